use axum::response::Html;
use minijinja::Environment;
use serde::Serialize;

use crate::error::AppError;

const TEMPLATES: &[(&str, &str)] = &[
    ("layout.html", include_str!("../templates/layout.html")),
    ("index.html", include_str!("../templates/index.html")),
    ("register.html", include_str!("../templates/register.html")),
    ("login.html", include_str!("../templates/login.html")),
    ("channel.html", include_str!("../templates/channel.html")),
    ("history.html", include_str!("../templates/history.html")),
    ("profile.html", include_str!("../templates/profile.html")),
    ("add_channel.html", include_str!("../templates/add_channel.html")),
];

/// HTML pages compiled into the binary.
pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        for &(name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Self { env })
    }

    pub fn render<S: Serialize>(&self, name: &str, ctx: S) -> Result<Html<String>, AppError> {
        let template = self.env.get_template(name)?;
        Ok(Html(template.render(ctx)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;

    #[test]
    fn every_page_renders_without_user() {
        let templates = Templates::new().unwrap();
        for page in ["index.html", "register.html", "login.html"] {
            let html = templates
                .render(page, context! { channel_id => 0, channels => Vec::<()>::new() })
                .unwrap();
            assert!(html.0.contains("isubata"), "{page} is missing the layout");
        }
    }
}
