use axum::{
    Extension,
    extract::{Multipart, Path, State, multipart::MultipartError},
    response::{Html, Redirect},
};
use minijinja::context;
use tracing::{info, warn};

use isubata_crypto::{avatar_extension, image_name};
use isubata_db::models::UserRow;
use isubata_types::models::PublicUser;

use crate::error::AppError;
use crate::state::AppState;
use crate::views::{UserView, channel_infos};

/// 1 MiB upload limit for avatars
pub const AVATAR_MAX_BYTES: usize = 1024 * 1024;

/// GET /profile: shortcut to the caller's own profile.
pub async fn own_profile(Extension(user): Extension<UserRow>) -> Redirect {
    Redirect::to(&format!("/profile/{}", user.name))
}

/// GET /profile/{user_name}
pub async fn profile_page(
    State(state): State<AppState>,
    Path(user_name): Path<String>,
    Extension(user): Extension<UserRow>,
) -> Result<Html<String>, AppError> {
    let (channels, other) = state
        .with_db(move |db| {
            let (channels, _) = db.list_channels(None)?;
            let other = db.get_user_by_name(&user_name)?;
            Ok((channels, other))
        })
        .await?;
    let other = other.ok_or(AppError::NotFound)?;

    state.templates.render(
        "profile.html",
        context! {
            channel_id => 0,
            channels => channel_infos(channels),
            user => UserView::from(&user),
            other => PublicUser {
                name: other.name,
                display_name: other.display_name,
                avatar_icon: other.avatar_icon,
            },
            self_profile => user.id == other.id,
        },
    )
}

fn rejected(e: MultipartError) -> AppError {
    warn!("Rejected profile upload: {}", e);
    AppError::BadRequest
}

/// POST /profile: multipart with optional `display_name` and `avatar_icon`.
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(user): Extension<UserRow>,
    mut multipart: Multipart,
) -> Result<Redirect, AppError> {
    let mut display_name = String::new();
    let mut avatar: Option<(String, Vec<u8>)> = None;

    while let Some(mut field) = multipart.next_field().await.map_err(rejected)? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("display_name") => {
                display_name = field.text().await.map_err(rejected)?;
            }
            Some("avatar_icon") => {
                let filename = field.file_name().unwrap_or_default().to_owned();
                if filename.is_empty() {
                    continue;
                }
                let ext = avatar_extension(&filename)
                    .ok_or(AppError::BadRequest)?
                    .to_owned();

                let mut data = Vec::new();
                while let Some(chunk) = field.chunk().await.map_err(rejected)? {
                    if data.len() + chunk.len() > AVATAR_MAX_BYTES {
                        return Err(AppError::BadRequest);
                    }
                    data.extend_from_slice(&chunk);
                }
                avatar = Some((image_name(&data, &ext), data));
            }
            _ => {}
        }
    }

    let user_id = user.id;
    if let Some((name, data)) = avatar.filter(|(_, data)| !data.is_empty()) {
        info!("User {} set avatar {}", user.name, name);
        state
            .with_db(move |db| db.set_avatar(user_id, &name, &data))
            .await?;
    }

    if !display_name.is_empty() {
        state
            .with_db(move |db| db.update_display_name(user_id, &display_name))
            .await?;
    }

    Ok(Redirect::to("/"))
}
