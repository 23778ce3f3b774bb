use axum::{
    Form,
    extract::State,
    response::{Html, IntoResponse, Redirect},
};
use axum_extra::extract::cookie::CookieJar;
use minijinja::context;
use tracing::info;

use isubata_crypto::{SALT_LEN, hash_password, random_string, verify_password};
use isubata_types::api::CredentialsForm;
use isubata_types::models::ChannelInfo;

use crate::error::AppError;
use crate::session;
use crate::state::AppState;

/// GET /: signed-in users go straight to the first channel.
pub async fn index(State(state): State<AppState>, jar: CookieJar) -> Result<impl IntoResponse, AppError> {
    if session::session_user_id(&jar, &state.session_secret).is_some() {
        return Ok(Redirect::to("/channel/1").into_response());
    }

    Ok(state
        .templates
        .render("index.html", context! { channel_id => () })?
        .into_response())
}

pub async fn register_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    anonymous_page(&state, "register.html")
}

pub async fn login_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    anonymous_page(&state, "login.html")
}

fn anonymous_page(state: &AppState, name: &str) -> Result<Html<String>, AppError> {
    state.templates.render(
        name,
        context! { channel_id => 0, channels => Vec::<ChannelInfo>::new(), user => () },
    )
}

pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<CredentialsForm>,
) -> Result<impl IntoResponse, AppError> {
    if form.name.is_empty() || form.password.is_empty() {
        return Err(AppError::BadRequest);
    }

    let salt = random_string(SALT_LEN);
    let digest = hash_password(&salt, &form.password);

    let name = form.name.clone();
    let user_id = state
        .with_db(move |db| db.create_user(&name, &salt, &digest))
        .await?
        .ok_or(AppError::Conflict)?;

    info!("Registered user {} ({})", form.name, user_id);

    let jar = session::start(jar, &state.session_secret, user_id)?;
    Ok((jar, Redirect::to("/")))
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<CredentialsForm>,
) -> Result<impl IntoResponse, AppError> {
    if form.name.is_empty() || form.password.is_empty() {
        return Err(AppError::BadRequest);
    }

    let name = form.name.clone();
    let user = state
        .with_db(move |db| db.get_user_by_name(&name))
        .await?
        .ok_or(AppError::Forbidden)?;

    if !verify_password(&user.salt, &form.password, &user.password) {
        return Err(AppError::Forbidden);
    }

    let jar = session::start(jar, &state.session_secret, user.id)?;
    Ok((jar, Redirect::to("/")))
}

pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    (session::end(jar), Redirect::to("/"))
}
