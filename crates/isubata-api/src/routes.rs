use axum::{
    Router, middleware,
    routing::get,
};

use crate::session::{require_login, require_session};
use crate::state::AppState;
use crate::{auth, channels, icons, initialize, messages, profile};

/// All application routes. Static assets are left to the caller.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/initialize", get(initialize::initialize))
        .route("/", get(auth::index))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/icons/{file_name}", get(icons::get_icon));

    let page_routes = Router::new()
        .route("/channel/{channel_id}", get(channels::channel_page))
        .route("/history/{channel_id}", get(messages::history_page))
        .route("/profile", get(profile::own_profile).post(profile::update_profile))
        .route("/profile/{user_name}", get(profile::profile_page))
        .route("/add_channel", get(channels::add_channel_page).post(channels::add_channel))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_login));

    let api_routes = Router::new()
        .route("/message", get(messages::get_messages).post(messages::post_message))
        .route("/fetch", get(messages::fetch_unread))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session));

    Router::new()
        .merge(public_routes)
        .merge(page_routes)
        .merge(api_routes)
        .with_state(state)
}
