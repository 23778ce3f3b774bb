use axum::{
    Extension, Form,
    extract::{Path, State},
    response::{Html, Redirect},
};
use minijinja::context;
use tracing::info;

use isubata_db::models::UserRow;
use isubata_types::api::AddChannelForm;

use crate::error::AppError;
use crate::state::AppState;
use crate::views::{UserView, channel_infos};

/// GET /channel/{channel_id}
pub async fn channel_page(
    State(state): State<AppState>,
    Path(channel_id): Path<i64>,
    Extension(user): Extension<UserRow>,
) -> Result<Html<String>, AppError> {
    let (channels, description) = state
        .with_db(move |db| db.list_channels(Some(channel_id)))
        .await?;

    state.templates.render(
        "channel.html",
        context! {
            channel_id => channel_id,
            channels => channel_infos(channels),
            user => UserView::from(&user),
            description => description,
        },
    )
}

pub async fn add_channel_page(
    State(state): State<AppState>,
    Extension(user): Extension<UserRow>,
) -> Result<Html<String>, AppError> {
    let (channels, _) = state.with_db(|db| db.list_channels(None)).await?;

    state.templates.render(
        "add_channel.html",
        context! {
            channel_id => 0,
            channels => channel_infos(channels),
            user => UserView::from(&user),
        },
    )
}

pub async fn add_channel(
    State(state): State<AppState>,
    Extension(user): Extension<UserRow>,
    Form(form): Form<AddChannelForm>,
) -> Result<Redirect, AppError> {
    if form.name.is_empty() || form.description.is_empty() {
        return Err(AppError::BadRequest);
    }

    let name = form.name.clone();
    let channel_id = state
        .with_db(move |db| db.create_channel(&name, &form.description))
        .await?;

    info!("Channel {} '{}' created by {}", channel_id, form.name, user.name);
    Ok(Redirect::to(&format!("/channel/{}", channel_id)))
}
