use axum::{
    Extension, Form, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Html,
};
use minijinja::context;
use tracing::debug;

use isubata_db::models::UserRow;
use isubata_types::api::{HistoryQuery, MessageQuery, MessageResponse, PostMessageForm, UnreadCount};

use crate::error::AppError;
use crate::state::AppState;
use crate::views::{UserView, channel_infos, chronological};

/// Most messages returned by one `/message` poll.
const RECENT_LIMIT: u32 = 100;

/// Messages per history page.
const PAGE_SIZE: i64 = 20;

/// POST /message
pub async fn post_message(
    State(state): State<AppState>,
    Extension(user): Extension<UserRow>,
    Form(form): Form<PostMessageForm>,
) -> Result<StatusCode, AppError> {
    if form.message.is_empty() {
        return Err(AppError::Forbidden);
    }
    let channel_id: i64 = form.channel_id.parse().map_err(|_| AppError::Forbidden)?;
    if channel_id <= 0 {
        return Err(AppError::Forbidden);
    }

    let message_id = state
        .with_db(move |db| db.insert_message(channel_id, user.id, &form.message))
        .await?;

    debug!("Message {} posted to channel {}", message_id, channel_id);
    Ok(StatusCode::NO_CONTENT)
}

/// GET /message?channel_id&last_message_id
///
/// Also moves the caller's read watermark for the channel to the newest id
/// returned, or to 0 when nothing newer than `last_message_id` exists.
pub async fn get_messages(
    State(state): State<AppState>,
    Extension(user): Extension<UserRow>,
    Query(query): Query<MessageQuery>,
) -> Result<Json<Vec<MessageResponse>>, AppError> {
    let MessageQuery {
        channel_id,
        last_message_id,
    } = query;

    let rows = state
        .with_db(move |db| {
            let rows = db.get_messages_after(channel_id, last_message_id, RECENT_LIMIT)?;
            let max_id = rows.iter().map(|r| r.id).max().unwrap_or(0);
            db.upsert_have_read(user.id, channel_id, max_id)?;
            Ok(rows)
        })
        .await?;

    Ok(Json(chronological(rows)))
}

/// GET /fetch: unread counts for every channel.
pub async fn fetch_unread(
    State(state): State<AppState>,
    Extension(user): Extension<UserRow>,
) -> Result<Json<Vec<UnreadCount>>, AppError> {
    if !state.fetch_delay.is_zero() {
        tokio::time::sleep(state.fetch_delay).await;
    }

    let counts = state.with_db(move |db| db.unread_counts(user.id)).await?;

    Ok(Json(
        counts
            .into_iter()
            .map(|(channel_id, unread)| UnreadCount { channel_id, unread })
            .collect(),
    ))
}

/// Number of history pages for `count` messages. An empty channel still
/// has one (empty) page.
pub fn max_page(count: i64) -> i64 {
    ((count + PAGE_SIZE - 1) / PAGE_SIZE).max(1)
}

fn parse_page(raw: Option<&str>) -> Result<i64, AppError> {
    match raw {
        None | Some("") => Ok(1),
        // Digits only: `parse` alone would accept a leading sign.
        Some(s) if !s.bytes().all(|b| b.is_ascii_digit()) => Err(AppError::BadRequest),
        Some(s) => match s.parse::<i64>() {
            Ok(page) if page >= 1 => Ok(page),
            _ => Err(AppError::BadRequest),
        },
    }
}

/// GET /history/{channel_id}?page
pub async fn history_page(
    State(state): State<AppState>,
    Path(channel_id): Path<i64>,
    Extension(user): Extension<UserRow>,
    Query(query): Query<HistoryQuery>,
) -> Result<Html<String>, AppError> {
    if channel_id <= 0 {
        return Err(AppError::BadRequest);
    }
    let page = parse_page(query.page.as_deref())?;

    let count = state.with_db(move |db| db.count_messages(channel_id)).await?;
    let max_page = max_page(count);
    if page > max_page {
        return Err(AppError::BadRequest);
    }

    let (rows, channels) = state
        .with_db(move |db| {
            let rows = db.get_messages_page(channel_id, PAGE_SIZE, (page - 1) * PAGE_SIZE)?;
            let (channels, _) = db.list_channels(None)?;
            Ok((rows, channels))
        })
        .await?;

    state.templates.render(
        "history.html",
        context! {
            channel_id => channel_id,
            channels => channel_infos(channels),
            messages => chronological(rows),
            max_page => max_page,
            page => page,
            user => UserView::from(&user),
        },
    )
}
