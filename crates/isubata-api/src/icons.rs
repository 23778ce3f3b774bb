use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};

use isubata_crypto::mime_for;

use crate::error::AppError;
use crate::state::AppState;

/// GET /icons/{file_name}
pub async fn get_icon(
    State(state): State<AppState>,
    Path(file_name): Path<String>,
) -> Result<Response, AppError> {
    let mime = mime_for(&file_name).ok_or(AppError::NotFound)?;

    let image = state
        .with_db(move |db| db.get_image(&file_name))
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(([(header::CONTENT_TYPE, mime)], image.data).into_response())
}
