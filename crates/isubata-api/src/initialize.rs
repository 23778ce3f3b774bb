use axum::{extract::State, http::StatusCode};

use crate::error::AppError;
use crate::state::AppState;

/// GET /initialize: restore the seeded dataset.
pub async fn initialize(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.with_db(|db| db.reset()).await?;
    Ok(StatusCode::NO_CONTENT)
}
