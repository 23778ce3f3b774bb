use std::sync::Arc;
use std::time::Duration;

use tracing::error;

use isubata_db::Database;

use crate::error::AppError;
use crate::templates::Templates;

pub type AppState = Arc<AppStateInner>;

/// Everything a request handler needs, passed explicitly through axum state.
pub struct AppStateInner {
    pub db: Database,
    pub session_secret: String,
    pub templates: Templates,
    /// Artificial delay before `/fetch` answers. Zero disables it.
    pub fetch_delay: Duration,
}

impl AppStateInner {
    /// Runs blocking DB work off the async runtime. The connection is held
    /// only for the duration of `f`.
    pub async fn with_db<F, T>(self: &Arc<Self>, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&Database) -> anyhow::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let state = self.clone();
        tokio::task::spawn_blocking(move || f(&state.db))
            .await
            .map_err(|e| {
                error!("spawn_blocking join error: {}", e);
                AppError::Internal(e.into())
            })?
            .map_err(AppError::from)
    }
}
