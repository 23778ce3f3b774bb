pub mod auth;
pub mod channels;
pub mod error;
pub mod icons;
pub mod initialize;
pub mod messages;
pub mod profile;
pub mod routes;
pub mod session;
pub mod state;
pub mod templates;
pub mod views;

pub use error::AppError;
pub use routes::router;
pub use state::{AppState, AppStateInner};
