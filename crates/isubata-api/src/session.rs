use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use tracing::debug;

use isubata_db::models::UserRow;
use isubata_types::api::SessionClaims;

use crate::error::AppError;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "session";

/// Lifetime of a session token in seconds.
const SESSION_TTL_SECS: i64 = 360_000;

/// Issue a signed session for `user_id` and attach it to the jar.
pub fn start(jar: CookieJar, secret: &str, user_id: i64) -> Result<CookieJar, AppError> {
    let claims = SessionClaims {
        sub: user_id,
        exp: (chrono::Utc::now() + chrono::Duration::seconds(SESSION_TTL_SECS)).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(e.into()))?;

    Ok(jar.add(
        Cookie::build((SESSION_COOKIE, token))
            .path("/")
            .http_only(true),
    ))
}

pub fn end(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
}

/// User id carried by a valid, unexpired session cookie.
pub fn session_user_id(jar: &CookieJar, secret: &str) -> Option<i64> {
    let token = jar.get(SESSION_COOKIE)?;

    decode::<SessionClaims>(
        token.value(),
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims.sub)
    .ok()
}

enum Session {
    Anonymous,
    /// Token is valid but its user row no longer exists.
    Stale,
    User(UserRow),
}

async fn resolve(state: &AppState, jar: &CookieJar) -> Result<Session, AppError> {
    let Some(user_id) = session_user_id(jar, &state.session_secret) else {
        return Ok(Session::Anonymous);
    };

    match state.with_db(move |db| db.get_user_by_id(user_id)).await? {
        Some(user) => Ok(Session::User(user)),
        None => {
            debug!("Session for missing user {}", user_id);
            Ok(Session::Stale)
        }
    }
}

/// Gate for page routes: anonymous visitors are sent to `/login`.
pub async fn require_login(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    match resolve(&state, &jar).await {
        Ok(Session::User(user)) => {
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        Ok(Session::Stale) => (end(jar), Redirect::to("/login")).into_response(),
        Ok(Session::Anonymous) => Redirect::to("/login").into_response(),
        Err(e) => e.into_response(),
    }
}

/// Gate for API routes: anything but a live user is 403.
pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    match resolve(&state, &jar).await {
        Ok(Session::User(user)) => {
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        Ok(Session::Stale | Session::Anonymous) => AppError::Forbidden.into_response(),
        Err(e) => e.into_response(),
    }
}
