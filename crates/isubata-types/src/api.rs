use serde::{Deserialize, Serialize};

use crate::models::PublicUser;

// -- Session --

/// Claims carried by the session cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: i64,
    pub exp: usize,
}

// -- Auth --

#[derive(Debug, Default, Deserialize)]
pub struct CredentialsForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub password: String,
}

// -- Messages --

/// Fields are kept as raw strings so that malformed input can be
/// rejected with the status the endpoint documents instead of 422.
#[derive(Debug, Default, Deserialize)]
pub struct PostMessageForm {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub channel_id: String,
}

#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub channel_id: i64,
    pub last_message_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub id: i64,
    pub user: PublicUser,
    pub date: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnreadCount {
    pub channel_id: i64,
    pub unread: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub page: Option<String>,
}

// -- Channels --

#[derive(Debug, Default, Deserialize)]
pub struct AddChannelForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}
