use serde::Serialize;
use tracing::warn;

use isubata_db::models::{ChannelRow, MessageRow, UserRow};
use isubata_types::api::MessageResponse;
use isubata_types::models::{ChannelInfo, PublicUser};

/// Signed-in user as templates see it.
#[derive(Debug, Serialize)]
pub struct UserView {
    pub id: i64,
    pub name: String,
    pub display_name: String,
    pub avatar_icon: String,
}

impl From<&UserRow> for UserView {
    fn from(row: &UserRow) -> Self {
        Self {
            id: row.id,
            name: row.name.clone(),
            display_name: row.display_name.clone(),
            avatar_icon: row.avatar_icon.clone(),
        }
    }
}

pub fn channel_infos(rows: Vec<ChannelRow>) -> Vec<ChannelInfo> {
    rows.into_iter()
        .map(|row| ChannelInfo {
            id: row.id,
            name: row.name,
            description: row.description,
        })
        .collect()
}

/// Rows come newest-first from storage; clients read them oldest-first.
pub fn chronological(rows: Vec<MessageRow>) -> Vec<MessageResponse> {
    rows.into_iter().rev().map(message_response).collect()
}

fn message_response(row: MessageRow) -> MessageResponse {
    MessageResponse {
        id: row.id,
        date: display_date(&row.created_at, row.id),
        user: PublicUser {
            name: row.author_name,
            display_name: row.author_display_name,
            avatar_icon: row.author_avatar_icon,
        },
        content: row.content,
    }
}

// SQLite stores timestamps as "YYYY-MM-DD HH:MM:SS" without timezone.
fn display_date(created_at: &str, message_id: i64) -> String {
    chrono::NaiveDateTime::parse_from_str(created_at, "%Y-%m-%d %H:%M:%S")
        .map(|ts| ts.format("%Y/%m/%d %H:%M:%S").to_string())
        .unwrap_or_else(|e| {
            warn!("Corrupt created_at '{}' on message {}: {}", created_at, message_id, e);
            created_at.to_string()
        })
}
