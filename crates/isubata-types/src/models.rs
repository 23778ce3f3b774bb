use serde::{Deserialize, Serialize};

/// The fields of a user that other users are allowed to see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    pub name: String,
    pub display_name: String,
    pub avatar_icon: String,
}

/// Channel entry as shown in the sidebar of every page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelInfo {
    pub id: i64,
    pub name: String,
    pub description: String,
}
