//! One struct per table, shaped like the SELECTs in `queries`.

#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: i64,
    pub name: String,
    pub salt: String,
    pub password: String,
    pub display_name: String,
    pub avatar_icon: String,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct ChannelRow {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub updated_at: String,
    pub created_at: String,
}

/// A message joined with the public fields of its author.
#[derive(Debug, Clone)]
pub struct MessageRow {
    pub id: i64,
    pub channel_id: i64,
    pub user_id: i64,
    pub content: String,
    pub created_at: String,
    pub author_name: String,
    pub author_display_name: String,
    pub author_avatar_icon: String,
}

#[derive(Debug, Clone)]
pub struct ImageRow {
    pub id: i64,
    pub name: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct HaveReadRow {
    pub user_id: i64,
    pub channel_id: i64,
    pub message_id: i64,
    pub updated_at: String,
    pub created_at: String,
}
