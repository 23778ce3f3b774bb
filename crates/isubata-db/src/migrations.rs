use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

/// Avatar every new user starts with. Stored as image id 1.
pub const DEFAULT_AVATAR_NAME: &str = "default.png";
const DEFAULT_AVATAR: &[u8] = include_bytes!("../assets/default.png");

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS user (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            name            TEXT NOT NULL UNIQUE,
            salt            TEXT NOT NULL,
            password        TEXT NOT NULL,
            display_name    TEXT NOT NULL,
            avatar_icon     TEXT NOT NULL,
            created_at      TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS image (
            id      INTEGER PRIMARY KEY AUTOINCREMENT,
            name    TEXT NOT NULL UNIQUE,
            data    BLOB NOT NULL
        );

        CREATE TABLE IF NOT EXISTS channel (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT NOT NULL,
            description TEXT NOT NULL,
            updated_at  TEXT NOT NULL DEFAULT (datetime('now')),
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS message (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            channel_id  INTEGER NOT NULL,
            user_id     INTEGER NOT NULL,
            content     TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_message_channel
            ON message(channel_id, id);

        CREATE TABLE IF NOT EXISTS haveread (
            user_id     INTEGER NOT NULL,
            channel_id  INTEGER NOT NULL,
            message_id  INTEGER NOT NULL,
            updated_at  TEXT NOT NULL DEFAULT (datetime('now')),
            created_at  TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (user_id, channel_id)
        );

        -- Seed the landing channel
        INSERT OR IGNORE INTO channel (id, name, description)
            VALUES (1, 'general', 'Everyone starts here');
        ",
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO image (id, name, data) VALUES (1, ?1, ?2)",
        rusqlite::params![DEFAULT_AVATAR_NAME, DEFAULT_AVATAR],
    )?;

    info!("Database migrations complete");
    Ok(())
}
