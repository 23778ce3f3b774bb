use crate::Database;
use crate::migrations::DEFAULT_AVATAR_NAME;
use crate::models::{ChannelRow, HaveReadRow, ImageRow, MessageRow, UserRow};
use anyhow::Result;
use rusqlite::{Connection, ErrorCode, Row};
use tracing::info;

/// Highest ids belonging to the seeded dataset. `reset` drops everything above.
pub const SEED_MAX_USER_ID: i64 = 1000;
pub const SEED_MAX_IMAGE_ID: i64 = 1001;
pub const SEED_MAX_CHANNEL_ID: i64 = 10;
pub const SEED_MAX_MESSAGE_ID: i64 = 10000;

const USER_COLUMNS: &str = "id, name, salt, password, display_name, avatar_icon, created_at";

// Messages joined with their author; a deleted author shows up as "unknown".
const MESSAGE_SELECT: &str = "SELECT m.id, m.channel_id, m.user_id, m.content, m.created_at,
        COALESCE(u.name, 'unknown'), COALESCE(u.display_name, 'unknown'),
        COALESCE(u.avatar_icon, 'default.png')
     FROM message m
     LEFT JOIN user u ON m.user_id = u.id";

impl Database {
    // -- Users --

    /// Inserts a new user and returns its id, or `None` if the name is taken.
    pub fn create_user(&self, name: &str, salt: &str, password_digest: &str) -> Result<Option<i64>> {
        self.with_conn(|conn| {
            let inserted = conn.execute(
                "INSERT INTO user (name, salt, password, display_name, avatar_icon)
                 VALUES (?1, ?2, ?3, ?1, ?4)",
                (name, salt, password_digest, DEFAULT_AVATAR_NAME),
            );
            match inserted {
                Ok(_) => Ok(Some(conn.last_insert_rowid())),
                Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                    Ok(None)
                }
                Err(e) => Err(e.into()),
            }
        })
    }

    pub fn get_user_by_id(&self, id: i64) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!("SELECT {USER_COLUMNS} FROM user WHERE id = ?1"),
                [id],
                user_from_row,
            )
            .optional()
        })
    }

    pub fn get_user_by_name(&self, name: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!("SELECT {USER_COLUMNS} FROM user WHERE name = ?1"),
                [name],
                user_from_row,
            )
            .optional()
        })
    }

    pub fn update_display_name(&self, user_id: i64, display_name: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "UPDATE user SET display_name = ?1 WHERE id = ?2",
                rusqlite::params![display_name, user_id],
            )?;
            Ok(())
        })
    }

    /// Stores the image under its content-addressed name (a no-op if the
    /// same bytes were uploaded before) and points the user's avatar at it.
    pub fn set_avatar(&self, user_id: i64, image_name: &str, data: &[u8]) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT OR IGNORE INTO image (name, data) VALUES (?1, ?2)",
                rusqlite::params![image_name, data],
            )?;
            conn.execute(
                "UPDATE user SET avatar_icon = ?1 WHERE id = ?2",
                rusqlite::params![image_name, user_id],
            )?;
            Ok(())
        })
    }

    // -- Images --

    pub fn get_image(&self, name: &str) -> Result<Option<ImageRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT id, name, data FROM image WHERE name = ?1",
                [name],
                image_from_row,
            )
            .optional()
        })
    }

    pub fn list_images(&self) -> Result<Vec<ImageRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT id, name, data FROM image ORDER BY id")?;
            let rows = stmt
                .query_map([], image_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Channels --

    /// All channels by id, plus the description of `focus_id` (empty when
    /// there is no focus or no such channel).
    pub fn list_channels(&self, focus_id: Option<i64>) -> Result<(Vec<ChannelRow>, String)> {
        let channels = self.with_conn(query_channels)?;
        let description = focus_id
            .and_then(|id| channels.iter().find(|c| c.id == id))
            .map(|c| c.description.clone())
            .unwrap_or_default();
        Ok((channels, description))
    }

    pub fn create_channel(&self, name: &str, description: &str) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO channel (name, description) VALUES (?1, ?2)",
                (name, description),
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    // -- Messages --

    pub fn insert_message(&self, channel_id: i64, user_id: i64, content: &str) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO message (channel_id, user_id, content) VALUES (?1, ?2, ?3)",
                rusqlite::params![channel_id, user_id, content],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Up to `limit` messages of the channel newer than `after_id`, newest first.
    pub fn get_messages_after(&self, channel_id: i64, after_id: i64, limit: u32) -> Result<Vec<MessageRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "{MESSAGE_SELECT}
                 WHERE m.id > ?1 AND m.channel_id = ?2
                 ORDER BY m.id DESC
                 LIMIT ?3"
            ))?;
            let rows = stmt
                .query_map(rusqlite::params![after_id, channel_id, limit], message_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// One page of the channel's messages, newest first.
    pub fn get_messages_page(&self, channel_id: i64, limit: i64, offset: i64) -> Result<Vec<MessageRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "{MESSAGE_SELECT}
                 WHERE m.channel_id = ?1
                 ORDER BY m.id DESC
                 LIMIT ?2 OFFSET ?3"
            ))?;
            let rows = stmt
                .query_map(rusqlite::params![channel_id, limit, offset], message_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn count_messages(&self, channel_id: i64) -> Result<i64> {
        self.with_conn(|conn| {
            let count = conn.query_row(
                "SELECT COUNT(*) FROM message WHERE channel_id = ?1",
                [channel_id],
                |row| row.get(0),
            )?;
            Ok(count)
        })
    }

    // -- HaveRead --

    /// Insert-or-update of the read watermark for (user, channel).
    pub fn upsert_have_read(&self, user_id: i64, channel_id: i64, message_id: i64) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO haveread (user_id, channel_id, message_id)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(user_id, channel_id)
                 DO UPDATE SET message_id = excluded.message_id, updated_at = datetime('now')",
                rusqlite::params![user_id, channel_id, message_id],
            )?;
            Ok(())
        })
    }

    pub fn get_have_read(&self, user_id: i64, channel_id: i64) -> Result<Option<HaveReadRow>> {
        self.with_conn(|conn| query_have_read(conn, user_id, channel_id))
    }

    /// `(channel_id, unread)` for every channel in id order. Without a
    /// watermark every message of the channel counts as unread.
    pub fn unread_counts(&self, user_id: i64) -> Result<Vec<(i64, i64)>> {
        self.with_conn(|conn| {
            let channel_ids = {
                let mut stmt = conn.prepare("SELECT id FROM channel ORDER BY id")?;
                let ids = stmt
                    .query_map([], |row| row.get::<_, i64>(0))?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                ids
            };

            let mut counts = Vec::with_capacity(channel_ids.len());
            for channel_id in channel_ids {
                let unread: i64 = match query_have_read(conn, user_id, channel_id)? {
                    Some(have_read) => conn.query_row(
                        "SELECT COUNT(*) FROM message WHERE channel_id = ?1 AND ?2 < id",
                        [channel_id, have_read.message_id],
                        |row| row.get(0),
                    )?,
                    None => conn.query_row(
                        "SELECT COUNT(*) FROM message WHERE channel_id = ?1",
                        [channel_id],
                        |row| row.get(0),
                    )?,
                };
                counts.push((channel_id, unread));
            }
            Ok(counts)
        })
    }

    // -- Reset --

    /// Drops everything created after the seeded baseline.
    pub fn reset(&self) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM user WHERE id > ?1", [SEED_MAX_USER_ID])?;
            conn.execute("DELETE FROM image WHERE id > ?1", [SEED_MAX_IMAGE_ID])?;
            conn.execute("DELETE FROM channel WHERE id > ?1", [SEED_MAX_CHANNEL_ID])?;
            conn.execute("DELETE FROM message WHERE id > ?1", [SEED_MAX_MESSAGE_ID])?;
            conn.execute("DELETE FROM haveread", [])?;
            info!("Dataset reset to seed baseline");
            Ok(())
        })
    }
}

fn query_channels(conn: &Connection) -> Result<Vec<ChannelRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, description, updated_at, created_at FROM channel ORDER BY id",
    )?;

    let rows = stmt
        .query_map([], |row| {
            Ok(ChannelRow {
                id: row.get(0)?,
                name: row.get(1)?,
                description: row.get(2)?,
                updated_at: row.get(3)?,
                created_at: row.get(4)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn query_have_read(conn: &Connection, user_id: i64, channel_id: i64) -> Result<Option<HaveReadRow>> {
    conn.query_row(
        "SELECT user_id, channel_id, message_id, updated_at, created_at
         FROM haveread WHERE user_id = ?1 AND channel_id = ?2",
        [user_id, channel_id],
        |row| {
            Ok(HaveReadRow {
                user_id: row.get(0)?,
                channel_id: row.get(1)?,
                message_id: row.get(2)?,
                updated_at: row.get(3)?,
                created_at: row.get(4)?,
            })
        },
    )
    .optional()
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        name: row.get(1)?,
        salt: row.get(2)?,
        password: row.get(3)?,
        display_name: row.get(4)?,
        avatar_icon: row.get(5)?,
        created_at: row.get(6)?,
    })
}

fn image_from_row(row: &Row<'_>) -> rusqlite::Result<ImageRow> {
    Ok(ImageRow {
        id: row.get(0)?,
        name: row.get(1)?,
        data: row.get(2)?,
    })
}

fn message_from_row(row: &Row<'_>) -> rusqlite::Result<MessageRow> {
    Ok(MessageRow {
        id: row.get(0)?,
        channel_id: row.get(1)?,
        user_id: row.get(2)?,
        content: row.get(3)?,
        created_at: row.get(4)?,
        author_name: row.get(5)?,
        author_display_name: row.get(6)?,
        author_avatar_icon: row.get(7)?,
    })
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn duplicate_user_name_is_reported() {
        let db = db();
        let id = db.create_user("alice", "salt", "digest").unwrap();
        assert!(id.is_some());
        assert_eq!(db.create_user("alice", "salt2", "digest2").unwrap(), None);

        let user = db.get_user_by_name("alice").unwrap().unwrap();
        assert_eq!(Some(user.id), id);
        assert_eq!(user.display_name, "alice");
        assert_eq!(user.avatar_icon, "default.png");
        assert!(db.get_user_by_name("bob").unwrap().is_none());
    }

    #[test]
    fn list_channels_reports_focus_description() {
        let db = db();
        let id = db.create_channel("random", "off topic").unwrap();

        let (channels, desc) = db.list_channels(Some(id)).unwrap();
        assert_eq!(channels.iter().map(|c| c.id).collect::<Vec<_>>(), vec![1, id]);
        assert_eq!(desc, "off topic");

        assert_eq!(db.list_channels(Some(999)).unwrap().1, "");
        assert_eq!(db.list_channels(None).unwrap().1, "");
    }

    #[test]
    fn messages_after_are_newest_first_and_limited() {
        let db = db();
        let uid = db.create_user("alice", "s", "d").unwrap().unwrap();
        let ids: Vec<i64> = (0..5)
            .map(|i| db.insert_message(1, uid, &format!("m{i}")).unwrap())
            .collect();
        db.insert_message(2, uid, "elsewhere").unwrap();

        let rows = db.get_messages_after(1, ids[1], 2).unwrap();
        assert_eq!(rows.iter().map(|r| r.id).collect::<Vec<_>>(), vec![ids[4], ids[3]]);
        assert_eq!(rows[0].author_name, "alice");
        assert_eq!(db.count_messages(1).unwrap(), 5);
    }

    #[test]
    fn same_image_is_stored_once() {
        let db = db();
        let a = db.create_user("alice", "s", "d").unwrap().unwrap();
        let b = db.create_user("bob", "s", "d").unwrap().unwrap();
        db.set_avatar(a, "abc.png", b"bytes").unwrap();
        db.set_avatar(b, "abc.png", b"bytes").unwrap();

        let names: Vec<String> = db.list_images().unwrap().into_iter().map(|i| i.name).collect();
        assert_eq!(names, vec![DEFAULT_AVATAR_NAME.to_string(), "abc.png".to_string()]);
        assert_eq!(db.get_user_by_id(b).unwrap().unwrap().avatar_icon, "abc.png");
        assert_eq!(db.get_image("abc.png").unwrap().unwrap().data, b"bytes");
    }

    #[test]
    fn unread_counts_follow_watermark() {
        let db = db();
        let uid = db.create_user("alice", "s", "d").unwrap().unwrap();
        let first = db.insert_message(1, uid, "one").unwrap();
        db.insert_message(1, uid, "two").unwrap();

        assert_eq!(db.unread_counts(uid).unwrap(), vec![(1, 2)]);
        db.upsert_have_read(uid, 1, first).unwrap();
        assert_eq!(db.unread_counts(uid).unwrap(), vec![(1, 1)]);
        db.upsert_have_read(uid, 1, 0).unwrap();
        assert_eq!(db.get_have_read(uid, 1).unwrap().unwrap().message_id, 0);
    }

    #[test]
    fn reset_keeps_seed_rows() {
        let db = db();
        db.with_conn(|conn| {
            conn.execute_batch(
                "INSERT INTO user (id, name, salt, password, display_name, avatar_icon)
                     VALUES (5, 'seed', 's', 'p', 'seed', 'default.png'),
                            (1001, 'late', 's', 'p', 'late', 'default.png');
                 INSERT INTO channel (id, name, description) VALUES (11, 'late', 'x');
                 INSERT INTO message (id, channel_id, user_id, content) VALUES (10001, 1, 5, 'late');
                 INSERT INTO haveread (user_id, channel_id, message_id) VALUES (5, 1, 10001);",
            )?;
            Ok(())
        })
        .unwrap();

        db.reset().unwrap();
        db.reset().unwrap();

        assert!(db.get_user_by_id(5).unwrap().is_some());
        assert!(db.get_user_by_id(1001).unwrap().is_none());
        assert_eq!(db.list_channels(None).unwrap().0.len(), 1);
        assert_eq!(db.count_messages(1).unwrap(), 0);
        assert!(db.get_have_read(5, 1).unwrap().is_none());
    }
}
