use std::path::Path;

use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::{debug, info};

use super::models::{Analytics, Attachment, EMPTY_SLOT_NAME, MAX_ATTACHMENTS, NewPost, Post};
use super::schema;
use super::{AnalyticsStorage, PostStorage};
use crate::errors::{DropError, Result};

const POST_SELECT: &str = "
    SELECT post_id, user_id, content, post_DateTime, file_type, comments
    FROM Posts
";

pub struct SqliteStorage {
    conn: Connection,
}

fn row_to_post(row: &Row) -> rusqlite::Result<Post> {
    let content: Option<String> = row.get(2)?;
    let date_time: Option<String> = row.get(3)?;
    let file_type: Option<String> = row.get(4)?;
    let comments: Option<String> = row.get(5)?;
    Ok(Post {
        post_id: row.get(0)?,
        user_id: row.get(1)?,
        content: content.unwrap_or_default(),
        date_time: date_time.unwrap_or_default(),
        file_type: file_type.unwrap_or_default(),
        comments: comments.unwrap_or_default(),
    })
}

fn row_to_analytics(row: &Row) -> rusqlite::Result<Analytics> {
    Ok(Analytics {
        post_id: row.get(0)?,
        views: row.get(1)?,
        likes: row.get(2)?,
    })
}

/// Lays attachments out over the fixed slots, filling the rest with the
/// sentinel name and no content.
fn slot_values(attachments: &[Attachment]) -> [(&str, Option<&[u8]>); MAX_ATTACHMENTS] {
    std::array::from_fn(|i| match attachments.get(i) {
        Some(a) => (a.name.as_str(), Some(a.content.as_slice())),
        None => (EMPTY_SLOT_NAME, None),
    })
}

impl SqliteStorage {
    pub fn new(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute(schema::CREATE_POSTS_TABLE, [])?;
        conn.execute(schema::CREATE_ANALYTICS_TABLE, [])?;
        Ok(Self { conn })
    }

    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::new(conn)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::new(conn)
    }

    #[cfg(test)]
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    fn increment(&self, column: &str, post_id: i64) -> Result<bool> {
        let sql = format!("UPDATE Analytics SET {column} = {column} + 1 WHERE post_id = ?1");
        let changes = self.conn.execute(&sql, params![post_id])?;
        if changes == 0 {
            debug!(post_id, column, "no analytics row, skipping increment");
        }
        Ok(changes > 0)
    }
}

impl PostStorage for SqliteStorage {
    fn list_posts(&self) -> Result<Vec<Post>> {
        let sql = format!("{} ORDER BY post_id ASC", POST_SELECT);
        let mut stmt = self.conn.prepare(&sql)?;
        let posts = stmt
            .query_map([], row_to_post)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(posts)
    }

    fn list_post_ids(&self) -> Result<Vec<i64>> {
        let mut stmt = self
            .conn
            .prepare("SELECT post_id FROM Posts ORDER BY post_id ASC")?;
        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<i64>, _>>()?;
        Ok(ids)
    }

    fn get_post(&self, post_id: i64) -> Result<Option<Post>> {
        let sql = format!("{} WHERE post_id = ?1", POST_SELECT);
        let post = self
            .conn
            .query_row(&sql, params![post_id], row_to_post)
            .optional()?;
        Ok(post)
    }

    fn create_post(&self, post: NewPost) -> Result<i64> {
        if post.attachments.len() > MAX_ATTACHMENTS {
            return Err(DropError::Constraint(format!(
                "a post holds at most {} attachments, got {}",
                MAX_ATTACHMENTS,
                post.attachments.len()
            )));
        }
        let [s1, s2, s3] = slot_values(&post.attachments);

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO Posts (
                user_id, file_type, content, post_DateTime,
                file_name_1, file_content_1,
                file_name_2, file_content_2,
                file_name_3, file_content_3
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                post.user_id,
                post.file_type,
                post.content,
                post.date_time,
                s1.0,
                s1.1,
                s2.0,
                s2.1,
                s3.0,
                s3.1,
            ],
        )?;
        let post_id = tx.last_insert_rowid();
        tx.execute(
            "INSERT INTO Analytics (post_id, views, likes) VALUES (?1, 0, 0)",
            params![post_id],
        )?;
        tx.commit()?;

        info!(post_id, attachments = post.attachments.len(), "created post");
        Ok(post_id)
    }

    fn delete_post(&self, post_id: i64) -> Result<bool> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM Analytics WHERE post_id = ?1", params![post_id])?;
        let removed = tx.execute("DELETE FROM Posts WHERE post_id = ?1", params![post_id])?;
        tx.commit()?;

        if removed > 0 {
            info!(post_id, "deleted post");
        }
        Ok(removed > 0)
    }

    fn get_attachments(&self, post_id: i64) -> Result<Vec<Attachment>> {
        let slots = self
            .conn
            .query_row(
                "SELECT file_name_1, file_content_1,
                        file_name_2, file_content_2,
                        file_name_3, file_content_3
                 FROM Posts WHERE post_id = ?1",
                params![post_id],
                |row| {
                    let mut slots = Vec::with_capacity(MAX_ATTACHMENTS);
                    for i in 0..MAX_ATTACHMENTS {
                        let name: Option<String> = row.get(i * 2)?;
                        let content: Option<Vec<u8>> = row.get(i * 2 + 1)?;
                        slots.push((name, content));
                    }
                    Ok(slots)
                },
            )
            .optional()?;

        let attachments = slots
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(name, content)| Some(Attachment::new(name?, content?)))
            .filter(Attachment::is_filled)
            .collect();
        Ok(attachments)
    }

    fn append_comment(&self, post_id: i64, text: &str) -> Result<bool> {
        let text = text.trim();
        if text.is_empty() {
            debug!(post_id, "blank comment, skipping");
            return Ok(false);
        }
        let changes = self.conn.execute(
            "UPDATE Posts
             SET comments = CASE
                 WHEN comments IS NULL OR comments = '' THEN ?1
                 ELSE comments || char(10) || ?1
             END
             WHERE post_id = ?2",
            params![text, post_id],
        )?;
        Ok(changes > 0)
    }

    fn get_comments(&self, post_id: i64) -> Result<Option<String>> {
        let comments = self
            .conn
            .query_row(
                "SELECT comments FROM Posts WHERE post_id = ?1",
                params![post_id],
                |row| row.get::<_, Option<String>>(0),
            )
            .optional()?;
        Ok(comments.map(Option::unwrap_or_default))
    }
}

impl AnalyticsStorage for SqliteStorage {
    fn get_analytics(&self, post_id: i64) -> Result<Option<Analytics>> {
        let analytics = self
            .conn
            .query_row(
                "SELECT post_id, views, likes FROM Analytics WHERE post_id = ?1",
                params![post_id],
                row_to_analytics,
            )
            .optional()?;
        Ok(analytics)
    }

    fn increment_view(&self, post_id: i64) -> Result<bool> {
        self.increment("views", post_id)
    }

    fn increment_like(&self, post_id: i64) -> Result<bool> {
        self.increment("likes", post_id)
    }

    fn ensure_all_have_analytics(&self) -> Result<usize> {
        let added = self.conn.execute(
            "INSERT INTO Analytics (post_id, views, likes)
             SELECT p.post_id, 0, 0 FROM Posts p
             WHERE NOT EXISTS (SELECT 1 FROM Analytics a WHERE a.post_id = p.post_id)",
            [],
        )?;
        if added > 0 {
            info!(added, "backfilled analytics rows");
        }
        Ok(added)
    }
}
