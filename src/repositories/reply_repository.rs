// src/repositories/reply_repository.rs

use rusqlite::{params, params_from_iter, OptionalExtension, Row};
use std::sync::Arc;
use uuid::Uuid;

use super::filter::{Filter, FilterColumn};
use super::sql::{count_column, timestamp_column, uuid_column};
use crate::db::ConnectionPool;
use crate::domain::{EntityKind, Reply};
use crate::error::AppResult;

const SELECT_REPLIES: &str =
    "SELECT id, comment_id, episode_id, user_id, text, created_at FROM replies";

const FILTER_COLUMNS: &[FilterColumn] = &[
    FilterColumn::Comment,
    FilterColumn::Episode,
    FilterColumn::User,
];

#[cfg_attr(test, mockall::automock)]
pub trait ReplyRepository: Send + Sync {
    fn save(&self, reply: &Reply) -> AppResult<()>;

    /// Rewrites the text only; parent references never change here
    fn update(&self, reply: &Reply) -> AppResult<bool>;

    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Reply>>;
    fn list(&self, filter: &Filter) -> AppResult<Vec<Reply>>;
    fn delete(&self, id: Uuid) -> AppResult<bool>;
    fn delete_many(&self, filter: &Filter) -> AppResult<usize>;
    fn count_by_episode(&self, episode_id: Uuid) -> AppResult<Option<u32>>;

    /// Bulk move of a comment's replies from one episode to another
    fn move_to_episode(&self, comment_id: Uuid, from: Uuid, to: Uuid) -> AppResult<usize>;
}

pub struct SqliteReplyRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteReplyRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_reply(row: &Row) -> rusqlite::Result<Reply> {
        Ok(Reply {
            id: uuid_column(row, "id")?,
            comment_id: uuid_column(row, "comment_id")?,
            episode_id: uuid_column(row, "episode_id")?,
            user_id: uuid_column(row, "user_id")?,
            text: row.get("text")?,
            created_at: timestamp_column(row, "created_at")?,
        })
    }
}

impl ReplyRepository for SqliteReplyRepository {
    fn save(&self, reply: &Reply) -> AppResult<()> {
        let conn = self.pool.get()?;

        conn.execute(
            "INSERT INTO replies (id, comment_id, episode_id, user_id, text, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                reply.id.to_string(),
                reply.comment_id.to_string(),
                reply.episode_id.to_string(),
                reply.user_id.to_string(),
                reply.text,
                reply.created_at.to_rfc3339(),
            ],
        )?;

        Ok(())
    }

    fn update(&self, reply: &Reply) -> AppResult<bool> {
        let conn = self.pool.get()?;
        let rows = conn.execute(
            "UPDATE replies SET text = ?1 WHERE id = ?2",
            params![reply.text, reply.id.to_string()],
        )?;
        Ok(rows > 0)
    }

    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Reply>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&format!("{} WHERE id = ?1", SELECT_REPLIES))?;

        let reply = stmt
            .query_row(params![id.to_string()], Self::row_to_reply)
            .optional()?;

        Ok(reply)
    }

    fn list(&self, filter: &Filter) -> AppResult<Vec<Reply>> {
        let (clause, values) = filter.where_clause(EntityKind::Reply, FILTER_COLUMNS)?;
        let conn = self.pool.get()?;
        let mut stmt =
            conn.prepare(&format!("{}{} ORDER BY created_at", SELECT_REPLIES, clause))?;

        let replies = stmt
            .query_map(params_from_iter(values.iter()), Self::row_to_reply)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(replies)
    }

    fn delete(&self, id: Uuid) -> AppResult<bool> {
        let conn = self.pool.get()?;
        let rows = conn.execute("DELETE FROM replies WHERE id = ?1", params![id.to_string()])?;
        Ok(rows > 0)
    }

    fn delete_many(&self, filter: &Filter) -> AppResult<usize> {
        let (clause, values) = filter.delete_clause(EntityKind::Reply, FILTER_COLUMNS)?;
        let conn = self.pool.get()?;
        let rows = conn.execute(
            &format!("DELETE FROM replies{}", clause),
            params_from_iter(values.iter()),
        )?;
        Ok(rows)
    }

    fn count_by_episode(&self, episode_id: Uuid) -> AppResult<Option<u32>> {
        let conn = self.pool.get()?;

        let count = conn
            .query_row(
                "SELECT COUNT(*) AS n_docs FROM replies WHERE episode_id = ?1 GROUP BY episode_id",
                params![episode_id.to_string()],
                |row| count_column(row, "n_docs"),
            )
            .optional()?;

        Ok(count)
    }

    fn move_to_episode(&self, comment_id: Uuid, from: Uuid, to: Uuid) -> AppResult<usize> {
        let conn = self.pool.get()?;
        let rows = conn.execute(
            "UPDATE replies SET episode_id = ?1 WHERE comment_id = ?2 AND episode_id = ?3",
            params![to.to_string(), comment_id.to_string(), from.to_string()],
        )?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::create_test_pool;
    use crate::domain::NewReply;

    fn reply(comment_id: Uuid, episode_id: Uuid) -> Reply {
        Reply::new(NewReply {
            comment_id,
            episode_id,
            user_id: Uuid::new_v4(),
            text: "agreed".to_string(),
        })
    }

    #[test]
    fn test_move_to_episode_only_touches_matching_replies() {
        let (_dir, pool) = create_test_pool();
        let repo = SqliteReplyRepository::new(pool);
        let (comment, other_comment) = (Uuid::new_v4(), Uuid::new_v4());
        let (from, to) = (Uuid::new_v4(), Uuid::new_v4());

        repo.save(&reply(comment, from)).unwrap();
        repo.save(&reply(comment, from)).unwrap();
        repo.save(&reply(other_comment, from)).unwrap();

        assert_eq!(repo.move_to_episode(comment, from, to).unwrap(), 2);
        assert_eq!(repo.count_by_episode(to).unwrap(), Some(2));
        assert_eq!(repo.count_by_episode(from).unwrap(), Some(1));
    }

    #[test]
    fn test_update_keeps_parent_references() {
        let (_dir, pool) = create_test_pool();
        let repo = SqliteReplyRepository::new(pool);
        let mut stored = reply(Uuid::new_v4(), Uuid::new_v4());
        repo.save(&stored).unwrap();

        let original_episode = stored.episode_id;
        stored.text = "changed my mind".to_string();
        stored.episode_id = Uuid::new_v4();
        assert!(repo.update(&stored).unwrap());

        let loaded = repo.get_by_id(stored.id).unwrap().unwrap();
        assert_eq!(loaded.text, "changed my mind");
        assert_eq!(loaded.episode_id, original_episode);
    }
}
