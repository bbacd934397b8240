// src/repositories/comment_repository.rs

use rusqlite::{params, params_from_iter, OptionalExtension, Row};
use std::sync::Arc;
use uuid::Uuid;

use super::filter::{Filter, FilterColumn};
use super::sql::{count_column, timestamp_column, uuid_column};
use crate::db::ConnectionPool;
use crate::domain::{Comment, EntityKind};
use crate::error::AppResult;

const SELECT_COMMENTS: &str =
    "SELECT id, episode_id, user_id, text, created_at FROM comments";

const FILTER_COLUMNS: &[FilterColumn] = &[FilterColumn::Episode, FilterColumn::User];

#[cfg_attr(test, mockall::automock)]
pub trait CommentRepository: Send + Sync {
    fn save(&self, comment: &Comment) -> AppResult<()>;
    fn update(&self, comment: &Comment) -> AppResult<bool>;
    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Comment>>;
    fn exists(&self, id: Uuid) -> AppResult<bool>;
    fn list(&self, filter: &Filter) -> AppResult<Vec<Comment>>;
    fn delete(&self, id: Uuid) -> AppResult<bool>;
    fn delete_many(&self, filter: &Filter) -> AppResult<usize>;
    fn count_by_episode(&self, episode_id: Uuid) -> AppResult<Option<u32>>;
}

pub struct SqliteCommentRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteCommentRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_comment(row: &Row) -> rusqlite::Result<Comment> {
        Ok(Comment {
            id: uuid_column(row, "id")?,
            episode_id: uuid_column(row, "episode_id")?,
            user_id: uuid_column(row, "user_id")?,
            text: row.get("text")?,
            created_at: timestamp_column(row, "created_at")?,
        })
    }
}

impl CommentRepository for SqliteCommentRepository {
    fn save(&self, comment: &Comment) -> AppResult<()> {
        let conn = self.pool.get()?;

        conn.execute(
            "INSERT INTO comments (id, episode_id, user_id, text, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                comment.id.to_string(),
                comment.episode_id.to_string(),
                comment.user_id.to_string(),
                comment.text,
                comment.created_at.to_rfc3339(),
            ],
        )?;

        Ok(())
    }

    fn update(&self, comment: &Comment) -> AppResult<bool> {
        let conn = self.pool.get()?;
        let rows = conn.execute(
            "UPDATE comments SET episode_id = ?1, text = ?2 WHERE id = ?3",
            params![
                comment.episode_id.to_string(),
                comment.text,
                comment.id.to_string(),
            ],
        )?;
        Ok(rows > 0)
    }

    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Comment>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&format!("{} WHERE id = ?1", SELECT_COMMENTS))?;

        let comment = stmt
            .query_row(params![id.to_string()], Self::row_to_comment)
            .optional()?;

        Ok(comment)
    }

    fn exists(&self, id: Uuid) -> AppResult<bool> {
        let conn = self.pool.get()?;

        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM comments WHERE id = ?1",
            params![id.to_string()],
            |row| row.get(0),
        )?;

        Ok(count > 0)
    }

    fn list(&self, filter: &Filter) -> AppResult<Vec<Comment>> {
        let (clause, values) = filter.where_clause(EntityKind::Comment, FILTER_COLUMNS)?;
        let conn = self.pool.get()?;
        let mut stmt =
            conn.prepare(&format!("{}{} ORDER BY created_at", SELECT_COMMENTS, clause))?;

        let comments = stmt
            .query_map(params_from_iter(values.iter()), Self::row_to_comment)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(comments)
    }

    fn delete(&self, id: Uuid) -> AppResult<bool> {
        let conn = self.pool.get()?;
        let rows = conn.execute("DELETE FROM comments WHERE id = ?1", params![id.to_string()])?;
        Ok(rows > 0)
    }

    fn delete_many(&self, filter: &Filter) -> AppResult<usize> {
        let (clause, values) = filter.delete_clause(EntityKind::Comment, FILTER_COLUMNS)?;
        let conn = self.pool.get()?;
        let rows = conn.execute(
            &format!("DELETE FROM comments{}", clause),
            params_from_iter(values.iter()),
        )?;
        Ok(rows)
    }

    fn count_by_episode(&self, episode_id: Uuid) -> AppResult<Option<u32>> {
        let conn = self.pool.get()?;

        let count = conn
            .query_row(
                "SELECT COUNT(*) AS n_docs FROM comments WHERE episode_id = ?1 GROUP BY episode_id",
                params![episode_id.to_string()],
                |row| count_column(row, "n_docs"),
            )
            .optional()?;

        Ok(count)
    }
}
