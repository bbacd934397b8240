// src/repositories/watchlist_repository.rs

use rusqlite::{params, params_from_iter, OptionalExtension, Row};
use std::sync::Arc;
use uuid::Uuid;

use super::filter::{Filter, FilterColumn};
use super::sql::{timestamp_column, uuid_column};
use crate::db::ConnectionPool;
use crate::domain::{EntityKind, Watchlist};
use crate::error::AppResult;

const FILTER_COLUMNS: &[FilterColumn] = &[FilterColumn::Series, FilterColumn::User];

#[cfg_attr(test, mockall::automock)]
pub trait WatchlistRepository: Send + Sync {
    fn save(&self, watchlist: &Watchlist) -> AppResult<()>;
    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Watchlist>>;
    fn list(&self, filter: &Filter) -> AppResult<Vec<Watchlist>>;
    fn delete(&self, id: Uuid) -> AppResult<bool>;
    fn delete_many(&self, filter: &Filter) -> AppResult<usize>;
}

pub struct SqliteWatchlistRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteWatchlistRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_watchlist(row: &Row) -> rusqlite::Result<Watchlist> {
        Ok(Watchlist {
            id: uuid_column(row, "id")?,
            series_id: uuid_column(row, "series_id")?,
            user_id: uuid_column(row, "user_id")?,
            created_at: timestamp_column(row, "created_at")?,
        })
    }
}

impl WatchlistRepository for SqliteWatchlistRepository {
    fn save(&self, watchlist: &Watchlist) -> AppResult<()> {
        let conn = self.pool.get()?;

        conn.execute(
            "INSERT INTO watchlists (id, series_id, user_id, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                watchlist.id.to_string(),
                watchlist.series_id.to_string(),
                watchlist.user_id.to_string(),
                watchlist.created_at.to_rfc3339(),
            ],
        )?;

        Ok(())
    }

    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Watchlist>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT id, series_id, user_id, created_at FROM watchlists WHERE id = ?1",
        )?;

        let watchlist = stmt
            .query_row(params![id.to_string()], Self::row_to_watchlist)
            .optional()?;

        Ok(watchlist)
    }

    fn list(&self, filter: &Filter) -> AppResult<Vec<Watchlist>> {
        let (clause, values) = filter.where_clause(EntityKind::Watchlist, FILTER_COLUMNS)?;
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT id, series_id, user_id, created_at FROM watchlists{} ORDER BY created_at",
            clause
        ))?;

        let watchlists = stmt
            .query_map(params_from_iter(values.iter()), Self::row_to_watchlist)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(watchlists)
    }

    fn delete(&self, id: Uuid) -> AppResult<bool> {
        let conn = self.pool.get()?;
        let rows = conn.execute(
            "DELETE FROM watchlists WHERE id = ?1",
            params![id.to_string()],
        )?;
        Ok(rows > 0)
    }

    fn delete_many(&self, filter: &Filter) -> AppResult<usize> {
        let (clause, values) = filter.delete_clause(EntityKind::Watchlist, FILTER_COLUMNS)?;
        let conn = self.pool.get()?;
        let rows = conn.execute(
            &format!("DELETE FROM watchlists{}", clause),
            params_from_iter(values.iter()),
        )?;
        Ok(rows)
    }
}
