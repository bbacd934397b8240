// src/repositories/season_repository.rs
//
// Season persistence

use rusqlite::{params, params_from_iter, OptionalExtension, Row};
use std::sync::Arc;
use uuid::Uuid;

use super::filter::{Filter, FilterColumn};
use super::sql::{count_column, timestamp_column, uuid_column};
use crate::db::ConnectionPool;
use crate::domain::{EntityKind, Season};
use crate::error::AppResult;

const SELECT_SEASONS: &str =
    "SELECT id, series_id, name, slug, number, episodes_count, created_at FROM seasons";

const FILTER_COLUMNS: &[FilterColumn] = &[FilterColumn::Series];

#[cfg_attr(test, mockall::automock)]
pub trait SeasonRepository: Send + Sync {
    fn save(&self, season: &Season) -> AppResult<()>;

    /// Rewrites name, number and series reference
    fn update(&self, season: &Season) -> AppResult<bool>;

    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Season>>;
    fn exists(&self, id: Uuid) -> AppResult<bool>;
    fn list(&self, filter: &Filter) -> AppResult<Vec<Season>>;
    fn delete(&self, id: Uuid) -> AppResult<bool>;
    fn delete_many(&self, filter: &Filter) -> AppResult<usize>;

    /// Grouped count of seasons for one series; None when the group is empty
    fn count_by_series(&self, series_id: Uuid) -> AppResult<Option<u32>>;

    /// Targeted counter write, no validation
    fn set_episodes_count(&self, id: Uuid, count: u32) -> AppResult<bool>;
}

pub struct SqliteSeasonRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteSeasonRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_season(row: &Row) -> rusqlite::Result<Season> {
        Ok(Season {
            id: uuid_column(row, "id")?,
            series_id: uuid_column(row, "series_id")?,
            name: row.get("name")?,
            slug: row.get("slug")?,
            number: count_column(row, "number")?,
            episodes_count: count_column(row, "episodes_count")?,
            created_at: timestamp_column(row, "created_at")?,
        })
    }
}

impl SeasonRepository for SqliteSeasonRepository {
    fn save(&self, season: &Season) -> AppResult<()> {
        let conn = self.pool.get()?;

        conn.execute(
            "INSERT INTO seasons (id, series_id, name, slug, number, episodes_count, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                season.id.to_string(),
                season.series_id.to_string(),
                season.name,
                season.slug,
                season.number as i64,
                season.episodes_count as i64,
                season.created_at.to_rfc3339(),
            ],
        )?;

        Ok(())
    }

    fn update(&self, season: &Season) -> AppResult<bool> {
        let conn = self.pool.get()?;

        let rows = conn.execute(
            "UPDATE seasons SET series_id = ?1, name = ?2, number = ?3 WHERE id = ?4",
            params![
                season.series_id.to_string(),
                season.name,
                season.number as i64,
                season.id.to_string(),
            ],
        )?;

        Ok(rows > 0)
    }

    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Season>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&format!("{} WHERE id = ?1", SELECT_SEASONS))?;

        let season = stmt
            .query_row(params![id.to_string()], Self::row_to_season)
            .optional()?;

        Ok(season)
    }

    fn exists(&self, id: Uuid) -> AppResult<bool> {
        let conn = self.pool.get()?;

        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM seasons WHERE id = ?1",
            params![id.to_string()],
            |row| row.get(0),
        )?;

        Ok(count > 0)
    }

    fn list(&self, filter: &Filter) -> AppResult<Vec<Season>> {
        let (clause, values) = filter.where_clause(EntityKind::Season, FILTER_COLUMNS)?;
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&format!("{}{} ORDER BY number", SELECT_SEASONS, clause))?;

        let seasons = stmt
            .query_map(params_from_iter(values.iter()), Self::row_to_season)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(seasons)
    }

    fn delete(&self, id: Uuid) -> AppResult<bool> {
        let conn = self.pool.get()?;
        let rows = conn.execute("DELETE FROM seasons WHERE id = ?1", params![id.to_string()])?;
        Ok(rows > 0)
    }

    fn delete_many(&self, filter: &Filter) -> AppResult<usize> {
        let (clause, values) = filter.delete_clause(EntityKind::Season, FILTER_COLUMNS)?;
        let conn = self.pool.get()?;
        let rows = conn.execute(
            &format!("DELETE FROM seasons{}", clause),
            params_from_iter(values.iter()),
        )?;
        Ok(rows)
    }

    fn count_by_series(&self, series_id: Uuid) -> AppResult<Option<u32>> {
        let conn = self.pool.get()?;

        let count = conn
            .query_row(
                "SELECT COUNT(*) AS n_docs FROM seasons WHERE series_id = ?1 GROUP BY series_id",
                params![series_id.to_string()],
                |row| count_column(row, "n_docs"),
            )
            .optional()?;

        Ok(count)
    }

    fn set_episodes_count(&self, id: Uuid, count: u32) -> AppResult<bool> {
        let conn = self.pool.get()?;
        let rows = conn.execute(
            "UPDATE seasons SET episodes_count = ?1 WHERE id = ?2",
            params![count as i64, id.to_string()],
        )?;
        Ok(rows > 0)
    }
}
