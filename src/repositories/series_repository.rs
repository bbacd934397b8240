// src/repositories/series_repository.rs
//
// Series persistence

use rusqlite::{params, OptionalExtension, Row};
use std::sync::Arc;
use uuid::Uuid;

use super::sql::{count_column, json_column, timestamp_column, uuid_column};
use crate::db::ConnectionPool;
use crate::domain::aggregates::RatingStats;
use crate::domain::Series;
use crate::error::AppResult;

const SELECT_SERIES: &str = "SELECT id, name, slug, description, launch_year, is_completed,
        keywords, genres, ratings_average, ratings_quantity, seasons_count, created_at
 FROM series";

#[cfg_attr(test, mockall::automock)]
pub trait SeriesRepository: Send + Sync {
    fn save(&self, series: &Series) -> AppResult<()>;

    /// Rewrites descriptive fields; returns false when the row is gone
    fn update(&self, series: &Series) -> AppResult<bool>;

    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Series>>;
    fn exists(&self, id: Uuid) -> AppResult<bool>;
    fn list_all(&self) -> AppResult<Vec<Series>>;
    fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Targeted counter write, no validation
    fn set_seasons_count(&self, id: Uuid, count: u32) -> AppResult<bool>;

    /// Targeted counter write, no validation
    fn set_ratings(&self, id: Uuid, stats: RatingStats) -> AppResult<bool>;
}

pub struct SqliteSeriesRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteSeriesRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_series(row: &Row) -> rusqlite::Result<Series> {
        Ok(Series {
            id: uuid_column(row, "id")?,
            name: row.get("name")?,
            slug: row.get("slug")?,
            description: row.get("description")?,
            launch_year: row.get("launch_year")?,
            is_completed: row.get("is_completed")?,
            keywords: json_column(row, "keywords")?,
            genres: json_column(row, "genres")?,
            ratings_average: row.get("ratings_average")?,
            ratings_quantity: count_column(row, "ratings_quantity")?,
            seasons_count: count_column(row, "seasons_count")?,
            created_at: timestamp_column(row, "created_at")?,
        })
    }
}

impl SeriesRepository for SqliteSeriesRepository {
    fn save(&self, series: &Series) -> AppResult<()> {
        let conn = self.pool.get()?;

        conn.execute(
            "INSERT INTO series (
                id, name, slug, description, launch_year, is_completed, keywords, genres,
                ratings_average, ratings_quantity, seasons_count, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                series.id.to_string(),
                series.name,
                series.slug,
                series.description,
                series.launch_year,
                series.is_completed,
                serde_json::to_string(&series.keywords)?,
                serde_json::to_string(&series.genres)?,
                series.ratings_average,
                series.ratings_quantity as i64,
                series.seasons_count as i64,
                series.created_at.to_rfc3339(),
            ],
        )?;

        Ok(())
    }

    fn update(&self, series: &Series) -> AppResult<bool> {
        let conn = self.pool.get()?;

        let rows = conn.execute(
            "UPDATE series SET name = ?1, description = ?2, launch_year = ?3,
                    is_completed = ?4, keywords = ?5, genres = ?6
             WHERE id = ?7",
            params![
                series.name,
                series.description,
                series.launch_year,
                series.is_completed,
                serde_json::to_string(&series.keywords)?,
                serde_json::to_string(&series.genres)?,
                series.id.to_string(),
            ],
        )?;

        Ok(rows > 0)
    }

    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Series>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&format!("{} WHERE id = ?1", SELECT_SERIES))?;

        let series = stmt
            .query_row(params![id.to_string()], Self::row_to_series)
            .optional()?;

        Ok(series)
    }

    fn exists(&self, id: Uuid) -> AppResult<bool> {
        let conn = self.pool.get()?;

        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM series WHERE id = ?1",
            params![id.to_string()],
            |row| row.get(0),
        )?;

        Ok(count > 0)
    }

    fn list_all(&self) -> AppResult<Vec<Series>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&format!("{} ORDER BY name", SELECT_SERIES))?;

        let series = stmt
            .query_map([], Self::row_to_series)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(series)
    }

    fn delete(&self, id: Uuid) -> AppResult<bool> {
        let conn = self.pool.get()?;
        let rows = conn.execute("DELETE FROM series WHERE id = ?1", params![id.to_string()])?;
        Ok(rows > 0)
    }

    fn set_seasons_count(&self, id: Uuid, count: u32) -> AppResult<bool> {
        let conn = self.pool.get()?;
        let rows = conn.execute(
            "UPDATE series SET seasons_count = ?1 WHERE id = ?2",
            params![count as i64, id.to_string()],
        )?;
        Ok(rows > 0)
    }

    fn set_ratings(&self, id: Uuid, stats: RatingStats) -> AppResult<bool> {
        let conn = self.pool.get()?;
        let rows = conn.execute(
            "UPDATE series SET ratings_quantity = ?1, ratings_average = ?2 WHERE id = ?3",
            params![stats.quantity as i64, stats.average, id.to_string()],
        )?;
        Ok(rows > 0)
    }
}
