// src/repositories/episode_repository.rs
//
// Episode persistence. All parse failures are explicit errors, not
// silent defaults.

use rusqlite::{params, params_from_iter, OptionalExtension, Row};
use std::sync::Arc;
use uuid::Uuid;

use super::filter::{Filter, FilterColumn};
use super::sql::{count_column, parsed_column, timestamp_column, uuid_column};
use crate::db::ConnectionPool;
use crate::domain::{EntityKind, Episode};
use crate::error::AppResult;

const SELECT_EPISODES: &str = "SELECT id, series_id, season_id, name, slug, summary, number,
        sequence_number, premium, filler, media_type, minutes, comments_count, created_at
 FROM episodes";

const FILTER_COLUMNS: &[FilterColumn] = &[FilterColumn::Series, FilterColumn::Season];

// ---------------------------------------------------------------------
// Repository contract
// ---------------------------------------------------------------------
#[cfg_attr(test, mockall::automock)]
pub trait EpisodeRepository: Send + Sync {
    fn save(&self, episode: &Episode) -> AppResult<()>;

    /// Rewrites descriptive fields and the season reference
    fn update(&self, episode: &Episode) -> AppResult<bool>;

    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Episode>>;
    fn exists(&self, id: Uuid) -> AppResult<bool>;
    fn list(&self, filter: &Filter) -> AppResult<Vec<Episode>>;
    fn delete(&self, id: Uuid) -> AppResult<bool>;
    fn delete_many(&self, filter: &Filter) -> AppResult<usize>;

    /// Grouped count of episodes for one season; None when the group is empty
    fn count_by_season(&self, season_id: Uuid) -> AppResult<Option<u32>>;

    /// Targeted counter write, no validation
    fn set_comments_count(&self, id: Uuid, count: u32) -> AppResult<bool>;

    /// Bulk relink of every episode of a season to another series
    fn reassign_series(&self, season_id: Uuid, series_id: Uuid) -> AppResult<usize>;
}

pub struct SqliteEpisodeRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteEpisodeRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    /// Convert a database row to an Episode entity.
    fn row_to_episode(row: &Row) -> rusqlite::Result<Episode> {
        Ok(Episode {
            id: uuid_column(row, "id")?,
            series_id: uuid_column(row, "series_id")?,
            season_id: uuid_column(row, "season_id")?,
            name: row.get("name")?,
            slug: row.get("slug")?,
            summary: row.get("summary")?,
            number: count_column(row, "number")?,
            sequence_number: count_column(row, "sequence_number")?,
            premium: row.get("premium")?,
            filler: row.get("filler")?,
            media_type: parsed_column(row, "media_type")?,
            minutes: count_column(row, "minutes")?,
            comments_count: count_column(row, "comments_count")?,
            created_at: timestamp_column(row, "created_at")?,
        })
    }
}

// ---------------------------------------------------------------------
// SQLite Implementation
// ---------------------------------------------------------------------
impl EpisodeRepository for SqliteEpisodeRepository {
    fn save(&self, episode: &Episode) -> AppResult<()> {
        let conn = self.pool.get()?;

        conn.execute(
            "INSERT INTO episodes (
                id, series_id, season_id, name, slug, summary, number, sequence_number,
                premium, filler, media_type, minutes, comments_count, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            params![
                episode.id.to_string(),
                episode.series_id.to_string(),
                episode.season_id.to_string(),
                episode.name,
                episode.slug,
                episode.summary,
                episode.number as i64,
                episode.sequence_number as i64,
                episode.premium,
                episode.filler,
                episode.media_type.to_string(),
                episode.minutes as i64,
                episode.comments_count as i64,
                episode.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn update(&self, episode: &Episode) -> AppResult<bool> {
        let conn = self.pool.get()?;

        let rows = conn.execute(
            "UPDATE episodes SET season_id = ?1, name = ?2, summary = ?3, number = ?4,
                    sequence_number = ?5, premium = ?6, filler = ?7, media_type = ?8,
                    minutes = ?9
             WHERE id = ?10",
            params![
                episode.season_id.to_string(),
                episode.name,
                episode.summary,
                episode.number as i64,
                episode.sequence_number as i64,
                episode.premium,
                episode.filler,
                episode.media_type.to_string(),
                episode.minutes as i64,
                episode.id.to_string(),
            ],
        )?;

        Ok(rows > 0)
    }

    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Episode>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&format!("{} WHERE id = ?1", SELECT_EPISODES))?;

        let episode = stmt
            .query_row(params![id.to_string()], Self::row_to_episode)
            .optional()?;

        Ok(episode)
    }

    fn exists(&self, id: Uuid) -> AppResult<bool> {
        let conn = self.pool.get()?;

        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM episodes WHERE id = ?1",
            params![id.to_string()],
            |row| row.get(0),
        )?;

        Ok(count > 0)
    }

    fn list(&self, filter: &Filter) -> AppResult<Vec<Episode>> {
        let (clause, values) = filter.where_clause(EntityKind::Episode, FILTER_COLUMNS)?;
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&format!(
            "{}{} ORDER BY sequence_number",
            SELECT_EPISODES, clause
        ))?;

        let episodes = stmt
            .query_map(params_from_iter(values.iter()), Self::row_to_episode)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(episodes)
    }

    fn delete(&self, id: Uuid) -> AppResult<bool> {
        let conn = self.pool.get()?;
        let rows = conn.execute("DELETE FROM episodes WHERE id = ?1", params![id.to_string()])?;
        Ok(rows > 0)
    }

    fn delete_many(&self, filter: &Filter) -> AppResult<usize> {
        let (clause, values) = filter.delete_clause(EntityKind::Episode, FILTER_COLUMNS)?;
        let conn = self.pool.get()?;
        let rows = conn.execute(
            &format!("DELETE FROM episodes{}", clause),
            params_from_iter(values.iter()),
        )?;
        Ok(rows)
    }

    fn count_by_season(&self, season_id: Uuid) -> AppResult<Option<u32>> {
        let conn = self.pool.get()?;

        let count = conn
            .query_row(
                "SELECT COUNT(*) AS n_docs FROM episodes WHERE season_id = ?1 GROUP BY season_id",
                params![season_id.to_string()],
                |row| count_column(row, "n_docs"),
            )
            .optional()?;

        Ok(count)
    }

    fn set_comments_count(&self, id: Uuid, count: u32) -> AppResult<bool> {
        let conn = self.pool.get()?;
        let rows = conn.execute(
            "UPDATE episodes SET comments_count = ?1 WHERE id = ?2",
            params![count as i64, id.to_string()],
        )?;
        Ok(rows > 0)
    }

    fn reassign_series(&self, season_id: Uuid, series_id: Uuid) -> AppResult<usize> {
        let conn = self.pool.get()?;
        let rows = conn.execute(
            "UPDATE episodes SET series_id = ?1 WHERE season_id = ?2",
            params![series_id.to_string(), season_id.to_string()],
        )?;
        Ok(rows)
    }
}
