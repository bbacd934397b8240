// src/repositories/video_repository.rs
//
// Videos are stored with two nullable parent columns; the row decoder
// refuses anything that is not exactly one parent.

use rusqlite::types::Type;
use rusqlite::{params, params_from_iter, OptionalExtension, Row};
use std::sync::Arc;
use uuid::Uuid;

use super::filter::{Filter, FilterColumn};
use super::sql::{json_column, optional_uuid_column, timestamp_column, uuid_column};
use crate::db::ConnectionPool;
use crate::domain::{EntityKind, Video, VideoParent};
use crate::error::AppResult;

const SELECT_VIDEOS: &str = "SELECT id, episode_id, series_id, logo, vids, created_at FROM videos";

const FILTER_COLUMNS: &[FilterColumn] = &[FilterColumn::Episode, FilterColumn::Series];

#[cfg_attr(test, mockall::automock)]
pub trait VideoRepository: Send + Sync {
    fn save(&self, video: &Video) -> AppResult<()>;
    fn update(&self, video: &Video) -> AppResult<bool>;
    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Video>>;
    fn list(&self, filter: &Filter) -> AppResult<Vec<Video>>;
    fn delete(&self, id: Uuid) -> AppResult<bool>;
    fn delete_many(&self, filter: &Filter) -> AppResult<usize>;
}

pub struct SqliteVideoRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteVideoRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_parent(row: &Row) -> rusqlite::Result<VideoParent> {
        let episode_id = optional_uuid_column(row, "episode_id")?;
        let series_id = optional_uuid_column(row, "series_id")?;
        let logo: Option<String> = row.get("logo")?;

        match (episode_id, series_id, logo) {
            (Some(episode_id), None, None) => Ok(VideoParent::Episode { episode_id }),
            (None, Some(series_id), Some(logo)) => Ok(VideoParent::Series { series_id, logo }),
            _ => Err(rusqlite::Error::FromSqlConversionFailure(
                0,
                Type::Text,
                Box::new(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    "video row does not reference exactly one parent",
                )),
            )),
        }
    }

    fn row_to_video(row: &Row) -> rusqlite::Result<Video> {
        Ok(Video {
            id: uuid_column(row, "id")?,
            parent: Self::row_to_parent(row)?,
            vids: json_column(row, "vids")?,
            created_at: timestamp_column(row, "created_at")?,
        })
    }
}

impl VideoRepository for SqliteVideoRepository {
    fn save(&self, video: &Video) -> AppResult<()> {
        let conn = self.pool.get()?;
        let vids = serde_json::to_string(&video.vids)?;

        conn.execute(
            "INSERT INTO videos (id, episode_id, series_id, logo, vids, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                video.id.to_string(),
                video.parent.episode_id().map(|id| id.to_string()),
                video.parent.series_id().map(|id| id.to_string()),
                video.parent.logo(),
                vids,
                video.created_at.to_rfc3339(),
            ],
        )?;

        Ok(())
    }

    fn update(&self, video: &Video) -> AppResult<bool> {
        let conn = self.pool.get()?;
        let vids = serde_json::to_string(&video.vids)?;

        let rows = conn.execute(
            "UPDATE videos SET episode_id = ?1, series_id = ?2, logo = ?3, vids = ?4
             WHERE id = ?5",
            params![
                video.parent.episode_id().map(|id| id.to_string()),
                video.parent.series_id().map(|id| id.to_string()),
                video.parent.logo(),
                vids,
                video.id.to_string(),
            ],
        )?;

        Ok(rows > 0)
    }

    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Video>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&format!("{} WHERE id = ?1", SELECT_VIDEOS))?;

        let video = stmt
            .query_row(params![id.to_string()], Self::row_to_video)
            .optional()?;

        Ok(video)
    }

    fn list(&self, filter: &Filter) -> AppResult<Vec<Video>> {
        let (clause, values) = filter.where_clause(EntityKind::Video, FILTER_COLUMNS)?;
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&format!("{}{} ORDER BY created_at", SELECT_VIDEOS, clause))?;

        let videos = stmt
            .query_map(params_from_iter(values.iter()), Self::row_to_video)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(videos)
    }

    fn delete(&self, id: Uuid) -> AppResult<bool> {
        let conn = self.pool.get()?;
        let rows = conn.execute("DELETE FROM videos WHERE id = ?1", params![id.to_string()])?;
        Ok(rows > 0)
    }

    fn delete_many(&self, filter: &Filter) -> AppResult<usize> {
        let (clause, values) = filter.delete_clause(EntityKind::Video, FILTER_COLUMNS)?;
        let conn = self.pool.get()?;
        let rows = conn.execute(
            &format!("DELETE FROM videos{}", clause),
            params_from_iter(values.iter()),
        )?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::create_test_pool;
    use crate::domain::{VideoHost, VideoSource};

    fn sources() -> Vec<VideoSource> {
        vec![VideoSource {
            link: "https://t.me/c/1/2".to_string(),
            source: VideoHost::Telegram,
            mime_type: "video/mp4".to_string(),
        }]
    }

    #[test]
    fn test_parent_roundtrip_through_nullable_columns() {
        let (_dir, pool) = create_test_pool();
        let repo = SqliteVideoRepository::new(pool);

        let banner = Video::new(
            VideoParent::Series {
                series_id: Uuid::new_v4(),
                logo: "logo.png".to_string(),
            },
            sources(),
        );
        repo.save(&banner).unwrap();
        assert_eq!(repo.get_by_id(banner.id).unwrap(), Some(banner.clone()));

        let mut moved = banner.clone();
        moved.parent = VideoParent::Episode {
            episode_id: Uuid::new_v4(),
        };
        assert!(repo.update(&moved).unwrap());

        let loaded = repo.get_by_id(banner.id).unwrap().unwrap();
        assert_eq!(loaded.parent, moved.parent);
        assert_eq!(loaded.parent.logo(), None);
    }

    #[test]
    fn test_corrupt_parent_columns_are_an_error() {
        let (_dir, pool) = create_test_pool();
        let conn = pool.get().unwrap();
        let id = Uuid::new_v4();
        conn.execute(
            "INSERT INTO videos (id, episode_id, series_id, logo, vids, created_at)
             VALUES (?1, NULL, NULL, NULL, '[]', '2024-01-01T00:00:00Z')",
            params![id.to_string()],
        )
        .unwrap();
        drop(conn);

        let repo = SqliteVideoRepository::new(pool);
        assert!(repo.get_by_id(id).is_err());
    }

    #[test]
    fn test_list_by_episode() {
        let (_dir, pool) = create_test_pool();
        let repo = SqliteVideoRepository::new(pool);
        let episode_id = Uuid::new_v4();

        repo.save(&Video::new(VideoParent::Episode { episode_id }, sources()))
            .unwrap();

        assert_eq!(repo.list(&Filter::episode(episode_id)).unwrap().len(), 1);
        assert!(repo.list(&Filter::season(episode_id)).is_err());
    }
}
