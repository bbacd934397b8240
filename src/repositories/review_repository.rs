// src/repositories/review_repository.rs

use rusqlite::{params, params_from_iter, OptionalExtension, Row};
use std::sync::Arc;
use uuid::Uuid;

use super::filter::{Filter, FilterColumn};
use super::sql::{count_column, timestamp_column, uuid_column};
use crate::db::ConnectionPool;
use crate::domain::aggregates::{round_rating, RatingStats};
use crate::domain::{EntityKind, Review};
use crate::error::AppResult;

const SELECT_REVIEWS: &str =
    "SELECT id, series_id, user_id, text, rating, created_at FROM reviews";

const FILTER_COLUMNS: &[FilterColumn] = &[FilterColumn::Series, FilterColumn::User];

#[cfg_attr(test, mockall::automock)]
pub trait ReviewRepository: Send + Sync {
    fn save(&self, review: &Review) -> AppResult<()>;
    fn update(&self, review: &Review) -> AppResult<bool>;
    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Review>>;
    fn list(&self, filter: &Filter) -> AppResult<Vec<Review>>;
    fn delete(&self, id: Uuid) -> AppResult<bool>;
    fn delete_many(&self, filter: &Filter) -> AppResult<usize>;

    /// Grouped count + average of ratings; None when the series has no reviews
    fn rating_stats(&self, series_id: Uuid) -> AppResult<Option<RatingStats>>;
}

pub struct SqliteReviewRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteReviewRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_review(row: &Row) -> rusqlite::Result<Review> {
        Ok(Review {
            id: uuid_column(row, "id")?,
            series_id: uuid_column(row, "series_id")?,
            user_id: uuid_column(row, "user_id")?,
            text: row.get("text")?,
            rating: row.get("rating")?,
            created_at: timestamp_column(row, "created_at")?,
        })
    }
}

impl ReviewRepository for SqliteReviewRepository {
    fn save(&self, review: &Review) -> AppResult<()> {
        let conn = self.pool.get()?;

        conn.execute(
            "INSERT INTO reviews (id, series_id, user_id, text, rating, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                review.id.to_string(),
                review.series_id.to_string(),
                review.user_id.to_string(),
                review.text,
                review.rating,
                review.created_at.to_rfc3339(),
            ],
        )?;

        Ok(())
    }

    fn update(&self, review: &Review) -> AppResult<bool> {
        let conn = self.pool.get()?;
        let rows = conn.execute(
            "UPDATE reviews SET text = ?1, rating = ?2 WHERE id = ?3",
            params![review.text, review.rating, review.id.to_string()],
        )?;
        Ok(rows > 0)
    }

    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Review>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&format!("{} WHERE id = ?1", SELECT_REVIEWS))?;

        let review = stmt
            .query_row(params![id.to_string()], Self::row_to_review)
            .optional()?;

        Ok(review)
    }

    fn list(&self, filter: &Filter) -> AppResult<Vec<Review>> {
        let (clause, values) = filter.where_clause(EntityKind::Review, FILTER_COLUMNS)?;
        let conn = self.pool.get()?;
        let mut stmt =
            conn.prepare(&format!("{}{} ORDER BY created_at", SELECT_REVIEWS, clause))?;

        let reviews = stmt
            .query_map(params_from_iter(values.iter()), Self::row_to_review)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(reviews)
    }

    fn delete(&self, id: Uuid) -> AppResult<bool> {
        let conn = self.pool.get()?;
        let rows = conn.execute("DELETE FROM reviews WHERE id = ?1", params![id.to_string()])?;
        Ok(rows > 0)
    }

    fn delete_many(&self, filter: &Filter) -> AppResult<usize> {
        let (clause, values) = filter.delete_clause(EntityKind::Review, FILTER_COLUMNS)?;
        let conn = self.pool.get()?;
        let rows = conn.execute(
            &format!("DELETE FROM reviews{}", clause),
            params_from_iter(values.iter()),
        )?;
        Ok(rows)
    }

    fn rating_stats(&self, series_id: Uuid) -> AppResult<Option<RatingStats>> {
        let conn = self.pool.get()?;

        let stats = conn
            .query_row(
                "SELECT COUNT(*) AS n_rating, AVG(rating) AS avg_rating
                 FROM reviews WHERE series_id = ?1 GROUP BY series_id",
                params![series_id.to_string()],
                |row| {
                    Ok(RatingStats {
                        quantity: count_column(row, "n_rating")?,
                        average: round_rating(row.get("avg_rating")?),
                    })
                },
            )
            .optional()?;

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::create_test_pool;
    use crate::domain::NewReview;

    fn review(series_id: Uuid, rating: i64) -> Review {
        Review::new(NewReview {
            series_id,
            user_id: Uuid::new_v4(),
            text: "worth watching".to_string(),
            rating,
        })
    }

    #[test]
    fn test_rating_stats_rounds_average() {
        let (_dir, pool) = create_test_pool();
        let repo = SqliteReviewRepository::new(pool);
        let series = Uuid::new_v4();

        assert_eq!(repo.rating_stats(series).unwrap(), None);

        for rating in [5, 5, 4] {
            repo.save(&review(series, rating)).unwrap();
        }

        let stats = repo.rating_stats(series).unwrap().unwrap();
        assert_eq!(stats.quantity, 3);
        assert_eq!(stats.average, 4.7);
    }

    #[test]
    fn test_update_rewrites_text_and_rating() {
        let (_dir, pool) = create_test_pool();
        let repo = SqliteReviewRepository::new(pool);
        let mut stored = review(Uuid::new_v4(), 2);
        repo.save(&stored).unwrap();

        stored.rating = 4;
        assert!(repo.update(&stored).unwrap());
        assert_eq!(repo.get_by_id(stored.id).unwrap().unwrap().rating, 4);
    }
}
