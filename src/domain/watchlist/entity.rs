use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Marks a series on a user's watchlist (one per user per series).
/// Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Watchlist {
    pub id: Uuid,
    pub series_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewWatchlist {
    pub series_id: Uuid,
    pub user_id: Uuid,
}

impl Watchlist {
    pub fn new(request: NewWatchlist) -> Self {
        Self {
            id: Uuid::new_v4(),
            series_id: request.series_id,
            user_id: request.user_id,
            created_at: Utc::now(),
        }
    }
}
