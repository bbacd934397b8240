use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user's rated review of a series (one per user per series)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: Uuid,
    pub series_id: Uuid,
    pub user_id: Uuid,
    pub text: String,
    /// 1..=5
    pub rating: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewReview {
    pub series_id: Uuid,
    pub user_id: Uuid,
    pub text: String,
    pub rating: i64,
}

#[derive(Debug, Clone, Default)]
pub struct ReviewPatch {
    pub text: Option<String>,
    pub rating: Option<i64>,
}

impl Review {
    pub fn new(request: NewReview) -> Self {
        Self {
            id: Uuid::new_v4(),
            series_id: request.series_id,
            user_id: request.user_id,
            text: request.text,
            rating: request.rating,
            created_at: Utc::now(),
        }
    }

    pub fn apply(&mut self, patch: &ReviewPatch) {
        if let Some(text) = &patch.text {
            self.text = text.clone();
        }
        if let Some(rating) = patch.rating {
            self.rating = rating;
        }
    }
}
