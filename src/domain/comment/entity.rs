use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user's comment on an episode (one per user per episode)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub episode_id: Uuid,
    pub user_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub episode_id: Uuid,
    pub user_id: Uuid,
    pub text: String,
}

#[derive(Debug, Clone, Default)]
pub struct CommentPatch {
    pub text: Option<String>,
    /// Moves the comment and its replies to another episode
    pub episode_id: Option<Uuid>,
}

impl Comment {
    pub fn new(request: NewComment) -> Self {
        Self {
            id: Uuid::new_v4(),
            episode_id: request.episode_id,
            user_id: request.user_id,
            text: request.text,
            created_at: Utc::now(),
        }
    }
}
