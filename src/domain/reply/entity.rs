use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A reply to a comment; carries its episode so the combined
/// episode counter can be derived with a single grouped count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub id: Uuid,
    pub comment_id: Uuid,
    pub episode_id: Uuid,
    pub user_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewReply {
    pub comment_id: Uuid,
    pub episode_id: Uuid,
    pub user_id: Uuid,
    pub text: String,
}

/// Parent references are immutable after creation; only text changes
#[derive(Debug, Clone, Default)]
pub struct ReplyPatch {
    pub text: Option<String>,
}

impl Reply {
    pub fn new(request: NewReply) -> Self {
        Self {
            id: Uuid::new_v4(),
            comment_id: request.comment_id,
            episode_id: request.episode_id,
            user_id: request.user_id,
            text: request.text,
            created_at: Utc::now(),
        }
    }
}
