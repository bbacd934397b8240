use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Caller identity attached to a request by the outer layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: Uuid,
    pub role: Role,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Admin,
}

impl Actor {
    pub fn user(user_id: Uuid) -> Self {
        Self {
            user_id,
            role: Role::User,
        }
    }

    pub fn admin(user_id: Uuid) -> Self {
        Self {
            user_id,
            role: Role::Admin,
        }
    }

    /// A non-privileged actor may only touch documents it owns
    pub fn may_mutate(&self, owner: Uuid) -> bool {
        self.role == Role::Admin || self.user_id == owner
    }
}
