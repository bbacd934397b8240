use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::slug::season_slug;

/// A season groups episodes of one series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Season {
    pub id: Uuid,

    /// Reference to parent Series (REQUIRED)
    pub series_id: Uuid,

    pub name: String,
    pub slug: String,
    pub number: u32,

    /// Live episode count, owned by the aggregate engine
    pub episodes_count: u32,

    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewSeason {
    pub series_id: Uuid,
    pub name: String,
    pub number: u32,
}

#[derive(Debug, Clone, Default)]
pub struct SeasonPatch {
    pub name: Option<String>,
    pub number: Option<u32>,
    /// Moves the season (and its episodes) under another series
    pub series_id: Option<Uuid>,
}

impl Season {
    /// series_id MUST be valid (checked by the integrity validator, which
    /// also supplies the parent slug)
    pub fn new(request: NewSeason, series_slug: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            series_id: request.series_id,
            name: request.name.trim().to_string(),
            slug: season_slug(series_slug, request.number),
            number: request.number,
            episodes_count: 0,
            created_at: Utc::now(),
        }
    }

    /// Apply descriptive fields; parent moves are handled by the cascade engine
    pub fn apply(&mut self, patch: &SeasonPatch) {
        if let Some(name) = &patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(number) = patch.number {
            self.number = number;
        }
    }
}
