use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::slug::episode_slug;
use crate::domain::DomainError;

/// Represents a single episode belonging to a Season of a Series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    /// Internal immutable identifier
    pub id: Uuid,

    /// Reference to parent Series (REQUIRED)
    pub series_id: Uuid,

    /// Reference to parent Season (REQUIRED)
    pub season_id: Uuid,

    pub name: String,
    pub slug: String,
    pub summary: String,

    /// Number within its season
    pub number: u32,

    /// Absolute position within the series
    pub sequence_number: u32,

    pub premium: bool,
    pub filler: bool,
    pub media_type: MediaType,
    pub minutes: u32,

    /// Comments plus replies, owned by the aggregate engine
    pub comments_count: u32,

    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    Episode,
    Movie,
}

#[derive(Debug, Clone)]
pub struct NewEpisode {
    pub series_id: Uuid,
    pub season_id: Uuid,
    pub name: String,
    pub summary: String,
    pub number: u32,
    pub sequence_number: u32,
    pub premium: bool,
    pub filler: bool,
    pub media_type: MediaType,
    pub minutes: u32,
}

#[derive(Debug, Clone, Default)]
pub struct EpisodePatch {
    pub name: Option<String>,
    pub summary: Option<String>,
    pub number: Option<u32>,
    pub sequence_number: Option<u32>,
    pub premium: Option<bool>,
    pub filler: Option<bool>,
    pub media_type: Option<MediaType>,
    pub minutes: Option<u32>,
    /// Moves the episode to another season
    pub season_id: Option<Uuid>,
}

impl Episode {
    /// Create a new Episode
    /// series_id and season_id MUST be valid (checked by caller)
    pub fn new(request: NewEpisode, season_slug: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            series_id: request.series_id,
            season_id: request.season_id,
            name: request.name.trim().to_string(),
            slug: episode_slug(season_slug, request.sequence_number),
            summary: request.summary,
            number: request.number,
            sequence_number: request.sequence_number,
            premium: request.premium,
            filler: request.filler,
            media_type: request.media_type,
            minutes: request.minutes,
            comments_count: 0,
            created_at: Utc::now(),
        }
    }

    /// Update descriptive fields; season moves are handled by the cascade engine
    pub fn apply(&mut self, patch: &EpisodePatch) {
        if let Some(name) = &patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(summary) = &patch.summary {
            self.summary = summary.clone();
        }
        if let Some(number) = patch.number {
            self.number = number;
        }
        if let Some(sequence_number) = patch.sequence_number {
            self.sequence_number = sequence_number;
        }
        if let Some(premium) = patch.premium {
            self.premium = premium;
        }
        if let Some(filler) = patch.filler {
            self.filler = filler;
        }
        if let Some(media_type) = patch.media_type {
            self.media_type = media_type;
        }
        if let Some(minutes) = patch.minutes {
            self.minutes = minutes;
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaType::Episode => write!(f, "episode"),
            MediaType::Movie => write!(f, "movie"),
        }
    }
}

impl FromStr for MediaType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "episode" => Ok(MediaType::Episode),
            "movie" => Ok(MediaType::Movie),
            other => Err(DomainError::UnknownValue {
                field: "media_type",
                value: other.to_string(),
            }),
        }
    }
}
