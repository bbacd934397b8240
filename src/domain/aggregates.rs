// src/domain/aggregates.rs
//
// Denormalized counters stored on ancestor documents.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::EntityKind;

/// Ratings average stored when a series has no reviews
pub const DEFAULT_RATINGS_AVERAGE: f64 = 1.0;

/// One recomputable counter on one parent document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "target", content = "id", rename_all = "snake_case")]
pub enum AggregateTarget {
    /// `Series.seasons_count`
    SeriesSeasons(Uuid),
    /// `Series.ratings_average` / `Series.ratings_quantity`
    SeriesRatings(Uuid),
    /// `Season.episodes_count`
    SeasonEpisodes(Uuid),
    /// `Episode.comments_count` (comments + replies)
    EpisodeComments(Uuid),
}

impl AggregateTarget {
    pub fn parent_id(&self) -> Uuid {
        match self {
            AggregateTarget::SeriesSeasons(id)
            | AggregateTarget::SeriesRatings(id)
            | AggregateTarget::SeasonEpisodes(id)
            | AggregateTarget::EpisodeComments(id) => *id,
        }
    }

    /// Kind of the document the counter lives on
    pub fn kind(&self) -> EntityKind {
        match self {
            AggregateTarget::SeriesSeasons(_) | AggregateTarget::SeriesRatings(_) => {
                EntityKind::Series
            }
            AggregateTarget::SeasonEpisodes(_) => EntityKind::Season,
            AggregateTarget::EpisodeComments(_) => EntityKind::Episode,
        }
    }

    /// All counters owned by a parent; empty for kinds without counters
    pub fn for_parent(kind: EntityKind, id: Uuid) -> Vec<AggregateTarget> {
        match kind {
            EntityKind::Series => vec![
                AggregateTarget::SeriesSeasons(id),
                AggregateTarget::SeriesRatings(id),
            ],
            EntityKind::Season => vec![AggregateTarget::SeasonEpisodes(id)],
            EntityKind::Episode => vec![AggregateTarget::EpisodeComments(id)],
            _ => Vec::new(),
        }
    }
}

/// Counter values as last written by the recomputation engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Aggregates {
    Series {
        seasons_count: u32,
        ratings_average: f64,
        ratings_quantity: u32,
    },
    Season {
        episodes_count: u32,
    },
    Episode {
        comments_count: u32,
    },
}

/// Grouped rating statistics for one series
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingStats {
    pub quantity: u32,
    pub average: f64,
}

impl RatingStats {
    /// Zero-state used when the grouped query returns no rows
    pub fn empty() -> Self {
        Self {
            quantity: 0,
            average: DEFAULT_RATINGS_AVERAGE,
        }
    }
}

/// Ratings are stored with one decimal (4.666 -> 4.7)
pub fn round_rating(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
