// src/domain/mod.rs
//
// Domain Root - The Single Source of Truth for Domain API
//
// This file declares all domain modules and re-exports their public API.
// All other modules import from `crate::domain::*`

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod actor;
pub mod aggregates;
pub mod comment;
pub mod episode;
pub mod reply;
pub mod review;
pub mod season;
pub mod series;
pub mod slug;
pub mod video;
pub mod watchlist;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

pub use actor::{Actor, Role};
pub use aggregates::{AggregateTarget, Aggregates};

pub use series::{validate_series, Genre, NewSeries, Series, SeriesPatch};
pub use season::{validate_season, NewSeason, Season, SeasonPatch};
pub use episode::{validate_episode, Episode, EpisodePatch, MediaType, NewEpisode};
pub use comment::{validate_comment, Comment, CommentPatch, NewComment};
pub use reply::{validate_reply, NewReply, Reply, ReplyPatch};
pub use review::{validate_review, NewReview, Review, ReviewPatch};
pub use watchlist::{NewWatchlist, Watchlist};
pub use video::{
    validate_video, ExclusivityError, NewVideo, Video, VideoHost, VideoParent, VideoPatch,
    VideoSource,
};

pub use slug::slugify;

// ============================================================================
// ENTITY KINDS
// ============================================================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// The seven related collections plus videos
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Series,
    Season,
    Episode,
    Comment,
    Reply,
    Review,
    Watchlist,
    Video,
}

impl EntityKind {
    /// Kinds whose documents carry an owning `user` reference
    pub fn is_user_owned(self) -> bool {
        matches!(
            self,
            EntityKind::Comment | EntityKind::Reply | EntityKind::Review | EntityKind::Watchlist
        )
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Series => "series",
            EntityKind::Season => "season",
            EntityKind::Episode => "episode",
            EntityKind::Comment => "comment",
            EntityKind::Reply => "reply",
            EntityKind::Review => "review",
            EntityKind::Watchlist => "watchlist",
            EntityKind::Video => "video",
        };
        write!(f, "{}", name)
    }
}

// ============================================================================
// DOCUMENTS
// ============================================================================

/// Creation payload for any collection
#[derive(Debug, Clone)]
pub enum NewDocument {
    Series(NewSeries),
    Season(NewSeason),
    Episode(NewEpisode),
    Comment(NewComment),
    Reply(NewReply),
    Review(NewReview),
    Watchlist(NewWatchlist),
    Video(NewVideo),
}

/// Partial update for any mutable collection
#[derive(Debug, Clone)]
pub enum Patch {
    Series(SeriesPatch),
    Season(SeasonPatch),
    Episode(EpisodePatch),
    Comment(CommentPatch),
    Reply(ReplyPatch),
    Review(ReviewPatch),
    Video(VideoPatch),
}

/// A persisted document of any collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Document {
    Series(Series),
    Season(Season),
    Episode(Episode),
    Comment(Comment),
    Reply(Reply),
    Review(Review),
    Watchlist(Watchlist),
    Video(Video),
}

impl NewDocument {
    pub fn kind(&self) -> EntityKind {
        match self {
            NewDocument::Series(_) => EntityKind::Series,
            NewDocument::Season(_) => EntityKind::Season,
            NewDocument::Episode(_) => EntityKind::Episode,
            NewDocument::Comment(_) => EntityKind::Comment,
            NewDocument::Reply(_) => EntityKind::Reply,
            NewDocument::Review(_) => EntityKind::Review,
            NewDocument::Watchlist(_) => EntityKind::Watchlist,
            NewDocument::Video(_) => EntityKind::Video,
        }
    }
}

impl Patch {
    pub fn kind(&self) -> EntityKind {
        match self {
            Patch::Series(_) => EntityKind::Series,
            Patch::Season(_) => EntityKind::Season,
            Patch::Episode(_) => EntityKind::Episode,
            Patch::Comment(_) => EntityKind::Comment,
            Patch::Reply(_) => EntityKind::Reply,
            Patch::Review(_) => EntityKind::Review,
            Patch::Video(_) => EntityKind::Video,
        }
    }
}

impl Document {
    pub fn kind(&self) -> EntityKind {
        match self {
            Document::Series(_) => EntityKind::Series,
            Document::Season(_) => EntityKind::Season,
            Document::Episode(_) => EntityKind::Episode,
            Document::Comment(_) => EntityKind::Comment,
            Document::Reply(_) => EntityKind::Reply,
            Document::Review(_) => EntityKind::Review,
            Document::Watchlist(_) => EntityKind::Watchlist,
            Document::Video(_) => EntityKind::Video,
        }
    }

    pub fn id(&self) -> uuid::Uuid {
        match self {
            Document::Series(d) => d.id,
            Document::Season(d) => d.id,
            Document::Episode(d) => d.id,
            Document::Comment(d) => d.id,
            Document::Reply(d) => d.id,
            Document::Review(d) => d.id,
            Document::Watchlist(d) => d.id,
            Document::Video(d) => d.id,
        }
    }

    /// Owning user, for user-owned collections
    pub fn owner(&self) -> Option<uuid::Uuid> {
        match self {
            Document::Comment(d) => Some(d.user_id),
            Document::Reply(d) => Some(d.user_id),
            Document::Review(d) => Some(d.user_id),
            Document::Watchlist(d) => Some(d.user_id),
            _ => None,
        }
    }
}

// ============================================================================
// DOMAIN ERROR TYPES
// ============================================================================

use thiserror::Error;

/// Domain-level errors
/// These represent field-level constraint violations
#[derive(Debug, Error, PartialEq)]
pub enum DomainError {
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("{field} can not be empty")]
    EmptyField { field: &'static str },

    #[error("{field} must have between {min} and {max} characters, got {actual}")]
    FieldLength {
        field: &'static str,
        min: usize,
        max: usize,
        actual: usize,
    },

    #[error("rating {0} is out of range 1..=5")]
    RatingOutOfRange(i64),

    #[error("{field} value '{value}' is not valid")]
    UnknownValue { field: &'static str, value: String },
}

/// Domain result type
pub type DomainResult<T> = Result<T, DomainError>;

/// Shared check for the 3..=120 character name rule
pub(crate) fn validate_name(field: &'static str, name: &str) -> DomainResult<()> {
    let actual = name.trim().chars().count();
    if !(3..=120).contains(&actual) {
        return Err(DomainError::FieldLength {
            field,
            min: 3,
            max: 120,
            actual,
        });
    }
    Ok(())
}

/// Shared check for required free text
pub(crate) fn validate_not_blank(field: &'static str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::EmptyField { field });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_length_bounds() {
        assert!(validate_name("name", "abc").is_ok());
        assert!(validate_name("name", "  ab  ").is_err());
        assert!(validate_name("name", &"x".repeat(121)).is_err());
    }

    #[test]
    fn test_user_owned_kinds() {
        assert!(EntityKind::Comment.is_user_owned());
        assert!(EntityKind::Watchlist.is_user_owned());
        assert!(!EntityKind::Season.is_user_owned());
        assert!(!EntityKind::Video.is_user_owned());
    }
}
