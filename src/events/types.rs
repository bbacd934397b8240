// src/events/types.rs
//
// Post-save facts emitted by the catalog service.
//
// RULES:
// - Events are facts, not commands
// - Events carry only the ids a handler needs to react
// - No business logic in event types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{AggregateTarget, Aggregates};

/// Trait that all domain events must implement
pub trait DomainEvent: std::fmt::Debug + Clone {
    fn event_id(&self) -> Uuid;
    fn occurred_at(&self) -> DateTime<Utc>;
    fn event_type(&self) -> &'static str;
}

// ============================================================================
// DOCUMENT-LEVEL CREATE EVENTS
// ============================================================================

/// A season was stored under `series_id`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonCreated {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub season_id: Uuid,
    pub series_id: Uuid,
}

impl SeasonCreated {
    pub fn new(season_id: Uuid, series_id: Uuid) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            season_id,
            series_id,
        }
    }
}

impl DomainEvent for SeasonCreated {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "SeasonCreated" }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeCreated {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub episode_id: Uuid,
    pub season_id: Uuid,
    pub series_id: Uuid,
}

impl EpisodeCreated {
    pub fn new(episode_id: Uuid, season_id: Uuid, series_id: Uuid) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            episode_id,
            season_id,
            series_id,
        }
    }
}

impl DomainEvent for EpisodeCreated {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "EpisodeCreated" }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentCreated {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub comment_id: Uuid,
    pub episode_id: Uuid,
}

impl CommentCreated {
    pub fn new(comment_id: Uuid, episode_id: Uuid) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            comment_id,
            episode_id,
        }
    }
}

impl DomainEvent for CommentCreated {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "CommentCreated" }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyCreated {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub reply_id: Uuid,
    pub comment_id: Uuid,
    pub episode_id: Uuid,
}

impl ReplyCreated {
    pub fn new(reply_id: Uuid, comment_id: Uuid, episode_id: Uuid) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            reply_id,
            comment_id,
            episode_id,
        }
    }
}

impl DomainEvent for ReplyCreated {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "ReplyCreated" }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewCreated {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub review_id: Uuid,
    pub series_id: Uuid,
    pub rating: i64,
}

impl ReviewCreated {
    pub fn new(review_id: Uuid, series_id: Uuid, rating: i64) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            review_id,
            series_id,
            rating,
        }
    }
}

impl DomainEvent for ReviewCreated {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "ReviewCreated" }
}

// ============================================================================
// AGGREGATE EVENTS
// ============================================================================

/// A counter write landed; `aggregates` holds the parent's counters after it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateRecomputed {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub target: AggregateTarget,
    pub aggregates: Aggregates,
}

impl AggregateRecomputed {
    pub fn new(target: AggregateTarget, aggregates: Aggregates) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            target,
            aggregates,
        }
    }
}

impl DomainEvent for AggregateRecomputed {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "AggregateRecomputed" }
}
