// src/lib.rs
// Catalog - series/episode catalog backend
//
// Architecture:
// - Domain-centric: entities, field rules and video exclusivity live in domain/
// - Repository per collection: traits with SQLite implementations
// - Event-driven: create hooks emit events, recompute handlers consume them
// - Explicit: parents are checked before every write, children are removed
//   after every delete, counters are re-derived from live data

pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod events;
pub mod logging;
pub mod repositories;
pub mod services;

// ============================================================================
// PUBLIC API - Domain
// ============================================================================

pub use domain::{
    Actor,
    AggregateTarget,
    Aggregates,
    Comment,
    Document,
    EntityKind,
    Episode,
    ExclusivityError,
    NewDocument,
    Patch,
    Reply,
    Review,
    Role,
    Season,
    Series,
    Video,
    VideoParent,
    Watchlist,
};

// ============================================================================
// PUBLIC API - Error Types
// ============================================================================

pub use error::{AppError, AppResult};

// ============================================================================
// PUBLIC API - Events
// ============================================================================

pub use events::{
    register_recompute_handlers,
    AggregateRecomputed,
    CommentCreated,
    DomainEvent,
    EpisodeCreated,
    EventBus,
    EventLogEntry,
    ReplyCreated,
    ReviewCreated,
    SeasonCreated,
};

// ============================================================================
// PUBLIC API - Database
// ============================================================================

pub use config::CatalogConfig;
pub use db::{create_connection_pool, initialize_database, ConnectionPool};

// ============================================================================
// PUBLIC API - Repositories
// ============================================================================

pub use repositories::Filter;

// ============================================================================
// PUBLIC API - Services
// ============================================================================

pub use services::{
    CatalogRepositories,
    CatalogService,
    RecomputeMode,
    RecomputeSummary,
};
