// src/events/mod.rs
//
// Internal event system - public API
//
// The handler type is internal to the bus and not exported.

pub mod bus;
pub mod handlers;
pub mod types;

pub use bus::{EventBus, EventLogEntry};
pub use handlers::register_recompute_handlers;

pub use types::{
    AggregateRecomputed, CommentCreated, DomainEvent, EpisodeCreated, ReplyCreated,
    ReviewCreated, SeasonCreated,
};
