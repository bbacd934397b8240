// src/events/handlers/recompute_handler.rs
//
// Bridges document-level create events to the recompute queue.
//
// - Handlers only enqueue; they never touch the store
// - The queue decides whether the work runs inline or in the background
// - The bus holds the queue weakly; once the owning service is dropped the
//   handlers become no-ops
// - One set of handlers per bus. A second registration is refused, so every
//   service sharing a bus feeds the queue of the service built first

use log::{debug, warn};
use std::sync::{Arc, Weak};

use crate::domain::AggregateTarget;
use crate::events::{
    CommentCreated, EpisodeCreated, EventBus, ReplyCreated, ReviewCreated, SeasonCreated,
};
use crate::services::RecomputeQueue;

fn enqueue(queue: &Weak<RecomputeQueue>, target: AggregateTarget) {
    match queue.upgrade() {
        Some(queue) => queue.enqueue(target),
        None => debug!("Recompute queue dropped, ignoring {:?}", target),
    }
}

/// Returns false when the bus already carries recompute handlers
pub fn register_recompute_handlers(bus: &EventBus, queue: &Arc<RecomputeQueue>) -> bool {
    if bus.subscriber_count::<SeasonCreated>() > 0 {
        warn!("Recompute handlers already registered on this bus, skipping");
        return false;
    }

    let q = Arc::downgrade(queue);
    bus.subscribe::<SeasonCreated, _>(move |event| {
        enqueue(&q, AggregateTarget::SeriesSeasons(event.series_id));
    });

    let q = Arc::downgrade(queue);
    bus.subscribe::<EpisodeCreated, _>(move |event| {
        enqueue(&q, AggregateTarget::SeasonEpisodes(event.season_id));
    });

    let q = Arc::downgrade(queue);
    bus.subscribe::<CommentCreated, _>(move |event| {
        enqueue(&q, AggregateTarget::EpisodeComments(event.episode_id));
    });

    let q = Arc::downgrade(queue);
    bus.subscribe::<ReplyCreated, _>(move |event| {
        enqueue(&q, AggregateTarget::EpisodeComments(event.episode_id));
    });

    let q = Arc::downgrade(queue);
    bus.subscribe::<ReviewCreated, _>(move |event| {
        enqueue(&q, AggregateTarget::SeriesRatings(event.series_id));
    });

    debug!("Recompute handlers registered");
    true
}
