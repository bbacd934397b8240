// src/services/aggregates.rs
//
// Aggregate Recomputation Engine
//
// RULES:
// - Every counter is re-derived from a grouped query over the live child
//   set, never incremented in place
// - No grouped row means the zero-state (0, or average 1 for ratings)
// - Writes go through the targeted counter setters, which skip validation
//   and fire no hooks
// - A parent that vanished before the write is not an error

use log::{debug, error};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::aggregates::RatingStats;
use crate::domain::{AggregateTarget, Aggregates, EntityKind};
use crate::error::{AppError, AppResult};
use crate::events::{AggregateRecomputed, EventBus};
use crate::repositories::{
    CommentRepository, EpisodeRepository, ReplyRepository, ReviewRepository, SeasonRepository,
    SeriesRepository,
};

pub struct AggregateEngine {
    series_repo: Arc<dyn SeriesRepository>,
    season_repo: Arc<dyn SeasonRepository>,
    episode_repo: Arc<dyn EpisodeRepository>,
    comment_repo: Arc<dyn CommentRepository>,
    reply_repo: Arc<dyn ReplyRepository>,
    review_repo: Arc<dyn ReviewRepository>,
    event_bus: Arc<EventBus>,
}

impl AggregateEngine {
    pub fn new(
        series_repo: Arc<dyn SeriesRepository>,
        season_repo: Arc<dyn SeasonRepository>,
        episode_repo: Arc<dyn EpisodeRepository>,
        comment_repo: Arc<dyn CommentRepository>,
        reply_repo: Arc<dyn ReplyRepository>,
        review_repo: Arc<dyn ReviewRepository>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            series_repo,
            season_repo,
            episode_repo,
            comment_repo,
            reply_repo,
            review_repo,
            event_bus,
        }
    }

    /// Re-derive one counter and write it back.
    ///
    /// Returns the parent's counters after the write, or `None` when the
    /// parent no longer exists.
    pub fn recompute(&self, target: AggregateTarget) -> AppResult<Option<Aggregates>> {
        let written = match target {
            AggregateTarget::SeriesSeasons(id) => {
                let count = self.season_repo.count_by_series(id)?.unwrap_or(0);
                self.series_repo.set_seasons_count(id, count)?
            }
            AggregateTarget::SeriesRatings(id) => {
                let stats = self
                    .review_repo
                    .rating_stats(id)?
                    .unwrap_or_else(RatingStats::empty);
                self.series_repo.set_ratings(id, stats)?
            }
            AggregateTarget::SeasonEpisodes(id) => {
                let count = self.episode_repo.count_by_season(id)?.unwrap_or(0);
                self.season_repo.set_episodes_count(id, count)?
            }
            AggregateTarget::EpisodeComments(id) => {
                // Combined counter: comments + replies
                let comments = self.comment_repo.count_by_episode(id)?.unwrap_or(0);
                let replies = self.reply_repo.count_by_episode(id)?.unwrap_or(0);
                self.episode_repo.set_comments_count(id, comments + replies)?
            }
        };

        if !written {
            debug!("Recompute skipped, parent gone: {:?}", target);
            return Ok(None);
        }

        let aggregates = self.current(target.kind(), target.parent_id())?;
        if let Some(aggregates) = &aggregates {
            debug!("Recomputed {:?} -> {:?}", target, aggregates);
            self.event_bus
                .emit(AggregateRecomputed::new(target, aggregates.clone()));
        }

        Ok(aggregates)
    }

    /// Recompute from a hook: failures are logged, never surfaced
    pub fn recompute_logged(&self, target: AggregateTarget) {
        if let Err(e) = self.recompute(target) {
            error!("Failed to recompute {:?}: {}", target, e);
        }
    }

    /// Every counter a parent of `kind` owns
    pub fn recompute_parent(&self, kind: EntityKind, id: Uuid) -> AppResult<Option<Aggregates>> {
        let targets = AggregateTarget::for_parent(kind, id);
        if targets.is_empty() {
            return Err(AppError::validation(format!(
                "{} documents carry no aggregates",
                kind
            )));
        }

        let mut latest = None;
        for target in targets {
            latest = self.recompute(target)?;
        }
        Ok(latest)
    }

    /// Counters as last written; never forces a recompute
    pub fn current(&self, kind: EntityKind, id: Uuid) -> AppResult<Option<Aggregates>> {
        let aggregates = match kind {
            EntityKind::Series => self.series_repo.get_by_id(id)?.map(|s| Aggregates::Series {
                seasons_count: s.seasons_count,
                ratings_average: s.ratings_average,
                ratings_quantity: s.ratings_quantity,
            }),
            EntityKind::Season => self.season_repo.get_by_id(id)?.map(|s| Aggregates::Season {
                episodes_count: s.episodes_count,
            }),
            EntityKind::Episode => self.episode_repo.get_by_id(id)?.map(|e| Aggregates::Episode {
                comments_count: e.comments_count,
            }),
            other => {
                return Err(AppError::validation(format!(
                    "{} documents carry no aggregates",
                    other
                )))
            }
        };

        Ok(aggregates)
    }
}
