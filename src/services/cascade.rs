// src/services/cascade.rs
//
// Cascade Engine
//
// RULES:
// - Runs after the parent write, on the children present at that moment
// - Deepest level first; every step is an idempotent delete/update by
//   filter, so a re-run converges to the same end state
// - Each step commits on its own; there is no cross-collection transaction
// - Counter fixes go through the aggregate engine and never fail the cascade

use log::{debug, info};
use std::sync::Arc;
use uuid::Uuid;

use super::aggregates::AggregateEngine;
use crate::domain::{AggregateTarget, Comment, Episode, Season, Series};
use crate::error::AppResult;
use crate::repositories::{
    CommentRepository, EpisodeRepository, Filter, ReplyRepository, ReviewRepository,
    SeasonRepository, VideoRepository, WatchlistRepository,
};

/// What a cascade removed, for logging and tests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CascadeReport {
    pub seasons: usize,
    pub episodes: usize,
    pub comments: usize,
    pub replies: usize,
    pub reviews: usize,
    pub watchlists: usize,
    pub videos: usize,
}

impl CascadeReport {
    pub fn total(&self) -> usize {
        self.seasons
            + self.episodes
            + self.comments
            + self.replies
            + self.reviews
            + self.watchlists
            + self.videos
    }
}

pub struct CascadeEngine {
    season_repo: Arc<dyn SeasonRepository>,
    episode_repo: Arc<dyn EpisodeRepository>,
    comment_repo: Arc<dyn CommentRepository>,
    reply_repo: Arc<dyn ReplyRepository>,
    review_repo: Arc<dyn ReviewRepository>,
    watchlist_repo: Arc<dyn WatchlistRepository>,
    video_repo: Arc<dyn VideoRepository>,
    aggregates: Arc<AggregateEngine>,
}

impl CascadeEngine {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        season_repo: Arc<dyn SeasonRepository>,
        episode_repo: Arc<dyn EpisodeRepository>,
        comment_repo: Arc<dyn CommentRepository>,
        reply_repo: Arc<dyn ReplyRepository>,
        review_repo: Arc<dyn ReviewRepository>,
        watchlist_repo: Arc<dyn WatchlistRepository>,
        video_repo: Arc<dyn VideoRepository>,
        aggregates: Arc<AggregateEngine>,
    ) -> Self {
        Self {
            season_repo,
            episode_repo,
            comment_repo,
            reply_repo,
            review_repo,
            watchlist_repo,
            video_repo,
            aggregates,
        }
    }

    // ========================================================================
    // DELETION CASCADES
    // ========================================================================

    /// Comments, replies and video of one episode
    fn purge_episode_children(&self, episode_id: Uuid, report: &mut CascadeReport) -> AppResult<()> {
        let filter = Filter::episode(episode_id);

        report.comments += self.comment_repo.delete_many(&filter)?;
        report.replies += self.reply_repo.delete_many(&filter)?;
        report.videos += self.video_repo.delete_many(&filter)?;

        debug!("Purged children of episode {}", episode_id);
        Ok(())
    }

    /// Episodes of one season, children first
    fn purge_season_episodes(&self, season_id: Uuid, report: &mut CascadeReport) -> AppResult<()> {
        let filter = Filter::season(season_id);

        for episode in self.episode_repo.list(&filter)? {
            self.purge_episode_children(episode.id, report)?;
        }
        report.episodes += self.episode_repo.delete_many(&filter)?;

        Ok(())
    }

    pub fn series_deleted(&self, series: &Series) -> AppResult<CascadeReport> {
        let mut report = CascadeReport::default();
        let by_series = Filter::series(series.id);

        let seasons = self.season_repo.list(&by_series)?;
        for season in &seasons {
            self.purge_season_episodes(season.id, &mut report)?;
        }

        // Episodes whose season link is already broken still point at the series
        for episode in self.episode_repo.list(&by_series)? {
            self.purge_episode_children(episode.id, &mut report)?;
        }
        report.episodes += self.episode_repo.delete_many(&by_series)?;

        report.seasons += self.season_repo.delete_many(&by_series)?;
        report.reviews += self.review_repo.delete_many(&by_series)?;
        report.watchlists += self.watchlist_repo.delete_many(&by_series)?;
        report.videos += self.video_repo.delete_many(&by_series)?;

        info!(
            "Series {} cascade removed {} documents ({:?})",
            series.id,
            report.total(),
            report
        );
        Ok(report)
    }

    // The parent row is already gone when these run, so the ancestor counter
    // is recomputed even if a purge step fails.

    pub fn season_deleted(&self, season: &Season) -> AppResult<CascadeReport> {
        let mut report = CascadeReport::default();
        let purged = self.purge_season_episodes(season.id, &mut report);

        self.aggregates
            .recompute_logged(AggregateTarget::SeriesSeasons(season.series_id));
        purged?;

        info!(
            "Season {} cascade removed {} documents",
            season.id,
            report.total()
        );
        Ok(report)
    }

    pub fn episode_deleted(&self, episode: &Episode) -> AppResult<CascadeReport> {
        let mut report = CascadeReport::default();
        let purged = self.purge_episode_children(episode.id, &mut report);

        self.aggregates
            .recompute_logged(AggregateTarget::SeasonEpisodes(episode.season_id));
        purged?;

        Ok(report)
    }

    pub fn comment_deleted(&self, comment: &Comment) -> AppResult<CascadeReport> {
        let purged = self
            .reply_repo
            .delete_many(&Filter::comment(comment.id).with_episode(comment.episode_id));

        self.aggregates
            .recompute_logged(AggregateTarget::EpisodeComments(comment.episode_id));

        Ok(CascadeReport {
            replies: purged?,
            ..CascadeReport::default()
        })
    }

    // ========================================================================
    // REASSIGNMENT CASCADES
    // ========================================================================

    /// Replies follow their comment, then both episodes are recounted
    pub fn comment_moved(&self, comment_id: Uuid, from: Uuid, to: Uuid) -> AppResult<usize> {
        let moved = self.reply_repo.move_to_episode(comment_id, from, to)?;
        debug!(
            "Moved {} replies of comment {} from episode {} to {}",
            moved, comment_id, from, to
        );

        self.aggregates
            .recompute_logged(AggregateTarget::EpisodeComments(from));
        self.aggregates
            .recompute_logged(AggregateTarget::EpisodeComments(to));

        Ok(moved)
    }

    pub fn episode_moved(&self, from_season: Uuid, to_season: Uuid) {
        self.aggregates
            .recompute_logged(AggregateTarget::SeasonEpisodes(from_season));
        self.aggregates
            .recompute_logged(AggregateTarget::SeasonEpisodes(to_season));
    }

    /// Episodes of the season are relinked to the new series
    pub fn season_moved(&self, season_id: Uuid, from_series: Uuid, to_series: Uuid) -> AppResult<usize> {
        let relinked = self.episode_repo.reassign_series(season_id, to_series)?;
        debug!(
            "Relinked {} episodes of season {} to series {}",
            relinked, season_id, to_series
        );

        self.aggregates
            .recompute_logged(AggregateTarget::SeriesSeasons(from_series));
        self.aggregates
            .recompute_logged(AggregateTarget::SeriesSeasons(to_series));

        Ok(relinked)
    }
}
