// src/services/catalog_service.rs
//
// Catalog Service - the surface handed to the request layer
//
// RULES:
// - Integrity and exclusivity checks run before the write; their errors are
//   the caller's result and nothing is persisted
// - Creates emit a post-save event; counters follow through the recompute
//   queue (fire-and-forget)
// - Update/delete by id run their cascades and recomputes before returning,
//   but failures there are logged, never surfaced
// - Counter fields are never written here; only the aggregate engine does

use log::{error, info, warn};
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

use super::aggregates::AggregateEngine;
use super::cascade::CascadeEngine;
use super::integrity::IntegrityValidator;
use super::recompute_queue::{RecomputeMode, RecomputeQueue};
use crate::db::ConnectionPool;
use crate::domain::video::{resolve_parent, resolve_parent_update};
use crate::domain::{
    validate_comment, validate_episode, validate_reply, validate_review, validate_season,
    validate_series, validate_video, Actor, AggregateTarget, Aggregates, Comment, CommentPatch,
    Document, EntityKind, Episode, EpisodePatch, NewComment, NewDocument, NewEpisode, NewReply,
    NewReview, NewSeason, NewSeries, NewVideo, NewWatchlist, Patch, Reply, ReplyPatch, Review,
    ReviewPatch, Season, SeasonPatch, Series, SeriesPatch, Video, VideoPatch, Watchlist,
};
use crate::error::{AppError, AppResult};
use crate::events::{
    register_recompute_handlers, CommentCreated, EpisodeCreated, EventBus, ReplyCreated,
    ReviewCreated, SeasonCreated,
};
use crate::repositories::{
    CommentRepository, EpisodeRepository, Filter, ReplyRepository, ReviewRepository,
    SeasonRepository, SeriesRepository, SqliteCommentRepository, SqliteEpisodeRepository,
    SqliteReplyRepository, SqliteReviewRepository, SqliteSeasonRepository,
    SqliteSeriesRepository, SqliteVideoRepository, SqliteWatchlistRepository, VideoRepository,
    WatchlistRepository,
};

/// One handle per collection, shared by the engines
#[derive(Clone)]
pub struct CatalogRepositories {
    pub series: Arc<dyn SeriesRepository>,
    pub season: Arc<dyn SeasonRepository>,
    pub episode: Arc<dyn EpisodeRepository>,
    pub comment: Arc<dyn CommentRepository>,
    pub reply: Arc<dyn ReplyRepository>,
    pub review: Arc<dyn ReviewRepository>,
    pub watchlist: Arc<dyn WatchlistRepository>,
    pub video: Arc<dyn VideoRepository>,
}

impl CatalogRepositories {
    pub fn sqlite(pool: Arc<ConnectionPool>) -> Self {
        Self {
            series: Arc::new(SqliteSeriesRepository::new(Arc::clone(&pool))),
            season: Arc::new(SqliteSeasonRepository::new(Arc::clone(&pool))),
            episode: Arc::new(SqliteEpisodeRepository::new(Arc::clone(&pool))),
            comment: Arc::new(SqliteCommentRepository::new(Arc::clone(&pool))),
            reply: Arc::new(SqliteReplyRepository::new(Arc::clone(&pool))),
            review: Arc::new(SqliteReviewRepository::new(Arc::clone(&pool))),
            watchlist: Arc::new(SqliteWatchlistRepository::new(Arc::clone(&pool))),
            video: Arc::new(SqliteVideoRepository::new(pool)),
        }
    }
}

/// Outcome of a full reconciliation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecomputeSummary {
    pub series: usize,
    pub seasons: usize,
    pub episodes: usize,
    pub failed: usize,
}

pub struct CatalogService {
    repos: CatalogRepositories,
    validator: IntegrityValidator,
    aggregates: Arc<AggregateEngine>,
    cascade: CascadeEngine,
    queue: Arc<RecomputeQueue>,
    event_bus: Arc<EventBus>,
}

impl CatalogService {
    /// Wire the engines and subscribe the recompute handlers to `event_bus`.
    ///
    /// A bus carries one set of recompute handlers. Services built later on
    /// the same bus share the first service's queue for create-time
    /// recomputes, so they should share its store as well.
    pub fn new(repos: CatalogRepositories, event_bus: Arc<EventBus>, mode: RecomputeMode) -> Self {
        let aggregates = Arc::new(AggregateEngine::new(
            Arc::clone(&repos.series),
            Arc::clone(&repos.season),
            Arc::clone(&repos.episode),
            Arc::clone(&repos.comment),
            Arc::clone(&repos.reply),
            Arc::clone(&repos.review),
            Arc::clone(&event_bus),
        ));

        let queue = Arc::new(RecomputeQueue::for_mode(Arc::clone(&aggregates), mode));
        register_recompute_handlers(&event_bus, &queue);

        let validator = IntegrityValidator::new(
            Arc::clone(&repos.series),
            Arc::clone(&repos.season),
            Arc::clone(&repos.episode),
            Arc::clone(&repos.comment),
        );

        let cascade = CascadeEngine::new(
            Arc::clone(&repos.season),
            Arc::clone(&repos.episode),
            Arc::clone(&repos.comment),
            Arc::clone(&repos.reply),
            Arc::clone(&repos.review),
            Arc::clone(&repos.watchlist),
            Arc::clone(&repos.video),
            Arc::clone(&aggregates),
        );

        Self {
            repos,
            validator,
            aggregates,
            cascade,
            queue,
            event_bus,
        }
    }

    pub fn event_bus(&self) -> &Arc<EventBus> {
        &self.event_bus
    }

    pub fn recompute_mode(&self) -> RecomputeMode {
        self.queue.mode()
    }

    /// Wait for every fire-and-forget recompute enqueued so far
    pub async fn settled(&self) {
        self.queue.settled().await;
    }

    // ========================================================================
    // CREATE
    // ========================================================================

    pub fn create(&self, request: NewDocument) -> AppResult<Document> {
        let document = match request {
            NewDocument::Series(req) => Document::Series(self.create_series(req)?),
            NewDocument::Season(req) => Document::Season(self.create_season(req)?),
            NewDocument::Episode(req) => Document::Episode(self.create_episode(req)?),
            NewDocument::Comment(req) => Document::Comment(self.create_comment(req)?),
            NewDocument::Reply(req) => Document::Reply(self.create_reply(req)?),
            NewDocument::Review(req) => Document::Review(self.create_review(req)?),
            NewDocument::Watchlist(req) => Document::Watchlist(self.create_watchlist(req)?),
            NewDocument::Video(req) => Document::Video(self.create_video(req)?),
        };

        info!("Created {} {}", document.kind(), document.id());
        Ok(document)
    }

    fn create_series(&self, request: NewSeries) -> AppResult<Series> {
        let series = Series::new(request);
        validate_series(&series)?;
        self.repos.series.save(&series)?;
        Ok(series)
    }

    fn create_season(&self, request: NewSeason) -> AppResult<Season> {
        let series = self.validator.check_season(&request)?;

        let season = Season::new(request, &series.slug);
        validate_season(&season)?;
        self.repos.season.save(&season)?;

        self.event_bus
            .emit(SeasonCreated::new(season.id, season.series_id));
        Ok(season)
    }

    fn create_episode(&self, request: NewEpisode) -> AppResult<Episode> {
        let season = self.validator.check_episode(&request)?;

        let episode = Episode::new(request, &season.slug);
        validate_episode(&episode)?;
        self.repos.episode.save(&episode)?;

        self.event_bus.emit(EpisodeCreated::new(
            episode.id,
            episode.season_id,
            episode.series_id,
        ));
        Ok(episode)
    }

    fn create_comment(&self, request: NewComment) -> AppResult<Comment> {
        self.validator.ensure_episode(request.episode_id)?;

        let comment = Comment::new(request);
        validate_comment(&comment)?;
        self.repos.comment.save(&comment)?;

        self.event_bus
            .emit(CommentCreated::new(comment.id, comment.episode_id));
        Ok(comment)
    }

    fn create_reply(&self, request: NewReply) -> AppResult<Reply> {
        self.validator.check_reply(&request)?;

        let reply = Reply::new(request);
        validate_reply(&reply)?;
        self.repos.reply.save(&reply)?;

        self.event_bus.emit(ReplyCreated::new(
            reply.id,
            reply.comment_id,
            reply.episode_id,
        ));
        Ok(reply)
    }

    fn create_review(&self, request: NewReview) -> AppResult<Review> {
        self.validator.ensure_series(request.series_id)?;

        let review = Review::new(request);
        validate_review(&review)?;
        self.repos.review.save(&review)?;

        self.event_bus.emit(ReviewCreated::new(
            review.id,
            review.series_id,
            review.rating,
        ));
        Ok(review)
    }

    fn create_watchlist(&self, request: NewWatchlist) -> AppResult<Watchlist> {
        self.validator.ensure_series(request.series_id)?;

        let watchlist = Watchlist::new(request);
        self.repos.watchlist.save(&watchlist)?;
        Ok(watchlist)
    }

    fn create_video(&self, request: NewVideo) -> AppResult<Video> {
        let parent = resolve_parent(&request)?;
        self.validator.check_video_parent(&parent)?;

        let video = Video::new(parent, request.vids);
        validate_video(&video)?;
        self.repos.video.save(&video)?;
        Ok(video)
    }

    // ========================================================================
    // UPDATE
    // ========================================================================

    pub fn update_by_id(&self, kind: EntityKind, id: Uuid, patch: Patch) -> AppResult<Document> {
        if kind == EntityKind::Watchlist {
            return Err(AppError::validation("watchlist documents cannot be updated"));
        }
        if patch.kind() != kind {
            return Err(AppError::validation(format!(
                "a {} patch cannot update a {} document",
                patch.kind(),
                kind
            )));
        }

        let document = match patch {
            Patch::Series(patch) => Document::Series(self.update_series(id, patch)?),
            Patch::Season(patch) => Document::Season(self.update_season(id, patch)?),
            Patch::Episode(patch) => Document::Episode(self.update_episode(id, patch)?),
            Patch::Comment(patch) => Document::Comment(self.update_comment(id, patch)?),
            Patch::Reply(patch) => Document::Reply(self.update_reply(id, patch)?),
            Patch::Review(patch) => Document::Review(self.update_review(id, patch)?),
            Patch::Video(patch) => Document::Video(self.update_video(id, patch)?),
        };

        info!("Updated {} {}", kind, id);
        Ok(document)
    }

    fn update_series(&self, id: Uuid, patch: SeriesPatch) -> AppResult<Series> {
        let mut series = self.repos.series.get_by_id(id)?.ok_or(AppError::NotFound)?;

        series.apply(patch);
        validate_series(&series)?;
        ensure_updated(self.repos.series.update(&series)?)?;

        Ok(series)
    }

    fn update_season(&self, id: Uuid, patch: SeasonPatch) -> AppResult<Season> {
        let mut season = self.repos.season.get_by_id(id)?.ok_or(AppError::NotFound)?;
        let previous_series = season.series_id;

        let moved_to = patch.series_id.filter(|series_id| *series_id != previous_series);
        if let Some(series_id) = moved_to {
            self.validator.ensure_series(series_id)?;
            season.series_id = series_id;
        }

        season.apply(&patch);
        validate_season(&season)?;
        ensure_updated(self.repos.season.update(&season)?)?;

        if let Some(series_id) = moved_to {
            if let Err(e) = self.cascade.season_moved(season.id, previous_series, series_id) {
                error!("Relinking episodes of season {} failed: {}", season.id, e);
            }
        }

        Ok(season)
    }

    fn update_episode(&self, id: Uuid, patch: EpisodePatch) -> AppResult<Episode> {
        let mut episode = self.repos.episode.get_by_id(id)?.ok_or(AppError::NotFound)?;
        let previous_season = episode.season_id;

        let moved_to = patch.season_id.filter(|season_id| *season_id != previous_season);
        if let Some(season_id) = moved_to {
            self.validator.ensure_season(season_id)?;
            episode.season_id = season_id;
        }

        episode.apply(&patch);
        validate_episode(&episode)?;
        ensure_updated(self.repos.episode.update(&episode)?)?;

        if let Some(season_id) = moved_to {
            self.cascade.episode_moved(previous_season, season_id);
        }

        Ok(episode)
    }

    fn update_comment(&self, id: Uuid, patch: CommentPatch) -> AppResult<Comment> {
        let mut comment = self.repos.comment.get_by_id(id)?.ok_or(AppError::NotFound)?;
        let previous_episode = comment.episode_id;

        let moved_to = patch.episode_id.filter(|episode_id| *episode_id != previous_episode);
        if let Some(episode_id) = moved_to {
            self.validator.ensure_episode(episode_id)?;
            comment.episode_id = episode_id;
        }
        if let Some(text) = patch.text {
            comment.text = text;
        }

        validate_comment(&comment)?;
        ensure_updated(self.repos.comment.update(&comment)?)?;

        if let Some(episode_id) = moved_to {
            if let Err(e) = self
                .cascade
                .comment_moved(comment.id, previous_episode, episode_id)
            {
                error!("Moving replies of comment {} failed: {}", comment.id, e);
            }
        }

        Ok(comment)
    }

    fn update_reply(&self, id: Uuid, patch: ReplyPatch) -> AppResult<Reply> {
        let mut reply = self.repos.reply.get_by_id(id)?.ok_or(AppError::NotFound)?;

        if let Some(text) = patch.text {
            reply.text = text;
        }

        validate_reply(&reply)?;
        ensure_updated(self.repos.reply.update(&reply)?)?;

        Ok(reply)
    }

    fn update_review(&self, id: Uuid, patch: ReviewPatch) -> AppResult<Review> {
        let mut review = self.repos.review.get_by_id(id)?.ok_or(AppError::NotFound)?;

        review.apply(&patch);
        validate_review(&review)?;
        ensure_updated(self.repos.review.update(&review)?)?;

        self.aggregates
            .recompute_logged(AggregateTarget::SeriesRatings(review.series_id));

        Ok(review)
    }

    fn update_video(&self, id: Uuid, patch: VideoPatch) -> AppResult<Video> {
        let mut video = self.repos.video.get_by_id(id)?.ok_or(AppError::NotFound)?;

        let parent = resolve_parent_update(&video.parent, &patch)?;
        if !parent.same_owner(&video.parent) {
            self.validator.check_video_parent(&parent)?;
        }
        video.parent = parent;

        if let Some(vids) = patch.vids {
            video.vids = vids;
        }

        validate_video(&video)?;
        ensure_updated(self.repos.video.update(&video)?)?;

        Ok(video)
    }

    // ========================================================================
    // DELETE
    // ========================================================================

    /// Delete one document, then cascade to its descendants
    pub fn delete_by_id(&self, kind: EntityKind, id: Uuid) -> AppResult<()> {
        let document = self.get(kind, id)?;

        let removed = match kind {
            EntityKind::Series => self.repos.series.delete(id)?,
            EntityKind::Season => self.repos.season.delete(id)?,
            EntityKind::Episode => self.repos.episode.delete(id)?,
            EntityKind::Comment => self.repos.comment.delete(id)?,
            EntityKind::Reply => self.repos.reply.delete(id)?,
            EntityKind::Review => self.repos.review.delete(id)?,
            EntityKind::Watchlist => self.repos.watchlist.delete(id)?,
            EntityKind::Video => self.repos.video.delete(id)?,
        };
        ensure_updated(removed)?;

        info!("Deleted {} {}", kind, id);
        self.after_delete(&document);
        Ok(())
    }

    fn after_delete(&self, document: &Document) {
        let result = match document {
            Document::Series(series) => self.cascade.series_deleted(series).map(drop),
            Document::Season(season) => self.cascade.season_deleted(season).map(drop),
            Document::Episode(episode) => self.cascade.episode_deleted(episode).map(drop),
            Document::Comment(comment) => self.cascade.comment_deleted(comment).map(drop),
            Document::Reply(reply) => {
                self.aggregates
                    .recompute_logged(AggregateTarget::EpisodeComments(reply.episode_id));
                Ok(())
            }
            Document::Review(review) => {
                self.aggregates
                    .recompute_logged(AggregateTarget::SeriesRatings(review.series_id));
                Ok(())
            }
            Document::Watchlist(_) | Document::Video(_) => Ok(()),
        };

        if let Err(e) = result {
            error!(
                "Cascade after deleting {} {} stopped: {}",
                document.kind(),
                document.id(),
                e
            );
        }
    }

    /// Bulk delete by filter. No cascade runs; every counter that owned one
    /// of the removed documents is recomputed.
    pub fn delete_many(&self, kind: EntityKind, filter: Filter) -> AppResult<usize> {
        if kind == EntityKind::Series {
            return Err(AppError::validation(
                "series documents cannot be deleted by filter",
            ));
        }

        let targets = self.counters_owning(kind, &filter)?;

        let removed = match kind {
            // rejected above
            EntityKind::Series => 0,
            EntityKind::Season => self.repos.season.delete_many(&filter)?,
            EntityKind::Episode => self.repos.episode.delete_many(&filter)?,
            EntityKind::Comment => self.repos.comment.delete_many(&filter)?,
            EntityKind::Reply => self.repos.reply.delete_many(&filter)?,
            EntityKind::Review => self.repos.review.delete_many(&filter)?,
            EntityKind::Watchlist => self.repos.watchlist.delete_many(&filter)?,
            EntityKind::Video => self.repos.video.delete_many(&filter)?,
        };

        for target in targets {
            self.aggregates.recompute_logged(target);
        }

        info!("Deleted {} {} documents by filter", removed, kind);
        Ok(removed)
    }

    /// Parent counters that count documents matched by `filter`, read
    /// before the delete. An empty filter matches nothing here; the
    /// repository rejects it.
    fn counters_owning(
        &self,
        kind: EntityKind,
        filter: &Filter,
    ) -> AppResult<HashSet<AggregateTarget>> {
        if filter.is_empty() {
            return Ok(HashSet::new());
        }

        let targets = match kind {
            EntityKind::Season => self
                .repos
                .season
                .list(filter)?
                .into_iter()
                .map(|season| AggregateTarget::SeriesSeasons(season.series_id))
                .collect(),
            EntityKind::Episode => self
                .repos
                .episode
                .list(filter)?
                .into_iter()
                .map(|episode| AggregateTarget::SeasonEpisodes(episode.season_id))
                .collect(),
            EntityKind::Comment => self
                .repos
                .comment
                .list(filter)?
                .into_iter()
                .map(|comment| AggregateTarget::EpisodeComments(comment.episode_id))
                .collect(),
            EntityKind::Reply => self
                .repos
                .reply
                .list(filter)?
                .into_iter()
                .map(|reply| AggregateTarget::EpisodeComments(reply.episode_id))
                .collect(),
            EntityKind::Review => self
                .repos
                .review
                .list(filter)?
                .into_iter()
                .map(|review| AggregateTarget::SeriesRatings(review.series_id))
                .collect(),
            EntityKind::Series | EntityKind::Watchlist | EntityKind::Video => HashSet::new(),
        };

        Ok(targets)
    }

    // ========================================================================
    // READ
    // ========================================================================

    pub fn get(&self, kind: EntityKind, id: Uuid) -> AppResult<Document> {
        let document = match kind {
            EntityKind::Series => self.repos.series.get_by_id(id)?.map(Document::Series),
            EntityKind::Season => self.repos.season.get_by_id(id)?.map(Document::Season),
            EntityKind::Episode => self.repos.episode.get_by_id(id)?.map(Document::Episode),
            EntityKind::Comment => self.repos.comment.get_by_id(id)?.map(Document::Comment),
            EntityKind::Reply => self.repos.reply.get_by_id(id)?.map(Document::Reply),
            EntityKind::Review => self.repos.review.get_by_id(id)?.map(Document::Review),
            EntityKind::Watchlist => self
                .repos
                .watchlist
                .get_by_id(id)?
                .map(Document::Watchlist),
            EntityKind::Video => self.repos.video.get_by_id(id)?.map(Document::Video),
        };

        document.ok_or(AppError::NotFound)
    }

    pub fn list(&self, kind: EntityKind, filter: Filter) -> AppResult<Vec<Document>> {
        fn wrap<T>(docs: Vec<T>, variant: fn(T) -> Document) -> Vec<Document> {
            docs.into_iter().map(variant).collect()
        }

        let documents = match kind {
            EntityKind::Series => {
                if !filter.is_empty() {
                    return Err(AppError::validation("series documents have no references"));
                }
                wrap(self.repos.series.list_all()?, Document::Series)
            }
            EntityKind::Season => wrap(self.repos.season.list(&filter)?, Document::Season),
            EntityKind::Episode => wrap(self.repos.episode.list(&filter)?, Document::Episode),
            EntityKind::Comment => wrap(self.repos.comment.list(&filter)?, Document::Comment),
            EntityKind::Reply => wrap(self.repos.reply.list(&filter)?, Document::Reply),
            EntityKind::Review => wrap(self.repos.review.list(&filter)?, Document::Review),
            EntityKind::Watchlist => {
                wrap(self.repos.watchlist.list(&filter)?, Document::Watchlist)
            }
            EntityKind::Video => wrap(self.repos.video.list(&filter)?, Document::Video),
        };

        Ok(documents)
    }

    /// Counters as of the last recompute; does not force one
    pub fn get_current_aggregate(&self, kind: EntityKind, id: Uuid) -> AppResult<Aggregates> {
        self.aggregates.current(kind, id)?.ok_or(AppError::NotFound)
    }

    /// Ownership check for user-owned collections
    pub fn authorize(&self, actor: &Actor, kind: EntityKind, id: Uuid) -> AppResult<()> {
        let document = self.get(kind, id)?;

        match document.owner() {
            Some(owner) if !actor.may_mutate(owner) => Err(AppError::Forbidden(format!(
                "{} {} belongs to another user",
                kind, id
            ))),
            _ => Ok(()),
        }
    }

    // ========================================================================
    // RECONCILIATION
    // ========================================================================

    /// Re-derive every counter from live data. Individual failures are
    /// counted and logged; the pass keeps going.
    pub fn recompute_all(&self) -> AppResult<RecomputeSummary> {
        let mut summary = RecomputeSummary::default();

        for series in self.repos.series.list_all()? {
            self.reconcile(EntityKind::Series, series.id, &mut summary);
            summary.series += 1;
        }
        for season in self.repos.season.list(&Filter::default())? {
            self.reconcile(EntityKind::Season, season.id, &mut summary);
            summary.seasons += 1;
        }
        for episode in self.repos.episode.list(&Filter::default())? {
            self.reconcile(EntityKind::Episode, episode.id, &mut summary);
            summary.episodes += 1;
        }

        info!(
            "Reconciled {} series, {} seasons, {} episodes ({} failures)",
            summary.series, summary.seasons, summary.episodes, summary.failed
        );
        Ok(summary)
    }

    fn reconcile(&self, kind: EntityKind, id: Uuid, summary: &mut RecomputeSummary) {
        if let Err(e) = self.aggregates.recompute_parent(kind, id) {
            warn!("Reconciling {} {} failed: {}", kind, id, e);
            summary.failed += 1;
        }
    }
}

/// A row that vanished between read and write is reported as NotFound
fn ensure_updated(written: bool) -> AppResult<()> {
    if written {
        Ok(())
    } else {
        Err(AppError::NotFound)
    }
}
