// src/services/integrity.rs
//
// Integrity Validator
//
// RULES:
// - Read-only lookups, run immediately before the write they guard
// - A missing parent is `ReferenceNotFound(kind)`, never a silent orphan
// - Lookups that the caller needs (slugs) return the parent document

use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{EntityKind, NewEpisode, NewReply, NewSeason, Season, Series, VideoParent};
use crate::error::{AppError, AppResult};
use crate::repositories::{
    CommentRepository, EpisodeRepository, SeasonRepository, SeriesRepository,
};

pub struct IntegrityValidator {
    series_repo: Arc<dyn SeriesRepository>,
    season_repo: Arc<dyn SeasonRepository>,
    episode_repo: Arc<dyn EpisodeRepository>,
    comment_repo: Arc<dyn CommentRepository>,
}

impl IntegrityValidator {
    pub fn new(
        series_repo: Arc<dyn SeriesRepository>,
        season_repo: Arc<dyn SeasonRepository>,
        episode_repo: Arc<dyn EpisodeRepository>,
        comment_repo: Arc<dyn CommentRepository>,
    ) -> Self {
        Self {
            series_repo,
            season_repo,
            episode_repo,
            comment_repo,
        }
    }

    pub fn require_series(&self, id: Uuid) -> AppResult<Series> {
        self.series_repo
            .get_by_id(id)?
            .ok_or(AppError::ReferenceNotFound(EntityKind::Series))
    }

    pub fn require_season(&self, id: Uuid) -> AppResult<Season> {
        self.season_repo
            .get_by_id(id)?
            .ok_or(AppError::ReferenceNotFound(EntityKind::Season))
    }

    fn ensure(&self, exists: bool, kind: EntityKind) -> AppResult<()> {
        if exists {
            Ok(())
        } else {
            Err(AppError::ReferenceNotFound(kind))
        }
    }

    pub fn ensure_series(&self, id: Uuid) -> AppResult<()> {
        self.ensure(self.series_repo.exists(id)?, EntityKind::Series)
    }

    pub fn ensure_season(&self, id: Uuid) -> AppResult<()> {
        self.ensure(self.season_repo.exists(id)?, EntityKind::Season)
    }

    pub fn ensure_episode(&self, id: Uuid) -> AppResult<()> {
        self.ensure(self.episode_repo.exists(id)?, EntityKind::Episode)
    }

    pub fn ensure_comment(&self, id: Uuid) -> AppResult<()> {
        self.ensure(self.comment_repo.exists(id)?, EntityKind::Comment)
    }

    /// Season -> Series. Returns the series for the slug.
    pub fn check_season(&self, request: &NewSeason) -> AppResult<Series> {
        self.require_series(request.series_id)
    }

    /// Episode -> {Series, Season}. Returns the season for the slug.
    pub fn check_episode(&self, request: &NewEpisode) -> AppResult<Season> {
        self.ensure_series(request.series_id)?;
        self.require_season(request.season_id)
    }

    /// Reply -> {Comment, Episode}
    pub fn check_reply(&self, request: &NewReply) -> AppResult<()> {
        self.ensure_comment(request.comment_id)?;
        self.ensure_episode(request.episode_id)
    }

    /// Video -> whichever parent is set
    pub fn check_video_parent(&self, parent: &VideoParent) -> AppResult<()> {
        match parent {
            VideoParent::Episode { episode_id } => self.ensure_episode(*episode_id),
            VideoParent::Series { series_id, .. } => self.ensure_series(*series_id),
        }
    }
}
