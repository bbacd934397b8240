// src/repositories/mod.rs
//
// Entity store adapter
//
// RULES:
// - Repositories are DUMB data mappers
// - NO referential checks (the integrity validator owns those)
// - NO cascades, NO counter recomputation
// - NO event emission
// - NO cross-repository calls
// - Explicit SQL only

pub mod comment_repository;
pub mod episode_repository;
pub mod filter;
pub mod reply_repository;
pub mod review_repository;
pub mod season_repository;
pub mod series_repository;
pub(crate) mod sql;
pub mod video_repository;
pub mod watchlist_repository;

pub use comment_repository::{CommentRepository, SqliteCommentRepository};
pub use episode_repository::{EpisodeRepository, SqliteEpisodeRepository};
pub use filter::{Filter, FilterColumn};
pub use reply_repository::{ReplyRepository, SqliteReplyRepository};
pub use review_repository::{ReviewRepository, SqliteReviewRepository};
pub use season_repository::{SeasonRepository, SqliteSeasonRepository};
pub use series_repository::{SeriesRepository, SqliteSeriesRepository};
pub use video_repository::{SqliteVideoRepository, VideoRepository};
pub use watchlist_repository::{SqliteWatchlistRepository, WatchlistRepository};
