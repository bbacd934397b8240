pub mod entity;
pub mod invariants;

pub use entity::{Episode, EpisodePatch, MediaType, NewEpisode};
pub use invariants::validate_episode;
