pub mod entity;
pub mod invariants;

pub use entity::{NewSeason, Season, SeasonPatch};
pub use invariants::validate_season;
