pub mod entity;
pub mod invariants;

pub use entity::{Genre, NewSeries, Series, SeriesPatch};
pub use invariants::validate_series;
