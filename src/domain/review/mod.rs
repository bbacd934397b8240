pub mod entity;
pub mod invariants;

pub use entity::{NewReview, Review, ReviewPatch};
pub use invariants::validate_review;
