pub mod entity;
pub mod invariants;

pub use entity::{Comment, CommentPatch, NewComment};
pub use invariants::validate_comment;
