pub mod entity;
pub mod invariants;

pub use entity::{NewReply, Reply, ReplyPatch};
pub use invariants::validate_reply;
