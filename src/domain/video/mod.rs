pub mod entity;
pub mod invariants;

pub use entity::{NewVideo, Video, VideoHost, VideoParent, VideoPatch, VideoSource};
pub use invariants::{resolve_parent, resolve_parent_update, validate_video, ExclusivityError};
