use super::entity::Comment;
use crate::domain::{validate_not_blank, DomainResult};

/// Validates all Comment invariants
///
/// Uniqueness of (episode, user) is enforced by the store's unique index.
pub fn validate_comment(comment: &Comment) -> DomainResult<()> {
    validate_not_blank("comment", &comment.text)
}
