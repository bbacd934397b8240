use super::entity::Reply;
use crate::domain::{validate_not_blank, DomainResult};

pub fn validate_reply(reply: &Reply) -> DomainResult<()> {
    validate_not_blank("reply", &reply.text)
}
