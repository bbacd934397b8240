use super::entity::Review;
use crate::domain::{validate_not_blank, DomainError, DomainResult};

/// Validates all Review invariants
pub fn validate_review(review: &Review) -> DomainResult<()> {
    validate_not_blank("review", &review.text)?;
    if !(1..=5).contains(&review.rating) {
        return Err(DomainError::RatingOutOfRange(review.rating));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::review::NewReview;
    use uuid::Uuid;

    fn review_with(rating: i64) -> Review {
        Review::new(NewReview {
            series_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            text: "Great pacing".to_string(),
            rating,
        })
    }

    #[test]
    fn test_rating_bounds() {
        assert!(validate_review(&review_with(1)).is_ok());
        assert!(validate_review(&review_with(5)).is_ok());
        assert_eq!(
            validate_review(&review_with(0)),
            Err(DomainError::RatingOutOfRange(0))
        );
        assert_eq!(
            validate_review(&review_with(6)),
            Err(DomainError::RatingOutOfRange(6))
        );
    }
}
