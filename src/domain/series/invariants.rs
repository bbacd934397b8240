use super::entity::Series;
use crate::domain::{validate_name, validate_not_blank, DomainError, DomainResult};

/// Validates all Series invariants
pub fn validate_series(series: &Series) -> DomainResult<()> {
    validate_name("name", &series.name)?;
    validate_not_blank("description", &series.description)?;
    validate_keywords(&series.keywords)?;
    if series.genres.is_empty() {
        return Err(DomainError::InvariantViolation(
            "At least one of genres must be selected".to_string(),
        ));
    }
    Ok(())
}

/// Keywords must be a non-empty list of non-blank entries
fn validate_keywords(keywords: &[String]) -> DomainResult<()> {
    if keywords.is_empty() || keywords.iter().any(|k| k.trim().is_empty()) {
        return Err(DomainError::InvariantViolation(
            "The keywords array must contain at least one element and non-empty fields"
                .to_string(),
        ));
    }
    Ok(())
}

// Series invariants:
//
// 1. Name is 3..=120 characters and unique (unique index)
// 2. Slug is derived from the name once, at creation
// 3. seasons_count / ratings_* are written only by the aggregate engine
// 4. ratings_average is 1 while no reviews exist
