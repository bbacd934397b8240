use super::entity::Episode;
use crate::domain::{validate_name, DomainError, DomainResult};

/// Validates all Episode invariants
pub fn validate_episode(episode: &Episode) -> DomainResult<()> {
    validate_name("name", &episode.name)?;
    validate_summary(&episode.summary)?;
    Ok(())
}

/// Summary must carry at least 10 characters
fn validate_summary(summary: &str) -> DomainResult<()> {
    if summary.trim().chars().count() < 10 {
        return Err(DomainError::InvariantViolation(
            "An episode summary must have at least 10 characters".to_string(),
        ));
    }
    Ok(())
}

/// Critical Episode Invariants:
///
/// 1. Episode MUST belong to an existing Series and Season
/// 2. Episode can exist without a video
/// 3. comments_count is comments + replies, written only by the aggregate engine
/// 4. Moving to another season recomputes both seasons' episode counts

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::episode::{MediaType, NewEpisode};
    use uuid::Uuid;

    fn sample() -> Episode {
        Episode::new(
            NewEpisode {
                series_id: Uuid::new_v4(),
                season_id: Uuid::new_v4(),
                name: "Pilot".to_string(),
                summary: "Where everything begins".to_string(),
                number: 1,
                sequence_number: 1,
                premium: false,
                filler: false,
                media_type: MediaType::Episode,
                minutes: 47,
            },
            "dark-s1",
        )
    }

    #[test]
    fn test_valid_episode() {
        let episode = sample();
        assert!(validate_episode(&episode).is_ok());
        assert_eq!(episode.slug, "dark-s1-e1");
    }

    #[test]
    fn test_short_summary_fails() {
        let mut episode = sample();
        episode.summary = "short".to_string();
        assert!(validate_episode(&episode).is_err());
    }

    #[test]
    fn test_media_type_parsing() {
        assert_eq!("movie".parse::<MediaType>().unwrap(), MediaType::Movie);
        assert!("ova".parse::<MediaType>().is_err());
    }
}
