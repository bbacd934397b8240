use super::entity::Season;
use crate::domain::{validate_name, DomainResult};

/// Validates all Season invariants
pub fn validate_season(season: &Season) -> DomainResult<()> {
    validate_name("name", &season.name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::season::NewSeason;
    use uuid::Uuid;

    #[test]
    fn test_new_season_slug_follows_series() {
        let season = Season::new(
            NewSeason {
                series_id: Uuid::new_v4(),
                name: "Season One".to_string(),
                number: 1,
            },
            "dark",
        );
        assert_eq!(season.slug, "dark-s1");
        assert_eq!(season.episodes_count, 0);
        assert!(validate_season(&season).is_ok());
    }

    #[test]
    fn test_short_name_fails() {
        let season = Season::new(
            NewSeason {
                series_id: Uuid::new_v4(),
                name: "S1".to_string(),
                number: 1,
            },
            "dark",
        );
        assert!(validate_season(&season).is_err());
    }
}
