use regex::Regex;
use std::sync::OnceLock;

fn separator_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[^a-z0-9]+").expect("static slug pattern"))
}

/// Lowercase the input and collapse every run of non-alphanumerics into `-`
pub fn slugify(input: &str) -> String {
    let lowered = input.to_lowercase();
    separator_pattern()
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

/// Season slug is derived from its series slug and season number
pub fn season_slug(series_slug: &str, number: u32) -> String {
    slugify(&format!("{} S{}", series_slug, number))
}

/// Episode slug is derived from its season slug and sequence number
pub fn episode_slug(season_slug: &str, sequence_number: u32) -> String {
    slugify(&format!("{} E{}", season_slug, sequence_number))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_collapses_punctuation() {
        assert_eq!(slugify("Attack on Titan: Final!"), "attack-on-titan-final");
        assert_eq!(slugify("  Steins;Gate  "), "steins-gate");
    }

    #[test]
    fn test_nested_slugs() {
        let series = slugify("Breaking Bad");
        let season = season_slug(&series, 2);
        assert_eq!(season, "breaking-bad-s2");
        assert_eq!(episode_slug(&season, 13), "breaking-bad-s2-e13");
    }
}
