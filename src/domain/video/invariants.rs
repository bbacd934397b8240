// src/domain/video/invariants.rs
//
// Exclusivity rules: a video belongs to exactly one of {episode, series},
// and carries a logo if and only if it belongs to a series.

use thiserror::Error;

use super::entity::{NewVideo, Video, VideoParent, VideoPatch};
use crate::domain::{DomainError, DomainResult};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExclusivityError {
    #[error("exactly one of episode or series must be provided")]
    ExactlyOneParentRequired,

    #[error("logo required for series video")]
    LogoRequiredForSeriesVideo,

    #[error("logo not allowed for episode video")]
    LogoNotAllowedForEpisodeVideo,
}

fn non_blank(logo: Option<&String>) -> Option<String> {
    logo.map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .map(str::to_string)
}

/// Resolve the two optional parent fields of a creation payload
pub fn resolve_parent(request: &NewVideo) -> Result<VideoParent, ExclusivityError> {
    match (request.episode_id, request.series_id) {
        (Some(_), Some(_)) | (None, None) => Err(ExclusivityError::ExactlyOneParentRequired),
        (Some(episode_id), None) => {
            if non_blank(request.logo.as_ref()).is_some() {
                return Err(ExclusivityError::LogoNotAllowedForEpisodeVideo);
            }
            Ok(VideoParent::Episode { episode_id })
        }
        (None, Some(series_id)) => {
            let logo = non_blank(request.logo.as_ref())
                .ok_or(ExclusivityError::LogoRequiredForSeriesVideo)?;
            Ok(VideoParent::Series { series_id, logo })
        }
    }
}

/// Compute the parent a video ends up with after `patch` is applied.
///
/// Switching episode -> series clears the episode and needs a logo from the
/// patch or the current document; switching series -> episode clears both
/// series and logo and rejects a new logo.
pub fn resolve_parent_update(
    current: &VideoParent,
    patch: &VideoPatch,
) -> Result<VideoParent, ExclusivityError> {
    let new_logo = non_blank(patch.logo.as_ref());

    match (patch.episode_id, patch.series_id) {
        (Some(_), Some(_)) => Err(ExclusivityError::ExactlyOneParentRequired),
        (None, Some(series_id)) => {
            let logo = new_logo
                .or_else(|| current.logo().map(str::to_string))
                .ok_or(ExclusivityError::LogoRequiredForSeriesVideo)?;
            Ok(VideoParent::Series { series_id, logo })
        }
        (Some(episode_id), None) => {
            if new_logo.is_some() {
                return Err(ExclusivityError::LogoNotAllowedForEpisodeVideo);
            }
            Ok(VideoParent::Episode { episode_id })
        }
        (None, None) => match (current, new_logo) {
            (_, None) => Ok(current.clone()),
            (VideoParent::Series { series_id, .. }, Some(logo)) => Ok(VideoParent::Series {
                series_id: *series_id,
                logo,
            }),
            (VideoParent::Episode { .. }, Some(_)) => {
                Err(ExclusivityError::LogoNotAllowedForEpisodeVideo)
            }
        },
    }
}

/// Validates field-level Video invariants
pub fn validate_video(video: &Video) -> DomainResult<()> {
    if video.vids.is_empty() {
        return Err(DomainError::InvariantViolation(
            "The vids array must contain at least one element".to_string(),
        ));
    }
    for vid in &video.vids {
        if vid.link.trim().is_empty() {
            return Err(DomainError::EmptyField { field: "vids.link" });
        }
        if vid.mime_type.trim().is_empty() {
            return Err(DomainError::EmptyField {
                field: "vids.mimeType",
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn episode_parent() -> VideoParent {
        VideoParent::Episode {
            episode_id: Uuid::new_v4(),
        }
    }

    fn series_parent() -> VideoParent {
        VideoParent::Series {
            series_id: Uuid::new_v4(),
            logo: "logo.png".to_string(),
        }
    }

    #[test]
    fn test_create_requires_exactly_one_parent() {
        let both = NewVideo {
            episode_id: Some(Uuid::new_v4()),
            series_id: Some(Uuid::new_v4()),
            logo: Some("logo.png".to_string()),
            ..Default::default()
        };
        assert_eq!(
            resolve_parent(&both),
            Err(ExclusivityError::ExactlyOneParentRequired)
        );

        let neither = NewVideo::default();
        assert_eq!(
            resolve_parent(&neither),
            Err(ExclusivityError::ExactlyOneParentRequired)
        );
    }

    #[test]
    fn test_series_video_requires_logo() {
        let request = NewVideo {
            series_id: Some(Uuid::new_v4()),
            logo: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(
            resolve_parent(&request),
            Err(ExclusivityError::LogoRequiredForSeriesVideo)
        );
    }

    #[test]
    fn test_episode_to_series_needs_logo() {
        let current = episode_parent();
        let series_id = Uuid::new_v4();

        let without_logo = VideoPatch {
            series_id: Some(series_id),
            ..Default::default()
        };
        assert_eq!(
            resolve_parent_update(&current, &without_logo),
            Err(ExclusivityError::LogoRequiredForSeriesVideo)
        );

        let with_logo = VideoPatch {
            series_id: Some(series_id),
            logo: Some("banner.png".to_string()),
            ..Default::default()
        };
        assert_eq!(
            resolve_parent_update(&current, &with_logo),
            Ok(VideoParent::Series {
                series_id,
                logo: "banner.png".to_string()
            })
        );
    }

    #[test]
    fn test_series_to_episode_clears_logo() {
        let current = series_parent();
        let episode_id = Uuid::new_v4();

        let patch = VideoPatch {
            episode_id: Some(episode_id),
            ..Default::default()
        };
        let parent = resolve_parent_update(&current, &patch).unwrap();
        assert_eq!(parent, VideoParent::Episode { episode_id });
        assert_eq!(parent.logo(), None);

        let with_logo = VideoPatch {
            episode_id: Some(episode_id),
            logo: Some("x.png".to_string()),
            ..Default::default()
        };
        assert_eq!(
            resolve_parent_update(&current, &with_logo),
            Err(ExclusivityError::LogoNotAllowedForEpisodeVideo)
        );
    }

    #[test]
    fn test_series_move_keeps_existing_logo() {
        let current = series_parent();
        let other = Uuid::new_v4();
        let patch = VideoPatch {
            series_id: Some(other),
            ..Default::default()
        };
        assert_eq!(
            resolve_parent_update(&current, &patch),
            Ok(VideoParent::Series {
                series_id: other,
                logo: "logo.png".to_string()
            })
        );
    }

    #[test]
    fn test_update_with_both_parents_fails() {
        let patch = VideoPatch {
            episode_id: Some(Uuid::new_v4()),
            series_id: Some(Uuid::new_v4()),
            ..Default::default()
        };
        assert_eq!(
            resolve_parent_update(&episode_parent(), &patch),
            Err(ExclusivityError::ExactlyOneParentRequired)
        );
    }

    #[test]
    fn test_logo_only_patch_on_episode_video_fails() {
        let patch = VideoPatch {
            logo: Some("x.png".to_string()),
            ..Default::default()
        };
        assert_eq!(
            resolve_parent_update(&episode_parent(), &patch),
            Err(ExclusivityError::LogoNotAllowedForEpisodeVideo)
        );
    }

    #[test]
    fn test_empty_vids_fail_validation() {
        let video = Video::new(episode_parent(), Vec::new());
        assert!(validate_video(&video).is_err());
    }
}
