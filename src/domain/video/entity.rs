use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::DomainError;

/// Playable links attached to exactly one episode or one series (banner)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    pub id: Uuid,
    pub parent: VideoParent,
    pub vids: Vec<VideoSource>,
    pub created_at: DateTime<Utc>,
}

/// The single owner of a video. A logo exists only for series banners.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VideoParent {
    Episode { episode_id: Uuid },
    Series { series_id: Uuid, logo: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoSource {
    pub link: String,
    pub source: VideoHost,
    pub mime_type: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoHost {
    Telegram,
    GoogleDrive,
    OneDrive,
}

/// Creation payload as received from the request layer: two optional
/// parent fields, resolved into a `VideoParent` by the exclusivity rules
#[derive(Debug, Clone, Default)]
pub struct NewVideo {
    pub vids: Vec<VideoSource>,
    pub episode_id: Option<Uuid>,
    pub series_id: Option<Uuid>,
    pub logo: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct VideoPatch {
    pub vids: Option<Vec<VideoSource>>,
    pub episode_id: Option<Uuid>,
    pub series_id: Option<Uuid>,
    pub logo: Option<String>,
}

impl Video {
    pub fn new(parent: VideoParent, vids: Vec<VideoSource>) -> Self {
        Self {
            id: Uuid::new_v4(),
            parent,
            vids,
            created_at: Utc::now(),
        }
    }
}

impl VideoParent {
    pub fn episode_id(&self) -> Option<Uuid> {
        match self {
            VideoParent::Episode { episode_id } => Some(*episode_id),
            VideoParent::Series { .. } => None,
        }
    }

    pub fn series_id(&self) -> Option<Uuid> {
        match self {
            VideoParent::Series { series_id, .. } => Some(*series_id),
            VideoParent::Episode { .. } => None,
        }
    }

    pub fn logo(&self) -> Option<&str> {
        match self {
            VideoParent::Series { logo, .. } => Some(logo),
            VideoParent::Episode { .. } => None,
        }
    }

    /// True when both values point at the same parent document
    pub fn same_owner(&self, other: &VideoParent) -> bool {
        self.episode_id() == other.episode_id() && self.series_id() == other.series_id()
    }
}

impl std::fmt::Display for VideoHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VideoHost::Telegram => write!(f, "telegram"),
            VideoHost::GoogleDrive => write!(f, "googledrive"),
            VideoHost::OneDrive => write!(f, "onedrive"),
        }
    }
}

impl FromStr for VideoHost {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "telegram" => Ok(VideoHost::Telegram),
            "googledrive" => Ok(VideoHost::GoogleDrive),
            "onedrive" => Ok(VideoHost::OneDrive),
            other => Err(DomainError::UnknownValue {
                field: "vids.source",
                value: other.to_string(),
            }),
        }
    }
}
