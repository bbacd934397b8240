use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::aggregates::DEFAULT_RATINGS_AVERAGE;
use crate::domain::slug::slugify;
use crate::domain::DomainError;

/// Root of the catalog hierarchy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    /// Internal immutable identifier
    pub id: Uuid,

    /// Unique display name
    pub name: String,

    /// URL-friendly name, fixed at creation
    pub slug: String,

    pub description: String,
    pub launch_year: i32,
    pub is_completed: bool,
    pub keywords: Vec<String>,
    pub genres: Vec<Genre>,

    /// Mean review rating, owned by the aggregate engine
    pub ratings_average: f64,

    /// Number of reviews, owned by the aggregate engine
    pub ratings_quantity: u32,

    /// Number of seasons, owned by the aggregate engine
    pub seasons_count: u32,

    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Genre {
    Action,
    Adventure,
    Comedy,
    Drama,
    Fantasy,
    Horror,
    Mystery,
    Romance,
}

/// Payload accepted by `create` for a series
#[derive(Debug, Clone)]
pub struct NewSeries {
    pub name: String,
    pub description: String,
    pub launch_year: i32,
    pub is_completed: bool,
    pub keywords: Vec<String>,
    pub genres: Vec<Genre>,
}

/// Partial update; counters are deliberately absent
#[derive(Debug, Clone, Default)]
pub struct SeriesPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub launch_year: Option<i32>,
    pub is_completed: Option<bool>,
    pub keywords: Option<Vec<String>>,
    pub genres: Option<Vec<Genre>>,
}

impl Series {
    pub fn new(request: NewSeries) -> Self {
        let name = request.name.trim().to_string();
        Self {
            id: Uuid::new_v4(),
            slug: slugify(&name),
            name,
            description: request.description.trim().to_string(),
            launch_year: request.launch_year,
            is_completed: request.is_completed,
            keywords: request.keywords,
            genres: request.genres,
            ratings_average: DEFAULT_RATINGS_AVERAGE,
            ratings_quantity: 0,
            seasons_count: 0,
            created_at: Utc::now(),
        }
    }

    pub fn apply(&mut self, patch: SeriesPatch) {
        if let Some(name) = patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(description) = patch.description {
            self.description = description.trim().to_string();
        }
        if let Some(launch_year) = patch.launch_year {
            self.launch_year = launch_year;
        }
        if let Some(is_completed) = patch.is_completed {
            self.is_completed = is_completed;
        }
        if let Some(keywords) = patch.keywords {
            self.keywords = keywords;
        }
        if let Some(genres) = patch.genres {
            self.genres = genres;
        }
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Genre::Action => "action",
            Genre::Adventure => "adventure",
            Genre::Comedy => "comedy",
            Genre::Drama => "drama",
            Genre::Fantasy => "fantasy",
            Genre::Horror => "horror",
            Genre::Mystery => "mystery",
            Genre::Romance => "romance",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Genre {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "action" => Ok(Genre::Action),
            "adventure" => Ok(Genre::Adventure),
            "comedy" => Ok(Genre::Comedy),
            "drama" => Ok(Genre::Drama),
            "fantasy" => Ok(Genre::Fantasy),
            "horror" => Ok(Genre::Horror),
            "mystery" => Ok(Genre::Mystery),
            "romance" => Ok(Genre::Romance),
            other => Err(DomainError::UnknownValue {
                field: "genres",
                value: other.to_string(),
            }),
        }
    }
}
