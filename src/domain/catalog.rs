use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ValidationError;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub struct TitleId(Uuid);

impl TitleId {
    pub fn new(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for TitleId {
    fn default() -> Self {
        Self(Uuid::new_v4())
    }
}

impl AsRef<Uuid> for TitleId {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub struct EpisodeId(Uuid);

impl EpisodeId {
    pub fn new(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for EpisodeId {
    fn default() -> Self {
        Self(Uuid::new_v4())
    }
}

impl AsRef<Uuid> for EpisodeId {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TitleKind {
    Movie,
    Series,
}

impl TitleKind {
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s {
            "Movie" => Ok(Self::Movie),
            "Series" => Ok(Self::Series),
            other => Err(ValidationError::new(format!(
                "Unknown title kind: {other}"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Movie => "Movie",
            Self::Series => "Series",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleName(String);

impl TitleName {
    pub fn parse(name: String) -> Result<Self, ValidationError> {
        match name.chars().count() {
            x if x < 1 => Err(ValidationError::new(
                "Title name cannot be empty".to_string(),
            )),
            x if x > 255 => Err(ValidationError::new(
                "Max title name length is 255 characters".to_string(),
            )),
            _ => Ok(Self(name)),
        }
    }
}

impl AsRef<String> for TitleName {
    fn as_ref(&self) -> &String {
        &self.0
    }
}

/// A catalog entry: a movie or a series shell that episodes hang off.
#[derive(Debug, Clone, PartialEq)]
pub struct Title {
    pub id: TitleId,
    pub name: TitleName,
    pub description: String,
    pub release_year: i32,
    pub kind: TitleKind,
    pub genre: String,
    pub maturity_rating: String,
    pub thumbnail_url: String,
    pub video_url: String,
    pub total_seasons: Option<i32>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Episode {
    pub id: EpisodeId,
    pub title_id: TitleId,
    pub name: TitleName,
    pub season_number: i32,
    pub episode_number: i32,
    pub duration_minutes: i32,
    pub video_url: String,
}

/// Optional narrowing for catalog listings.
#[derive(Debug, Clone, Default)]
pub struct TitleFilter {
    pub genre: Option<String>,
    pub kind: Option<TitleKind>,
}
