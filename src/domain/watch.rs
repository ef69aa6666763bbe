use chrono::{DateTime, Utc};

use super::{EpisodeId, ProfileId, TitleId, ValidationError};

/// A saved title on a profile's personal list.
#[derive(Debug, Clone, PartialEq)]
pub struct MyListEntry {
    pub profile_id: ProfileId,
    pub title_id: TitleId,
    pub added_at: DateTime<Utc>,
}

/// Playback progress for (profile, title, optional episode). One row per
/// tuple, upserted on every progress report.
#[derive(Debug, Clone, PartialEq)]
pub struct WatchEntry {
    pub profile_id: ProfileId,
    pub title_id: TitleId,
    pub episode_id: Option<EpisodeId>,
    pub watched_percentage: WatchedPercentage,
    pub position_seconds: i32,
    pub completed: bool,
    pub last_watched: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WatchedPercentage(f64);

impl WatchedPercentage {
    pub fn parse(value: f64) -> Result<Self, ValidationError> {
        if !(0.0..=100.0).contains(&value) || value.is_nan() {
            return Err(ValidationError::new(format!(
                "Watched percentage must be between 0 and 100, got {value}"
            )));
        }
        Ok(Self(value))
    }

    pub fn value_of(&self) -> f64 {
        self.0
    }
}
