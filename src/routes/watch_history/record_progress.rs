use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::CookieJar;
use chrono::Utc;
use color_eyre::eyre::eyre;
use serde::{Deserialize, Serialize};

use crate::{
    app_state::AppState,
    domain::{
        CatalogStoreError, EpisodeId, MediaAPIError, ProfileId, TitleId,
        WatchEntry, WatchedPercentage,
    },
    utils::{auth::get_claims, profile::check_profile_ownership},
};

#[tracing::instrument(name = "Record watch progress route handler", skip_all)]
pub async fn record_progress(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<RecordProgressRequest>,
) -> Result<(StatusCode, CookieJar, Json<WatchEntryResponse>), MediaAPIError> {
    let user_id = get_claims(&jar, &state.banned_token_store).await?.id;
    let profile_id = ProfileId::new(request.profile_id);
    let title_id = TitleId::new(request.title_id);

    check_profile_ownership(&state.profile_store, &user_id, &profile_id)
        .await?;

    state
        .catalog_store
        .read()
        .await
        .get_title(&title_id)
        .await
        .map_err(|e| match e {
            CatalogStoreError::TitleNotFound => {
                MediaAPIError::IDNotFoundError(*title_id.as_ref())
            }
            e => MediaAPIError::UnexpectedError(eyre!(e)),
        })?;

    let entry = WatchEntry {
        profile_id,
        title_id,
        episode_id: request.episode_id.map(EpisodeId::new),
        watched_percentage: WatchedPercentage::parse(
            request.watched_percentage,
        )?,
        position_seconds: request.position_seconds,
        completed: request.completed,
        last_watched: Utc::now(),
    };

    state
        .watch_history_store
        .write()
        .await
        .record(entry.clone())
        .await
        .map_err(|e| MediaAPIError::UnexpectedError(eyre!(e)))?;

    // Echo the row as persisted, not the request as parsed.
    let stored = state
        .watch_history_store
        .read()
        .await
        .get_entry(
            &entry.profile_id,
            &entry.title_id,
            entry.episode_id.as_ref(),
        )
        .await
        .map_err(|e| MediaAPIError::UnexpectedError(eyre!(e)))?;

    Ok((StatusCode::OK, jar, Json(WatchEntryResponse::from(&stored))))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordProgressRequest {
    pub profile_id: uuid::Uuid,
    pub title_id: uuid::Uuid,
    pub episode_id: Option<uuid::Uuid>,
    pub watched_percentage: f64,
    pub position_seconds: i32,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchEntryResponse {
    pub profile_id: String,
    pub title_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode_id: Option<String>,
    pub watched_percentage: f64,
    pub position_seconds: i32,
    pub completed: bool,
    pub last_watched: chrono::DateTime<chrono::Utc>,
}

impl From<&WatchEntry> for WatchEntryResponse {
    fn from(entry: &WatchEntry) -> Self {
        Self {
            profile_id: entry.profile_id.as_ref().to_string(),
            title_id: entry.title_id.as_ref().to_string(),
            episode_id: entry
                .episode_id
                .as_ref()
                .map(|id| id.as_ref().to_string()),
            watched_percentage: entry.watched_percentage.value_of(),
            position_seconds: entry.position_seconds,
            completed: entry.completed,
            last_watched: entry.last_watched,
        }
    }
}
