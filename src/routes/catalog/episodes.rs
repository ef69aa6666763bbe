use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::CookieJar;
use color_eyre::eyre::eyre;
use serde::{Deserialize, Serialize};

use crate::{
    app_state::AppState,
    domain::{
        CatalogStoreError, Episode, EpisodeId, MediaAPIError, TitleId,
        TitleName,
    },
    utils::auth::get_claims,
};

use super::require_admin;

#[tracing::instrument(name = "List episodes route handler", skip_all)]
pub async fn get_episodes(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(title_id): Path<uuid::Uuid>,
) -> Result<(StatusCode, CookieJar, Json<Vec<EpisodeResponse>>), MediaAPIError>
{
    get_claims(&jar, &state.banned_token_store).await?;
    let title_id = TitleId::new(title_id);

    let episodes = state
        .catalog_store
        .read()
        .await
        .get_episodes(&title_id)
        .await
        .map_err(|e| match e {
            CatalogStoreError::TitleNotFound => {
                MediaAPIError::IDNotFoundError(*title_id.as_ref())
            }
            e => MediaAPIError::UnexpectedError(eyre!(e)),
        })?;

    let response =
        episodes.iter().map(EpisodeResponse::from).collect::<Vec<_>>();

    Ok((StatusCode::OK, jar, Json(response)))
}

#[tracing::instrument(name = "Create episode route handler", skip_all)]
pub async fn new_episode(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(title_id): Path<uuid::Uuid>,
    Json(request): Json<NewEpisodeRequest>,
) -> Result<(StatusCode, CookieJar, Json<EpisodeResponse>), MediaAPIError> {
    require_admin(&state, &jar).await?;
    let title_id = TitleId::new(title_id);

    let episode = Episode {
        id: EpisodeId::default(),
        title_id,
        name: TitleName::parse(request.name)?,
        season_number: request.season_number,
        episode_number: request.episode_number,
        duration_minutes: request.duration_minutes,
        video_url: request.video_url.unwrap_or_default(),
    };

    state
        .catalog_store
        .write()
        .await
        .add_episode(episode.clone())
        .await
        .map_err(|e| match e {
            CatalogStoreError::TitleNotFound => {
                MediaAPIError::IDNotFoundError(*title_id.as_ref())
            }
            e => MediaAPIError::UnexpectedError(eyre!(e)),
        })?;

    Ok((StatusCode::CREATED, jar, Json(EpisodeResponse::from(&episode))))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEpisodeRequest {
    pub name: String,
    pub season_number: i32,
    pub episode_number: i32,
    pub duration_minutes: i32,
    pub video_url: Option<String>,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeResponse {
    pub id: String,
    pub title_id: String,
    pub name: String,
    pub season_number: i32,
    pub episode_number: i32,
    pub duration_minutes: i32,
    pub video_url: String,
}

impl From<&Episode> for EpisodeResponse {
    fn from(episode: &Episode) -> Self {
        Self {
            id: episode.id.as_ref().to_string(),
            title_id: episode.title_id.as_ref().to_string(),
            name: episode.name.as_ref().to_owned(),
            season_number: episode.season_number,
            episode_number: episode.episode_number,
            duration_minutes: episode.duration_minutes,
            video_url: episode.video_url.clone(),
        }
    }
}
