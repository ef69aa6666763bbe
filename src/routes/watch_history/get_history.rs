use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::CookieJar;
use color_eyre::eyre::eyre;
use serde::Deserialize;

use crate::{
    app_state::AppState,
    domain::{MediaAPIError, ProfileId},
    utils::{auth::get_claims, profile::check_profile_ownership},
};

use super::record_progress::WatchEntryResponse;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryParams {
    profile_id: uuid::Uuid,
}

#[tracing::instrument(name = "Get watch history route handler", skip_all)]
pub async fn get_history(
    State(state): State<AppState>,
    jar: CookieJar,
    query_params: Query<QueryParams>,
) -> Result<
    (StatusCode, CookieJar, Json<Vec<WatchEntryResponse>>),
    MediaAPIError,
> {
    let user_id = get_claims(&jar, &state.banned_token_store).await?.id;
    let profile_id = ProfileId::new(query_params.profile_id);

    check_profile_ownership(&state.profile_store, &user_id, &profile_id)
        .await?;

    let entries = state
        .watch_history_store
        .read()
        .await
        .get_history(&profile_id)
        .await
        .map_err(|e| MediaAPIError::UnexpectedError(eyre!(e)))?;

    let response = entries
        .iter()
        .map(WatchEntryResponse::from)
        .collect::<Vec<_>>();

    Ok((StatusCode::OK, jar, Json(response)))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContinueWatchingParams {
    profile_id: uuid::Uuid,
    limit: Option<i64>,
}

const DEFAULT_CONTINUE_WATCHING_LIMIT: i64 = 10;

#[tracing::instrument(name = "Continue watching route handler", skip_all)]
pub async fn continue_watching(
    State(state): State<AppState>,
    jar: CookieJar,
    query_params: Query<ContinueWatchingParams>,
) -> Result<
    (StatusCode, CookieJar, Json<Vec<WatchEntryResponse>>),
    MediaAPIError,
> {
    let user_id = get_claims(&jar, &state.banned_token_store).await?.id;
    let profile_id = ProfileId::new(query_params.profile_id);
    let limit = query_params
        .limit
        .unwrap_or(DEFAULT_CONTINUE_WATCHING_LIMIT)
        .clamp(1, 100);

    check_profile_ownership(&state.profile_store, &user_id, &profile_id)
        .await?;

    let entries = state
        .watch_history_store
        .read()
        .await
        .get_continue_watching(&profile_id, limit)
        .await
        .map_err(|e| MediaAPIError::UnexpectedError(eyre!(e)))?;

    let response = entries
        .iter()
        .map(WatchEntryResponse::from)
        .collect::<Vec<_>>();

    Ok((StatusCode::OK, jar, Json(response)))
}
