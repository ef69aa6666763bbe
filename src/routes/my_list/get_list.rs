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

use super::add_entry::MyListEntryResponse;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MyListParams {
    profile_id: uuid::Uuid,
}

#[tracing::instrument(name = "Get my list route handler", skip_all)]
pub async fn get_list(
    State(state): State<AppState>,
    jar: CookieJar,
    query_params: Query<MyListParams>,
) -> Result<
    (StatusCode, CookieJar, Json<Vec<MyListEntryResponse>>),
    MediaAPIError,
> {
    let user_id = get_claims(&jar, &state.banned_token_store).await?.id;
    let profile_id = ProfileId::new(query_params.profile_id);

    check_profile_ownership(&state.profile_store, &user_id, &profile_id)
        .await?;

    let entries = state
        .my_list_store
        .read()
        .await
        .get_entries(&profile_id)
        .await
        .map_err(|e| MediaAPIError::UnexpectedError(eyre!(e)))?;

    let response = entries
        .iter()
        .map(MyListEntryResponse::from)
        .collect::<Vec<_>>();

    Ok((StatusCode::OK, jar, Json(response)))
}
