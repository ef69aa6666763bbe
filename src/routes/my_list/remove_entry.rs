use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::CookieJar;
use color_eyre::eyre::eyre;
use serde::Deserialize;

use crate::{
    app_state::AppState,
    domain::{MediaAPIError, MyListStoreError, ProfileId, TitleId},
    utils::{auth::get_claims, profile::check_profile_ownership},
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveEntryParams {
    profile_id: uuid::Uuid,
    title_id: uuid::Uuid,
}

#[tracing::instrument(name = "Remove from my list route handler", skip_all)]
pub async fn remove_entry(
    State(state): State<AppState>,
    jar: CookieJar,
    query_params: Query<RemoveEntryParams>,
) -> Result<(CookieJar, impl IntoResponse), MediaAPIError> {
    let user_id = get_claims(&jar, &state.banned_token_store).await?.id;
    let profile_id = ProfileId::new(query_params.profile_id);
    let title_id = TitleId::new(query_params.title_id);

    check_profile_ownership(&state.profile_store, &user_id, &profile_id)
        .await?;

    state
        .my_list_store
        .write()
        .await
        .remove_entry(&profile_id, &title_id)
        .await
        .map_err(|e| match e {
            MyListStoreError::EntryNotFound => {
                MediaAPIError::IDNotFoundError(*title_id.as_ref())
            }
            e => MediaAPIError::UnexpectedError(eyre!(e)),
        })?;

    Ok((jar, StatusCode::OK))
}
