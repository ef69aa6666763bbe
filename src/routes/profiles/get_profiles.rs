use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::CookieJar;
use color_eyre::eyre::eyre;

use crate::{
    app_state::AppState, domain::MediaAPIError, utils::auth::get_claims,
};

use super::create_profile::ProfileResponse;

#[tracing::instrument(name = "List profiles route handler", skip_all)]
pub async fn get_profiles(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(StatusCode, CookieJar, Json<Vec<ProfileResponse>>), MediaAPIError>
{
    let user_id = get_claims(&jar, &state.banned_token_store).await?.id;

    let profiles = state
        .profile_store
        .read()
        .await
        .get_profiles(&user_id)
        .await
        .map_err(|e| MediaAPIError::UnexpectedError(eyre!(e)))?;

    let response =
        profiles.iter().map(ProfileResponse::from).collect::<Vec<_>>();

    Ok((StatusCode::OK, jar, Json(response)))
}
