use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::CookieJar;
use color_eyre::eyre::eyre;

use crate::{
    app_state::AppState,
    domain::{MediaAPIError, ProfileId, ProfileStoreError},
    utils::auth::get_claims,
};

#[tracing::instrument(name = "Delete profile route handler", skip_all)]
pub async fn delete_profile(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(profile_id): Path<uuid::Uuid>,
) -> Result<(CookieJar, impl IntoResponse), MediaAPIError> {
    let user_id = get_claims(&jar, &state.banned_token_store).await?.id;
    let profile_id = ProfileId::new(profile_id);

    state
        .profile_store
        .write()
        .await
        .soft_delete_profile(&user_id, &profile_id)
        .await
        .map_err(|e| match e {
            ProfileStoreError::ProfileNotFound => {
                MediaAPIError::IDNotFoundError(*profile_id.as_ref())
            }
            e => MediaAPIError::UnexpectedError(eyre!(e)),
        })?;

    Ok((jar, StatusCode::OK))
}
