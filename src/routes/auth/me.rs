use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::CookieJar;
use color_eyre::eyre::eyre;

use crate::{
    app_state::AppState,
    domain::{AuthAPIError, UserStoreError},
    routes::UserResponse,
    utils::auth::get_claims,
};

#[tracing::instrument(name = "Current user route handler", skip_all)]
pub async fn me(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(StatusCode, CookieJar, Json<UserResponse>), AuthAPIError> {
    let claims = get_claims(&jar, &state.banned_token_store).await?;

    let user = state
        .user_store
        .read()
        .await
        .get_user_by_id(&claims.id)
        .await
        .map_err(|e| match e {
            UserStoreError::UserNotFound => AuthAPIError::UserNotFound,
            e => AuthAPIError::UnexpectedError(eyre!(e)),
        })?;

    Ok((StatusCode::OK, jar, Json(UserResponse::from(&user))))
}
