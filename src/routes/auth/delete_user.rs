use axum::{extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::{cookie, CookieJar};
use color_eyre::eyre::eyre;

use crate::{
    app_state::AppState,
    domain::{AuthAPIError, UserStoreError},
    utils::{auth::get_claims, constants::JWT_COOKIE_NAME},
};

/// Soft-deletes the caller's own account. The row stays behind with
/// `deleted_at` set; the email becomes free for a fresh registration.
#[tracing::instrument(name = "Delete user route handler", skip_all)]
pub async fn delete_user(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Result<impl IntoResponse, AuthAPIError>) {
    let claims = match get_claims(&jar, &state.banned_token_store).await {
        Ok(claims) => claims,
        Err(e) => return (jar, Err(e)),
    };

    match state
        .user_store
        .write()
        .await
        .soft_delete_user(&claims.email)
        .await
    {
        Ok(()) => (),
        Err(UserStoreError::UserNotFound) => {
            return (jar, Err(AuthAPIError::UserNotFound))
        }
        Err(e) => return (jar, Err(AuthAPIError::UnexpectedError(eyre!(e)))),
    }

    // The session token dies with the account.
    match state
        .banned_token_store
        .write()
        .await
        .add_token(&claims.token)
        .await
    {
        Ok(()) => (),
        Err(e) => return (jar, Err(AuthAPIError::UnexpectedError(eyre!(e)))),
    }

    let jar = jar.remove(cookie::Cookie::from(JWT_COOKIE_NAME));

    (jar, Ok(StatusCode::OK))
}
