use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use color_eyre::eyre::eyre;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use crate::{
    app_state::AppState,
    domain::{
        AuthAPIError, Email, TwoFactorStoreError, UserStoreError,
        ValidationError,
    },
};

use super::enable::{user_not_found_response, TwoFactorResponse};

#[derive(Deserialize)]
pub struct QueryParams {
    email: String,
}

#[tracing::instrument(name = "Two-factor status route handler", skip_all)]
pub async fn status(
    State(state): State<AppState>,
    query_params: Query<QueryParams>,
) -> Result<(StatusCode, Json<TwoFactorResponse>), AuthAPIError> {
    let email = Email::parse(Secret::new(query_params.email.clone()))
        .map_err(|_| {
            ValidationError::new("Invalid email address".to_string())
        })?;

    let user = match state.user_store.read().await.get_user(&email).await {
        Ok(user) => user,
        Err(UserStoreError::UserNotFound) => {
            return Ok((StatusCode::OK, Json(user_not_found_response())));
        }
        Err(e) => return Err(AuthAPIError::UnexpectedError(eyre!(e))),
    };

    let is_enabled = match state
        .two_factor_store
        .read()
        .await
        .get_setting(&user.id)
        .await
    {
        Ok(setting) => setting.enabled,
        Err(TwoFactorStoreError::SettingNotFound) => false,
        Err(e) => return Err(AuthAPIError::UnexpectedError(eyre!(e))),
    };

    let message = if is_enabled {
        "Two-factor authentication is enabled"
    } else {
        "Two-factor authentication is disabled"
    };

    Ok((
        StatusCode::OK,
        Json(TwoFactorResponse {
            success: true,
            is_enabled,
            message: message.to_string(),
            email: Some(email.as_ref().expose_secret().to_owned()),
        }),
    ))
}
