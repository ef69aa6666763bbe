use axum::{extract::State, http::StatusCode, Json};
use color_eyre::eyre::eyre;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use crate::{
    app_state::AppState,
    domain::{
        verify_password_hash, AuthAPIError, Email, TwoFactorStoreError,
        UserStoreError, ValidationError,
    },
};

use super::enable::{user_not_found_response, TwoFactorResponse};

/// Turning two-factor off weakens the account, so it demands the current
/// password even on an authenticated session.
#[tracing::instrument(name = "Disable two-factor route handler", skip_all)]
pub async fn disable(
    State(state): State<AppState>,
    Json(request): Json<DisableTwoFactorRequest>,
) -> Result<(StatusCode, Json<TwoFactorResponse>), AuthAPIError> {
    let email = Email::parse(Secret::new(request.email)).map_err(|_| {
        ValidationError::new("Invalid email address".to_string())
    })?;

    let user = match state.user_store.read().await.get_user(&email).await {
        Ok(user) => user,
        Err(UserStoreError::UserNotFound) => {
            return Ok((StatusCode::OK, Json(user_not_found_response())));
        }
        Err(e) => return Err(AuthAPIError::UnexpectedError(eyre!(e))),
    };

    if verify_password_hash(
        user.hash.as_ref().to_owned(),
        request.password.to_owned(),
    )
    .await
    .is_err()
    {
        return Ok((
            StatusCode::OK,
            Json(TwoFactorResponse {
                success: false,
                is_enabled: true,
                message: "Invalid password".to_string(),
                email: None,
            }),
        ));
    }

    let mut setting = match state
        .two_factor_store
        .read()
        .await
        .get_setting(&user.id)
        .await
    {
        Ok(setting) if setting.enabled => setting,
        Ok(_) | Err(TwoFactorStoreError::SettingNotFound) => {
            return Ok((
                StatusCode::OK,
                Json(TwoFactorResponse {
                    success: false,
                    is_enabled: false,
                    message: "Two-factor authentication is not enabled"
                        .to_string(),
                    email: None,
                }),
            ));
        }
        Err(e) => return Err(AuthAPIError::UnexpectedError(eyre!(e))),
    };

    setting.enabled = false;

    state
        .two_factor_store
        .write()
        .await
        .upsert_setting(setting)
        .await
        .map_err(|e| AuthAPIError::UnexpectedError(eyre!(e)))?;

    Ok((
        StatusCode::OK,
        Json(TwoFactorResponse {
            success: true,
            is_enabled: false,
            message: "Two-factor authentication has been disabled".to_string(),
            email: Some(email.as_ref().expose_secret().to_owned()),
        }),
    ))
}

#[derive(Deserialize)]
pub struct DisableTwoFactorRequest {
    pub email: String,
    pub password: Secret<String>,
}
