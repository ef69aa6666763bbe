use axum::{extract::State, http::StatusCode, Json};
use color_eyre::eyre::eyre;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

use crate::{
    app_state::AppState,
    domain::{
        AuthAPIError, Email, TwoFactorSetting, TwoFactorStoreError,
        UserStoreError, ValidationError,
    },
};

/// Flips the standing preference on. Deliberately sends nothing: the
/// first code is only issued at the next login (or explicit resend).
#[tracing::instrument(name = "Enable two-factor route handler", skip_all)]
pub async fn enable(
    State(state): State<AppState>,
    Json(request): Json<EnableTwoFactorRequest>,
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

    let setting = match state
        .two_factor_store
        .read()
        .await
        .get_setting(&user.id)
        .await
    {
        Ok(setting) if setting.enabled => {
            return Ok((
                StatusCode::OK,
                Json(TwoFactorResponse {
                    success: false,
                    is_enabled: true,
                    message: "Two-factor authentication is already enabled"
                        .to_string(),
                    email: None,
                }),
            ));
        }
        Ok(mut setting) => {
            setting.enabled = true;
            setting.verified = false;
            setting
        }
        Err(TwoFactorStoreError::SettingNotFound) => {
            TwoFactorSetting::new_enabled(user.id, email.clone())
        }
        Err(e) => return Err(AuthAPIError::UnexpectedError(eyre!(e))),
    };

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
            is_enabled: true,
            message:
                "Two-factor authentication enabled successfully. \
                 You will receive verification codes during login."
                    .to_string(),
            email: Some(email.as_ref().expose_secret().to_owned()),
        }),
    ))
}

#[derive(Deserialize)]
pub struct EnableTwoFactorRequest {
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TwoFactorResponse {
    pub success: bool,
    pub is_enabled: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

pub fn user_not_found_response() -> TwoFactorResponse {
    TwoFactorResponse {
        success: false,
        is_enabled: false,
        message: "User not found".to_string(),
        email: None,
    }
}
