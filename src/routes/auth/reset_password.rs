use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use color_eyre::eyre::eyre;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use crate::{
    app_state::AppState,
    domain::{
        AuthAPIError, Email, OneTimeCode, Password, UserPasswordHash,
        UserStoreError, ValidationError,
    },
};

use super::{
    forgot_password::PasswordResetResponse,
    verify_reset_code::{check_reset_code, invalid_code_response},
};

#[tracing::instrument(name = "Reset password route handler", skip_all)]
pub async fn reset_password(
    State(state): State<AppState>,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<(StatusCode, Json<PasswordResetResponse>), AuthAPIError> {
    let email = Email::parse(Secret::new(request.email)).map_err(|_| {
        ValidationError::new("Invalid email address".to_string())
    })?;

    if request.new_password.expose_secret()
        != request.confirm_password.expose_secret()
    {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(PasswordResetResponse {
                success: false,
                message: "Passwords do not match".to_string(),
                email: None,
            }),
        ));
    }

    let new_password = Password::parse(request.new_password)?;

    // The code must still be valid here; nothing reserves it between the
    // verify step and this one, so it can lapse in between.
    if !check_reset_code(&state, &email, &request.reset_code).await? {
        return Ok((StatusCode::BAD_REQUEST, Json(invalid_code_response())));
    }

    let hash = UserPasswordHash::from_password(new_password)
        .await
        .map_err(AuthAPIError::UnexpectedError)?;

    match state
        .user_store
        .write()
        .await
        .update_password(&email, hash)
        .await
    {
        Ok(()) => (),
        Err(UserStoreError::UserNotFound) => {
            return Ok((
                StatusCode::BAD_REQUEST,
                Json(PasswordResetResponse {
                    success: false,
                    message: "Failed to update password. Please try again."
                        .to_string(),
                    email: None,
                }),
            ));
        }
        Err(e) => return Err(AuthAPIError::UnexpectedError(eyre!(e))),
    }

    // Consume the record only after the hash is in place.
    let code = OneTimeCode::parse(request.reset_code)
        .map_err(|e| AuthAPIError::UnexpectedError(eyre!(e)))?;
    state
        .password_reset_store
        .write()
        .await
        .mark_used(&email, &code, Utc::now())
        .await
        .map_err(|e| AuthAPIError::UnexpectedError(eyre!(e)))?;

    Ok((
        StatusCode::OK,
        Json(PasswordResetResponse {
            success: true,
            message: "Password updated successfully".to_string(),
            email: None,
        }),
    ))
}

#[derive(Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
    #[serde(rename = "resetCode")]
    pub reset_code: Secret<String>,
    #[serde(rename = "newPassword")]
    pub new_password: Secret<String>,
    #[serde(rename = "confirmPassword")]
    pub confirm_password: Secret<String>,
}
