use axum::{extract::State, http::StatusCode, Json};
use color_eyre::eyre::eyre;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use crate::{
    app_state::AppState,
    domain::{
        AuthAPIError, Email, OneTimeCode, PasswordResetStoreError,
        ValidationError,
    },
};

use super::forgot_password::PasswordResetResponse;

#[tracing::instrument(name = "Verify reset code route handler", skip_all)]
pub async fn verify_reset_code(
    State(state): State<AppState>,
    Json(request): Json<VerifyResetCodeRequest>,
) -> Result<(StatusCode, Json<PasswordResetResponse>), AuthAPIError> {
    let email = Email::parse(Secret::new(request.email)).map_err(|_| {
        ValidationError::new("Invalid email address".to_string())
    })?;

    match check_reset_code(&state, &email, &request.reset_code).await? {
        true => Ok((
            StatusCode::OK,
            Json(PasswordResetResponse {
                success: true,
                message: "Reset code verified successfully".to_string(),
                email: Some(email.as_ref().expose_secret().to_owned()),
            }),
        )),
        false => Ok((StatusCode::BAD_REQUEST, Json(invalid_code_response()))),
    }
}

#[derive(Deserialize)]
pub struct VerifyResetCodeRequest {
    pub email: String,
    #[serde(rename = "resetCode")]
    pub reset_code: Secret<String>,
}

pub fn invalid_code_response() -> PasswordResetResponse {
    PasswordResetResponse {
        success: false,
        message: "Invalid or expired reset code".to_string(),
        email: None,
    }
}

/// Shared by the verify and complete steps: the code must match an unused
/// record and still be inside its window at the time of the call. There
/// is no single-step consume; completion re-runs this check.
#[tracing::instrument(name = "Checking reset code", skip_all)]
pub async fn check_reset_code(
    state: &AppState,
    email: &Email,
    code: &Secret<String>,
) -> Result<bool, AuthAPIError> {
    // A malformed code can never match a stored one.
    let code = match OneTimeCode::parse(code.to_owned()) {
        Ok(code) => code,
        Err(_) => return Ok(false),
    };

    let reset = match state
        .password_reset_store
        .read()
        .await
        .find_unused(email, &code)
        .await
    {
        Ok(reset) => reset,
        Err(PasswordResetStoreError::ResetNotFound) => return Ok(false),
        Err(e) => return Err(AuthAPIError::UnexpectedError(eyre!(e))),
    };

    Ok(reset.is_valid_for(email, &code))
}
