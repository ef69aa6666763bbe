use axum::{extract::State, http::StatusCode, Json};
use secrecy::Secret;
use serde::{Deserialize, Serialize};

use crate::{
    app_state::AppState,
    domain::{AuthAPIError, Email, ValidationError},
    utils::two_factor::issue_verification_code,
};

#[tracing::instrument(name = "Resend two-factor code route handler", skip_all)]
pub async fn resend(
    State(state): State<AppState>,
    Json(request): Json<ResendTwoFactorRequest>,
) -> Result<(StatusCode, Json<ResendTwoFactorResponse>), AuthAPIError> {
    let email = Email::parse(Secret::new(request.email)).map_err(|_| {
        ValidationError::new("Invalid email address".to_string())
    })?;

    match issue_verification_code(&state, &email).await? {
        true => Ok((
            StatusCode::OK,
            Json(ResendTwoFactorResponse {
                success: true,
                message: "Verification code has been resent to your email"
                    .to_string(),
            }),
        )),
        false => Ok((
            StatusCode::BAD_REQUEST,
            Json(ResendTwoFactorResponse {
                success: false,
                message:
                    "Failed to send verification code. Please try again."
                        .to_string(),
            }),
        )),
    }
}

#[derive(Deserialize)]
pub struct ResendTwoFactorRequest {
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResendTwoFactorResponse {
    pub success: bool,
    pub message: String,
}
