use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use color_eyre::eyre::eyre;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

use crate::{
    app_state::AppState,
    domain::{
        AuthAPIError, Email, OneTimeCode, PasswordReset, UserStoreError,
        ValidationError,
    },
};

pub const RESET_EMAIL_SUBJECT: &str = "Reset your streambox password";

/// The response for an unknown email is indistinguishable from the real
/// thing, so the endpoint cannot be used to probe which addresses have
/// accounts.
const MASKED_MESSAGE: &str =
    "If an account with that email exists, a password reset code has been sent.";

#[tracing::instrument(name = "Forgot password route handler", skip_all)]
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(request): Json<ForgotPasswordRequest>,
) -> Result<(StatusCode, Json<PasswordResetResponse>), AuthAPIError> {
    let email = Email::parse(Secret::new(request.email)).map_err(|_| {
        ValidationError::new("Invalid email address".to_string())
    })?;

    let user = match state.user_store.read().await.get_user(&email).await {
        Ok(user) => user,
        Err(UserStoreError::UserNotFound) => {
            // No row is written and nothing is sent for unknown emails.
            return Ok((
                StatusCode::OK,
                Json(PasswordResetResponse {
                    success: true,
                    message: MASKED_MESSAGE.to_string(),
                    email: Some(email.as_ref().expose_secret().to_owned()),
                }),
            ));
        }
        Err(e) => return Err(AuthAPIError::UnexpectedError(eyre!(e))),
    };

    let code = OneTimeCode::generate();
    let reset =
        PasswordReset::issue(user.id, email.clone(), code.clone(), Utc::now());

    {
        let mut reset_store = state.password_reset_store.write().await;
        // Opportunistic housekeeping; lapsed records are dead weight.
        reset_store
            .purge_expired(Utc::now())
            .await
            .map_err(|e| AuthAPIError::UnexpectedError(eyre!(e)))?;
        reset_store
            .replace_reset(reset)
            .await
            .map_err(|e| AuthAPIError::UnexpectedError(eyre!(e)))?;
    }

    let sent = state
        .email_client
        .send_email(&email, RESET_EMAIL_SUBJECT, code.as_ref().expose_secret())
        .await
        .is_ok();

    if !sent {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(PasswordResetResponse {
                success: false,
                message: "Failed to send reset code. Please try again."
                    .to_string(),
                email: None,
            }),
        ));
    }

    // Same body as the unknown-email branch; the only observable
    // difference is the delivery failure above.
    Ok((
        StatusCode::OK,
        Json(PasswordResetResponse {
            success: true,
            message: MASKED_MESSAGE.to_string(),
            email: Some(email.as_ref().expose_secret().to_owned()),
        }),
    ))
}

#[derive(Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PasswordResetResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}
