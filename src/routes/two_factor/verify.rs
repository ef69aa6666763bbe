use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::CookieJar;
use chrono::Utc;
use color_eyre::eyre::eyre;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

use crate::{
    app_state::AppState,
    domain::{
        AuthAPIError, Email, TwoFactorStoreError, TwoFactorVerifyError,
        UserRole, UserStoreError, ValidationError,
    },
    routes::UserResponse,
    utils::auth::{create_auth_cookie, generate_auth_token},
};

/// The only path that completes a two-factor login. Every outcome is an
/// HTTP 200 with the flags set accordingly; credentials were already
/// checked at the login step.
#[tracing::instrument(name = "Verify two-factor code route handler", skip_all)]
pub async fn verify(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<VerifyTwoFactorRequest>,
) -> Result<
    (StatusCode, CookieJar, Json<TwoFactorVerifyResponse>),
    AuthAPIError,
> {
    let email = Email::parse(Secret::new(request.email)).map_err(|_| {
        ValidationError::new("Invalid email address".to_string())
    })?;

    let user = match state.user_store.read().await.get_user(&email).await {
        Ok(user) => user,
        Err(UserStoreError::UserNotFound) => {
            return Ok((
                StatusCode::OK,
                jar,
                Json(failure_response("User not found")),
            ));
        }
        Err(e) => return Err(AuthAPIError::UnexpectedError(eyre!(e))),
    };

    let mut setting = match state
        .two_factor_store
        .read()
        .await
        .get_setting(&user.id)
        .await
    {
        Ok(setting) => setting,
        Err(TwoFactorStoreError::SettingNotFound) => {
            return Ok((
                StatusCode::OK,
                jar,
                Json(failure_response(
                    "Two-factor authentication is not enabled",
                )),
            ));
        }
        Err(e) => return Err(AuthAPIError::UnexpectedError(eyre!(e))),
    };

    match setting.verify(request.code.expose_secret(), Utc::now()) {
        Ok(()) => (),
        Err(e) => {
            let message = match e {
                TwoFactorVerifyError::NotEnabled => {
                    "Two-factor authentication is not enabled"
                }
                TwoFactorVerifyError::Expired => {
                    "Verification code has expired"
                }
                // A consumed code and a wrong code are indistinguishable
                // to the caller.
                TwoFactorVerifyError::NoActiveCode
                | TwoFactorVerifyError::Mismatch => {
                    "Invalid verification code"
                }
            };
            return Ok((StatusCode::OK, jar, Json(failure_response(message))));
        }
    }

    // Persist the consumed state before minting the token, so a crash in
    // between cannot leave a replayable code behind.
    state
        .two_factor_store
        .write()
        .await
        .upsert_setting(setting)
        .await
        .map_err(|e| AuthAPIError::UnexpectedError(eyre!(e)))?;

    let token = generate_auth_token(&user.email, &user.id)
        .map_err(AuthAPIError::UnexpectedError)?;
    let updated_jar = jar.add(create_auth_cookie(token.clone()));

    Ok((
        StatusCode::OK,
        updated_jar,
        Json(TwoFactorVerifyResponse {
            success: true,
            is_verified: true,
            token: Some(token.expose_secret().to_owned()),
            user: Some(UserResponse::from(&user)),
            role: Some(user.role),
            message: "Two-factor authentication verified successfully"
                .to_string(),
        }),
    ))
}

#[derive(Deserialize)]
pub struct VerifyTwoFactorRequest {
    pub email: String,
    pub code: Secret<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TwoFactorVerifyResponse {
    pub success: bool,
    pub is_verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    pub message: String,
}

fn failure_response(message: &str) -> TwoFactorVerifyResponse {
    TwoFactorVerifyResponse {
        success: false,
        is_verified: false,
        token: None,
        user: None,
        role: None,
        message: message.to_string(),
    }
}
