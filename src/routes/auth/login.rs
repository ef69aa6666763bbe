use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::CookieJar;
use color_eyre::eyre::eyre;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

use crate::{
    app_state::AppState,
    domain::{
        AuthAPIError, Email, Password, User, UserStoreError, ValidationError,
    },
    routes::UserResponse,
    utils::{
        auth::{create_auth_cookie, generate_auth_token},
        two_factor::{is_two_factor_enabled, issue_verification_code},
    },
};

#[tracing::instrument(name = "Login", skip_all)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> Result<(StatusCode, CookieJar, Json<LoginResponse>), AuthAPIError> {
    let email = Email::parse(Secret::new(request.email)).map_err(|_| {
        ValidationError::new("Invalid email address".to_string())
    })?;
    let password = Password::parse(request.password)?;

    {
        let user_store = state.user_store.read().await;
        // A missing user and a wrong password produce the same rejection.
        user_store
            .validate_user(&email, &password)
            .await
            .map_err(|e| match e {
                UserStoreError::InvalidCredentials
                | UserStoreError::UserNotFound => {
                    AuthAPIError::IncorrectCredentials
                }
                _ => AuthAPIError::UnexpectedError(eyre!(e)),
            })?;
    }

    let user = state
        .user_store
        .read()
        .await
        .get_user(&email)
        .await
        .map_err(|e| AuthAPIError::UnexpectedError(eyre!(e)))?;

    if !user.is_active {
        return Err(AuthAPIError::AccountDeactivated);
    }

    match is_two_factor_enabled(&state, &email).await? {
        true => handle_2fa(&state, &email, jar).await,
        false => handle_no_2fa(&user, jar).await,
    }
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: Secret<String>,
}

#[tracing::instrument(name = "Handling 2FA login", skip_all)]
async fn handle_2fa(
    state: &AppState,
    email: &Email,
    jar: CookieJar,
) -> Result<(StatusCode, CookieJar, Json<LoginResponse>), AuthAPIError> {
    if !issue_verification_code(state, email).await? {
        return Err(AuthAPIError::DeliveryFailed);
    }

    // The email comes back so the client can drive the verify step; no
    // token is minted until the code checks out.
    let response = Json(LoginResponse {
        is_successful: true,
        requires_two_factor: true,
        email: Some(email.as_ref().expose_secret().to_owned()),
        token: None,
        user: None,
        role: None,
        message: Some(String::from(
            "Login successful. Two-factor authentication required. \
             Please check your email for the verification code.",
        )),
    });

    Ok((StatusCode::OK, jar, response))
}

#[tracing::instrument(name = "Handling login without 2FA", skip_all)]
async fn handle_no_2fa(
    user: &User,
    jar: CookieJar,
) -> Result<(StatusCode, CookieJar, Json<LoginResponse>), AuthAPIError> {
    let token = generate_auth_token(&user.email, &user.id)
        .map_err(AuthAPIError::UnexpectedError)?;
    let updated_jar = jar.add(create_auth_cookie(token.clone()));

    let response = Json(LoginResponse {
        is_successful: true,
        requires_two_factor: false,
        email: None,
        token: Some(token.expose_secret().to_owned()),
        user: Some(UserResponse::from(user)),
        role: Some(user.role),
        message: None,
    });

    Ok((StatusCode::OK, updated_jar, response))
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub is_successful: bool,
    pub requires_two_factor: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<crate::domain::UserRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
