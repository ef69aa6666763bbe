use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::CookieJar;
use color_eyre::eyre::eyre;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

use crate::{
    app_state::AppState,
    domain::{
        AuthAPIError, Email, Password, Profile, ProfileName, User,
        UserPasswordHash, UserStoreError, ValidationError,
    },
    routes::UserResponse,
    utils::auth::{create_auth_cookie, generate_auth_token},
};

#[tracing::instrument(name = "Register", skip_all)]
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, CookieJar, Json<RegisterResponse>), AuthAPIError> {
    let email = Email::parse(Secret::new(request.email)).map_err(|_| {
        ValidationError::new("Invalid email address".to_string())
    })?;
    let password = Password::parse(request.password)?;

    let hash = UserPasswordHash::from_password(password)
        .await
        .map_err(AuthAPIError::UnexpectedError)?;
    let user = User::new(email, hash);

    {
        let mut user_store = state.user_store.write().await;
        user_store.add_user(user.clone()).await.map_err(|e| match e {
            UserStoreError::UserAlreadyExists => {
                AuthAPIError::UserAlreadyExists
            }
            err => AuthAPIError::UnexpectedError(eyre!(err)),
        })?;
    }

    // Every account starts with one default viewing profile.
    let profile = Profile::new(
        user.id,
        ProfileName::parse("Main".to_string())?,
        None,
        false,
        "Adult".to_string(),
    );
    state
        .profile_store
        .write()
        .await
        .add_profile(profile)
        .await
        .map_err(|e| AuthAPIError::UnexpectedError(eyre!(e)))?;

    let token = generate_auth_token(&user.email, &user.id)
        .map_err(AuthAPIError::UnexpectedError)?;
    let updated_jar = jar.add(create_auth_cookie(token.clone()));

    let response = Json(RegisterResponse {
        is_successful: true,
        token: Some(token.expose_secret().to_owned()),
        user: Some(UserResponse::from(&user)),
        message: Some("User created successfully".to_string()),
    });

    Ok((StatusCode::CREATED, updated_jar, response))
}

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: Secret<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub is_successful: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
