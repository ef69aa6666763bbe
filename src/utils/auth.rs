use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Utc;
use color_eyre::eyre::{eyre, Context, ContextCompat, Result};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Validation};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

use crate::{
    app_state::BannedTokenStoreType,
    domain::{AuthAPIError, Email, UserId},
};

use super::constants::{JWT_COOKIE_NAME, JWT_SECRET};

// This value determines how long the JWT auth token is valid for
pub const TOKEN_TTL_SECONDS: i64 = 3600; // 1 hour

/// Claims carried by every session token: the subject id, the email it
/// was minted for, and a unique token id.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub jti: String,
    pub exp: usize,
}

/// The validated identity behind a request cookie.
#[derive(Debug, Clone)]
pub struct SessionClaims {
    pub id: UserId,
    pub email: Email,
    pub token: Secret<String>,
}

// Create JWT auth token
#[tracing::instrument(name = "Generating auth token", skip_all)]
pub fn generate_auth_token(
    email: &Email,
    user_id: &UserId,
) -> Result<Secret<String>> {
    let delta = chrono::Duration::try_seconds(TOKEN_TTL_SECONDS)
        .wrap_err("Failed to create token TTL time delta")?;

    let exp = Utc::now()
        .checked_add_signed(delta)
        .ok_or(eyre!("failed to add to current time"))?
        .timestamp();

    let exp: usize = exp.try_into().wrap_err(format!(
        "failed to cast exp time to usize. exp time: {}",
        exp
    ))?;

    let claims = Claims {
        sub: user_id.as_ref().to_string(),
        email: email.as_ref().expose_secret().to_owned(),
        jti: uuid::Uuid::new_v4().to_string(),
        exp,
    };

    create_token(&claims)
}

// Create cookie and set the value to the passed-in token string
#[tracing::instrument(name = "Creating auth cookie", skip_all)]
pub fn create_auth_cookie(token: Secret<String>) -> Cookie<'static> {
    Cookie::build((JWT_COOKIE_NAME, token.expose_secret().to_owned()))
        .path("/") // apply cookie to all URLs on the server
        .http_only(true) // prevent JavaScript from accessing the cookie
        .same_site(SameSite::Lax)
        .build()
}

// Check if JWT auth token is valid by decoding it using the JWT secret
#[tracing::instrument(name = "Validating auth token", skip_all)]
pub async fn validate_token(
    token: &Secret<String>,
    banned_token_store: BannedTokenStoreType,
) -> Result<Claims> {
    banned_token_store
        .read()
        .await
        .check_token(token)
        .await
        .map_err(|e| eyre!("token rejected by banned-token store: {e}"))?;

    decode::<Claims>(
        token.expose_secret(),
        &DecodingKey::from_secret(JWT_SECRET.expose_secret().as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .wrap_err("failed to decode token")
}

/// Resolves the request cookie into a validated session, for routes that
/// require an authenticated caller.
#[tracing::instrument(name = "Resolving session claims", skip_all)]
pub async fn get_claims(
    jar: &CookieJar,
    banned_token_store: &BannedTokenStoreType,
) -> Result<SessionClaims, AuthAPIError> {
    let cookie = jar.get(JWT_COOKIE_NAME).ok_or(AuthAPIError::MissingToken)?;
    let token = Secret::new(cookie.value().to_string());

    let claims = validate_token(&token, banned_token_store.clone())
        .await
        .map_err(|_| AuthAPIError::InvalidToken)?;

    let id =
        UserId::parse(&claims.sub).map_err(|_| AuthAPIError::InvalidToken)?;
    let email = Email::parse(Secret::new(claims.email))
        .map_err(|_| AuthAPIError::InvalidToken)?;

    Ok(SessionClaims { id, email, token })
}

// Create JWT auth token by encoding claims using the JWT secret
#[tracing::instrument(name = "Creating auth token", skip_all)]
fn create_token(claims: &Claims) -> Result<Secret<String>> {
    let token_string = encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.expose_secret().as_bytes()),
    )
    .wrap_err("failed to create token")?;

    Ok(Secret::new(token_string))
}
