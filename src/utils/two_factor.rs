use chrono::Utc;
use color_eyre::eyre::eyre;
use secrecy::ExposeSecret;

use crate::{
    app_state::AppState,
    domain::{
        AuthAPIError, Email, OneTimeCode, TwoFactorStoreError, UserStoreError,
    },
};

pub const TWO_FACTOR_EMAIL_SUBJECT: &str = "Your streambox verification code";

/// True when the email belongs to a live credential with two-factor
/// switched on.
#[tracing::instrument(name = "Checking two-factor preference", skip_all)]
pub async fn is_two_factor_enabled(
    state: &AppState,
    email: &Email,
) -> Result<bool, AuthAPIError> {
    let user = match state.user_store.read().await.get_user(email).await {
        Ok(user) => user,
        Err(UserStoreError::UserNotFound) => return Ok(false),
        Err(e) => return Err(AuthAPIError::UnexpectedError(eyre!(e))),
    };

    match state
        .two_factor_store
        .read()
        .await
        .get_setting(&user.id)
        .await
    {
        Ok(setting) => Ok(setting.enabled),
        Err(TwoFactorStoreError::SettingNotFound) => Ok(false),
        Err(e) => Err(AuthAPIError::UnexpectedError(eyre!(e))),
    }
}

/// Issues a fresh code and dispatches it. Quietly reports `false` when
/// there is no matching credential or no enabled setting, and when the
/// send itself fails; the caller decides what failure looks like on the
/// wire.
#[tracing::instrument(name = "Issuing two-factor code", skip_all)]
pub async fn issue_verification_code(
    state: &AppState,
    email: &Email,
) -> Result<bool, AuthAPIError> {
    let user = match state.user_store.read().await.get_user(email).await {
        Ok(user) => user,
        Err(UserStoreError::UserNotFound) => return Ok(false),
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
        Err(TwoFactorStoreError::SettingNotFound) => return Ok(false),
        Err(e) => return Err(AuthAPIError::UnexpectedError(eyre!(e))),
    };

    if !setting.enabled {
        return Ok(false);
    }

    let code = OneTimeCode::generate();
    setting.issue(code.clone(), Utc::now());

    state
        .two_factor_store
        .write()
        .await
        .upsert_setting(setting)
        .await
        .map_err(|e| AuthAPIError::UnexpectedError(eyre!(e)))?;

    let sent = state
        .email_client
        .send_email(
            email,
            TWO_FACTOR_EMAIL_SUBJECT,
            code.as_ref().expose_secret(),
        )
        .await
        .is_ok();

    Ok(sent)
}
