use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use super::{
    one_time_code::VERIFICATION_WINDOW_MINUTES, Email, OneTimeCode, UserId,
};

/// Per-user two-factor preference plus the state of the most recently
/// issued code.
///
/// Lifecycle: `Disabled -> Enabled (no active code) -> CodeIssued ->
/// Verified`. Enabling is a standing preference only; a code is issued at
/// login time (or on explicit resend), never at enable time. Disabling
/// flips `enabled` off and leaves the code fields stale.
#[derive(Debug, Clone, PartialEq)]
pub struct TwoFactorSetting {
    pub user_id: UserId,
    pub email: Email,
    pub enabled: bool,
    pub verification_code: Option<OneTimeCode>,
    pub code_generated_at: Option<DateTime<Utc>>,
    pub code_expires_at: Option<DateTime<Utc>>,
    pub verified: bool,
    pub last_used_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TwoFactorVerifyError {
    #[error("Two-factor authentication is not enabled")]
    NotEnabled,
    #[error("No verification code is outstanding")]
    NoActiveCode,
    #[error("Verification code has expired")]
    Expired,
    #[error("Invalid verification code")]
    Mismatch,
}

impl TwoFactorSetting {
    pub fn new_enabled(user_id: UserId, email: Email) -> Self {
        Self {
            user_id,
            email,
            enabled: true,
            verification_code: None,
            code_generated_at: None,
            code_expires_at: None,
            verified: false,
            last_used_at: None,
        }
    }

    /// Records a freshly generated code, restarting the verification
    /// window and clearing any previous verification.
    pub fn issue(&mut self, code: OneTimeCode, now: DateTime<Utc>) {
        self.verification_code = Some(code);
        self.code_generated_at = Some(now);
        self.code_expires_at =
            Some(now + Duration::minutes(VERIFICATION_WINDOW_MINUTES));
        self.verified = false;
    }

    /// Checks `input` against the outstanding code. On success the stored
    /// code is cleared, so a code can pass verification exactly once; a
    /// replay inside the window fails with `NoActiveCode`.
    pub fn verify(
        &mut self,
        input: &str,
        now: DateTime<Utc>,
    ) -> Result<(), TwoFactorVerifyError> {
        if !self.enabled {
            return Err(TwoFactorVerifyError::NotEnabled);
        }
        let code = self
            .verification_code
            .as_ref()
            .ok_or(TwoFactorVerifyError::NoActiveCode)?;
        let expires_at = self
            .code_expires_at
            .ok_or(TwoFactorVerifyError::NoActiveCode)?;
        if now > expires_at {
            return Err(TwoFactorVerifyError::Expired);
        }
        if !code.matches(input) {
            return Err(TwoFactorVerifyError::Mismatch);
        }

        self.verified = true;
        self.last_used_at = Some(now);
        self.verification_code = None;
        Ok(())
    }
}
