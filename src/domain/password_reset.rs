use chrono::{DateTime, Duration, Utc};

use super::{
    one_time_code, one_time_code::VERIFICATION_WINDOW_MINUTES, Email,
    OneTimeCode, UserId,
};

/// An outstanding password-reset code. At most one record exists per email
/// at a time: issuing a new one replaces whatever came before.
#[derive(Debug, Clone, PartialEq)]
pub struct PasswordReset {
    pub user_id: UserId,
    pub email: Email,
    pub reset_code: OneTimeCode,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub used: bool,
    pub used_at: Option<DateTime<Utc>>,
}

impl PasswordReset {
    pub fn issue(
        user_id: UserId,
        email: Email,
        reset_code: OneTimeCode,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            email,
            reset_code,
            created_at: now,
            expires_at: now + Duration::minutes(VERIFICATION_WINDOW_MINUTES),
            used: false,
            used_at: None,
        }
    }

    /// Expiry is computed from `created_at` plus the window. `expires_at`
    /// is written at issue time but never consulted here; the two agree
    /// unless a row was edited out-of-band.
    pub fn is_expired(&self) -> bool {
        one_time_code::is_expired(self.created_at, VERIFICATION_WINDOW_MINUTES)
    }

    /// A record validates a (email, code) pair when it is unused, the pair
    /// matches, and the window has not lapsed.
    pub fn is_valid_for(&self, email: &Email, code: &OneTimeCode) -> bool {
        !self.used
            && self.email == *email
            && self.reset_code == *code
            && !self.is_expired()
    }

    pub fn mark_used(&mut self, now: DateTime<Utc>) {
        self.used = true;
        self.used_at = Some(now);
    }
}
