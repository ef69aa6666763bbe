use chrono::{DateTime, Duration, Utc};

use crate::domain::{
    Email, OneTimeCode, PasswordReset, PasswordResetStore,
    PasswordResetStoreError, VERIFICATION_WINDOW_MINUTES,
};

/// In-memory reset-record store. Keyed by email, so "at most one record
/// per email" holds by construction, as with the delete-then-insert in
/// the Postgres store.
#[derive(Default)]
pub struct HashmapPasswordResetStore {
    resets: std::collections::HashMap<Email, PasswordReset>,
}

#[async_trait::async_trait]
impl PasswordResetStore for HashmapPasswordResetStore {
    async fn replace_reset(
        &mut self,
        reset: PasswordReset,
    ) -> Result<(), PasswordResetStoreError> {
        self.resets.insert(reset.email.clone(), reset);
        Ok(())
    }

    async fn find_unused(
        &self,
        email: &Email,
        code: &OneTimeCode,
    ) -> Result<PasswordReset, PasswordResetStoreError> {
        match self.resets.get(email) {
            Some(reset) if !reset.used && reset.reset_code == *code => {
                Ok(reset.clone())
            }
            _ => Err(PasswordResetStoreError::ResetNotFound),
        }
    }

    async fn mark_used(
        &mut self,
        email: &Email,
        code: &OneTimeCode,
        when: DateTime<Utc>,
    ) -> Result<(), PasswordResetStoreError> {
        match self.resets.get_mut(email) {
            Some(reset) if reset.reset_code == *code => {
                reset.mark_used(when);
                Ok(())
            }
            _ => Err(PasswordResetStoreError::ResetNotFound),
        }
    }

    async fn purge_expired(
        &mut self,
        now: DateTime<Utc>,
    ) -> Result<(), PasswordResetStoreError> {
        let cutoff = now - Duration::minutes(VERIFICATION_WINDOW_MINUTES);
        self.resets.retain(|_, reset| reset.created_at >= cutoff);
        Ok(())
    }
}
