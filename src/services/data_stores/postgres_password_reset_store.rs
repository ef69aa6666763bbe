use chrono::{DateTime, Duration, Utc};
use color_eyre::eyre::eyre;
use secrecy::{ExposeSecret, Secret};
use sqlx::{postgres::PgRow, PgPool, Row};

use crate::domain::{
    Email, OneTimeCode, PasswordReset, PasswordResetStore,
    PasswordResetStoreError, UserId, VERIFICATION_WINDOW_MINUTES,
};

pub struct PostgresPasswordResetStore {
    pool: PgPool,
}

impl PostgresPasswordResetStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl PasswordResetStore for PostgresPasswordResetStore {
    #[tracing::instrument(
        name = "Replacing password reset record in PostgreSQL",
        skip_all
    )]
    async fn replace_reset(
        &mut self,
        reset: PasswordReset,
    ) -> Result<(), PasswordResetStoreError> {
        // Delete-then-insert keeps at most one record per email. The two
        // statements are not wrapped in a transaction; concurrent requests
        // for the same email race here and the last insert wins.
        sqlx::query(r#"DELETE FROM password_resets WHERE email = $1"#)
            .bind(reset.email.as_ref().expose_secret())
            .execute(&self.pool)
            .await
            .map_err(|e| PasswordResetStoreError::UnexpectedError(eyre!(e)))?;

        sqlx::query(
            r#"
            INSERT INTO password_resets
                (user_id, email, reset_code, created_at, expires_at, used)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(reset.user_id.as_ref())
        .bind(reset.email.as_ref().expose_secret())
        .bind(reset.reset_code.as_ref().expose_secret())
        .bind(reset.created_at)
        .bind(reset.expires_at)
        .bind(reset.used)
        .execute(&self.pool)
        .await
        .map_err(|e| PasswordResetStoreError::UnexpectedError(eyre!(e)))?;

        Ok(())
    }

    #[tracing::instrument(
        name = "Finding unused password reset record in PostgreSQL",
        skip_all
    )]
    async fn find_unused(
        &self,
        email: &Email,
        code: &OneTimeCode,
    ) -> Result<PasswordReset, PasswordResetStoreError> {
        sqlx::query(
            r#"
            SELECT user_id, email, reset_code, created_at, expires_at,
                   used, used_at
            FROM password_resets
            WHERE email = $1 AND reset_code = $2 AND used = FALSE
            "#,
        )
        .bind(email.as_ref().expose_secret())
        .bind(code.as_ref().expose_secret())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => PasswordResetStoreError::ResetNotFound,
            err => PasswordResetStoreError::UnexpectedError(eyre!(err)),
        })
        .map(|row| reset_from_row(&row))?
    }

    #[tracing::instrument(
        name = "Marking password reset record used in PostgreSQL",
        skip_all
    )]
    async fn mark_used(
        &mut self,
        email: &Email,
        code: &OneTimeCode,
        when: DateTime<Utc>,
    ) -> Result<(), PasswordResetStoreError> {
        let result = sqlx::query(
            r#"
            UPDATE password_resets SET used = TRUE, used_at = $3
            WHERE email = $1 AND reset_code = $2
            "#,
        )
        .bind(email.as_ref().expose_secret())
        .bind(code.as_ref().expose_secret())
        .bind(when)
        .execute(&self.pool)
        .await
        .map_err(|e| PasswordResetStoreError::UnexpectedError(eyre!(e)))?;

        if result.rows_affected() == 0 {
            return Err(PasswordResetStoreError::ResetNotFound);
        }

        Ok(())
    }

    #[tracing::instrument(
        name = "Purging expired password reset records from PostgreSQL",
        skip_all
    )]
    async fn purge_expired(
        &mut self,
        now: DateTime<Utc>,
    ) -> Result<(), PasswordResetStoreError> {
        // The live validity check reads created_at; the purge matches it.
        let cutoff = now - Duration::minutes(VERIFICATION_WINDOW_MINUTES);
        sqlx::query(r#"DELETE FROM password_resets WHERE created_at < $1"#)
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(|e| PasswordResetStoreError::UnexpectedError(eyre!(e)))?;

        Ok(())
    }
}

fn reset_from_row(
    row: &PgRow,
) -> Result<PasswordReset, PasswordResetStoreError> {
    let user_id: uuid::Uuid = row
        .try_get("user_id")
        .map_err(|e| PasswordResetStoreError::UnexpectedError(eyre!(e)))?;
    let email: String = row
        .try_get("email")
        .map_err(|e| PasswordResetStoreError::UnexpectedError(eyre!(e)))?;
    let reset_code: String = row
        .try_get("reset_code")
        .map_err(|e| PasswordResetStoreError::UnexpectedError(eyre!(e)))?;

    Ok(PasswordReset {
        user_id: UserId::new(user_id),
        email: Email::parse(Secret::new(email))
            .map_err(|e| PasswordResetStoreError::UnexpectedError(eyre!(e)))?,
        reset_code: OneTimeCode::parse(Secret::new(reset_code))
            .map_err(|e| PasswordResetStoreError::UnexpectedError(eyre!(e)))?,
        created_at: row
            .try_get("created_at")
            .map_err(|e| PasswordResetStoreError::UnexpectedError(eyre!(e)))?,
        expires_at: row
            .try_get("expires_at")
            .map_err(|e| PasswordResetStoreError::UnexpectedError(eyre!(e)))?,
        used: row
            .try_get("used")
            .map_err(|e| PasswordResetStoreError::UnexpectedError(eyre!(e)))?,
        used_at: row
            .try_get("used_at")
            .map_err(|e| PasswordResetStoreError::UnexpectedError(eyre!(e)))?,
    })
}
