use color_eyre::eyre::eyre;
use secrecy::{ExposeSecret, Secret};
use sqlx::{postgres::PgRow, PgPool, Row};

use crate::domain::{
    Email, OneTimeCode, TwoFactorSetting, TwoFactorStore, TwoFactorStoreError,
    UserId,
};

pub struct PostgresTwoFactorStore {
    pool: PgPool,
}

impl PostgresTwoFactorStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl TwoFactorStore for PostgresTwoFactorStore {
    #[tracing::instrument(
        name = "Retrieving two-factor setting from PostgreSQL",
        skip_all
    )]
    async fn get_setting(
        &self,
        user_id: &UserId,
    ) -> Result<TwoFactorSetting, TwoFactorStoreError> {
        sqlx::query(
            r#"
            SELECT user_id, email, enabled, verification_code,
                   code_generated_at, code_expires_at, verified, last_used_at
            FROM two_factor_settings
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_ref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => TwoFactorStoreError::SettingNotFound,
            err => TwoFactorStoreError::UnexpectedError(eyre!(err)),
        })
        .map(|row| setting_from_row(&row))?
    }

    #[tracing::instrument(
        name = "Upserting two-factor setting in PostgreSQL",
        skip_all
    )]
    async fn upsert_setting(
        &mut self,
        setting: TwoFactorSetting,
    ) -> Result<(), TwoFactorStoreError> {
        sqlx::query(
            r#"
            INSERT INTO two_factor_settings
                (user_id, email, enabled, verification_code,
                 code_generated_at, code_expires_at, verified, last_used_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (user_id) DO UPDATE SET
                email = EXCLUDED.email,
                enabled = EXCLUDED.enabled,
                verification_code = EXCLUDED.verification_code,
                code_generated_at = EXCLUDED.code_generated_at,
                code_expires_at = EXCLUDED.code_expires_at,
                verified = EXCLUDED.verified,
                last_used_at = EXCLUDED.last_used_at
            "#,
        )
        .bind(setting.user_id.as_ref())
        .bind(setting.email.as_ref().expose_secret())
        .bind(setting.enabled)
        .bind(
            setting
                .verification_code
                .as_ref()
                .map(|code| code.as_ref().expose_secret().to_owned()),
        )
        .bind(setting.code_generated_at)
        .bind(setting.code_expires_at)
        .bind(setting.verified)
        .bind(setting.last_used_at)
        .execute(&self.pool)
        .await
        .map_err(|e| TwoFactorStoreError::UnexpectedError(eyre!(e)))?;

        Ok(())
    }
}

fn setting_from_row(
    row: &PgRow,
) -> Result<TwoFactorSetting, TwoFactorStoreError> {
    let user_id: uuid::Uuid = row
        .try_get("user_id")
        .map_err(|e| TwoFactorStoreError::UnexpectedError(eyre!(e)))?;
    let email: String = row
        .try_get("email")
        .map_err(|e| TwoFactorStoreError::UnexpectedError(eyre!(e)))?;
    let verification_code: Option<String> = row
        .try_get("verification_code")
        .map_err(|e| TwoFactorStoreError::UnexpectedError(eyre!(e)))?;

    let verification_code = verification_code
        .map(|code| OneTimeCode::parse(Secret::new(code)))
        .transpose()
        .map_err(|e| TwoFactorStoreError::UnexpectedError(eyre!(e)))?;

    Ok(TwoFactorSetting {
        user_id: UserId::new(user_id),
        email: Email::parse(Secret::new(email))
            .map_err(|e| TwoFactorStoreError::UnexpectedError(eyre!(e)))?,
        enabled: row
            .try_get("enabled")
            .map_err(|e| TwoFactorStoreError::UnexpectedError(eyre!(e)))?,
        verification_code,
        code_generated_at: row
            .try_get("code_generated_at")
            .map_err(|e| TwoFactorStoreError::UnexpectedError(eyre!(e)))?,
        code_expires_at: row
            .try_get("code_expires_at")
            .map_err(|e| TwoFactorStoreError::UnexpectedError(eyre!(e)))?,
        verified: row
            .try_get("verified")
            .map_err(|e| TwoFactorStoreError::UnexpectedError(eyre!(e)))?,
        last_used_at: row
            .try_get("last_used_at")
            .map_err(|e| TwoFactorStoreError::UnexpectedError(eyre!(e)))?,
    })
}
