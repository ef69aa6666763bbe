use color_eyre::eyre::eyre;
use sqlx::{postgres::PgRow, PgPool, Row};

use crate::domain::{
    Profile, ProfileId, ProfileName, ProfileStore, ProfileStoreError, UserId,
};

pub struct PostgresProfileStore {
    pool: PgPool,
}

impl PostgresProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ProfileStore for PostgresProfileStore {
    #[tracing::instrument(name = "Adding profile to PostgreSQL", skip_all)]
    async fn add_profile(
        &mut self,
        profile: Profile,
    ) -> Result<(), ProfileStoreError> {
        sqlx::query(
            r#"
            INSERT INTO profiles
                (id, user_id, name, avatar_url, is_kids, maturity_level)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(profile.id.as_ref())
        .bind(profile.user_id.as_ref())
        .bind(profile.name.as_ref())
        .bind(&profile.avatar_url)
        .bind(profile.is_kids)
        .bind(&profile.maturity_level)
        .execute(&self.pool)
        .await
        .map_err(|e| ProfileStoreError::UnexpectedError(eyre!(e)))?;
        Ok(())
    }

    #[tracing::instrument(
        name = "Listing profiles from PostgreSQL",
        skip_all
    )]
    async fn get_profiles(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Profile>, ProfileStoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, name, avatar_url, is_kids, maturity_level,
                   deleted_at
            FROM profiles
            WHERE user_id = $1 AND deleted_at IS NULL
            ORDER BY created_at
            "#,
        )
        .bind(user_id.as_ref())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ProfileStoreError::UnexpectedError(eyre!(e)))?;

        rows.iter().map(profile_from_row).collect()
    }

    #[tracing::instrument(
        name = "Retrieving profile from PostgreSQL",
        skip_all
    )]
    async fn get_profile(
        &self,
        user_id: &UserId,
        profile_id: &ProfileId,
    ) -> Result<Profile, ProfileStoreError> {
        sqlx::query(
            r#"
            SELECT id, user_id, name, avatar_url, is_kids, maturity_level,
                   deleted_at
            FROM profiles
            WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(profile_id.as_ref())
        .bind(user_id.as_ref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => ProfileStoreError::ProfileNotFound,
            err => ProfileStoreError::UnexpectedError(eyre!(err)),
        })
        .map(|row| profile_from_row(&row))?
    }

    #[tracing::instrument(name = "Updating profile in PostgreSQL", skip_all)]
    async fn update_profile(
        &mut self,
        profile: &Profile,
    ) -> Result<(), ProfileStoreError> {
        let result = sqlx::query(
            r#"
            UPDATE profiles
            SET name = $3, avatar_url = $4, is_kids = $5, maturity_level = $6
            WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(profile.id.as_ref())
        .bind(profile.user_id.as_ref())
        .bind(profile.name.as_ref())
        .bind(&profile.avatar_url)
        .bind(profile.is_kids)
        .bind(&profile.maturity_level)
        .execute(&self.pool)
        .await
        .map_err(|e| ProfileStoreError::UnexpectedError(eyre!(e)))?;

        if result.rows_affected() == 0 {
            return Err(ProfileStoreError::ProfileNotFound);
        }

        Ok(())
    }

    #[tracing::instrument(
        name = "Soft-deleting profile in PostgreSQL",
        skip_all
    )]
    async fn soft_delete_profile(
        &mut self,
        user_id: &UserId,
        profile_id: &ProfileId,
    ) -> Result<(), ProfileStoreError> {
        let result = sqlx::query(
            r#"
            UPDATE profiles SET deleted_at = now()
            WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(profile_id.as_ref())
        .bind(user_id.as_ref())
        .execute(&self.pool)
        .await
        .map_err(|e| ProfileStoreError::UnexpectedError(eyre!(e)))?;

        if result.rows_affected() == 0 {
            return Err(ProfileStoreError::ProfileNotFound);
        }

        Ok(())
    }
}

fn profile_from_row(row: &PgRow) -> Result<Profile, ProfileStoreError> {
    let id: uuid::Uuid = row
        .try_get("id")
        .map_err(|e| ProfileStoreError::UnexpectedError(eyre!(e)))?;
    let user_id: uuid::Uuid = row
        .try_get("user_id")
        .map_err(|e| ProfileStoreError::UnexpectedError(eyre!(e)))?;
    let name: String = row
        .try_get("name")
        .map_err(|e| ProfileStoreError::UnexpectedError(eyre!(e)))?;

    Ok(Profile {
        id: ProfileId::new(id),
        user_id: UserId::new(user_id),
        name: ProfileName::parse(name)
            .map_err(|e| ProfileStoreError::UnexpectedError(eyre!(e)))?,
        avatar_url: row
            .try_get("avatar_url")
            .map_err(|e| ProfileStoreError::UnexpectedError(eyre!(e)))?,
        is_kids: row
            .try_get("is_kids")
            .map_err(|e| ProfileStoreError::UnexpectedError(eyre!(e)))?,
        maturity_level: row
            .try_get("maturity_level")
            .map_err(|e| ProfileStoreError::UnexpectedError(eyre!(e)))?,
        deleted_at: row
            .try_get("deleted_at")
            .map_err(|e| ProfileStoreError::UnexpectedError(eyre!(e)))?,
    })
}
