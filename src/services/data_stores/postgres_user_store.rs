use color_eyre::eyre::{eyre, Result};
use secrecy::{ExposeSecret, Secret};
use sqlx::{postgres::PgRow, PgPool, Row};

use crate::domain::{
    verify_password_hash, Email, Password, User, UserId, UserPasswordHash,
    UserRole, UserStore, UserStoreError,
};

pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Soft delete: rows stay in place and every query filters on
// deleted_at IS NULL.
#[async_trait::async_trait]
impl UserStore for PostgresUserStore {
    #[tracing::instrument(name = "Adding user to PostgreSQL", skip_all)]
    async fn add_user(&mut self, user: User) -> Result<(), UserStoreError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, role, is_active)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(user.id.as_ref())
        .bind(user.email.as_ref().expose_secret())
        .bind(user.hash.as_ref().expose_secret())
        .bind(user.role.as_str())
        .bind(user.is_active)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                UserStoreError::UserAlreadyExists
            }
            err => UserStoreError::UnexpectedError(eyre!(err)),
        })?;
        Ok(())
    }

    #[tracing::instrument(name = "Retrieving user from PostgreSQL", skip_all)]
    async fn get_user(&self, email: &Email) -> Result<User, UserStoreError> {
        sqlx::query(
            r#"
            SELECT id, email, password_hash, role, is_active, deleted_at
            FROM users
            WHERE email = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(email.as_ref().expose_secret())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => UserStoreError::UserNotFound,
            err => UserStoreError::UnexpectedError(eyre!(err)),
        })
        .map(|row| user_from_row(&row))?
    }

    #[tracing::instrument(
        name = "Retrieving user by id from PostgreSQL",
        skip_all
    )]
    async fn get_user_by_id(
        &self,
        id: &UserId,
    ) -> Result<User, UserStoreError> {
        sqlx::query(
            r#"
            SELECT id, email, password_hash, role, is_active, deleted_at
            FROM users
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id.as_ref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => UserStoreError::UserNotFound,
            err => UserStoreError::UnexpectedError(eyre!(err)),
        })
        .map(|row| user_from_row(&row))?
    }

    #[tracing::instrument(
        name = "Validating user credentials in PostgreSQL",
        skip_all
    )]
    async fn validate_user(
        &self,
        email: &Email,
        password: &Password,
    ) -> Result<(), UserStoreError> {
        let user = self.get_user(email).await?;
        verify_password_hash(
            user.hash.as_ref().to_owned(),
            password.as_ref().to_owned(),
        )
        .await
        .map_err(|_| UserStoreError::InvalidCredentials)
    }

    #[tracing::instrument(name = "Updating password in PostgreSQL", skip_all)]
    async fn update_password(
        &mut self,
        email: &Email,
        hash: UserPasswordHash,
    ) -> Result<(), UserStoreError> {
        let result = sqlx::query(
            r#"
            UPDATE users SET password_hash = $2
            WHERE email = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(email.as_ref().expose_secret())
        .bind(hash.as_ref().expose_secret())
        .execute(&self.pool)
        .await
        .map_err(|e| UserStoreError::UnexpectedError(eyre!(e)))?;

        if result.rows_affected() == 0 {
            return Err(UserStoreError::UserNotFound);
        }

        Ok(())
    }

    #[tracing::instrument(
        name = "Soft-deleting user in PostgreSQL",
        skip_all
    )]
    async fn soft_delete_user(
        &mut self,
        email: &Email,
    ) -> Result<(), UserStoreError> {
        let result = sqlx::query(
            r#"
            UPDATE users SET deleted_at = now()
            WHERE email = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(email.as_ref().expose_secret())
        .execute(&self.pool)
        .await
        .map_err(|e| UserStoreError::UnexpectedError(eyre!(e)))?;

        if result.rows_affected() == 0 {
            return Err(UserStoreError::UserNotFound);
        }

        Ok(())
    }
}

fn user_from_row(row: &PgRow) -> Result<User, UserStoreError> {
    let id: uuid::Uuid = row
        .try_get("id")
        .map_err(|e| UserStoreError::UnexpectedError(eyre!(e)))?;
    let email: String = row
        .try_get("email")
        .map_err(|e| UserStoreError::UnexpectedError(eyre!(e)))?;
    let password_hash: String = row
        .try_get("password_hash")
        .map_err(|e| UserStoreError::UnexpectedError(eyre!(e)))?;
    let role: String = row
        .try_get("role")
        .map_err(|e| UserStoreError::UnexpectedError(eyre!(e)))?;

    Ok(User {
        id: UserId::new(id),
        email: Email::parse(Secret::new(email))
            .map_err(|e| UserStoreError::UnexpectedError(eyre!(e)))?,
        hash: UserPasswordHash::parse(Secret::new(password_hash))
            .map_err(|e| UserStoreError::UnexpectedError(eyre!(e)))?,
        role: UserRole::parse(&role)
            .map_err(|e| UserStoreError::UnexpectedError(eyre!(e)))?,
        is_active: row
            .try_get("is_active")
            .map_err(|e| UserStoreError::UnexpectedError(eyre!(e)))?,
        deleted_at: row
            .try_get("deleted_at")
            .map_err(|e| UserStoreError::UnexpectedError(eyre!(e)))?,
    })
}
