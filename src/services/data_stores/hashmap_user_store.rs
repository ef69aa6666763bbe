use std::collections::HashMap;

use chrono::Utc;

use crate::domain::{
    verify_password_hash, Email, Password, User, UserId, UserPasswordHash,
    UserStore, UserStoreError,
};

/// In-memory credential store. Mirrors the Postgres store's semantics,
/// including the soft-delete filter.
#[derive(Default)]
pub struct HashmapUserStore {
    users: HashMap<Email, User>,
}

#[async_trait::async_trait]
impl UserStore for HashmapUserStore {
    async fn add_user(&mut self, user: User) -> Result<(), UserStoreError> {
        if let Some(existing) = self.users.get(&user.email) {
            if existing.deleted_at.is_none() {
                return Err(UserStoreError::UserAlreadyExists);
            }
        }
        self.users.insert(user.email.clone(), user);
        Ok(())
    }

    async fn get_user(&self, email: &Email) -> Result<User, UserStoreError> {
        match self.users.get(email) {
            Some(user) if user.deleted_at.is_none() => Ok(user.clone()),
            _ => Err(UserStoreError::UserNotFound),
        }
    }

    async fn get_user_by_id(
        &self,
        id: &UserId,
    ) -> Result<User, UserStoreError> {
        self.users
            .values()
            .find(|user| user.id == *id && user.deleted_at.is_none())
            .cloned()
            .ok_or(UserStoreError::UserNotFound)
    }

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

    async fn update_password(
        &mut self,
        email: &Email,
        hash: UserPasswordHash,
    ) -> Result<(), UserStoreError> {
        match self.users.get_mut(email) {
            Some(user) if user.deleted_at.is_none() => {
                user.hash = hash;
                Ok(())
            }
            _ => Err(UserStoreError::UserNotFound),
        }
    }

    async fn soft_delete_user(
        &mut self,
        email: &Email,
    ) -> Result<(), UserStoreError> {
        match self.users.get_mut(email) {
            Some(user) if user.deleted_at.is_none() => {
                user.deleted_at = Some(Utc::now());
                Ok(())
            }
            _ => Err(UserStoreError::UserNotFound),
        }
    }
}
