use chrono::{DateTime, Utc};
use color_eyre::eyre::{Report, Result};
use secrecy::Secret;
use thiserror::Error;

use super::{
    Email, Episode, EpisodeId, MyListEntry, OneTimeCode, Password,
    PasswordReset, Profile, ProfileId, Title, TitleFilter, TitleId,
    TwoFactorSetting, User, UserId, UserPasswordHash, WatchEntry,
};

#[async_trait::async_trait]
pub trait UserStore {
    async fn add_user(&mut self, user: User) -> Result<(), UserStoreError>;
    async fn get_user(&self, email: &Email) -> Result<User, UserStoreError>;
    async fn get_user_by_id(
        &self,
        id: &UserId,
    ) -> Result<User, UserStoreError>;
    async fn validate_user(
        &self,
        email: &Email,
        password: &Password,
    ) -> Result<(), UserStoreError>;
    async fn update_password(
        &mut self,
        email: &Email,
        hash: UserPasswordHash,
    ) -> Result<(), UserStoreError>;
    async fn soft_delete_user(
        &mut self,
        email: &Email,
    ) -> Result<(), UserStoreError>;
}

#[derive(Debug, Error)]
pub enum UserStoreError {
    #[error("User already exists")]
    UserAlreadyExists,
    #[error("User not found")]
    UserNotFound,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Unexpected error")]
    UnexpectedError(#[source] Report),
}

impl PartialEq for UserStoreError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::UserAlreadyExists, Self::UserAlreadyExists)
                | (Self::UserNotFound, Self::UserNotFound)
                | (Self::InvalidCredentials, Self::InvalidCredentials)
                | (Self::UnexpectedError(_), Self::UnexpectedError(_))
        )
    }
}

#[async_trait::async_trait]
pub trait BannedTokenStore {
    async fn add_token(&mut self, token: &Secret<String>) -> Result<()>;
    async fn check_token(
        &self,
        token: &Secret<String>,
    ) -> Result<(), BannedTokenStoreError>;
}

#[derive(Debug, Error)]
pub enum BannedTokenStoreError {
    #[error("Token is banned")]
    BannedToken,
    #[error("Unexpected error")]
    UnexpectedError(#[source] Report),
}

impl PartialEq for BannedTokenStoreError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::BannedToken, Self::BannedToken)
                | (Self::UnexpectedError(_), Self::UnexpectedError(_))
        )
    }
}

/// Persistence for per-user two-factor settings. Transitions live on
/// `TwoFactorSetting`; the store reads and writes whole records.
#[async_trait::async_trait]
pub trait TwoFactorStore {
    async fn get_setting(
        &self,
        user_id: &UserId,
    ) -> Result<TwoFactorSetting, TwoFactorStoreError>;
    async fn upsert_setting(
        &mut self,
        setting: TwoFactorSetting,
    ) -> Result<(), TwoFactorStoreError>;
}

#[derive(Debug, Error)]
pub enum TwoFactorStoreError {
    #[error("Two-factor setting not found")]
    SettingNotFound,
    #[error("Unexpected error")]
    UnexpectedError(#[source] Report),
}

impl PartialEq for TwoFactorStoreError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::SettingNotFound, Self::SettingNotFound)
                | (Self::UnexpectedError(_), Self::UnexpectedError(_))
        )
    }
}

#[async_trait::async_trait]
pub trait PasswordResetStore {
    /// Deletes any prior records for the email, then inserts `reset`,
    /// keeping at most one record per email by construction.
    async fn replace_reset(
        &mut self,
        reset: PasswordReset,
    ) -> Result<(), PasswordResetStoreError>;
    /// Finds the unused record matching email and code, expired or not.
    async fn find_unused(
        &self,
        email: &Email,
        code: &OneTimeCode,
    ) -> Result<PasswordReset, PasswordResetStoreError>;
    async fn mark_used(
        &mut self,
        email: &Email,
        code: &OneTimeCode,
        when: DateTime<Utc>,
    ) -> Result<(), PasswordResetStoreError>;
    /// Housekeeping: drops records whose window has lapsed.
    async fn purge_expired(
        &mut self,
        now: DateTime<Utc>,
    ) -> Result<(), PasswordResetStoreError>;
}

#[derive(Debug, Error)]
pub enum PasswordResetStoreError {
    #[error("Password reset record not found")]
    ResetNotFound,
    #[error("Unexpected error")]
    UnexpectedError(#[source] Report),
}

impl PartialEq for PasswordResetStoreError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::ResetNotFound, Self::ResetNotFound)
                | (Self::UnexpectedError(_), Self::UnexpectedError(_))
        )
    }
}

#[async_trait::async_trait]
pub trait ProfileStore {
    async fn add_profile(
        &mut self,
        profile: Profile,
    ) -> Result<(), ProfileStoreError>;
    async fn get_profiles(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Profile>, ProfileStoreError>;
    async fn get_profile(
        &self,
        user_id: &UserId,
        profile_id: &ProfileId,
    ) -> Result<Profile, ProfileStoreError>;
    async fn update_profile(
        &mut self,
        profile: &Profile,
    ) -> Result<(), ProfileStoreError>;
    async fn soft_delete_profile(
        &mut self,
        user_id: &UserId,
        profile_id: &ProfileId,
    ) -> Result<(), ProfileStoreError>;
}

#[derive(Debug, Error)]
pub enum ProfileStoreError {
    #[error("Profile not found")]
    ProfileNotFound,
    #[error("Unexpected error")]
    UnexpectedError(#[source] Report),
}

impl PartialEq for ProfileStoreError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::ProfileNotFound, Self::ProfileNotFound)
                | (Self::UnexpectedError(_), Self::UnexpectedError(_))
        )
    }
}

#[async_trait::async_trait]
pub trait CatalogStore {
    async fn add_title(
        &mut self,
        title: Title,
    ) -> Result<(), CatalogStoreError>;
    async fn list_titles(
        &self,
        filter: &TitleFilter,
    ) -> Result<Vec<Title>, CatalogStoreError>;
    async fn get_title(
        &self,
        title_id: &TitleId,
    ) -> Result<Title, CatalogStoreError>;
    async fn add_episode(
        &mut self,
        episode: Episode,
    ) -> Result<(), CatalogStoreError>;
    async fn get_episodes(
        &self,
        title_id: &TitleId,
    ) -> Result<Vec<Episode>, CatalogStoreError>;
}

#[derive(Debug, Error)]
pub enum CatalogStoreError {
    #[error("Title not found")]
    TitleNotFound,
    #[error("Title already exists")]
    TitleExists,
    #[error("Unexpected error")]
    UnexpectedError(#[source] Report),
}

impl PartialEq for CatalogStoreError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::TitleNotFound, Self::TitleNotFound)
                | (Self::TitleExists, Self::TitleExists)
                | (Self::UnexpectedError(_), Self::UnexpectedError(_))
        )
    }
}

#[async_trait::async_trait]
pub trait MyListStore {
    async fn add_entry(
        &mut self,
        entry: MyListEntry,
    ) -> Result<(), MyListStoreError>;
    async fn remove_entry(
        &mut self,
        profile_id: &ProfileId,
        title_id: &TitleId,
    ) -> Result<(), MyListStoreError>;
    async fn get_entries(
        &self,
        profile_id: &ProfileId,
    ) -> Result<Vec<MyListEntry>, MyListStoreError>;
}

#[derive(Debug, Error)]
pub enum MyListStoreError {
    #[error("Entry already on the list")]
    EntryExists,
    #[error("Entry not found")]
    EntryNotFound,
    #[error("Unexpected error")]
    UnexpectedError(#[source] Report),
}

impl PartialEq for MyListStoreError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::EntryExists, Self::EntryExists)
                | (Self::EntryNotFound, Self::EntryNotFound)
                | (Self::UnexpectedError(_), Self::UnexpectedError(_))
        )
    }
}

#[async_trait::async_trait]
pub trait WatchHistoryStore {
    /// Inserts or updates the row for (profile, title, episode).
    async fn record(
        &mut self,
        entry: WatchEntry,
    ) -> Result<(), WatchHistoryStoreError>;
    async fn get_history(
        &self,
        profile_id: &ProfileId,
    ) -> Result<Vec<WatchEntry>, WatchHistoryStoreError>;
    /// Incomplete entries, most recently watched first.
    async fn get_continue_watching(
        &self,
        profile_id: &ProfileId,
        limit: i64,
    ) -> Result<Vec<WatchEntry>, WatchHistoryStoreError>;
    /// The row for one (profile, title, episode) tuple.
    async fn get_entry(
        &self,
        profile_id: &ProfileId,
        title_id: &TitleId,
        episode_id: Option<&EpisodeId>,
    ) -> Result<WatchEntry, WatchHistoryStoreError>;
}

#[derive(Debug, Error)]
pub enum WatchHistoryStoreError {
    #[error("Watch history entry not found")]
    EntryNotFound,
    #[error("Unexpected error")]
    UnexpectedError(#[source] Report),
}

impl PartialEq for WatchHistoryStoreError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::EntryNotFound, Self::EntryNotFound)
                | (Self::UnexpectedError(_), Self::UnexpectedError(_))
        )
    }
}
