use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::{
    BannedTokenStore, CatalogStore, EmailClient, MyListStore,
    PasswordResetStore, ProfileStore, TwoFactorStore, UserStore,
    WatchHistoryStore,
};

pub type UserStoreType = Arc<RwLock<dyn UserStore + Send + Sync>>;
pub type BannedTokenStoreType = Arc<RwLock<dyn BannedTokenStore + Send + Sync>>;
pub type TwoFactorStoreType = Arc<RwLock<dyn TwoFactorStore + Send + Sync>>;
pub type PasswordResetStoreType =
    Arc<RwLock<dyn PasswordResetStore + Send + Sync>>;
pub type EmailClientType = Arc<dyn EmailClient + Send + Sync>;
pub type ProfileStoreType = Arc<RwLock<dyn ProfileStore + Send + Sync>>;
pub type CatalogStoreType = Arc<RwLock<dyn CatalogStore + Send + Sync>>;
pub type MyListStoreType = Arc<RwLock<dyn MyListStore + Send + Sync>>;
pub type WatchHistoryStoreType =
    Arc<RwLock<dyn WatchHistoryStore + Send + Sync>>;

#[derive(Clone)]
pub struct AppState {
    pub user_store: UserStoreType,
    pub banned_token_store: BannedTokenStoreType,
    pub two_factor_store: TwoFactorStoreType,
    pub password_reset_store: PasswordResetStoreType,
    pub email_client: EmailClientType,
    pub profile_store: ProfileStoreType,
    pub catalog_store: CatalogStoreType,
    pub my_list_store: MyListStoreType,
    pub watch_history_store: WatchHistoryStoreType,
}

impl AppState {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_store: UserStoreType,
        banned_token_store: BannedTokenStoreType,
        two_factor_store: TwoFactorStoreType,
        password_reset_store: PasswordResetStoreType,
        email_client: EmailClientType,
        profile_store: ProfileStoreType,
        catalog_store: CatalogStoreType,
        my_list_store: MyListStoreType,
        watch_history_store: WatchHistoryStoreType,
    ) -> Self {
        Self {
            user_store,
            banned_token_store,
            two_factor_store,
            password_reset_store,
            email_client,
            profile_store,
            catalog_store,
            my_list_store,
            watch_history_store,
        }
    }
}
