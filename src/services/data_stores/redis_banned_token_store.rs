use std::sync::Arc;

use color_eyre::eyre::{Result, WrapErr};
use redis::{Commands, Connection};
use secrecy::{ExposeSecret, Secret};
use tokio::sync::RwLock;

use crate::{
    domain::{BannedTokenStore, BannedTokenStoreError},
    utils::auth::TOKEN_TTL_SECONDS,
};

/// Revoked JWTs, kept only as long as the token itself could still be
/// presented.
pub struct RedisBannedTokenStore {
    conn: Arc<RwLock<Connection>>,
}

impl RedisBannedTokenStore {
    pub fn new(conn: Arc<RwLock<Connection>>) -> Self {
        Self { conn }
    }
}

#[async_trait::async_trait]
impl BannedTokenStore for RedisBannedTokenStore {
    #[tracing::instrument(name = "Adding token to Redis ban list", skip_all)]
    async fn add_token(&mut self, token: &Secret<String>) -> Result<()> {
        let key = get_key(token);

        self.conn
            .write()
            .await
            .set_ex::<_, _, ()>(key, true, TOKEN_TTL_SECONDS as u64)
            .wrap_err("failed to set banned token in Redis")?;

        Ok(())
    }

    #[tracing::instrument(
        name = "Checking token against Redis ban list",
        skip_all
    )]
    async fn check_token(
        &self,
        token: &Secret<String>,
    ) -> Result<(), BannedTokenStoreError> {
        let key = get_key(token);

        let banned: bool = self
            .conn
            .write()
            .await
            .exists(key)
            .wrap_err("failed to check banned token in Redis")
            .map_err(BannedTokenStoreError::UnexpectedError)?;

        if banned {
            return Err(BannedTokenStoreError::BannedToken);
        }

        Ok(())
    }
}

const BANNED_TOKEN_PREFIX: &str = "banned_token:";

fn get_key(token: &Secret<String>) -> String {
    format!("{}{}", BANNED_TOKEN_PREFIX, token.expose_secret())
}
