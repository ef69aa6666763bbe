use std::sync::Arc;

use reqwest::Client;
use streambox::{
    app_state::AppState,
    domain::Email,
    get_postgres_pool, get_redis_client,
    services::{
        data_stores::{
            PostgresCatalogStore, PostgresMyListStore,
            PostgresPasswordResetStore, PostgresProfileStore,
            PostgresTwoFactorStore, PostgresUserStore,
            PostgresWatchHistoryStore, RedisBannedTokenStore,
        },
        postmark_email_client::PostmarkEmailClient,
    },
    utils::{
        constants::{
            prod, DATABASE_URL, POSTMARK_AUTH_TOKEN,
            POSTMARK_EMAIL_SENDER_ADDRESS, REDIS_HOST_NAME,
        },
        tracing::init_tracing,
    },
    Application,
};
use tokio::sync::RwLock;

#[tokio::main]
async fn main() {
    color_eyre::install().expect("Failed to install color_eyre");
    init_tracing().expect("Failed to initialise tracing");

    let pg_pool = get_postgres_pool(&DATABASE_URL)
        .await
        .expect("Failed to create Postgres connection pool");
    sqlx::migrate!()
        .run(&pg_pool)
        .await
        .expect("Failed to run migrations");

    let user_store =
        Arc::new(RwLock::new(PostgresUserStore::new(pg_pool.clone())));
    let two_factor_store =
        Arc::new(RwLock::new(PostgresTwoFactorStore::new(pg_pool.clone())));
    let password_reset_store = Arc::new(RwLock::new(
        PostgresPasswordResetStore::new(pg_pool.clone()),
    ));
    let profile_store =
        Arc::new(RwLock::new(PostgresProfileStore::new(pg_pool.clone())));
    let catalog_store =
        Arc::new(RwLock::new(PostgresCatalogStore::new(pg_pool.clone())));
    let my_list_store =
        Arc::new(RwLock::new(PostgresMyListStore::new(pg_pool.clone())));
    let watch_history_store =
        Arc::new(RwLock::new(PostgresWatchHistoryStore::new(pg_pool)));

    let redis_connection = Arc::new(RwLock::new(
        get_redis_client(REDIS_HOST_NAME.to_owned())
            .expect("Failed to get Redis client")
            .get_connection()
            .expect("Failed to get Redis connection"),
    ));
    let banned_token_store =
        Arc::new(RwLock::new(RedisBannedTokenStore::new(redis_connection)));

    let email_client = Arc::new(configure_postmark_email_client());

    let app_state = AppState::new(
        user_store,
        banned_token_store,
        two_factor_store,
        password_reset_store,
        email_client,
        profile_store,
        catalog_store,
        my_list_store,
        watch_history_store,
    );

    let app = Application::build(app_state, prod::APP_ADDRESS)
        .await
        .expect("Failed to build app");

    app.run().await.expect("Failed to run app");
}

fn configure_postmark_email_client() -> PostmarkEmailClient {
    let http_client = Client::builder()
        .timeout(prod::email_client::TIMEOUT)
        .build()
        .expect("Failed to build HTTP client");

    let sender = Email::parse(POSTMARK_EMAIL_SENDER_ADDRESS.to_owned())
        .expect("Invalid sender email address");

    PostmarkEmailClient::new(
        prod::email_client::BASE_URL.to_owned(),
        sender,
        POSTMARK_AUTH_TOKEN.to_owned(),
        http_client,
    )
}
