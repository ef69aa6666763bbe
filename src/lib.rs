use axum::{
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    serve::Serve,
    Json, Router,
};

use redis::{Client, RedisResult};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::error::Error;
use tokio::signal;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::Level;

use domain::{AuthAPIError, MediaAPIError};
pub mod routes;
use crate::utils::tracing::*;
use routes::{auth, catalog, my_list, profiles, two_factor, watch_history};
pub mod app_state;
pub mod domain;
pub mod services;
use app_state::AppState;
pub mod utils;

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for AuthAPIError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AuthAPIError::UserAlreadyExists => {
                log_error_chain(&self, Level::DEBUG);
                (StatusCode::CONFLICT, "User already exists".to_string())
            }
            AuthAPIError::ValidationError(message) => {
                log_error_chain(&self, Level::DEBUG);
                (StatusCode::BAD_REQUEST, format!("{message}"))
            }
            AuthAPIError::UserNotFound => {
                log_error_chain(&self, Level::DEBUG);
                (StatusCode::NOT_FOUND, "User not found".to_string())
            }
            AuthAPIError::IncorrectCredentials => {
                log_error_chain(&self, Level::DEBUG);
                (
                    StatusCode::UNAUTHORIZED,
                    "Incorrect credentials".to_string(),
                )
            }
            AuthAPIError::AccountDeactivated => {
                log_error_chain(&self, Level::DEBUG);
                (
                    StatusCode::UNAUTHORIZED,
                    "Account is deactivated".to_string(),
                )
            }
            AuthAPIError::DeliveryFailed => {
                log_error_chain(&self, Level::WARN);
                (
                    StatusCode::BAD_REQUEST,
                    "Failed to send verification code. Please try again."
                        .to_string(),
                )
            }
            AuthAPIError::UnexpectedError(_) => {
                log_error_chain(&self, Level::ERROR);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Unexpected error".to_string(),
                )
            }
            AuthAPIError::MissingToken => {
                log_error_chain(&self, Level::DEBUG);
                (StatusCode::BAD_REQUEST, "Missing token".to_string())
            }
            AuthAPIError::InvalidToken => {
                log_error_chain(&self, Level::DEBUG);
                (StatusCode::UNAUTHORIZED, "Invalid token".to_string())
            }
        };
        let body = Json(ErrorResponse {
            error: error_message,
        });
        (status, body).into_response()
    }
}

impl IntoResponse for MediaAPIError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            MediaAPIError::IDNotFoundError(id) => {
                log_error_chain(&self, Level::DEBUG);
                (StatusCode::NOT_FOUND, format!("{id}"))
            }
            MediaAPIError::IDExistsError(id) => {
                log_error_chain(&self, Level::DEBUG);
                (StatusCode::CONFLICT, format!("{id}"))
            }
            MediaAPIError::AuthenticationError(auth_error) => {
                log_error_chain(&self, Level::DEBUG);
                (StatusCode::UNAUTHORIZED, format!("{auth_error}"))
            }
            MediaAPIError::Forbidden => {
                log_error_chain(&self, Level::DEBUG);
                (StatusCode::FORBIDDEN, "Admin role required".to_string())
            }
            MediaAPIError::ProfileLimitReached => {
                log_error_chain(&self, Level::DEBUG);
                (
                    StatusCode::BAD_REQUEST,
                    "Maximum number of profiles reached".to_string(),
                )
            }
            MediaAPIError::UnexpectedError(_) => {
                log_error_chain(&self, Level::ERROR);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Unexpected error".to_string(),
                )
            }
            MediaAPIError::ValidationError(message) => {
                log_error_chain(&self, Level::DEBUG);
                (StatusCode::BAD_REQUEST, format!("{message}"))
            }
        };
        let body = Json(ErrorResponse {
            error: error_message,
        });
        (status, body).into_response()
    }
}

fn log_error_chain(e: &(dyn Error + 'static), debug_level: Level) {
    let separator =
        "\n-----------------------------------------------------------------------------------\n";
    let mut report = format!("{}{:?}\n", separator, e);
    let mut current = e.source();
    while let Some(cause) = current {
        let str = format!("Caused by:\n\n{:?}", cause);
        report = format!("{}\n{}", report, str);
        current = cause.source();
    }
    report = format!("{}\n{}", report, separator);
    match debug_level {
        Level::ERROR => tracing::error!("{}", report),
        Level::WARN => tracing::warn!("{}", report),
        Level::INFO => tracing::info!("{}", report),
        Level::DEBUG => tracing::debug!("{}", report),
        Level::TRACE => tracing::trace!("{}", report),
    }
}

pub struct Application {
    server: Serve<Router, Router>,
    pub address: String,
}

impl Application {
    pub async fn build(
        app_state: AppState,
        address: &str,
    ) -> Result<Self, Box<dyn Error>> {
        let allowed_origins = [
            "http://localhost:3000".parse()?,
            "http://127.0.0.1:3000".parse()?,
        ];

        let cors = CorsLayer::new()
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
            ])
            .allow_credentials(true)
            .allow_origin(allowed_origins);

        let router = Router::new()
            .route("/auth/register", post(auth::register))
            .route("/auth/login", post(auth::login))
            .route("/auth/logout", post(auth::logout))
            .route("/auth/verify-token", post(auth::verify_token))
            .route("/auth/delete-user", delete(auth::delete_user))
            .route("/auth/me", get(auth::me))
            .route("/auth/forgot-password", post(auth::forgot_password))
            .route("/auth/verify-reset-code", post(auth::verify_reset_code))
            .route("/auth/reset-password", post(auth::reset_password))
            .route("/two-factor/enable", post(two_factor::enable))
            .route("/two-factor/disable", post(two_factor::disable))
            .route("/two-factor/status", get(two_factor::status))
            .route("/two-factor/verify", post(two_factor::verify))
            .route("/two-factor/resend", post(two_factor::resend))
            .route(
                "/profiles",
                get(profiles::get_profiles).post(profiles::create_profile),
            )
            .route(
                "/profiles/:id",
                put(profiles::update_profile)
                    .delete(profiles::delete_profile),
            )
            .route(
                "/catalog/titles",
                get(catalog::list_titles).post(catalog::new_title),
            )
            .route("/catalog/titles/:id", get(catalog::get_title))
            .route(
                "/catalog/titles/:id/episodes",
                get(catalog::get_episodes).post(catalog::new_episode),
            )
            .route(
                "/my-list",
                post(my_list::add_entry)
                    .get(my_list::get_list)
                    .delete(my_list::remove_entry),
            )
            .route(
                "/watch-history",
                post(watch_history::record_progress)
                    .get(watch_history::get_history),
            )
            .route(
                "/watch-history/continue",
                get(watch_history::continue_watching),
            )
            .with_state(app_state)
            .layer(cors)
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(make_span_with_request_id)
                    .on_request(on_request)
                    .on_response(on_response),
            );

        let listener = tokio::net::TcpListener::bind(address).await?;
        let address = listener.local_addr()?.to_string();
        let server = axum::serve(listener, router);

        Ok(Application { server, address })
    }

    pub async fn run(self) -> Result<(), std::io::Error> {
        tracing::info!("listening on {}", &self.address);
        self.server.with_graceful_shutdown(shutdown_signal()).await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

pub async fn get_postgres_pool(
    url: &Secret<String>,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(5)
        .connect(url.expose_secret())
        .await
}

pub fn get_redis_client(redis_hostname: String) -> RedisResult<Client> {
    let redis_url = format!("redis://{}/", redis_hostname);
    redis::Client::open(redis_url)
}
