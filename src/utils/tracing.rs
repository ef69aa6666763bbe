use axum::{body::Body, http::Request, response::Response};
use color_eyre::eyre::Result;
use std::time::Duration;
use tracing::{Level, Span};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Installs the global subscriber: env-filtered fmt output plus span
/// traces for error reports.
pub fn init_tracing() -> Result<()> {
    let fmt_layer = tracing_subscriber::fmt::layer().compact();
    let filter_layer = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))?;

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .with(ErrorLayer::default())
        .init();

    Ok(())
}

/// One span per request, tagged with a fresh request id.
pub fn make_span_with_request_id(request: &Request<Body>) -> Span {
    let request_id = uuid::Uuid::new_v4();
    tracing::span!(
        Level::INFO,
        "[REQUEST]",
        method = tracing::field::display(request.method()),
        uri = tracing::field::display(request.uri()),
        request_id = tracing::field::display(request_id),
    )
}

pub fn on_request(_request: &Request<Body>, _span: &Span) {
    tracing::event!(Level::INFO, "[REQUEST START]");
}

pub fn on_response(
    response: &Response,
    latency: Duration,
    _span: &Span,
) {
    tracing::event!(
        Level::INFO,
        latency = ?latency,
        status = tracing::field::display(response.status()),
        "[REQUEST END]"
    );
}
