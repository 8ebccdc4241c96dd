use std::{sync::Arc, time::Duration};

use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;
use service::{
    mail::Mailer,
    quote::{repository::QuoteRepository, service::QuoteService},
    storage::memory_quote_store::InMemoryQuoteRepository,
};

use crate::observability;

pub mod quotes;

/// Request bodies above this size are rejected before parsing.
pub const MAX_BODY_BYTES: usize = 1 << 20;

#[derive(Clone)]
pub struct AppState {
    pub quotes: QuoteService<InMemoryQuoteRepository>,
    pub mailer: Arc<dyn Mailer>,
}

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn metrics(State(state): State<AppState>) -> (StatusCode, String) {
    let stored = state.quotes.repository().list().await.len();
    observability::QUOTES_STORED.set(stored as i64);
    observability::encode_metrics()
}

/// Build the full application router with its middleware stack.
pub fn build_router(state: AppState, cors: CorsLayer, request_timeout: Duration) -> Router {
    observability::init_metrics();

    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/quote", get(quotes::get_random_quote))
        .route("/add", post(quotes::create_quote))
        .route("/share", post(quotes::share_random_quote))
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(CatchPanicLayer::new())
        .layer(cors)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                // one INFO span per request with method and path
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                // status and latency
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 5xx and transport failures
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
