//! HTTP routes and handlers

use axum::{
    body::Bytes,
    extract::State,
    routing::{get, post},
    Json, Router,
};
use salary_core::{PredictionResponse, WelcomeMessage};
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::error::ApiError;
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(read_root))
        .route("/predict", post(predict))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .fallback(fallback)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(state)
}

/// Every origin, method and header is allowed, with credentials.
///
/// Browsers reject a literal `*` alongside credentials, so the request's
/// own origin, method and headers are echoed back instead.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

async fn read_root() -> Json<WelcomeMessage> {
    Json(WelcomeMessage::default())
}

/// The body is taken raw so that malformed JSON, missing fields and wrong
/// types all produce the same field-level 400 instead of the extractor's
/// default rejection.
async fn predict(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<PredictionResponse>, ApiError> {
    metrics::counter!("salary_requests_total", "endpoint" => "predict").increment(1);

    state.predict_body(&body).map(Json)
}

async fn health_check() -> &'static str {
    "OK"
}

async fn metrics(State(state): State<AppState>) -> String {
    state.render_metrics()
}

async fn fallback() -> ApiError {
    ApiError::NotFound
}
