//! `/__health` and `/__gtg` endpoints over a running check set

use crate::error::ApiError;
use axum::{
    extract::{Path, State},
    http::{header, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use health_core::{CheckSnapshot, ChecksFn, GoodToGoFn, HealthCheck};
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::{debug, info_span, Span};

#[derive(Clone)]
pub struct AppState {
    pub checks: ChecksFn,
    pub good_to_go: GoodToGoFn,
    pub health: HealthCheck,
}

impl AppState {
    pub fn new(health: HealthCheck) -> Self {
        Self {
            checks: health.checks(),
            good_to_go: health.good_to_go(),
            health,
        }
    }
}

pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/__health", get(list_checks))
        .route("/__health/:id", get(get_check))
        .route("/__gtg", get(good_to_go))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                })
                .on_response(|response: &Response<_>, latency: Duration, _span: &Span| {
                    debug!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis() as u64,
                        "request completed"
                    );
                }),
        )
        .with_state(state)
}

async fn list_checks(State(state): State<AppState>) -> Json<Vec<CheckSnapshot>> {
    Json((state.checks)().await)
}

async fn get_check(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CheckSnapshot>, ApiError> {
    state
        .health
        .find(&id)
        .map(|check| Json(check.to_snapshot()))
        .ok_or_else(|| ApiError::NotFound(format!("No health check with id \"{}\"", id)))
}

async fn good_to_go(State(state): State<AppState>) -> impl IntoResponse {
    let (status, body) = if (state.good_to_go)().await {
        (StatusCode::OK, "OK")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "Service Unavailable")
    };

    (status, [(header::CACHE_CONTROL, "no-store")], body)
}
