use std::sync::Arc;
use std::time::Duration;

use axum::{http::StatusCode, middleware, routing::get, Extension, Router};
use tower_http::{
    cors::CorsLayer,
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

use crate::handlers;
use crate::security::{security_middleware, ApiKeyValidator};
use crate::state::AppState;

pub fn build_router(
    state: AppState,
    validator: Arc<ApiKeyValidator>,
    request_timeout: Duration,
) -> Router {
    // Public routes (no security)
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/health/ready", get(handlers::health::readiness_check));

    // Protected routes (API key required)
    let protected_routes = Router::new()
        .route(
            "/organizations/search/name",
            get(handlers::organizations::search_by_name),
        )
        .route(
            "/organizations/search/geo",
            get(handlers::organizations::search_geo),
        )
        .route(
            "/organizations/{organization_id}",
            get(handlers::organizations::get_organization),
        )
        .route("/buildings", get(handlers::buildings::list_buildings))
        .route("/buildings/", get(handlers::buildings::list_buildings))
        .route("/buildings/search/geo", get(handlers::buildings::search_geo))
        .route(
            "/buildings/{building_id}/organizations",
            get(handlers::buildings::organizations_in_building),
        )
        .route("/activities", get(handlers::activities::activity_tree))
        .route("/activities/", get(handlers::activities::activity_tree))
        .route(
            "/activities/{activity_id}/organizations",
            get(handlers::activities::organizations_by_activity),
        )
        .layer(middleware::from_fn(security_middleware))
        .layer(Extension(validator));

    Router::new()
        .merge(public_routes)
        .nest("/api/v1", protected_routes)
        .with_state(state)
        // CORS
        .layer(CorsLayer::permissive())
        // Tracing
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(false)),
        )
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
}
