use crate::{auth, handlers, AppState};
use axum::{
    extract::DefaultBodyLimit,
    middleware,
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::json;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Assemble the full application router over the given state.
pub fn build_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/couple/request", post(handlers::send_couple_request))
        .route(
            "/couple/respond/{id}",
            post(handlers::respond_couple_request),
        )
        .route("/couple/pending", get(handlers::pending_couple_requests))
        .route("/couple/active", get(handlers::active_couple))
        .route("/users/{code}", get(handlers::find_user_by_code))
        .route(
            "/gifts",
            post(handlers::create_gift).get(handlers::list_gifts),
        )
        .route(
            "/gifts/upload",
            post(handlers::upload_gift_image).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::middleware::require_auth,
        ));

    let cors_layer = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
            axum::http::header::ACCEPT,
        ]);

    Router::new()
        .route("/", get(health_handler))
        .route("/auth/register", post(handlers::register_handler))
        .route("/auth/verify/{token}", get(handlers::verify_token_handler))
        .route("/auth/login", post(handlers::login_handler))
        .merge(protected_routes)
        .layer(cors_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
