//! Route table.

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post, put};

use crate::handlers;
use crate::middleware::session::session_layer;
use crate::state::AppState;

/// Room for the non-file multipart fields on top of the image limit.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// Builds all routes with the session layer and body limit applied.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.profile_images.max_upload_bytes + FORM_OVERHEAD_BYTES;

    let api = Router::new()
        .merge(user_routes())
        .merge(health_routes());

    Router::new()
        .nest("/api", api)
        .merge(image_routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(from_fn_with_state(state.clone(), session_layer))
        .with_state(state)
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/signup", post(handlers::auth::signup))
        .route("/users/login", post(handlers::auth::login))
        .route("/users/logout", post(handlers::auth::logout))
        .route("/users/status", get(handlers::auth::status))
        .route(
            "/users/me",
            get(handlers::user::get_me).patch(handlers::user::update_me),
        )
        .route("/users/me/password", put(handlers::user::change_password))
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

fn image_routes() -> Router<AppState> {
    Router::new().route(
        "/images/profile/{id}",
        get(handlers::image::serve_profile_image),
    )
}
