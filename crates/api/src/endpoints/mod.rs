//! API endpoints.

pub mod auth;
pub mod posts;
pub mod profile;

use axum::Router;

use crate::middleware::AppState;

/// Build the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/posts", posts::router())
        .nest("/profile", profile::router())
}
