//! API middleware.

#![allow(missing_docs)]

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use inkpot_core::{LikeService, PostService, TokenService, UserService};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub post_service: PostService,
    pub like_service: LikeService,
    pub token_service: TokenService,
}

/// Authentication middleware.
///
/// Resolves a `Bearer` token to a user and stashes it in request extensions;
/// handlers decide via the extractors whether auth is required.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
        && let Ok(user_id) = state.token_service.verify(token)
        && let Ok(user) = state.user_service.get(&user_id).await
    {
        req.extensions_mut().insert(user);
    }

    next.run(req).await
}
