//! Authentication endpoints.

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use inkpot_common::AppResult;
use inkpot_core::{LoginInput, RegisterInput};
use serde::Serialize;

use crate::{
    endpoints::profile::UserResponse, extractors::AuthUser, json::Json, middleware::AppState,
    response::ApiResponse,
};

/// Response for register and login: the user plus a fresh bearer token.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

/// Create a new account.
async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterInput>,
) -> AppResult<impl IntoResponse> {
    let user = state.user_service.register(input).await?;
    let token = state.token_service.issue(&user.id)?;

    Ok((
        StatusCode::CREATED,
        ApiResponse::ok(AuthResponse {
            token,
            user: user.into(),
        }),
    ))
}

/// Log in to an existing account.
async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginInput>,
) -> AppResult<ApiResponse<AuthResponse>> {
    let user = state
        .user_service
        .authenticate(&input.username, &input.password)
        .await?;
    let token = state.token_service.issue(&user.id)?;

    Ok(ApiResponse::ok(AuthResponse {
        token,
        user: user.into(),
    }))
}

/// Get the user behind the presented token.
async fn me(AuthUser(user): AuthUser) -> ApiResponse<UserResponse> {
    ApiResponse::ok(user.into())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me))
}
