//! Profile endpoints.

use axum::{
    Router,
    extract::State,
    response::IntoResponse,
    routing::{get, put},
};
use chrono::{DateTime, Utc};
use inkpot_common::AppResult;
use inkpot_core::{ChangePasswordInput, UpdateProfileInput};
use inkpot_db::entities::user;
use serde::Serialize;

use crate::{extractors::AuthUser, json::Json, middleware::AppState, response::ApiResponse};

/// Public view of a user.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub avatar: String,
    pub bio: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<user::Model> for UserResponse {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            avatar: user.avatar,
            bio: user.bio,
            created_at: user.created_at.into(),
            updated_at: user.updated_at.map(Into::into),
        }
    }
}

/// Get the authenticated user's profile.
async fn get_profile(AuthUser(user): AuthUser) -> ApiResponse<UserResponse> {
    ApiResponse::ok(user.into())
}

/// Update the authenticated user's profile.
async fn update_profile(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateProfileInput>,
) -> AppResult<ApiResponse<UserResponse>> {
    let updated = state.user_service.update_profile(&user.id, input).await?;

    Ok(ApiResponse::ok(updated.into()))
}

/// Change the authenticated user's password.
async fn change_password(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<ChangePasswordInput>,
) -> AppResult<impl IntoResponse> {
    state.user_service.change_password(&user.id, input).await?;

    Ok(crate::response::ok())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_profile).put(update_profile))
        .route("/password", put(change_password))
}
