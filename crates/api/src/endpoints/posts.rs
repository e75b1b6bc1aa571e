//! Post endpoints.

use axum::{
    Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use inkpot_common::AppResult;
use inkpot_core::{CreatePostInput, PostFilter};
use inkpot_db::entities::post::{self, PostKind};
use serde::{Deserialize, Serialize};

use crate::{
    extractors::{AuthUser, MaybeAuthUser},
    json::Json,
    middleware::AppState,
    response::ApiResponse,
};

/// Wire view of a post.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: PostKind,
    pub title: String,
    pub category: String,
    pub author_id: String,
    pub author_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_gallery: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub music_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_music: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub music_desc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_video: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_desc: Option<String>,
    pub views: i32,
    pub likes: i32,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<post::Model> for PostResponse {
    fn from(post: post::Model) -> Self {
        let image_gallery = post
            .image_gallery
            .map(|g| serde_json::from_value(g).unwrap_or_default());

        Self {
            id: post.id,
            kind: post.kind,
            title: post.title,
            category: post.category,
            author_id: post.author_id,
            author_name: post.author_name,
            content: post.content,
            excerpt: post.excerpt,
            cover_image: post.cover_image,
            image_gallery,
            music_url: post.music_url,
            local_music: post.local_music,
            music_desc: post.music_desc,
            video_url: post.video_url,
            local_video: post.local_video,
            video_desc: post.video_desc,
            views: post.views,
            likes: post.likes,
            created_at: post.created_at.into(),
            updated_at: post.updated_at.map(Into::into),
        }
    }
}

/// Author snapshot attached to a post detail.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorResponse {
    pub username: String,
    pub avatar: String,
    pub bio: String,
}

/// Post detail: the post plus viewer-specific state.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDetailResponse {
    #[serde(flatten)]
    pub post: PostResponse,
    pub liked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<AuthorResponse>,
}

/// Result of a like toggle.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    pub likes: i32,
    pub liked: bool,
}

/// Listing query parameters. Empty strings mean "no filter".
#[derive(Debug, Deserialize)]
struct ListParams {
    category: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

/// List posts, newest first.
async fn list_posts(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<ApiResponse<Vec<PostResponse>>> {
    let filter = PostFilter::from_params(params.category, params.kind)?;
    let posts = state.post_service.list(&filter).await?;

    Ok(ApiResponse::ok(posts.into_iter().map(Into::into).collect()))
}

/// Get a post. Counts a view; reports `liked` for an authenticated viewer.
async fn get_post(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<PostDetailResponse>> {
    let post = state.post_service.get(&id).await?;

    let liked = match &viewer {
        Some(user) => state.like_service.has_liked(&user.id, &post.id).await?,
        None => false,
    };

    // Best effort; the denormalized author_name still covers a missing author
    let author = state
        .user_service
        .get(&post.author_id)
        .await
        .ok()
        .map(|a| AuthorResponse {
            username: a.username,
            avatar: a.avatar,
            bio: a.bio,
        });

    Ok(ApiResponse::ok(PostDetailResponse {
        post: post.into(),
        liked,
        author,
    }))
}

/// Create a post.
async fn create_post(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreatePostInput>,
) -> AppResult<impl IntoResponse> {
    let post = state.post_service.create(&user, input).await?;

    Ok((
        StatusCode::CREATED,
        ApiResponse::ok(PostResponse::from(post)),
    ))
}

/// Delete a post (author only).
async fn delete_post(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.post_service.delete(&user, &id).await?;

    Ok(crate::response::ok())
}

/// Toggle a like on a post.
async fn toggle_like(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<LikeResponse>> {
    let outcome = state.like_service.toggle(&user.id, &id).await?;

    Ok(ApiResponse::ok(LikeResponse {
        likes: outcome.likes,
        liked: outcome.liked,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_posts).post(create_post))
        .route("/{id}", get(get_post).delete(delete_post))
        .route("/{id}/like", post(toggle_like))
}
