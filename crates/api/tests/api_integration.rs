//! API integration tests.
//!
//! Drive the router end to end over a mock database.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
    middleware::from_fn_with_state,
};
use chrono::Utc;
use inkpot_api::{
    middleware::{AppState, auth_middleware},
    router as api_router,
};
use inkpot_common::config::{AuthConfig, Config, DatabaseConfig, MediaConfig, ServerConfig};
use inkpot_core::{LikeService, PostService, TokenService, UserService};
use inkpot_db::entities::{post, user};
use inkpot_db::repositories::{PostLikeRepository, PostRepository, UserRepository};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
use std::sync::Arc;
use tower::ServiceExt;

const TEST_SECRET: &str = "integration-test-secret";

fn create_test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 5000,
        },
        database: DatabaseConfig {
            url: "postgres://localhost/test".to_string(),
            max_connections: 10,
            min_connections: 1,
        },
        auth: AuthConfig {
            token_secret: TEST_SECRET.to_string(),
            token_expiry_days: 30,
        },
        media: MediaConfig::default(),
    }
}

fn create_state(db: DatabaseConnection) -> AppState {
    let db = Arc::new(db);
    let config = create_test_config();

    let user_repo = UserRepository::new(Arc::clone(&db));
    let post_repo = PostRepository::new(Arc::clone(&db));
    let like_repo = PostLikeRepository::new(Arc::clone(&db));

    AppState {
        user_service: UserService::new(user_repo, &config),
        post_service: PostService::new(post_repo.clone(), &config),
        like_service: LikeService::new(post_repo, like_repo),
        token_service: TokenService::new(&config),
    }
}

fn create_app(db: DatabaseConnection) -> Router {
    let state = create_state(db);

    Router::new()
        .nest("/api", api_router())
        .layer(from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}

fn create_test_user(id: &str, username: &str) -> user::Model {
    user::Model {
        id: id.to_string(),
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password_hash: "$argon2id$fake".to_string(),
        avatar: String::new(),
        bio: String::new(),
        created_at: Utc::now().into(),
        updated_at: None,
    }
}

#[tokio::test]
async fn test_unknown_endpoint_returns_404() {
    let app = create_app(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/nonexistent")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_login_unknown_user_unauthorized() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<user::Model>::new()])
        .into_connection();
    let app = create_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/auth/login")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from(r#"{"username":"ghost","password":"wrong"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_invalid_email_rejected() {
    let app = create_app(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/auth/register")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    r#"{"username":"alice","email":"not-an-email","password":"hunter22"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_malformed_body_bad_request() {
    let app = create_app(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/auth/register")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from(r#"{"username":"alice""#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_missing_fields_bad_request() {
    let app = create_app(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/auth/register")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from(r#"{"username":"alice"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_duplicate_identity_conflicts() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[create_test_user("u1", "alice")]])
        .into_connection();
    let app = create_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/auth/register")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    r#"{"username":"alice","email":"alice@example.com","password":"hunter22"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_list_posts_empty_ok() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<post::Model>::new()])
        .into_connection();
    let app = create_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/posts?category=&type=")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_list_posts_unknown_type_rejected() {
    let app = create_app(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/posts?type=podcast")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_missing_post_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<post::Model>::new()])
        .into_connection();
    let app = create_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/posts/nonexistent")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_post_without_token_unauthorized() {
    let app = create_app(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/posts")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    r#"{"title":"t","category":"c","type":"article","content":"body"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_like_without_token_unauthorized() {
    let app = create_app(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/posts/p1/like")
                .method("POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_profile_without_token_unauthorized() {
    let app = create_app(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/profile")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_with_valid_token_ok() {
    // Middleware resolves the token subject against the database
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[create_test_user("u1", "alice")]])
        .into_connection();
    let app = create_app(db);

    let token = TokenService::with_secret(TEST_SECRET, 30).issue("u1").unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/auth/me")
                .method("GET")
                .header("Authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_me_with_garbage_token_unauthorized() {
    let app = create_app(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/auth/me")
                .method("GET")
                .header("Authorization", "Bearer not.a.token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_delete_post_by_non_author_forbidden() {
    let actor = create_test_user("u2", "mallory");
    let post_row = post::Model {
        id: "p1".to_string(),
        kind: post::PostKind::Article,
        title: "Title".to_string(),
        category: "tech".to_string(),
        author_id: "u1".to_string(),
        author_name: "alice".to_string(),
        content: Some("body".to_string()),
        excerpt: Some("body".to_string()),
        cover_image: None,
        image_gallery: None,
        music_url: None,
        local_music: None,
        music_desc: None,
        video_url: None,
        local_video: None,
        video_desc: None,
        views: 0,
        likes: 0,
        created_at: Utc::now().into(),
        updated_at: None,
    };

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        // middleware user lookup, then the post fetch
        .append_query_results([[actor]])
        .append_query_results([[post_row]])
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection();
    let app = create_app(db);

    let token = TokenService::with_secret(TEST_SECRET, 30).issue("u2").unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/posts/p1")
                .method("DELETE")
                .header("Authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
