//! Inkpot server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context as _;
use axum::{Router, middleware};
use inkpot_api::{middleware::AppState, router as api_router};
use inkpot_common::Config;
use inkpot_core::{LikeService, PostService, TokenService, UserService};
use inkpot_db::repositories::{PostLikeRepository, PostRepository, UserRepository};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional; real deployments use the environment directly
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inkpot=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting inkpot server...");

    // Load configuration
    let config = Config::load().context("Failed to load configuration")?;

    // Connect to database
    let db = inkpot_db::init(&config)
        .await
        .context("Failed to connect to database")?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    inkpot_db::migrate(&db).await.context("Migrations failed")?;
    info!("Migrations completed");

    // Initialize repositories
    let db = Arc::new(db);
    let user_repo = UserRepository::new(Arc::clone(&db));
    let post_repo = PostRepository::new(Arc::clone(&db));
    let like_repo = PostLikeRepository::new(Arc::clone(&db));

    // Initialize services
    let user_service = UserService::new(user_repo, &config);
    let post_service = PostService::new(post_repo.clone(), &config);
    let like_service = LikeService::new(post_repo, like_repo);
    let token_service = TokenService::new(&config);

    // Create app state
    let state = AppState {
        user_service,
        post_service,
        like_service,
        token_service,
    };

    // Build router
    let app = Router::new()
        .nest("/api", api_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            inkpot_api::middleware::auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        // Bodies are large: media travels inline as base64
        .layer(RequestBodyLimitLayer::new(config.media.max_body_bytes))
        .with_state(state);

    // Start server with graceful shutdown
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
