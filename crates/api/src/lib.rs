//! HTTP API layer for inkpot.
//!
//! - **Endpoints**: auth, posts, profile
//! - **Extractors**: authenticated user from request extensions
//! - **Middleware**: bearer token resolution
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod json;
pub mod middleware;
pub mod response;

pub use endpoints::router;
