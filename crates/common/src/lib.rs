//! Common utilities and shared types for inkpot.
//!
//! This crate provides foundational components used across all inkpot crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: ULID-based unique identifiers via [`IdGenerator`]
//! - **Inline media**: Data-URL helpers for base64-encoded uploads
//!
//! # Example
//!
//! ```no_run
//! use inkpot_common::{Config, IdGenerator, AppResult};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id_gen = IdGenerator::new();
//!     let id = id_gen.generate();
//!     println!("Generated ID: {}", id);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod id;
pub mod media;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use id::IdGenerator;
pub use media::{encode_data_url, validate_inline_media};
