//! Core business logic for inkpot.

pub mod services;

pub use services::*;
