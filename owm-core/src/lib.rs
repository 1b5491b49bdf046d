//! Core library for the `owm` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The request executor with its observable request state
//! - Shared request/response/error types
//!
//! It is used by `owm-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod executor;
pub mod request;

pub use config::{Config, DEFAULT_BASE_URL};
pub use error::ApiError;
pub use executor::{ApiResponse, RequestExecutor, RequestState};
pub use request::ApiRequest;
