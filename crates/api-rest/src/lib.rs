//! # API REST
//!
//! REST façade of the research preservation workflow.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - Translation of collaborator failures into status codes and the `{code, error}` envelope
//!
//! Uses `api-shared` for the response bodies and `research-core` for everything behind them.

#![warn(rust_2018_idioms)]

pub mod error;
pub mod routes;

pub use error::ApiError;
pub use routes::{router, ApiDoc, AppState};
