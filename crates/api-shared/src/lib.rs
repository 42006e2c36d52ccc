//! # API Shared
//!
//! Shared definitions for the research REST API.
//!
//! Contains:
//! - JSON response types (`dto` module) with OpenAPI schemas
//! - `HealthService`
//!
//! Used by `api-rest` and by the OpenAPI document it serves.

pub mod dto;
pub mod health;

pub use dto::*;
pub use health::HealthService;
