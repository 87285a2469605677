//! # API Shared
//!
//! Shared definitions for the docstore APIs.
//!
//! Contains:
//! - Request/response bodies (`dto` module), with OpenAPI schemas
//! - Shared services like `HealthService`
//!
//! Used by `api-rest` and anything else that speaks the docstore wire format.

pub mod dto;
pub mod health;

pub use dto::*;
pub use health::HealthService;
