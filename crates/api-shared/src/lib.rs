//! # API Shared
//!
//! Shared wire types and services for the CAVI calculator APIs.
//!
//! Contains:
//! - Request/response bodies of the REST surface (`types` module), with OpenAPI schemas
//! - `HealthService`
//!
//! Used by `api-rest` for common functionality.

pub mod health;
pub mod types;

pub use health::HealthService;
pub use types::*;
