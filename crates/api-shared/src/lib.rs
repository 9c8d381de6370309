//! # API Shared
//!
//! Shared wire types and services for the Ausome APIs.
//!
//! Contains:
//! - Request and response bodies (`types` module) with OpenAPI schemas
//! - Shared services like `HealthService`
//!
//! Used by `api-rest` and the workspace binary.

pub mod health;
pub mod types;

pub use health::HealthService;
pub use types::*;
