//! REST API client module for the ESG reporting service.
//!
//! This module provides the `ApiClient` for listing, creating and deleting
//! companies, business units and metrics. Each collection lives under
//! `<base>/<resource>/` and individual records under `<base>/<resource>/<id>/`.
//!
//! Requests are unauthenticated unless a bearer token is configured.

pub mod client;
pub mod error;
pub mod resource;

pub use client::{ApiClient, Records};
pub use error::ApiError;
pub use resource::Resource;
