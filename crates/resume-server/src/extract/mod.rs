//! Enhanced HTTP request extractors with improved error handling and validation.
//!
//! # Extractor Categories
//!
//! ## Authentication
//!
//! - [`Principal`] - Caller identity and role, attached by the access gate
//! - [`PrincipalResolver`] - Stateless bearer token resolution
//!
//! ## Request Data Extraction
//!
//! - [`Json`] - JSON deserialization with enveloped error responses
//! - [`ValidateJson`] - JSON extraction with automatic validation
//! - [`Path`] - Path parameters with enveloped error responses

pub mod auth;
pub mod reject;

pub use crate::extract::auth::{Principal, PrincipalResolver, ResolveError, Role};
pub use crate::extract::reject::{Json, Path, ValidateJson};
