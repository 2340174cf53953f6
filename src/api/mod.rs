//! REST API layer for HTTP request/response handling.
//!
//! This layer translates HTTP requests into service calls and formats
//! responses according to API contracts.
//!
//! # Modules
//!
//! - [`doc`] - OpenAPI document
//! - [`dto`] - Data Transfer Objects for request/response serialization
//! - [`extract`] - Extractors that report rejections as [`crate::AppError`]
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Authentication, CORS, rate limiting and tracing
//! - [`routes`] - Route configuration and composition

pub mod doc;
pub mod dto;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod routes;
