//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete implementations for data persistence, caching and token security.
//!
//! # Modules
//!
//! - [`cache`] - Response cache and token blacklist (Redis and fallbacks)
//! - [`persistence`] - PostgreSQL repository implementations
//! - [`security`] - JWT signing/verification and password hashing

pub mod cache;
pub mod persistence;
pub mod security;
