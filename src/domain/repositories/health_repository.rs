//! Repository trait for database liveness checks.

use crate::error::AppError;
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HealthRepository: Send + Sync {
    /// Runs a trivial query against the database.
    async fn ping(&self) -> Result<(), AppError>;
}
