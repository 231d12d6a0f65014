//! Convenience result type alias for HackHub.

use crate::error::AppError;

/// A specialized `Result` type for storage and infrastructure operations.
pub type AppResult<T> = Result<T, AppError>;
