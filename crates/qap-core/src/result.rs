//! Convenience result type alias for QAP Total.

use crate::error::AppError;

/// A specialized `Result` type for store and infrastructure operations.
pub type AppResult<T> = Result<T, AppError>;
