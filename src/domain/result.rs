//! Result type alias for Coffer
//!
//! This module provides a convenient Result type alias that uses CofferError
//! as the error type.

use super::errors::CofferError;

/// Result type alias for Coffer operations
///
/// This is a convenience type alias that uses `CofferError` as the error type.
/// Use this throughout the codebase for fallible operations.
///
/// # Examples
///
/// ```
/// use coffer::domain::result::Result;
/// use coffer::domain::errors::CofferError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(CofferError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, CofferError>;
