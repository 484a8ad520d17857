//! Result type alias for Tallyman
//!
//! This module provides a convenient Result type alias that uses TallyError
//! as the error type.

use super::errors::TallyError;

/// Result type alias for Tallyman operations
///
/// # Examples
///
/// ```
/// use tallyman::domain::result::Result;
/// use tallyman::domain::errors::TallyError;
///
/// fn example_function() -> Result<u64> {
///     Ok(10)
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(TallyError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, TallyError>;
