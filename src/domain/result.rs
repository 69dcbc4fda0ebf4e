//! Result type alias for Clinisync

use super::errors::ClinisyncError;

/// Result type alias for Clinisync operations
///
/// # Examples
///
/// ```
/// use clinisync::domain::result::Result;
/// use clinisync::domain::errors::ClinisyncError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(ClinisyncError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, ClinisyncError>;
