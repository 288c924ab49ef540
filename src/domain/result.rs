//! Result type alias for Nova Intake
//!
//! This module provides a convenient Result type alias that uses NovaError
//! as the error type.

use super::errors::NovaError;

/// Result type alias for Nova Intake operations
///
/// # Examples
///
/// ```
/// use nova_intake::domain::result::Result;
/// use nova_intake::domain::errors::NovaError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(NovaError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, NovaError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::NovaError;

    #[test]
    fn test_result_err() {
        let result: Result<i32> = Err(NovaError::Validation("test error".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<i32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }
}
