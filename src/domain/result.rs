//! Result type alias for Lanyard

use super::errors::LanyardError;

/// Result type alias for Lanyard operations
///
/// # Examples
///
/// ```
/// use lanyard::domain::result::Result;
/// use lanyard::domain::errors::LanyardError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(LanyardError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, LanyardError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::LanyardError;

    #[test]
    fn test_result_err() {
        let result: Result<i32> = Err(LanyardError::EmptySelection);
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
