//! # Validation Utilities
//!
//! Input validation helpers.

/// Validate that a string is not empty.
pub fn validate_not_empty(value: &str, field_name: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{} cannot be empty", field_name))
    } else {
        Ok(())
    }
}

/// Validate that two values differ.
pub fn validate_distinct(a: &str, b: &str, a_name: &str, b_name: &str) -> Result<(), String> {
    if a.trim() == b.trim() {
        Err(format!("{} and {} must be different", a_name, b_name))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_not_empty() {
        assert!(validate_not_empty("So11111111111111111111111111111111111111112", "inputToken").is_ok());
        assert_eq!(
            validate_not_empty("   ", "inputToken").unwrap_err(),
            "inputToken cannot be empty"
        );
    }

    #[test]
    fn test_validate_distinct() {
        assert!(validate_distinct("a", "b", "inputToken", "outputToken").is_ok());
        assert!(validate_distinct("a", " a ", "inputToken", "outputToken").is_err());
    }
}
