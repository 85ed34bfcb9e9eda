use thiserror::Error;

/// Minimum accepted password length for registration.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Client-side form validation failures.
///
/// These are raised before any network call is made; the API client converts
/// them into its validation error category when a form is submitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("passwords do not match")]
    PasswordMismatch,

    #[error("password must be at least {MIN_PASSWORD_LENGTH} characters")]
    PasswordTooShort,

    #[error("{0} cannot be negative")]
    NegativeQuantity(&'static str),

    #[error("unknown transaction type: {0}")]
    UnknownTransactionType(String),
}

/// Normalize one raw quantity field.
///
/// Empty and unparseable input count as zero; explicitly negative input is
/// surfaced as invalid rather than silently submitted.
pub(crate) fn normalize_quantity(raw: &str, field: &'static str) -> Result<u32, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    match trimmed.parse::<i64>() {
        Err(_) => Ok(0),
        Ok(n) if n < 0 => Err(ValidationError::NegativeQuantity(field)),
        Ok(n) => Ok(u32::try_from(n).unwrap_or(u32::MAX)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_junk_normalize_to_zero() {
        assert_eq!(normalize_quantity("", "unit"), Ok(0));
        assert_eq!(normalize_quantity("   ", "unit"), Ok(0));
        assert_eq!(normalize_quantity("abc", "unit"), Ok(0));
        assert_eq!(normalize_quantity("12abc", "unit"), Ok(0));
    }

    #[test]
    fn test_numeric_input_parses() {
        assert_eq!(normalize_quantity("0", "unit"), Ok(0));
        assert_eq!(normalize_quantity("42", "unit"), Ok(42));
        assert_eq!(normalize_quantity(" 7 ", "unit"), Ok(7));
    }

    #[test]
    fn test_negative_input_is_rejected() {
        assert_eq!(
            normalize_quantity("-3", "dozen"),
            Err(ValidationError::NegativeQuantity("dozen"))
        );
    }
}
