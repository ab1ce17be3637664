//! Errors surfaced by the quote engine.

use thiserror::Error;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, QuoteError>;

/// Reasons a single quote request can fail.
///
/// Every variant is fatal to that request; the engine never returns a
/// partially computed quote.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QuoteError {
    /// An attribute is out of its domain, names an unknown property type,
    /// or falls outside every pricing tier
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput {
        field: &'static str,
        reason: String,
    },

    /// A price override was supplied without a configured approver
    #[error("Price override of ${amount:.2} is not authorized{}", approver_note(.approver))]
    UnauthorizedOverride {
        amount: f64,
        approver: Option<String>,
    },
}

impl QuoteError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    /// Name of the offending input field, if the error is tied to one
    pub fn field(&self) -> Option<&'static str> {
        match self {
            QuoteError::InvalidInput { field, .. } => Some(field),
            QuoteError::UnauthorizedOverride { .. } => Some("price_override"),
        }
    }
}

fn approver_note(approver: &Option<String>) -> String {
    match approver {
        Some(name) => format!(" ('{}' is not an approver)", name),
        None => " (no approver given)".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_names_field() {
        let err = QuoteError::invalid("floors", "must be at least 1");
        assert_eq!(err.field(), Some("floors"));
        assert_eq!(err.to_string(), "Invalid input for floors: must be at least 1");
    }

    #[test]
    fn test_unauthorized_override_message() {
        let err = QuoteError::UnauthorizedOverride {
            amount: 2500.0,
            approver: Some("mallory".to_string()),
        };
        let msg = err.to_string();
        assert!(msg.contains("$2500.00"));
        assert!(msg.contains("mallory"));

        let err = QuoteError::UnauthorizedOverride {
            amount: 10.0,
            approver: None,
        };
        assert!(err.to_string().contains("no approver given"));
    }
}
