//! # Error Types
//!
//! Custom error types for the Ruptela decoder using `thiserror`.
//!
//! Decoding distinguishes two data-error kinds: input that cannot be parsed as a
//! packet at all ([`DecodeError::Malformed`]) and input that parses but breaks a
//! configured limit ([`DecodeError::PolicyViolation`]). Callers can relax the
//! policy without ever masking structural corruption.

use thiserror::Error;

/// Error returned by a single decode call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Input cannot be parsed as the claimed structure, regardless of policy
    #[error("parse error at offset {offset}: {message}")]
    Malformed {
        /// Human-readable description
        message: String,
        /// Byte offset at failure
        offset: usize,
        /// Raw bytes being parsed when the failure occurred
        data: Vec<u8>,
    },

    /// Input is well-formed but violates a configured semantic limit
    #[error("validation error for {field} (value: {value}): {message}")]
    PolicyViolation {
        /// Name of the violated field
        field: &'static str,
        /// Offending value, rendered for display
        value: String,
        /// Human-readable description
        message: String,
    },

    /// Internal invariant broken; never caused by input data alone
    #[error("internal decoder fault: {0}")]
    Internal(String),
}

impl DecodeError {
    /// Returns `true` for structural parse failures
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed { .. })
    }

    /// Returns `true` for policy violations
    pub fn is_policy_violation(&self) -> bool {
        matches!(self, Self::PolicyViolation { .. })
    }

    /// Name of the violated field, if this is a policy violation
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::PolicyViolation { field, .. } => Some(field),
            _ => None,
        }
    }
}

/// Main error type for the Ruptela decoder application layer
#[derive(Debug, Error)]
pub enum RuptelaError {
    /// Packet decoding errors
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON rendering errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Processor input errors
    #[error("Processor error: {0}")]
    Processor(String),
}

/// Result type alias for the Ruptela decoder
pub type Result<T> = std::result::Result<T, RuptelaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_display() {
        let err = DecodeError::Malformed {
            message: "packet too short".to_string(),
            offset: 0,
            data: vec![0x01, 0x02],
        };
        assert_eq!(err.to_string(), "parse error at offset 0: packet too short");
        assert!(err.is_malformed());
        assert!(!err.is_policy_violation());
        assert_eq!(err.field(), None);
    }

    #[test]
    fn test_policy_violation_display() {
        let err = DecodeError::PolicyViolation {
            field: "num_records",
            value: "5".to_string(),
            message: "too many records: 5 (max: 2)".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "validation error for num_records (value: 5): too many records: 5 (max: 2)"
        );
        assert!(err.is_policy_violation());
        assert_eq!(err.field(), Some("num_records"));
    }

    #[test]
    fn test_decode_error_converts_transparently() {
        let err: RuptelaError = DecodeError::Internal("overflow".to_string()).into();
        assert_eq!(err.to_string(), "internal decoder fault: overflow");
    }

    #[test]
    fn test_processor_error_display() {
        let err = RuptelaError::Processor("empty input data".to_string());
        assert_eq!(err.to_string(), "Processor error: empty input data");
    }
}
