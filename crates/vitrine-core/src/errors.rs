//! Unified error type for Vitrine core operations
//!
//! One simple enum instead of a per-module error hierarchy: callers that need
//! finer categorization (toast severity, retry hints) layer it on top in
//! `vitrine-app`.

use serde::{Deserialize, Serialize};

/// Unified error type for all Vitrine operations
#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
pub enum VitrineError {
    /// Invalid input or configuration
    #[error("Invalid: {message}")]
    Invalid {
        /// Description of the invalid input
        message: String,
    },

    /// Resource not found
    #[error("Not found: {message}")]
    NotFound {
        /// Description of what was not found
        message: String,
    },

    /// Permission denied by a backing service
    #[error("Permission denied: {message}")]
    PermissionDenied {
        /// Description of the permission issue
        message: String,
    },

    /// Network or transport error from a backing service
    #[error("Network error: {message}")]
    Network {
        /// Description of the network failure
        message: String,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {message}")]
    Serialization {
        /// Description of the serialization failure
        message: String,
    },

    /// Document or object storage operation failed
    #[error("Storage error: {message}")]
    Storage {
        /// Description of the storage failure
        message: String,
    },

    /// Translation service call failed
    #[error("Translation error: {message}")]
    Translation {
        /// Description of the translation failure
        message: String,
    },

    /// Internal system error
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error
        message: String,
    },
}

impl VitrineError {
    /// Create an invalid input error
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a permission denied error
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::PermissionDenied {
            message: message.into(),
        }
    }

    /// Create a network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Create a translation error
    pub fn translation(message: impl Into<String>) -> Self {
        Self::Translation {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

/// Standard Result type for Vitrine operations
pub type Result<T> = std::result::Result<T, VitrineError>;

impl From<serde_json::Error> for VitrineError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = VitrineError::invalid("empty field path");
        assert!(matches!(err, VitrineError::Invalid { .. }));
        assert_eq!(err.to_string(), "Invalid: empty field path");
    }

    #[test]
    fn test_serde_json_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = VitrineError::from(json_err);
        assert!(matches!(err, VitrineError::Serialization { .. }));
    }

    #[test]
    fn test_errors_are_cloneable() {
        let err = VitrineError::storage("write rejected");
        let cloned = err.clone();
        assert_eq!(err.to_string(), cloned.to_string());
    }
}
