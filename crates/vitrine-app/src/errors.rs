//! Categorized application errors
//!
//! Workflow and adapter failures carry enough structure for the UI layer to
//! route them: which toast severity to show, and whether retrying makes
//! sense. The underlying store/service error rides along where there is one.

use crate::toasts::ToastLevel;
use vitrine_core::VitrineError;

/// Categorized application error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AppError {
    /// The user gave us something we cannot act on; correctable.
    #[error("{message} - {hint}")]
    Input {
        /// What was wrong
        message: String,
        /// How to fix it
        hint: String,
    },

    /// A live data source degraded (subscription error, listener dropped).
    #[error("Source '{source_name}' degraded: {error}")]
    Source {
        /// Which source (feed adapter name, collection)
        source_name: String,
        /// The underlying store error
        error: VitrineError,
    },

    /// A user-initiated operation against a backing service failed.
    #[error("{action} failed: {error}")]
    Action {
        /// What the user was doing ("Send reply", "Save page")
        action: String,
        /// The underlying service error
        error: VitrineError,
    },

    /// An unexpected internal condition.
    #[error("{context}: {message}")]
    Internal {
        /// Where it happened
        context: String,
        /// What happened
        message: String,
    },
}

impl AppError {
    /// Correctable user-input error.
    pub fn input(message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::Input {
            message: message.into(),
            hint: hint.into(),
        }
    }

    /// Degraded live source.
    pub fn source(source_name: impl Into<String>, error: VitrineError) -> Self {
        Self::Source {
            source_name: source_name.into(),
            error,
        }
    }

    /// Failed user-initiated operation.
    pub fn action(action: impl Into<String>, error: VitrineError) -> Self {
        Self::Action {
            action: action.into(),
            error,
        }
    }

    /// Unexpected internal condition.
    pub fn internal(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Internal {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Toast severity appropriate for surfacing this error.
    pub fn toast_level(&self) -> ToastLevel {
        match self {
            Self::Input { .. } => ToastLevel::Info,
            Self::Source { .. } => ToastLevel::Warning,
            Self::Action { .. } => ToastLevel::Error,
            Self::Internal { .. } => ToastLevel::Error,
        }
    }

    /// Whether a retry can plausibly succeed.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Input { .. } => true,
            Self::Source { .. } => true,
            Self::Action { error, .. } => matches!(
                error,
                VitrineError::Network { .. } | VitrineError::NotFound { .. }
            ),
            Self::Internal { .. } => false,
        }
    }
}
