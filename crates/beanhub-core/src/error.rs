use thiserror::Error;

/// Core error types for BeanHub operations
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Coffee bean not found: {id}")]
    NotFound { id: i64 },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("Invalid selection date: {0}")]
    InvalidDate(String),

    #[error("Data access failed: {message}")]
    DataAccessFailed { message: String },

    #[error("No coffee beans available to select from.")]
    NoCandidatesAvailable,

    #[error("No alternative coffee beans available to avoid repetition.")]
    NoAlternativeAvailable,

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CoreError {
    /// Create a new NotFound error
    #[must_use]
    pub fn not_found(id: i64) -> Self {
        Self::NotFound { id }
    }

    /// Create a new ValidationFailed error
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            message: message.into(),
        }
    }

    /// Create a new InvalidDate error
    #[must_use]
    pub fn invalid_date(date: impl Into<String>) -> Self {
        Self::InvalidDate(date.into())
    }

    /// Create a new DataAccessFailed error
    #[must_use]
    pub fn data_access(message: impl Into<String>) -> Self {
        Self::DataAccessFailed {
            message: message.into(),
        }
    }

    /// Create a new Internal error
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Check if this error is a client error (4xx category)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::ValidationFailed { .. } | Self::InvalidDate(_)
        )
    }

    /// Check if this error is a server error (5xx category)
    pub fn is_server_error(&self) -> bool {
        !self.is_client_error()
    }

    /// Check if this error came out of the daily-selection algorithm
    pub fn is_selection_error(&self) -> bool {
        matches!(self, Self::NoCandidatesAvailable | Self::NoAlternativeAvailable)
    }

    /// Get error category for logging/monitoring
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::ValidationFailed { .. } | Self::InvalidDate(_) => ErrorCategory::Validation,
            Self::DataAccessFailed { .. } => ErrorCategory::DataAccess,
            Self::NoCandidatesAvailable | Self::NoAlternativeAvailable => ErrorCategory::Selection,
            Self::JsonError(_) => ErrorCategory::Serialization,
            Self::Internal { .. } => ErrorCategory::System,
        }
    }
}

/// Error categories for monitoring and classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    DataAccess,
    Selection,
    Serialization,
    System,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::NotFound => write!(f, "not_found"),
            Self::DataAccess => write!(f, "data_access"),
            Self::Selection => write!(f, "selection"),
            Self::Serialization => write!(f, "serialization"),
            Self::System => write!(f, "system"),
        }
    }
}

/// Convenience result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
