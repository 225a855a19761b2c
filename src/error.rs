//! Error types for conversion jobs.
//!
//! Validation and capacity errors are expected outcomes the caller can
//! recover from by adjusting settings. Internal errors mean the planner and
//! sampler disagree about the grid and are fatal for the job.

/// Coarse classification of a [`ConvertError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Input,
    Capacity,
    Internal,
}

/// Errors that can occur while planning or running a conversion.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConvertError {
    /// Settings were rejected at submission.
    #[error("Invalid settings: {}", .reasons.join("; "))]
    Validation { reasons: Vec<String> },

    /// The source image cannot be converted (zero area, short buffer).
    #[error("Invalid source image: {reason}")]
    Input { reason: String },

    /// The pre-flight estimate exceeded a resource ceiling.
    #[error("{reason}. {suggestion}")]
    Capacity { reason: String, suggestion: String },

    /// A sampling coordinate fell outside the source buffer.
    #[error("Internal conversion error: {reason}")]
    Internal { reason: String },
}

impl ConvertError {
    pub fn validation(reason: impl Into<String>) -> Self {
        ConvertError::Validation {
            reasons: vec![reason.into()],
        }
    }

    pub fn input(reason: impl Into<String>) -> Self {
        ConvertError::Input {
            reason: reason.into(),
        }
    }

    pub fn internal(reason: impl Into<String>) -> Self {
        ConvertError::Internal {
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ConvertError::Validation { .. } => ErrorKind::Validation,
            ConvertError::Input { .. } => ErrorKind::Input,
            ConvertError::Capacity { .. } => ErrorKind::Capacity,
            ConvertError::Internal { .. } => ErrorKind::Internal,
        }
    }

    /// Whether resubmitting with different settings can succeed.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, ConvertError::Internal { .. })
    }
}
