//! Error types and recovery strategies for BookPlay
//!
//! Each error carries a recovery action so callers can log or show what
//! happens next without matching every variant.

use crate::types::SkipDirection;
use std::fmt;
use thiserror::Error;

/// Recovery actions that can be taken when an error occurs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryAction {
    /// Substitute a neutral default (e.g. an unknown duration becomes 0)
    UseDefault,
    /// Stop at the boundary of the chapter sequence
    StopAtBoundary,
    /// No automatic recovery - user intervention required
    UserIntervention,
}

impl fmt::Display for RecoveryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UseDefault => write!(f, "Using default value"),
            Self::StopAtBoundary => write!(f, "Stopping at sequence boundary"),
            Self::UserIntervention => write!(f, "User intervention required"),
        }
    }
}

/// Main error type for BookPlay
#[derive(Error, Debug)]
pub enum AppError {
    /// Media could not be opened or its duration could not be read
    #[error("Media unavailable: {url} - {reason}")]
    MediaUnavailable { url: String, reason: String },

    /// Speed level outside the supported range
    #[error("Invalid speed level: {level} (expected {min}..={max})")]
    InvalidSpeed { level: u8, min: u8, max: u8 },

    /// No further chapter in the requested direction and wraparound disabled
    #[error("No chapter {direction} of the current one")]
    NavigatorExhausted { direction: SkipDirection },

    /// Failed to parse a metadata document
    #[error("Metadata parse error: {reason}")]
    MetadataParseError {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl AppError {
    /// Returns the recommended recovery action for this error
    pub fn recovery_action(&self) -> RecoveryAction {
        match self {
            Self::MediaUnavailable { .. } | Self::InvalidSpeed { .. } => {
                RecoveryAction::UseDefault
            }
            Self::NavigatorExhausted { .. } => RecoveryAction::StopAtBoundary,
            Self::MetadataParseError { .. } => RecoveryAction::UserIntervention,
        }
    }

    /// Helper to create a media error for a URL
    pub fn media_unavailable(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MediaUnavailable {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Helper to create a metadata parse error from any error type
    pub fn metadata_parse<E: std::error::Error + Send + Sync + 'static>(
        reason: impl Into<String>,
        source: E,
    ) -> Self {
        Self::MetadataParseError {
            reason: reason.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Convenience type alias for Results using AppError
pub type Result<T> = std::result::Result<T, AppError>;
