//! BookPlay core domain types and error taxonomy

pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::{AppError, RecoveryAction, Result};
pub use types::{
    BookMetadata, Chapter, Duration, SkipDirection, SpeedLevel, TimeLabels, Validator,
};
