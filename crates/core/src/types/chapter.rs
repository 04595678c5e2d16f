//! Chapter (key point) and book metadata models

use crate::error::{AppError, Result};
use crate::types::Validator;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One playable unit of a book's key-point sequence
///
/// Identity is structural: two chapters with the same fields are the same
/// chapter as far as navigation is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Chapter {
    pub title: String,
    #[serde(rename = "fileUrl")]
    pub media_url: String,
    #[serde(rename = "text", default)]
    pub display_text: String,
}

impl Chapter {
    /// Creates a new chapter
    pub fn new(
        title: impl Into<String>,
        media_url: impl Into<String>,
        display_text: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            media_url: media_url.into(),
            display_text: display_text.into(),
        }
    }
}

impl Validator for Chapter {
    fn validate(&self) -> std::result::Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.media_url.trim().is_empty() {
            errors.push(format!("Chapter '{}' has an empty media URL", self.title));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Book metadata document as delivered by the metadata service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookMetadata {
    pub book_name: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub key_points: Vec<Chapter>,
}

impl BookMetadata {
    /// Parses a metadata JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| {
            let reason = e.to_string();
            AppError::metadata_parse(reason, e)
        })
    }

    /// Returns the number of key points
    pub fn chapter_count(&self) -> usize {
        self.key_points.len()
    }

    /// Consumes the metadata, returning the ordered chapter list
    pub fn into_chapters(self) -> Vec<Chapter> {
        self.key_points
    }
}

impl Validator for BookMetadata {
    fn validate(&self) -> std::result::Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.book_name.trim().is_empty() {
            errors.push("Book name cannot be empty".to_string());
        }

        for chapter in &self.key_points {
            if let Err(mut chapter_errors) = chapter.validate() {
                errors.append(&mut chapter_errors);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Direction of a chapter skip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkipDirection {
    Forward,
    Backward,
}

impl fmt::Display for SkipDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Forward => write!(f, "forward"),
            Self::Backward => write!(f, "backward"),
        }
    }
}
