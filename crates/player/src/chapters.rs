// FILE: crates/player/src/chapters.rs
//! Chapter sequence navigation

use bookplay_core::{Chapter, SkipDirection};

/// Ordered key points of a book plus a cursor on the current one
///
/// The list is fixed once built. Navigation only moves the cursor, which is
/// either unset or points inside the list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChapterSequence {
    chapters: Vec<Chapter>,
    current_index: Option<usize>,
}

impl ChapterSequence {
    /// Creates a sequence, selecting the first chapter if there is one
    pub fn new(chapters: Vec<Chapter>) -> Self {
        let current_index = if chapters.is_empty() { None } else { Some(0) };
        Self {
            chapters,
            current_index,
        }
    }

    /// Returns the number of chapters
    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    /// Returns true if the sequence has no chapters
    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    /// Returns all chapters in order
    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    /// Gets the current chapter
    pub fn current(&self) -> Option<&Chapter> {
        self.current_index.and_then(|idx| self.chapters.get(idx))
    }

    /// Gets the current chapter index (0-based)
    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    /// Returns the chapter after `after`
    ///
    /// At the last chapter this is `None`, or the first chapter when
    /// `wrap` is set. A chapter that is not in the sequence has no
    /// successor.
    pub fn next(&self, after: &Chapter, wrap: bool) -> Option<&Chapter> {
        let idx = self.position(after)?;
        self.step_from(idx, SkipDirection::Forward, wrap)
            .and_then(|target| self.chapters.get(target))
    }

    /// Returns the chapter before `before`, wrapping to the last one
    pub fn previous(&self, before: &Chapter, wrap: bool) -> Option<&Chapter> {
        let idx = self.position(before)?;
        self.step_from(idx, SkipDirection::Backward, wrap)
            .and_then(|target| self.chapters.get(target))
    }

    /// Returns the 1-based position of a chapter
    ///
    /// Equality is structural, so with duplicates the first match wins.
    pub fn index_of(&self, chapter: &Chapter) -> Option<usize> {
        self.position(chapter).map(|idx| idx + 1)
    }

    /// Moves the cursor to a specific chapter
    ///
    /// Out-of-range indices leave the cursor where it was.
    pub fn select(&mut self, index: usize) -> Option<&Chapter> {
        if index < self.chapters.len() {
            self.current_index = Some(index);
            self.chapters.get(index)
        } else {
            None
        }
    }

    /// Moves the cursor one chapter in `direction`
    ///
    /// With no current chapter the first one is selected. Returns `None`
    /// and keeps the cursor when the boundary is hit without wrapping.
    pub fn advance(&mut self, direction: SkipDirection, wrap: bool) -> Option<&Chapter> {
        let target = match self.current_index {
            Some(idx) => self.step_from(idx, direction, wrap)?,
            None => 0,
        };
        self.select(target)
    }

    /// Returns a progress caption such as "KEY POINT 2 OF 7"
    pub fn progress_label(&self) -> Option<String> {
        self.current_index
            .map(|idx| format!("KEY POINT {} OF {}", idx + 1, self.chapters.len()))
    }

    fn position(&self, chapter: &Chapter) -> Option<usize> {
        self.chapters.iter().position(|c| c == chapter)
    }

    fn step_from(&self, idx: usize, direction: SkipDirection, wrap: bool) -> Option<usize> {
        let len = self.chapters.len();
        if idx >= len {
            return None;
        }

        match direction {
            SkipDirection::Forward if idx + 1 < len => Some(idx + 1),
            SkipDirection::Forward if wrap => Some(0),
            SkipDirection::Backward if idx > 0 => Some(idx - 1),
            SkipDirection::Backward if wrap => Some(len - 1),
            _ => None,
        }
    }
}
