//! Run-level text styling.

use serde::{Deserialize, Serialize};

/// Character styling carried over from the source fragments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextStyle {
    /// Bold text
    pub bold: bool,
    /// Italic text
    pub italic: bool,
}

impl TextStyle {
    /// Check if any styling is applied.
    pub fn has_styling(&self) -> bool {
        self.bold || self.italic
    }
}

/// A run of text with consistent styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    /// The text content
    pub text: String,
    /// Text styling
    pub style: TextStyle,
}

impl TextRun {
    /// Create a new text run with default style.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: TextStyle::default(),
        }
    }

    /// Create a run with the given style.
    pub fn styled(text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    /// Check if this run is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Accumulates text into runs, starting a new run whenever the style changes.
#[derive(Debug, Default)]
pub(crate) struct RunBuilder {
    runs: Vec<TextRun>,
}

impl RunBuilder {
    pub(crate) fn push(&mut self, text: &str, style: TextStyle) {
        if text.is_empty() {
            return;
        }
        match self.runs.last_mut() {
            Some(last) if last.style == style => last.text.push_str(text),
            _ => self.runs.push(TextRun::styled(text, style)),
        }
    }

    /// Append text to the current run regardless of style.
    pub(crate) fn push_plain(&mut self, text: &str) {
        match self.runs.last_mut() {
            Some(last) => last.text.push_str(text),
            None => self.runs.push(TextRun::new(text)),
        }
    }

    pub(crate) fn finish(self) -> Vec<TextRun> {
        self.runs
    }
}
