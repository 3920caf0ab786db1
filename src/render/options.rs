//! Rendering options and configuration.

use serde::{Deserialize, Serialize};

/// Title used for HTML output when none is configured.
pub const DEFAULT_TITLE: &str = "Document";

/// Options for rendering a logical document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Document title written to the HTML `<title>`
    pub title: String,

    /// Insert explicit breaks between source lines in HTML and DOCX output
    pub preserve_line_breaks: bool,

    /// Join the lines of each block into a single plain text line
    pub reflow_text: bool,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Enable or disable plain text reflow.
    pub fn with_reflow(mut self, reflow: bool) -> Self {
        self.reflow_text = reflow;
        self
    }

    /// Enable or disable line break preservation.
    pub fn with_line_breaks(mut self, preserve: bool) -> Self {
        self.preserve_line_breaks = preserve;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            preserve_line_breaks: false,
            reflow_text: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_options_builder() {
        let options = RenderOptions::new()
            .with_title("Report")
            .with_line_breaks(true)
            .with_reflow(true);

        assert_eq!(options.title, "Report");
        assert!(options.preserve_line_breaks);
        assert!(options.reflow_text);
    }

    #[test]
    fn test_render_options_defaults() {
        let options = RenderOptions::default();
        assert_eq!(options.title, DEFAULT_TITLE);
        assert!(!options.preserve_line_breaks);
        assert!(!options.reflow_text);
    }
}
