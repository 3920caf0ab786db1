//! Layout heuristics and their tunable thresholds.

use serde::{Deserialize, Serialize};

/// Minimum vertical overlap, as a fraction of the smaller box height, for two
/// fragments to share a line.
pub const LINE_OVERLAP_RATIO: f32 = 0.5;

/// Maximum baseline difference, as a fraction of the larger font size, for
/// two fragments to share a line.
pub const BASELINE_TOLERANCE_RATIO: f32 = 0.5;

/// Horizontal gap, as a fraction of the font size, above which a space is
/// inserted between fragments.
pub const SPACE_GAP_RATIO: f32 = 0.3;

/// Horizontal gap, as a fraction of the font size, above which a line is split.
pub const LINE_SPLIT_GAP_RATIO: f32 = 3.0;

/// Baseline spacing, as a multiple of the page's median line spacing, above
/// which consecutive lines start separate blocks.
pub const BLOCK_SPACING_RATIO: f32 = 1.5;

/// Font size difference (points) tolerated inside a block.
pub const FONT_SIZE_TOLERANCE: f32 = 1.0;

/// Fraction by which a line's font size must exceed the body size to count
/// as a heading.
pub const HEADING_MARGIN: f32 = 0.2;

/// Line spacing assumed on pages with a single line, as a multiple of the
/// body font size.
pub const DEFAULT_LINE_SPACING_FACTOR: f32 = 1.2;

/// Options for layout analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    /// See [`LINE_OVERLAP_RATIO`]
    pub line_overlap_ratio: f32,

    /// See [`BASELINE_TOLERANCE_RATIO`]
    pub baseline_tolerance_ratio: f32,

    /// See [`SPACE_GAP_RATIO`]
    pub space_gap_ratio: f32,

    /// See [`LINE_SPLIT_GAP_RATIO`]
    pub line_split_gap_ratio: f32,

    /// See [`BLOCK_SPACING_RATIO`]
    pub block_spacing_ratio: f32,

    /// See [`FONT_SIZE_TOLERANCE`]
    pub font_size_tolerance: f32,

    /// See [`HEADING_MARGIN`]
    pub heading_margin: f32,

    /// Whether bullet and numbering markers start list items
    pub detect_lists: bool,
}

impl LayoutOptions {
    /// Create new layout options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the space insertion gap ratio.
    pub fn with_space_gap_ratio(mut self, ratio: f32) -> Self {
        self.space_gap_ratio = ratio;
        self
    }

    /// Set the line split gap ratio.
    pub fn with_line_split_gap_ratio(mut self, ratio: f32) -> Self {
        self.line_split_gap_ratio = ratio;
        self
    }

    /// Set the block spacing ratio.
    pub fn with_block_spacing_ratio(mut self, ratio: f32) -> Self {
        self.block_spacing_ratio = ratio;
        self
    }

    /// Set the font size tolerance.
    pub fn with_font_size_tolerance(mut self, points: f32) -> Self {
        self.font_size_tolerance = points;
        self
    }

    /// Set the heading margin.
    pub fn with_heading_margin(mut self, margin: f32) -> Self {
        self.heading_margin = margin;
        self
    }

    /// Enable or disable list detection.
    pub fn with_lists(mut self, detect: bool) -> Self {
        self.detect_lists = detect;
        self
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            line_overlap_ratio: LINE_OVERLAP_RATIO,
            baseline_tolerance_ratio: BASELINE_TOLERANCE_RATIO,
            space_gap_ratio: SPACE_GAP_RATIO,
            line_split_gap_ratio: LINE_SPLIT_GAP_RATIO,
            block_spacing_ratio: BLOCK_SPACING_RATIO,
            font_size_tolerance: FONT_SIZE_TOLERANCE,
            heading_margin: HEADING_MARGIN,
            detect_lists: true,
        }
    }
}
