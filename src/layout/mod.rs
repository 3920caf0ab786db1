//! Layout analysis: fragments into lines, lines into blocks.

mod analyzer;
mod options;
mod stats;

pub use analyzer::{LayoutAnalyzer, LayoutWarning};
pub use options::{
    LayoutOptions, BASELINE_TOLERANCE_RATIO, BLOCK_SPACING_RATIO, DEFAULT_LINE_SPACING_FACTOR,
    FONT_SIZE_TOLERANCE, HEADING_MARGIN, LINE_OVERLAP_RATIO, LINE_SPLIT_GAP_RATIO,
    SPACE_GAP_RATIO,
};
pub use stats::{FontStatistics, HeadingRanks};
