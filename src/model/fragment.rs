//! Positioned text fragments produced by the source decoder.

use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box in page coordinates.
///
/// The y axis grows downward: `y0` is the top edge and `y1` the bottom edge,
/// which doubles as the baseline of the text it encloses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    /// Left edge
    pub x0: f32,
    /// Top edge
    pub y0: f32,
    /// Right edge
    pub x1: f32,
    /// Bottom edge (baseline)
    pub y1: f32,
}

impl BBox {
    /// Create a new bounding box.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Width of the box.
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    /// Height of the box.
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    /// Whether the box has finite coordinates and a positive area.
    pub fn is_valid(&self) -> bool {
        [self.x0, self.y0, self.x1, self.y1]
            .iter()
            .all(|v| v.is_finite())
            && self.x0 < self.x1
            && self.y0 < self.y1
    }

    /// Smallest box containing both boxes.
    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    /// Length of the vertical interval shared by both boxes (0 if disjoint).
    pub fn vertical_overlap(&self, other: &BBox) -> f32 {
        (self.y1.min(other.y1) - self.y0.max(other.y0)).max(0.0)
    }
}

/// One positioned run of glyphs with its style hints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFragment {
    /// The text content
    pub text: String,
    /// Zero-based page index
    #[serde(default)]
    pub page_index: usize,
    /// Bounding box in page coordinates
    pub bbox: BBox,
    /// Font size in points
    pub font_size: f32,
    /// Whether the font is bold
    #[serde(default)]
    pub is_bold: bool,
    /// Whether the font is italic
    #[serde(default)]
    pub is_italic: bool,
}

impl TextFragment {
    /// Create a regular-weight fragment.
    pub fn new(text: impl Into<String>, page_index: usize, bbox: BBox, font_size: f32) -> Self {
        Self {
            text: text.into(),
            page_index,
            bbox,
            font_size,
            is_bold: false,
            is_italic: false,
        }
    }

    /// Mark the fragment bold.
    pub fn bold(mut self) -> Self {
        self.is_bold = true;
        self
    }

    /// Mark the fragment italic.
    pub fn italic(mut self) -> Self {
        self.is_italic = true;
        self
    }

    /// Baseline y coordinate.
    pub fn baseline(&self) -> f32 {
        self.bbox.y1
    }

    /// Why the fragment cannot be laid out, if it cannot.
    pub fn defect(&self) -> Option<&'static str> {
        if self.text.is_empty() {
            Some("empty text")
        } else if !self.bbox.is_valid() {
            Some("degenerate bounding box")
        } else if !(self.font_size.is_finite() && self.font_size > 0.0) {
            Some("non-positive font size")
        } else {
            None
        }
    }
}
