//! Text lines: fragments that share a baseline.

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use super::{BBox, TextFragment};

/// A text line composed of fragments on the same baseline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Line {
    /// Fragments sorted by `x0`
    pub fragments: Vec<TextFragment>,
    /// Union of the fragment boxes
    pub bbox: BBox,
    /// Mean font size of the fragments, weighted by character count
    pub font_size: f32,
    /// For each fragment, whether a space precedes it in the assembled text
    space_before: Vec<bool>,
}

impl Line {
    /// Build a line from fragments, inserting a space wherever the horizontal
    /// gap exceeds `space_gap_ratio` times the fragment's font size.
    ///
    /// Returns `None` for an empty fragment list.
    pub fn from_fragments(mut fragments: Vec<TextFragment>, space_gap_ratio: f32) -> Option<Self> {
        let first = fragments.first()?;
        let mut bbox = first.bbox;

        fragments.sort_by(|a, b| a.bbox.x0.total_cmp(&b.bbox.x0));

        let mut space_before = Vec::with_capacity(fragments.len());
        for (i, frag) in fragments.iter().enumerate() {
            bbox = bbox.union(&frag.bbox);
            if i == 0 {
                space_before.push(false);
                continue;
            }
            let prev = &fragments[i - 1];
            let gap = frag.bbox.x0 - prev.bbox.x1;
            space_before.push(needs_space(prev, frag, gap, space_gap_ratio));
        }

        let total_chars: usize = fragments.iter().map(|f| f.text.chars().count()).sum();
        let weighted: f32 = fragments
            .iter()
            .map(|f| f.font_size * f.text.chars().count() as f32)
            .sum();
        let font_size = if total_chars > 0 {
            weighted / total_chars as f32
        } else {
            fragments[0].font_size
        };

        Some(Self {
            fragments,
            bbox,
            font_size,
            space_before,
        })
    }

    /// Page the line belongs to.
    pub fn page_index(&self) -> usize {
        self.fragments.first().map(|f| f.page_index).unwrap_or(0)
    }

    /// Baseline of the line.
    pub fn baseline(&self) -> f32 {
        self.bbox.y1
    }

    /// Fragments paired with whether a space precedes each one.
    pub fn pieces(&self) -> impl Iterator<Item = (bool, &TextFragment)> {
        self.space_before.iter().copied().zip(self.fragments.iter())
    }

    /// Assembled text of the line.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for (space, frag) in self.pieces() {
            if space {
                out.push(' ');
            }
            out.push_str(&normalize(&frag.text));
        }
        out
    }

    /// Number of characters in the assembled text.
    pub fn char_count(&self) -> usize {
        self.text().chars().count()
    }

    /// Check if the line is predominantly bold.
    pub fn is_bold(&self) -> bool {
        let bold: usize = self
            .fragments
            .iter()
            .filter(|f| f.is_bold)
            .map(|f| f.text.len())
            .sum();
        let total: usize = self.fragments.iter().map(|f| f.text.len()).sum();
        total > 0 && bold as f32 / total as f32 > 0.5
    }
}

/// NFC-normalize fragment text.
pub(crate) fn normalize(text: &str) -> String {
    text.nfc().collect()
}

fn needs_space(prev: &TextFragment, curr: &TextFragment, gap: f32, ratio: f32) -> bool {
    if gap <= curr.font_size * ratio {
        return false;
    }
    if prev.text.ends_with([' ', '\u{00A0}']) || curr.text.starts_with([' ', '\u{00A0}']) {
        return false;
    }
    let prev_last = prev.text.chars().last().map(is_spaceless_script_char);
    let curr_first = curr.text.chars().next().map(is_spaceless_script_char);
    !(prev_last == Some(true) && curr_first == Some(true))
}

/// Chinese and Japanese do not separate words with spaces; Korean does.
fn is_spaceless_script_char(c: char) -> bool {
    matches!(c as u32,
        0x4E00..=0x9FFF       // CJK Unified Ideographs
        | 0x3400..=0x4DBF     // Extension A
        | 0x20000..=0x2EBEF   // Extensions B-F
        | 0x3040..=0x309F     // Hiragana
        | 0x30A0..=0x30FF     // Katakana
        | 0x3000..=0x303F)    // CJK punctuation
}
