//! Font size statistics for body text and heading detection.

use std::collections::BTreeMap;

use crate::model::MAX_HEADING_LEVEL;

/// Body size assumed when no text has been observed.
const FALLBACK_BODY_SIZE: f32 = 12.0;

/// Character-weighted histogram of font sizes.
#[derive(Debug, Clone, Default)]
pub struct FontStatistics {
    /// Font sizes in tenths of a point, with character counts
    histogram: BTreeMap<i32, usize>,
}

impl FontStatistics {
    /// Add a font size observation covering `chars` characters.
    pub fn add_size(&mut self, size: f32, chars: usize) {
        let key = (size * 10.0).round() as i32; // Round to 0.1 precision
        *self.histogram.entry(key).or_insert(0) += chars.max(1);
    }

    /// The most common font size; ties resolve to the smaller size.
    pub fn body_size(&self) -> f32 {
        self.histogram
            .iter()
            .max_by(|(ka, ca), (kb, cb)| ca.cmp(cb).then(kb.cmp(ka)))
            .map(|(key, _)| *key as f32 / 10.0)
            .unwrap_or(FALLBACK_BODY_SIZE)
    }

    /// Check if nothing has been observed.
    pub fn is_empty(&self) -> bool {
        self.histogram.is_empty()
    }
}

/// Ranks distinct heading font sizes: the largest is level 1.
#[derive(Debug, Clone, Default)]
pub struct HeadingRanks {
    /// Representative size of each rank, largest first
    sizes: Vec<f32>,
    tolerance: f32,
}

impl HeadingRanks {
    /// Build ranks from observed heading sizes. Sizes within `tolerance`
    /// points of a larger rank's size fall into that rank.
    pub fn from_sizes(mut sizes: Vec<f32>, tolerance: f32) -> Self {
        sizes.sort_by(|a, b| b.total_cmp(a));
        let mut ranks: Vec<f32> = Vec::new();
        for size in sizes {
            match ranks.last() {
                Some(last) if last - size <= tolerance => {}
                _ => ranks.push(size),
            }
        }
        Self {
            sizes: ranks,
            tolerance,
        }
    }

    /// Heading level for a font size, capped at the deepest level.
    pub fn level(&self, size: f32) -> u8 {
        let rank = self
            .sizes
            .iter()
            .position(|&s| size >= s - self.tolerance)
            .unwrap_or(self.sizes.len().saturating_sub(1));
        (rank + 1).min(MAX_HEADING_LEVEL as usize) as u8
    }
}
