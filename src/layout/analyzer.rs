//! Geometric grouping of fragments into lines and of lines into blocks.

use once_cell::sync::Lazy;
use regex::Regex;

use super::stats::{FontStatistics, HeadingRanks};
use super::{LayoutOptions, DEFAULT_LINE_SPACING_FACTOR};
use crate::model::{Block, BlockRole, Line, TextFragment};

/// Bullet glyphs (`•`, `-`, `*`) and `<digits>.` at the start of a line.
static LIST_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:(•)\s*|([-*]|\d{1,3}\.)\s+)").expect("valid regex"));

/// A fragment the analyzer skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutWarning {
    /// Page the fragment came from
    pub page_index: usize,
    /// Text of the skipped fragment
    pub text: String,
    /// Why it was skipped
    pub reason: &'static str,
}

/// Layout analyzer for turning positioned fragments into structured blocks.
///
/// Pages are fed one at a time to [`analyze`](Self::analyze); once every page
/// has been seen, [`group_lines`](Self::group_lines) turns the accumulated
/// lines into blocks.
#[derive(Debug, Clone, Default)]
pub struct LayoutAnalyzer {
    options: LayoutOptions,
    warnings: Vec<LayoutWarning>,
}

impl LayoutAnalyzer {
    /// Create a new layout analyzer.
    pub fn new(options: LayoutOptions) -> Self {
        Self {
            options,
            warnings: Vec::new(),
        }
    }

    /// Options in use.
    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// Fragments skipped so far.
    pub fn warnings(&self) -> &[LayoutWarning] {
        &self.warnings
    }

    /// Group the fragments of one page into lines, top to bottom.
    ///
    /// Malformed fragments are skipped and recorded as warnings.
    pub fn analyze(&mut self, fragments: Vec<TextFragment>) -> Vec<Line> {
        let mut valid = Vec::with_capacity(fragments.len());
        for frag in fragments {
            match frag.defect() {
                Some(reason) => {
                    log::warn!(
                        "Skipping fragment {:?} on page {}: {}",
                        frag.text,
                        frag.page_index,
                        reason
                    );
                    self.warnings.push(LayoutWarning {
                        page_index: frag.page_index,
                        text: frag.text,
                        reason,
                    });
                }
                None => valid.push(frag),
            }
        }

        if valid.is_empty() {
            return vec![];
        }

        // Sort fragments top to bottom, then left to right
        valid.sort_by(|a, b| {
            a.baseline()
                .total_cmp(&b.baseline())
                .then(a.bbox.x0.total_cmp(&b.bbox.x0))
        });

        let mut clusters: Vec<Vec<TextFragment>> = Vec::new();
        for frag in valid {
            match clusters.last_mut() {
                Some(current) if current.iter().any(|m| self.same_line(m, &frag)) => {
                    current.push(frag)
                }
                _ => clusters.push(vec![frag]),
            }
        }

        let mut lines: Vec<Line> = clusters
            .into_iter()
            .flat_map(|cluster| self.split_wide_gaps(cluster))
            .filter_map(|frags| Line::from_fragments(frags, self.options.space_gap_ratio))
            .collect();

        lines.sort_by(|a, b| {
            a.baseline()
                .total_cmp(&b.baseline())
                .then(a.bbox.x0.total_cmp(&b.bbox.x0))
        });

        log::debug!("Page analyzed into {} lines", lines.len());
        lines
    }

    /// Group lines of the whole document, in page order, into blocks.
    ///
    /// Body text size and spacing thresholds are measured per page; heading
    /// levels rank heading sizes across the whole document.
    pub fn group_lines(&self, lines: Vec<Line>) -> Vec<Block> {
        if lines.is_empty() {
            return vec![];
        }

        let mut blocks = Vec::new();
        let mut page: Vec<Line> = Vec::new();
        for line in lines {
            if page
                .last()
                .is_some_and(|prev| prev.page_index() != line.page_index())
            {
                blocks.extend(self.group_page(std::mem::take(&mut page)));
            }
            page.push(line);
        }
        blocks.extend(self.group_page(page));

        self.assign_heading_levels(&mut blocks);
        blocks
    }

    /// Two fragments share a line when their boxes overlap vertically enough
    /// or their baselines nearly coincide.
    fn same_line(&self, a: &TextFragment, b: &TextFragment) -> bool {
        let min_height = a.bbox.height().min(b.bbox.height());
        let overlap = a.bbox.vertical_overlap(&b.bbox);
        if overlap > self.options.line_overlap_ratio * min_height {
            return true;
        }
        let max_size = a.font_size.max(b.font_size);
        (a.baseline() - b.baseline()).abs() < self.options.baseline_tolerance_ratio * max_size
    }

    /// Split a left-to-right sorted cluster wherever the horizontal gap is
    /// wider than the line split threshold.
    fn split_wide_gaps(&self, mut cluster: Vec<TextFragment>) -> Vec<Vec<TextFragment>> {
        cluster.sort_by(|a, b| a.bbox.x0.total_cmp(&b.bbox.x0));

        let mut parts: Vec<Vec<TextFragment>> = Vec::new();
        for frag in cluster {
            match parts.last_mut() {
                Some(part) => {
                    let right = part.iter().map(|f| f.bbox.x1).fold(f32::MIN, f32::max);
                    let gap = frag.bbox.x0 - right;
                    if gap > self.options.line_split_gap_ratio * frag.font_size {
                        parts.push(vec![frag]);
                    } else {
                        part.push(frag);
                    }
                }
                None => parts.push(vec![frag]),
            }
        }
        parts
    }

    /// Group the lines of a single page into blocks.
    fn group_page(&self, lines: Vec<Line>) -> Vec<Block> {
        let Some(first) = lines.first() else {
            return vec![];
        };

        let mut stats = FontStatistics::default();
        for line in &lines {
            stats.add_size(line.font_size, line.char_count());
        }
        let body_size = stats.body_size();
        log::debug!(
            "Page {} body font size: {:.1}pt",
            first.page_index(),
            body_size
        );

        let threshold = self.median_line_spacing(&lines, body_size) * self.options.block_spacing_ratio;
        let heading_size = body_size * (1.0 + self.options.heading_margin);

        let mut blocks = Vec::new();
        let mut current: Vec<Line> = Vec::new();
        let mut current_start: Option<LineKind> = None;

        for line in lines {
            let kind = self.classify(&line, heading_size);
            let should_break = match (current.last(), current_start.as_ref()) {
                (Some(prev), Some(start)) => {
                    self.should_break_block(prev, &line, start, &kind, threshold)
                }
                _ => false,
            };

            if should_break {
                if let Some(start) = current_start.take() {
                    blocks.push(Self::finish_block(std::mem::take(&mut current), start));
                }
            }

            if current_start.is_none() {
                current_start = Some(kind);
            }
            current.push(line);
        }

        if let Some(start) = current_start {
            blocks.push(Self::finish_block(current, start));
        }
        blocks
    }

    /// Median baseline distance between consecutive lines on a page.
    fn median_line_spacing(&self, lines: &[Line], body_size: f32) -> f32 {
        let mut spacings: Vec<f32> = lines
            .windows(2)
            .map(|w| w[1].baseline() - w[0].baseline())
            .filter(|s| *s > 0.1)
            .collect();

        if spacings.is_empty() {
            return body_size * DEFAULT_LINE_SPACING_FACTOR;
        }

        spacings.sort_by(|a, b| a.total_cmp(b));
        let mid = spacings.len() / 2;
        if spacings.len() % 2 == 0 {
            (spacings[mid - 1] + spacings[mid]) / 2.0
        } else {
            spacings[mid]
        }
    }

    fn classify(&self, line: &Line, heading_size: f32) -> LineKind {
        // Tolerate float rounding at the boundary
        if line.font_size >= heading_size - 0.01 {
            return LineKind::Heading;
        }
        if self.options.detect_lists {
            if let Some((marker, len)) = list_marker(&line.text()) {
                return LineKind::ListStart { marker, len };
            }
        }
        LineKind::Body
    }

    /// Determine if a new block should start at `curr`.
    fn should_break_block(
        &self,
        prev: &Line,
        curr: &Line,
        block_start: &LineKind,
        curr_kind: &LineKind,
        threshold: f32,
    ) -> bool {
        let prev_heading = *block_start == LineKind::Heading;
        let curr_heading = *curr_kind == LineKind::Heading;

        // Headings stand alone: only a same-size heading line continues one
        if prev_heading != curr_heading {
            return true;
        }

        if matches!(curr_kind, LineKind::ListStart { .. }) {
            return true;
        }

        let spacing = curr.baseline() - prev.baseline();
        if spacing > threshold {
            return true;
        }

        (prev.font_size - curr.font_size).abs() > self.options.font_size_tolerance
    }

    fn finish_block(lines: Vec<Line>, start: LineKind) -> Block {
        match start {
            // Level is provisional until every page has been seen
            LineKind::Heading => Block::new(lines, BlockRole::heading(1)),
            LineKind::ListStart { marker, len } => Block::list_item(lines, marker, len),
            LineKind::Body => Block::new(lines, BlockRole::Paragraph),
        }
    }

    fn assign_heading_levels(&self, blocks: &mut [Block]) {
        let sizes: Vec<f32> = blocks
            .iter()
            .filter(|b| b.role.is_heading())
            .map(block_font_size)
            .collect();
        if sizes.is_empty() {
            return;
        }

        let ranks = HeadingRanks::from_sizes(sizes, self.options.font_size_tolerance);
        for block in blocks.iter_mut().filter(|b| b.role.is_heading()) {
            let level = ranks.level(block_font_size(block));
            block.role = BlockRole::heading(level);
        }
    }
}

/// How a line starts a block.
#[derive(Debug, Clone, PartialEq, Eq)]
enum LineKind {
    Heading,
    ListStart { marker: String, len: usize },
    Body,
}

/// Detect a list marker at the start of `text`, returning the marker and the
/// byte length of the prefix to strip. A marker with nothing after it is not
/// a list item.
fn list_marker(text: &str) -> Option<(String, usize)> {
    let caps = LIST_MARKER.captures(text)?;
    let whole = caps.get(0)?;
    if whole.end() >= text.len() {
        return None;
    }
    let marker = caps.get(1).or_else(|| caps.get(2))?;
    Some((marker.as_str().to_string(), whole.end()))
}

fn block_font_size(block: &Block) -> f32 {
    block
        .lines
        .iter()
        .map(|l| l.font_size)
        .fold(0.0, f32::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BBox;

    fn frag(text: &str, page: usize, x0: f32, baseline: f32, size: f32) -> TextFragment {
        let width = text.chars().count() as f32 * size * 0.5;
        TextFragment::new(text, page, BBox::new(x0, baseline - size, x0 + width, baseline), size)
    }

    fn body_lines(page: usize, start: f32, texts: &[&str]) -> Vec<TextFragment> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| frag(t, page, 72.0, start + i as f32 * 14.0, 12.0))
            .collect()
    }

    #[test]
    fn test_list_marker_detection() {
        let (m, len) = list_marker("- item").unwrap();
        assert_eq!(m, "-");
        assert_eq!(len, 2);

        let (m, len) = list_marker("12. twelfth").unwrap();
        assert_eq!(m, "12.");
        assert_eq!(len, 4);

        let (m, len) = list_marker("•bullet").unwrap();
        assert_eq!(m, "•");
        assert_eq!(len, "•".len());

        assert!(list_marker("-dash").is_none());
        assert!(list_marker("1.5 million").is_none());
        assert!(list_marker("- ").is_none());
        assert!(list_marker("plain text").is_none());
    }

    #[test]
    fn test_fragments_on_same_baseline_form_one_line() {
        let mut analyzer = LayoutAnalyzer::default();
        let lines = analyzer.analyze(vec![
            frag("world", 0, 120.0, 100.0, 12.0),
            frag("Hello", 0, 72.0, 100.5, 12.0),
            frag("Next", 0, 72.0, 114.0, 12.0),
        ]);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text(), "Hello world");
        assert_eq!(lines[1].text(), "Next");
    }

    #[test]
    fn test_wide_gap_splits_line() {
        let mut analyzer = LayoutAnalyzer::default();
        // "Left" ends at 96; gap of 100 > 3 * 12
        let lines = analyzer.analyze(vec![
            frag("Left", 0, 72.0, 100.0, 12.0),
            frag("Right", 0, 196.0, 100.0, 12.0),
        ]);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text(), "Left");
        assert_eq!(lines[1].text(), "Right");
    }

    #[test]
    fn test_split_threshold_boundary() {
        let options = LayoutOptions::new().with_line_split_gap_ratio(3.0);
        let mut analyzer = LayoutAnalyzer::new(options);
        // gap exactly 36 = 3 * 12 stays joined
        let lines = analyzer.analyze(vec![
            frag("Left", 0, 72.0, 100.0, 12.0),
            frag("Right", 0, 132.0, 100.0, 12.0),
        ]);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text(), "Left Right");
    }

    #[test]
    fn test_malformed_fragment_skipped() {
        let mut analyzer = LayoutAnalyzer::default();
        let mut bad = frag("bad", 0, 72.0, 86.0, 12.0);
        bad.bbox.x1 = bad.bbox.x0;
        let mut frags = body_lines(0, 100.0, &["First line", "Second line"]);
        frags.push(bad);

        let lines = analyzer.analyze(frags);
        assert_eq!(lines.len(), 2);
        assert_eq!(analyzer.warnings().len(), 1);
        assert_eq!(analyzer.warnings()[0].text, "bad");

        let blocks = analyzer.group_lines(lines);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].text(), "First line Second line");
    }

    #[test]
    fn test_empty_page_yields_nothing() {
        let mut analyzer = LayoutAnalyzer::default();
        assert!(analyzer.analyze(vec![]).is_empty());
        assert!(analyzer.group_lines(vec![]).is_empty());
    }

    #[test]
    fn test_lone_large_line_is_level_one_heading() {
        let mut analyzer = LayoutAnalyzer::default();
        let mut frags = vec![frag("Introduction", 0, 72.0, 60.0, 24.0)];
        frags.extend(body_lines(0, 100.0, &["Body one", "Body two", "Body three"]));

        let lines = analyzer.analyze(frags);
        let blocks = analyzer.group_lines(lines);

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].role, BlockRole::Heading { level: 1 });
        assert_eq!(blocks[0].text(), "Introduction");
        assert_eq!(blocks[1].role, BlockRole::Paragraph);
    }

    #[test]
    fn test_heading_levels_rank_across_pages() {
        let mut analyzer = LayoutAnalyzer::default();
        let mut lines = Vec::new();

        let mut page0 = vec![frag("Chapter", 0, 72.0, 60.0, 24.0)];
        page0.extend(body_lines(0, 100.0, &["aaaa bbbb cccc", "dddd eeee ffff"]));
        lines.extend(analyzer.analyze(page0));

        let mut page1 = vec![frag("Section", 1, 72.0, 60.0, 18.0)];
        page1.extend(body_lines(1, 100.0, &["gggg hhhh iiii", "jjjj kkkk llll"]));
        page1.push(frag("Minor", 1, 72.0, 160.0, 15.0));
        page1.extend(body_lines(1, 200.0, &["mmmm nnnn oooo"]));
        page1.push(frag("Tiny", 1, 72.0, 240.0, 14.5));
        lines.extend(analyzer.analyze(page1));

        let blocks = analyzer.group_lines(lines);
        let headings: Vec<_> = blocks
            .iter()
            .filter_map(|b| match b.role {
                BlockRole::Heading { level } => Some((b.text(), level)),
                _ => None,
            })
            .collect();
        assert_eq!(
            headings,
            vec![
                ("Chapter".to_string(), 1),
                ("Section".to_string(), 2),
                ("Minor".to_string(), 3),
                ("Tiny".to_string(), 3),
            ]
        );
    }

    #[test]
    fn test_heading_margin_boundary() {
        // 14.0 < 12 * 1.2 stays body text; 14.4 is a heading
        let mut analyzer = LayoutAnalyzer::default();
        let mut frags = body_lines(0, 100.0, &["body text here", "more body text"]);
        frags.push(frag("Almost", 0, 72.0, 200.0, 14.0));
        frags.extend(body_lines(0, 240.0, &["body again here"]));
        frags.push(frag("Heading", 0, 72.0, 300.0, 14.4));
        frags.extend(body_lines(0, 340.0, &["final body text"]));

        let lines = analyzer.analyze(frags);
        let blocks = analyzer.group_lines(lines);
        let almost = blocks.iter().find(|b| b.text() == "Almost").unwrap();
        let heading = blocks.iter().find(|b| b.text() == "Heading").unwrap();
        assert_eq!(almost.role, BlockRole::Paragraph);
        assert!(heading.role.is_heading());
    }

    #[test]
    fn test_three_dash_lines_are_list_items() {
        let mut analyzer = LayoutAnalyzer::default();
        let frags = body_lines(0, 100.0, &["- apples", "- pears", "- plums"]);
        let lines = analyzer.analyze(frags);
        let blocks = analyzer.group_lines(lines);

        assert_eq!(blocks.len(), 3);
        for (block, text) in blocks.iter().zip(["apples", "pears", "plums"]) {
            assert_eq!(block.role, BlockRole::list_item("-"));
            assert_eq!(block.text(), text);
        }
    }

    #[test]
    fn test_list_detection_can_be_disabled() {
        let mut analyzer = LayoutAnalyzer::new(LayoutOptions::new().with_lists(false));
        let lines = analyzer.analyze(body_lines(0, 100.0, &["- apples", "- pears"]));
        let blocks = analyzer.group_lines(lines);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].role, BlockRole::Paragraph);
    }

    #[test]
    fn test_spacing_breaks_paragraphs() {
        let mut analyzer = LayoutAnalyzer::default();
        let mut frags = body_lines(0, 100.0, &["one", "two", "three"]);
        frags.extend(body_lines(0, 160.0, &["four", "five"]));
        let lines = analyzer.analyze(frags);
        let blocks = analyzer.group_lines(lines);

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].text(), "one two three");
        assert_eq!(blocks[1].text(), "four five");
    }

    #[test]
    fn test_new_page_forces_new_block() {
        let mut analyzer = LayoutAnalyzer::default();
        let mut lines = analyzer.analyze(body_lines(0, 700.0, &["end of page"]));
        lines.extend(analyzer.analyze(body_lines(1, 714.0, &["start of next"])));
        let blocks = analyzer.group_lines(lines);

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].page_index, 0);
        assert_eq!(blocks[1].page_index, 1);
    }
}
