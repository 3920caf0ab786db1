//! Integration tests for layout analysis and document assembly.

use pdfweave::convert::reconstruct;
use pdfweave::{
    BBox, BlockRole, ConvertOptions, LayoutAnalyzer, LayoutOptions, MemorySource, SourcePage,
    TextFragment,
};

/// Fragment whose width follows its character count.
fn frag(text: &str, page: usize, x0: f32, y1: f32, size: f32) -> TextFragment {
    let width = text.chars().count() as f32 * size * 0.5;
    TextFragment::new(text, page, BBox::new(x0, y1 - size, x0 + width, y1), size)
}

fn doc_from(pages: Vec<Vec<TextFragment>>) -> pdfweave::LogicalDocument {
    let pages = pages
        .into_iter()
        .enumerate()
        .map(|(i, frags)| SourcePage::new(i, frags))
        .collect();
    reconstruct(&mut MemorySource::new(pages), &ConvertOptions::default()).unwrap()
}

#[test]
fn test_empty_source() {
    let doc = doc_from(vec![]);
    assert!(doc.is_empty());
    assert_eq!(doc.page_count, 0);
}

#[test]
fn test_empty_pages_count_but_yield_nothing() {
    let doc = doc_from(vec![vec![], vec![]]);
    assert!(doc.is_empty());
    assert_eq!(doc.page_count, 2);
}

#[test]
fn test_lone_large_line_is_top_heading() {
    let doc = doc_from(vec![vec![
        frag("Annual Report", 0, 72.0, 60.0, 24.0),
        frag("Revenue grew steadily across every region this year.", 0, 72.0, 100.0, 12.0),
        frag("Costs were held flat while headcount rose slightly.", 0, 72.0, 114.0, 12.0),
    ]]);

    assert_eq!(doc.blocks[0].role, BlockRole::Heading { level: 1 });
    assert_eq!(doc.blocks[0].text(), "Annual Report");
    assert_eq!(doc.blocks[1].role, BlockRole::Paragraph);
}

#[test]
fn test_three_dash_lines_are_list_items() {
    let doc = doc_from(vec![vec![
        frag("- apples", 0, 72.0, 100.0, 12.0),
        frag("- pears", 0, 72.0, 114.0, 12.0),
        frag("- plums", 0, 72.0, 128.0, 12.0),
    ]]);

    assert_eq!(doc.len(), 3);
    for block in &doc {
        assert_eq!(block.role, BlockRole::list_item("-"));
    }
    let texts: Vec<_> = doc.iter().map(|b| b.text()).collect();
    assert_eq!(texts, vec!["apples", "pears", "plums"]);
}

#[test]
fn test_numbered_and_bullet_markers() {
    let doc = doc_from(vec![vec![
        frag("1. first step", 0, 72.0, 100.0, 12.0),
        frag("2. second step", 0, 72.0, 114.0, 12.0),
        frag("• loose note", 0, 72.0, 128.0, 12.0),
    ]]);

    let roles: Vec<_> = doc.iter().map(|b| b.role.clone()).collect();
    assert_eq!(
        roles,
        vec![
            BlockRole::list_item("1."),
            BlockRole::list_item("2."),
            BlockRole::list_item("•"),
        ]
    );
}

#[test]
fn test_degenerate_fragment_is_skipped() {
    let mut analyzer = LayoutAnalyzer::new(LayoutOptions::default());
    let lines = analyzer.analyze(vec![
        frag("kept", 0, 72.0, 100.0, 12.0),
        TextFragment::new("zero width", 0, BBox::new(90.0, 88.0, 90.0, 100.0), 12.0),
        frag("also kept", 0, 72.0, 130.0, 12.0),
    ]);

    assert_eq!(lines.len(), 2);
    assert_eq!(analyzer.warnings().len(), 1);
    assert_eq!(analyzer.warnings()[0].text, "zero width");
}

#[test]
fn test_fragments_on_one_baseline_join_in_x_order() {
    let doc = doc_from(vec![vec![
        frag("world", 0, 110.0, 100.0, 12.0),
        frag("Hello", 0, 72.0, 100.0, 12.0),
    ]]);

    assert_eq!(doc.len(), 1);
    assert_eq!(doc.blocks[0].text(), "Hello world");
}

#[test]
fn test_paragraphs_split_on_spacing() {
    let doc = doc_from(vec![vec![
        frag("The first paragraph opens here", 0, 72.0, 100.0, 12.0),
        frag("and continues on this line", 0, 72.0, 114.0, 12.0),
        frag("and ends on a third line.", 0, 72.0, 128.0, 12.0),
        frag("A second paragraph after a gap.", 0, 72.0, 170.0, 12.0),
        frag("It also spans two lines of text.", 0, 72.0, 184.0, 12.0),
    ]]);

    assert_eq!(doc.len(), 2);
    assert_eq!(
        doc.blocks[0].text(),
        "The first paragraph opens here and continues on this line and ends on a third line."
    );
    assert_eq!(doc.blocks[0].lines.len(), 3);
    assert_eq!(doc.blocks[1].lines.len(), 2);
}

#[test]
fn test_reading_order_across_pages() {
    let doc = doc_from(vec![
        vec![
            frag("Chapter One", 0, 72.0, 60.0, 24.0),
            frag("Opening text that is long enough to stand alone.", 0, 72.0, 100.0, 12.0),
        ],
        vec![
            frag("Section", 1, 72.0, 60.0, 18.0),
            frag("Closing text that is long enough to stand alone.", 1, 72.0, 100.0, 12.0),
        ],
    ]);

    let roles: Vec<_> = doc.iter().map(|b| b.role.clone()).collect();
    assert_eq!(
        roles,
        vec![
            BlockRole::heading(1),
            BlockRole::Paragraph,
            BlockRole::heading(2),
            BlockRole::Paragraph,
        ]
    );
    let pages: Vec<_> = doc.iter().map(|b| b.page_index).collect();
    assert_eq!(pages, vec![0, 0, 1, 1]);
    let indices: Vec<_> = doc.iter().map(|b| b.index).collect();
    assert_eq!(indices, vec![0, 1, 2, 3]);
    assert_eq!(doc.page_count, 2);
}

#[test]
fn test_short_paragraphs_merge() {
    let doc = doc_from(vec![vec![
        frag("A paragraph long enough to stand alone", 0, 72.0, 100.0, 12.0),
        frag("which carries on over a second line", 0, 72.0, 114.0, 12.0),
        frag("and then a third one before the gap.", 0, 72.0, 128.0, 12.0),
        frag("Short.", 0, 72.0, 178.0, 12.0),
        frag("Tiny.", 0, 72.0, 228.0, 12.0),
        frag("Another paragraph long enough to stand", 0, 72.0, 278.0, 12.0),
        frag("alone, closing out the page.", 0, 72.0, 292.0, 12.0),
    ]]);

    let texts: Vec<_> = doc.iter().map(|b| b.text()).collect();
    assert_eq!(texts.len(), 3);
    assert_eq!(texts[1], "Short. Tiny.");
    assert_eq!(doc.blocks[1].index, 1);
    assert_eq!(doc.blocks[2].index, 2);
}
