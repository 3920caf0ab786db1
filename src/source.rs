//! Fragment sources: forward-only providers of positioned text, page by page.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::TextFragment;

/// The fragments of one source page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourcePage {
    /// Zero-based page index
    pub page_index: usize,
    /// Fragments in extraction order
    pub fragments: Vec<TextFragment>,
}

impl SourcePage {
    /// Create a page, stamping `page_index` onto every fragment.
    pub fn new(page_index: usize, mut fragments: Vec<TextFragment>) -> Self {
        for fragment in &mut fragments {
            fragment.page_index = page_index;
        }
        Self {
            page_index,
            fragments,
        }
    }
}

/// Forward-only provider of pages.
///
/// Each call returns the next page, `Ok(None)` once exhausted, or an error
/// when the underlying data cannot be decoded.
pub trait FragmentSource {
    /// Pull the next page.
    fn next_page(&mut self) -> Result<Option<SourcePage>>;
}

impl<S: FragmentSource + ?Sized> FragmentSource for Box<S> {
    fn next_page(&mut self) -> Result<Option<SourcePage>> {
        (**self).next_page()
    }
}

/// In-memory source over pre-built pages.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    pages: VecDeque<SourcePage>,
}

impl MemorySource {
    /// Create a source from pages.
    pub fn new(pages: Vec<SourcePage>) -> Self {
        Self {
            pages: pages.into(),
        }
    }

    /// Create a source from a flat fragment list, grouped by `page_index`.
    pub fn from_fragments(fragments: Vec<TextFragment>) -> Self {
        let mut pages: Vec<SourcePage> = Vec::new();
        for fragment in fragments {
            match pages.iter_mut().find(|p| p.page_index == fragment.page_index) {
                Some(page) => page.fragments.push(fragment),
                None => pages.push(SourcePage {
                    page_index: fragment.page_index,
                    fragments: vec![fragment],
                }),
            }
        }
        pages.sort_by_key(|p| p.page_index);
        Self::new(pages)
    }

    /// Number of pages not yet pulled.
    pub fn remaining(&self) -> usize {
        self.pages.len()
    }
}

impl FragmentSource for MemorySource {
    fn next_page(&mut self) -> Result<Option<SourcePage>> {
        Ok(self.pages.pop_front())
    }
}

/// Wire form of one JSON-lines record.
#[derive(Deserialize)]
struct PageRecord {
    #[serde(default)]
    page_index: Option<usize>,
    #[serde(default)]
    fragments: Vec<TextFragment>,
}

/// Source reading one JSON page object per line.
///
/// ```text
/// {"page_index":0,"fragments":[{"text":"Title","bbox":{"x0":72,"y0":60,"x1":200,"y1":84},"font_size":24}]}
/// ```
///
/// `page_index` may be omitted, in which case pages are numbered in the
/// order they appear. Explicit indices must increase from line to line.
/// Blank lines are ignored.
#[derive(Debug)]
pub struct JsonLinesSource<R> {
    reader: R,
    line_no: usize,
    next_index: usize,
    buf: String,
}

impl JsonLinesSource<BufReader<File>> {
    /// Open a JSON-lines file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| Error::Decode(format!("{}: {}", path.display(), e)))?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> JsonLinesSource<R> {
    /// Wrap a buffered reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_no: 0,
            next_index: 0,
            buf: String::new(),
        }
    }
}

impl<R: BufRead> FragmentSource for JsonLinesSource<R> {
    fn next_page(&mut self) -> Result<Option<SourcePage>> {
        loop {
            self.buf.clear();
            let read = self
                .reader
                .read_line(&mut self.buf)
                .map_err(|e| Error::Decode(format!("line {}: {}", self.line_no + 1, e)))?;
            if read == 0 {
                return Ok(None);
            }
            self.line_no += 1;

            let line = self.buf.trim();
            if line.is_empty() {
                continue;
            }

            let record: PageRecord = serde_json::from_str(line)
                .map_err(|e| Error::Decode(format!("line {}: {}", self.line_no, e)))?;
            let page_index = record.page_index.unwrap_or(self.next_index);
            if page_index < self.next_index {
                return Err(Error::Decode(format!(
                    "line {}: page index {} does not follow page {}",
                    self.line_no,
                    page_index,
                    self.next_index - 1
                )));
            }
            self.next_index = page_index + 1;

            return Ok(Some(SourcePage::new(page_index, record.fragments)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BBox;
    use std::io::Cursor;

    #[test]
    fn test_memory_source_groups_pages() {
        let frag = |text: &str, page| TextFragment::new(text, page, BBox::new(0.0, 0.0, 10.0, 10.0), 10.0);
        let mut source = MemorySource::from_fragments(vec![frag("b", 1), frag("a", 0), frag("c", 1)]);

        assert_eq!(source.remaining(), 2);
        let first = source.next_page().unwrap().unwrap();
        assert_eq!(first.page_index, 0);
        let second = source.next_page().unwrap().unwrap();
        assert_eq!(second.fragments.len(), 2);
        assert!(source.next_page().unwrap().is_none());
    }

    #[test]
    fn test_json_lines_source() {
        let data = concat!(
            r#"{"page_index":0,"fragments":[{"text":"Hi","bbox":{"x0":0,"y0":0,"x1":10,"y1":12},"font_size":12,"is_bold":true}]}"#,
            "\n\n",
            r#"{"fragments":[]}"#,
            "\n",
        );
        let mut source = JsonLinesSource::new(Cursor::new(data));

        let page = source.next_page().unwrap().unwrap();
        assert_eq!(page.page_index, 0);
        assert_eq!(page.fragments[0].text, "Hi");
        assert!(page.fragments[0].is_bold);

        let page = source.next_page().unwrap().unwrap();
        assert_eq!(page.page_index, 1);
        assert!(page.fragments.is_empty());

        assert!(source.next_page().unwrap().is_none());
    }

    #[test]
    fn test_json_lines_decode_error() {
        let mut source = JsonLinesSource::new(Cursor::new("{\"page_index\":0}\nnot json\n"));
        assert!(source.next_page().unwrap().is_some());
        let err = source.next_page().unwrap_err();
        assert!(matches!(err, Error::Decode(ref msg) if msg.starts_with("line 2")));
    }

    #[test]
    fn test_json_lines_rejects_repeated_page_index() {
        let data = "{\"page_index\":0}\n{\"page_index\":0}\n";
        let mut source = JsonLinesSource::new(Cursor::new(data));
        assert!(source.next_page().unwrap().is_some());

        let err = source.next_page().unwrap_err();
        assert!(matches!(err, Error::Decode(ref msg) if msg.starts_with("line 2: page index 0")));
    }

    #[test]
    fn test_json_lines_allows_skipped_pages() {
        let data = "{\"page_index\":0}\n{\"page_index\":3}\n{}\n";
        let mut source = JsonLinesSource::new(Cursor::new(data));
        let indices: Vec<_> = std::iter::from_fn(|| source.next_page().unwrap())
            .map(|p| p.page_index)
            .collect();
        assert_eq!(indices, vec![0, 3, 4]);
    }

    #[test]
    fn test_open_missing_file_is_decode_error() {
        let err = JsonLinesSource::open("/nonexistent/pages.jsonl").unwrap_err();
        assert!(matches!(err, Error::Decode(ref msg) if msg.contains("pages.jsonl")));
    }

    #[test]
    fn test_page_index_stamped_on_fragments() {
        let page = SourcePage::new(4, vec![TextFragment::new("x", 0, BBox::new(0.0, 0.0, 1.0, 1.0), 1.0)]);
        assert_eq!(page.fragments[0].page_index, 4);
    }
}
