//! Document model types.
//!
//! Fragments come from the external decoder; lines and blocks are derived by
//! the layout analyzer; the logical document is the builder's output and the
//! single input of every serializer.

mod block;
mod document;
mod fragment;
mod line;
mod run;

pub use block::{Block, BlockRole, ListKind, MAX_HEADING_LEVEL};
pub use document::LogicalDocument;
pub use fragment::{BBox, TextFragment};
pub use line::Line;
pub use run::{TextRun, TextStyle};
