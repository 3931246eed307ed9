//! # redmark-engine
//!
//! Turns a pair of plain-text document revisions into Word track-changes
//! markup (`w:ins`/`w:del`) injected into an existing WordprocessingML
//! document, so a reviewer can accept or reject each edit individually.
//!
//! ## Pipeline
//!
//! - **`diff`**: two-tier alignment (lines, then words inside replaced line
//!   ranges) reducing the text pair to ordered [`Change`] pairs
//! - **`redline`**: locates each change's old text across the document's
//!   search scopes and rewrites the owning paragraph with tracked
//!   insertion/deletion nodes
//! - **`dom`**: the mutable paragraph/run tree the applier edits in place
//! - **`xml`**: reads and writes the WordprocessingML main document part
//!
//! ## Example
//!
//! ```rust
//! use redmark_engine::{Block, Document, Paragraph, generate_redlines};
//!
//! let mut document = Document::new();
//! document.blocks.push(Block::Paragraph(Paragraph::from_runs(&[
//!     "Payment of $500 is due.",
//! ])));
//!
//! let report = generate_redlines(
//!     &mut document,
//!     "Payment of $500 is due.",
//!     "Payment of $750 is due.",
//!     "Legal Review",
//! );
//! assert_eq!(report.applied, 1);
//! ```

pub mod diff;
pub mod dom;
pub mod io;
pub mod redline;
pub mod xml;

// Re-export key types for easier usage
pub use diff::{Change, diff_texts};
pub use dom::{Block, Cell, Document, HeaderFooter, Node, Paragraph, Revision, Row, Run, Section, Table};
pub use redline::{
    ApplicationReport, ChangeOutcome, ChangeReport, RedlineApplier, RevisionIdAllocator,
};
pub use xml::{XmlError, parse_document, write_document};

/// One-call surface: diff the two texts and redline `document` in place.
///
/// Every markup node produced by one call shares the author and a single
/// UTC timestamp; revision ids are unique within the call.
pub fn generate_redlines(
    document: &mut Document,
    original: &str,
    modified: &str,
    author: &str,
) -> ApplicationReport {
    let changes = diff_texts(original, modified);
    let mut applier = RedlineApplier::new(author);
    applier.apply_all(document, &changes)
}
