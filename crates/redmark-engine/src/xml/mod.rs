//! WordprocessingML main-document-part round-trip.
//!
//! The reader builds a [`crate::dom::Document`] from `document.xml`; the
//! writer serializes the (possibly redlined) tree back out. Headers and
//! footers live in separate package parts in a real DOCX package and are the
//! package layer's concern; the dom still models them so a fuller loader can
//! populate sections.

pub mod reader;
pub mod writer;

pub use reader::parse_document;
pub use writer::{write_document, write_header_footer};

use thiserror::Error;

/// Errors from reading the WordprocessingML document part.
#[derive(Debug, Error)]
pub enum XmlError {
    #[error("XML parse error: {0}")]
    Parse(String),
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("invalid document: {0}")]
    InvalidDocument(String),
}
