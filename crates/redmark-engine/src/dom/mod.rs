//! In-memory WordprocessingML document model.
//!
//! The model is deliberately small: ordered body blocks (paragraphs and
//! tables), sections with their optional header/footer slots, and paragraphs
//! holding an ordered, mutable run list. The redline applier edits this tree
//! in place; the `xml` module reads and writes the main document part.

mod node;

pub use node::{Node, Revision, Run};

/// A paragraph: an ordered, in-place-mutable sequence of run-level nodes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Paragraph {
    pub nodes: Vec<Node>,
}

impl Paragraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a paragraph of plain runs, one per slice entry.
    pub fn from_runs<S: AsRef<str>>(texts: &[S]) -> Self {
        Self {
            nodes: texts.iter().map(|text| Node::run(text.as_ref())).collect(),
        }
    }

    /// Visible runs with their node indices, in paragraph order.
    pub fn runs(&self) -> impl Iterator<Item = (usize, &Run)> {
        self.nodes.iter().enumerate().filter_map(|(index, node)| match node {
            Node::Run(run) => Some((index, run)),
            _ => None,
        })
    }

    /// Concatenated visible text of the paragraph.
    pub fn text(&self) -> String {
        self.nodes.iter().filter_map(Node::visible_text).collect()
    }

    /// Remove the nodes at `indices` (ascending, in-bounds) and insert
    /// `replacement` at the position of the first removed node.
    ///
    /// This is the run-list editing capability the markup builder relies on:
    /// nodes between two removed indices are kept and end up after the
    /// replacement sequence.
    pub fn replace_nodes(&mut self, indices: &[usize], replacement: Vec<Node>) {
        let Some(&first) = indices.first() else {
            return;
        };
        for &index in indices.iter().rev() {
            if index < self.nodes.len() {
                self.nodes.remove(index);
            }
        }
        let at = first.min(self.nodes.len());
        self.nodes.splice(at..at, replacement);
    }
}

/// One cell of a table row, holding its own paragraph sequence.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cell {
    pub paragraphs: Vec<Paragraph>,
}

/// One row of a table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
    pub cells: Vec<Cell>,
}

/// A table: ordered rows of ordered cells.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    pub rows: Vec<Row>,
}

/// Paragraph container for a header or footer part.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HeaderFooter {
    pub paragraphs: Vec<Paragraph>,
}

/// A document section exposing up to three header and three footer slots.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Section {
    pub default_header: Option<HeaderFooter>,
    pub first_page_header: Option<HeaderFooter>,
    pub even_page_header: Option<HeaderFooter>,
    pub default_footer: Option<HeaderFooter>,
    pub first_page_footer: Option<HeaderFooter>,
    pub even_page_footer: Option<HeaderFooter>,
}

impl Section {
    /// Present headers in search order: default, first-page, even-page.
    pub fn headers_mut(&mut self) -> impl Iterator<Item = &mut HeaderFooter> {
        [
            self.default_header.as_mut(),
            self.first_page_header.as_mut(),
            self.even_page_header.as_mut(),
        ]
        .into_iter()
        .flatten()
    }

    /// Present footers in the same sub-order as headers.
    pub fn footers_mut(&mut self) -> impl Iterator<Item = &mut HeaderFooter> {
        [
            self.default_footer.as_mut(),
            self.first_page_footer.as_mut(),
            self.even_page_footer.as_mut(),
        ]
        .into_iter()
        .flatten()
    }
}

/// A top-level body block, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Paragraph(Paragraph),
    Table(Table),
}

/// Mutable document tree the redline applier edits in place.
///
/// The tree is single-owner for the duration of an apply run: edits are
/// destructive and non-atomic, so callers must not persist it until
/// `apply_all` has returned.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    pub blocks: Vec<Block>,
    pub sections: Vec<Section>,
    pub last_modified_by: Option<String>,
    track_changes: bool,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Turn on the document-level track-changes setting. Idempotent.
    pub fn enable_track_changes(&mut self) {
        self.track_changes = true;
    }

    pub fn track_changes_enabled(&self) -> bool {
        self.track_changes
    }

    /// Top-level body paragraphs in document order, excluding table content.
    pub fn paragraphs_mut(&mut self) -> impl Iterator<Item = &mut Paragraph> {
        self.blocks.iter_mut().filter_map(|block| match block {
            Block::Paragraph(paragraph) => Some(paragraph),
            Block::Table(_) => None,
        })
    }

    /// Body tables in document order.
    pub fn tables_mut(&mut self) -> impl Iterator<Item = &mut Table> {
        self.blocks.iter_mut().filter_map(|block| match block {
            Block::Table(table) => Some(table),
            Block::Paragraph(_) => None,
        })
    }
}
