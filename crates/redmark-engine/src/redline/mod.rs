//! Redline application: locate each change's anchor in the document and
//! rewrite the owning paragraph with tracked-change markup.

pub mod locate;
pub mod markup;

pub use locate::{MatchSpan, RunMatch, RunSpan, locate_in_paragraph};
pub use markup::{RevisionIdAllocator, replacement_nodes};

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::diff::Change;
use crate::dom::{Document, Paragraph};

/// Per-change application outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ChangeOutcome {
    /// The anchor was found and the paragraph rewritten.
    Applied,
    /// The old text occurs nowhere in the searched scopes.
    NotFound,
    /// The change was never searched for.
    Skipped { reason: String },
}

/// One change paired with what happened to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeReport {
    pub change: Change,
    pub outcome: ChangeOutcome,
}

/// Summary of one `apply_all` run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct ApplicationReport {
    pub total_changes: usize,
    pub applied: usize,
    pub changes: Vec<ChangeReport>,
}

impl ApplicationReport {
    pub fn not_found(&self) -> usize {
        self.changes
            .iter()
            .filter(|entry| entry.outcome == ChangeOutcome::NotFound)
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.changes
            .iter()
            .filter(|entry| matches!(entry.outcome, ChangeOutcome::Skipped { .. }))
            .count()
    }

    /// True when the diff produced nothing, meaning the caller should copy
    /// the original document through unchanged.
    pub fn is_empty(&self) -> bool {
        self.total_changes == 0
    }
}

/// Applies a change list to a document tree, producing tracked-change markup.
///
/// One applier represents one logical revision event: every node it creates
/// shares the same author and timestamp, while revision ids increase
/// strictly in emission order. The applier owns its id allocator, so
/// concurrent redline runs never contend over shared state.
#[derive(Debug, Clone)]
pub struct RedlineApplier {
    author: String,
    date: String,
    ids: RevisionIdAllocator,
}

impl RedlineApplier {
    /// Applier stamped with the current UTC time at second precision.
    pub fn new(author: impl Into<String>) -> Self {
        Self::with_timestamp(author, Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true))
    }

    /// Applier with a caller-chosen timestamp.
    pub fn with_timestamp(author: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            date: date.into(),
            ids: RevisionIdAllocator::new(),
        }
    }

    /// Apply every change, mutating `document` in place.
    ///
    /// Never fails: anchors that cannot be located and insertions without an
    /// anchor are recorded per change and leave the tree untouched. An empty
    /// change list leaves the document entirely unmodified.
    pub fn apply_all(&mut self, document: &mut Document, changes: &[Change]) -> ApplicationReport {
        let mut report = ApplicationReport {
            total_changes: changes.len(),
            ..ApplicationReport::default()
        };
        if changes.is_empty() {
            return report;
        }

        for change in changes {
            let outcome = if change.old.is_empty() {
                log::warn!("skipped insertion with no anchor: '{}'", change.new_preview());
                ChangeOutcome::Skipped {
                    reason: "no anchor text to locate".to_string(),
                }
            } else if self.apply_change(document, change) {
                log::debug!("applied: '{}' -> '{}'", change.old_preview(), change.new_preview());
                report.applied += 1;
                ChangeOutcome::Applied
            } else {
                log::warn!("could not find '{}' in document", change.old_preview());
                ChangeOutcome::NotFound
            };
            report.changes.push(ChangeReport {
                change: change.clone(),
                outcome,
            });
        }

        document.last_modified_by = Some(self.author.clone());
        report
    }

    /// Search scopes in fixed priority order and rewrite the first paragraph
    /// containing the change's old text. First match wins: the same phrase
    /// occurring later in the document is left alone.
    fn apply_change(&mut self, document: &mut Document, change: &Change) -> bool {
        for paragraph in document.paragraphs_mut() {
            if self.try_paragraph(paragraph, change) {
                return true;
            }
        }
        for table in document.tables_mut() {
            for row in &mut table.rows {
                for cell in &mut row.cells {
                    for paragraph in &mut cell.paragraphs {
                        if self.try_paragraph(paragraph, change) {
                            return true;
                        }
                    }
                }
            }
        }
        for section in &mut document.sections {
            for header in section.headers_mut() {
                for paragraph in &mut header.paragraphs {
                    if self.try_paragraph(paragraph, change) {
                        return true;
                    }
                }
            }
        }
        for section in &mut document.sections {
            for footer in section.footers_mut() {
                for paragraph in &mut footer.paragraphs {
                    if self.try_paragraph(paragraph, change) {
                        return true;
                    }
                }
            }
        }
        false
    }

    fn try_paragraph(&mut self, paragraph: &mut Paragraph, change: &Change) -> bool {
        let Some(span) = locate_in_paragraph(paragraph, &change.old) else {
            return false;
        };
        let indices: Vec<usize> = span.iter().map(|run| run.node_index).collect();
        let nodes = replacement_nodes(
            &span,
            &change.old,
            &change.new,
            &self.author,
            &self.date,
            &mut self.ids,
        );
        if nodes.is_empty() {
            // A located match with no affected runs is treated as not found.
            return false;
        }
        paragraph.replace_nodes(&indices, nodes);
        true
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::dom::{Block, Cell, HeaderFooter, Node, Revision, Row, Section, Table};

    const AUTHOR: &str = "Legal Review";
    const DATE: &str = "2026-08-07T12:00:00Z";

    fn applier() -> RedlineApplier {
        RedlineApplier::with_timestamp(AUTHOR, DATE)
    }

    fn change(old: &str, new: &str) -> Change {
        Change {
            old: old.to_string(),
            new: new.to_string(),
        }
    }

    fn body_document(texts: &[&[&str]]) -> Document {
        let mut document = Document::new();
        for runs in texts {
            document.blocks.push(Block::Paragraph(Paragraph::from_runs(runs)));
        }
        document
    }

    fn revisions(paragraph: &Paragraph) -> Vec<&Revision> {
        paragraph
            .nodes
            .iter()
            .filter_map(|node| match node {
                Node::Insertion(revision) | Node::Deletion(revision) => Some(revision),
                Node::Run(_) => None,
            })
            .collect()
    }

    #[test]
    fn replacement_splits_the_anchored_run() {
        let mut document = body_document(&[&["Payment of ", "$500", " is due"]]);
        let report = applier().apply_all(&mut document, &[change("500", "750")]);

        assert_eq!(report.applied, 1);
        let Block::Paragraph(paragraph) = &document.blocks[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(paragraph.nodes.len(), 5);
        assert_eq!(paragraph.nodes[0], Node::run("Payment of "));
        assert_eq!(paragraph.nodes[1], Node::run("$"));
        let Node::Deletion(deletion) = &paragraph.nodes[2] else {
            panic!("expected deletion");
        };
        assert_eq!(deletion.text, "500");
        let Node::Insertion(insertion) = &paragraph.nodes[3] else {
            panic!("expected insertion");
        };
        assert_eq!(insertion.text, "750");
        assert!(insertion.id > deletion.id);
        assert_eq!(paragraph.nodes[4], Node::run(" is due"));
    }

    #[test]
    fn missing_anchor_reports_not_found_and_leaves_runs_untouched() {
        let mut document = body_document(&[&["Payment of $500 is due"]]);
        let before = document.clone();
        let report = applier().apply_all(&mut document, &[change("$900", "$950")]);

        assert_eq!(report.applied, 0);
        assert_eq!(report.not_found(), 1);
        assert_eq!(document.blocks, before.blocks);
    }

    #[test]
    fn unanchored_insertion_is_skipped_without_search() {
        let mut document = body_document(&[&["some text"]]);
        let before = document.clone();
        let report = applier().apply_all(&mut document, &[change("", "brand new clause")]);

        assert_eq!(report.applied, 0);
        assert_eq!(report.skipped(), 1);
        assert_eq!(document.blocks, before.blocks);
        assert!(matches!(
            report.changes[0].outcome,
            ChangeOutcome::Skipped { .. }
        ));
    }

    #[test]
    fn empty_change_list_leaves_document_unchanged() {
        let mut document = body_document(&[&["anything"]]);
        let before = document.clone();
        let report = applier().apply_all(&mut document, &[]);

        assert!(report.is_empty());
        assert_eq!(document, before);
        assert_eq!(document.last_modified_by, None);
    }

    #[test]
    fn first_matching_paragraph_wins() {
        let mut document = body_document(&[&["boilerplate clause"], &["boilerplate clause"]]);
        applier().apply_all(&mut document, &[change("boilerplate", "standard")]);

        let Block::Paragraph(first) = &document.blocks[0] else {
            panic!("expected paragraph");
        };
        let Block::Paragraph(second) = &document.blocks[1] else {
            panic!("expected paragraph");
        };
        assert!(!revisions(first).is_empty());
        assert!(revisions(second).is_empty());
        assert_eq!(second.text(), "boilerplate clause");
    }

    #[test]
    fn table_cells_are_searched_after_body_paragraphs() {
        let mut document = body_document(&[&["unrelated body text"]]);
        document.blocks.push(Block::Table(Table {
            rows: vec![Row {
                cells: vec![Cell {
                    paragraphs: vec![Paragraph::from_runs(&["fee schedule: $100"])],
                }],
            }],
        }));
        let report = applier().apply_all(&mut document, &[change("$100", "$120")]);

        assert_eq!(report.applied, 1);
        let Block::Table(table) = &document.blocks[1] else {
            panic!("expected table");
        };
        let cell_paragraph = &table.rows[0].cells[0].paragraphs[0];
        assert!(!revisions(cell_paragraph).is_empty());
    }

    #[test]
    fn headers_and_footers_are_searched_last() {
        let mut document = body_document(&[&["body text"]]);
        document.sections.push(Section {
            default_header: Some(HeaderFooter {
                paragraphs: vec![Paragraph::from_runs(&["Confidential draft"])],
            }),
            default_footer: Some(HeaderFooter {
                paragraphs: vec![Paragraph::from_runs(&["Page footer notice"])],
            }),
            ..Section::default()
        });
        let report = applier().apply_all(
            &mut document,
            &[change("Confidential", "Privileged"), change("notice", "legend")],
        );

        assert_eq!(report.applied, 2);
        let header = document.sections[0].default_header.as_ref().unwrap();
        let footer = document.sections[0].default_footer.as_ref().unwrap();
        assert!(!revisions(&header.paragraphs[0]).is_empty());
        assert!(!revisions(&footer.paragraphs[0]).is_empty());
    }

    #[test]
    fn all_nodes_share_author_and_date_with_unique_increasing_ids() {
        let mut document = body_document(&[
            &["first clause to amend"],
            &["second clause to strike"],
        ]);
        applier().apply_all(
            &mut document,
            &[change("amend", "revise"), change("to strike", "")],
        );

        let mut ids = Vec::new();
        for paragraph in document.paragraphs_mut() {
            for revision in revisions(paragraph) {
                assert_eq!(revision.author, AUTHOR);
                assert_eq!(revision.date, DATE);
                ids.push(revision.id);
            }
        }
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), ids.len());
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn applied_run_records_author_as_last_modifier() {
        let mut document = body_document(&[&["clause"]]);
        applier().apply_all(&mut document, &[change("clause", "provision")]);
        assert_eq!(document.last_modified_by.as_deref(), Some(AUTHOR));
    }

    #[test]
    fn mixed_outcomes_are_counted_per_change() {
        let mut document = body_document(&[&["alpha beta"]]);
        let report = applier().apply_all(
            &mut document,
            &[
                change("alpha", "gamma"),
                change("missing", "nowhere"),
                change("", "floating insertion"),
            ],
        );

        assert_eq!(report.total_changes, 3);
        assert_eq!(report.applied, 1);
        assert_eq!(report.not_found(), 1);
        assert_eq!(report.skipped(), 1);
    }
}
