//! Two-tier text diff producing anchored change pairs.
//!
//! Lines are aligned first; within each replaced line range the joined text
//! is re-aligned at word granularity. Word-level replacements collapse to a
//! single phrase pair so the old side stays findable as an anchor in the
//! document.

pub mod opcodes;

use opcodes::{Tag, align};
use serde::Serialize;

const PREVIEW_LEN: usize = 40;

/// One (old, new) change pair.
///
/// At least one side is non-empty. An empty `old` is an unanchored insertion
/// that the applier will skip; an empty `new` is a pure deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Change {
    pub old: String,
    pub new: String,
}

impl Change {
    pub fn is_insertion(&self) -> bool {
        self.old.is_empty()
    }

    pub fn is_deletion(&self) -> bool {
        self.new.is_empty()
    }

    /// Old text truncated for log and summary lines.
    pub fn old_preview(&self) -> String {
        preview(&self.old)
    }

    /// New text truncated for log and summary lines.
    pub fn new_preview(&self) -> String {
        preview(&self.new)
    }
}

fn preview(text: &str) -> String {
    if text.chars().count() > PREVIEW_LEN {
        let cut: String = text.chars().take(PREVIEW_LEN).collect();
        format!("{cut}...")
    } else {
        text.to_string()
    }
}

/// Diff two plain-text revisions into an ordered change list.
///
/// Identical inputs produce an empty list; an entirely empty side produces a
/// single full-delete or full-insert change.
pub fn diff_texts(original: &str, modified: &str) -> Vec<Change> {
    let original_lines: Vec<&str> = original.lines().collect();
    let modified_lines: Vec<&str> = modified.lines().collect();

    let mut changes = Vec::new();
    for op in align(&original_lines, &modified_lines) {
        match op.tag {
            Tag::Equal => {}
            Tag::Replace => {
                let old_block = original_lines[op.a.clone()].join("\n");
                let new_block = modified_lines[op.b.clone()].join("\n");
                word_changes(&old_block, &new_block, &mut changes);
            }
            Tag::Delete => {
                let deleted = original_lines[op.a.clone()].join("\n");
                let trimmed = deleted.trim();
                if !trimmed.is_empty() {
                    changes.push(Change {
                        old: trimmed.to_string(),
                        new: String::new(),
                    });
                }
            }
            Tag::Insert => {
                let inserted = modified_lines[op.b.clone()].join("\n");
                let trimmed = inserted.trim();
                if !trimmed.is_empty() {
                    changes.push(Change {
                        old: String::new(),
                        new: trimmed.to_string(),
                    });
                }
            }
        }
    }
    changes
}

/// Word-level pass over one replaced line range.
fn word_changes(old_block: &str, new_block: &str, out: &mut Vec<Change>) {
    let old_words: Vec<&str> = old_block.split_whitespace().collect();
    let new_words: Vec<&str> = new_block.split_whitespace().collect();

    for op in align(&old_words, &new_words) {
        match op.tag {
            Tag::Equal => {}
            Tag::Replace => {
                let old_phrase = old_words[op.a.clone()].join(" ");
                let new_phrase = new_words[op.b.clone()].join(" ");
                if old_phrase != new_phrase {
                    out.push(Change {
                        old: old_phrase,
                        new: new_phrase,
                    });
                }
            }
            Tag::Delete => {
                let old_phrase = old_words[op.a.clone()].join(" ");
                if !old_phrase.is_empty() {
                    out.push(Change {
                        old: old_phrase,
                        new: String::new(),
                    });
                }
            }
            Tag::Insert => {
                let new_phrase = new_words[op.b.clone()].join(" ");
                if !new_phrase.is_empty() {
                    out.push(Change {
                        old: String::new(),
                        new: new_phrase,
                    });
                }
            }
        }
    }
}
