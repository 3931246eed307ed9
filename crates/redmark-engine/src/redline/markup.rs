//! Construction of tracked-change markup for a located anchor.

use crate::dom::{Node, Revision, Run};

use super::locate::MatchSpan;

/// Allocates monotonically increasing revision identifiers, starting at 1.
///
/// Word requires every insertion/deletion element in a document to carry a
/// unique id. Each redline run owns its allocator; concurrent runs must each
/// construct their own instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionIdAllocator {
    next: u32,
}

impl RevisionIdAllocator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }
}

impl Default for RevisionIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the node sequence that replaces the matched runs: untouched prefix
/// of the first run, a tracked deletion of the matched text, a tracked
/// insertion of the new text, untouched suffix of the last run.
///
/// The deletion carries the characters actually present in the runs rather
/// than the normalized query, so casing and whitespace survive into the
/// markup. Empty parts are omitted.
pub fn replacement_nodes(
    span: &MatchSpan,
    old_text: &str,
    new_text: &str,
    author: &str,
    date: &str,
    ids: &mut RevisionIdAllocator,
) -> Vec<Node> {
    let (Some(first), Some(last)) = (span.first(), span.last()) else {
        return Vec::new();
    };

    let before = &first.text[..first.local_start];
    let after = &last.text[last.local_end..];
    let matched: String = span
        .iter()
        .map(|run| &run.text[run.local_start..run.local_end])
        .collect();

    let mut nodes = Vec::new();
    if !before.is_empty() {
        nodes.push(Node::Run(Run::new(before)));
    }
    if !old_text.is_empty() {
        nodes.push(Node::Deletion(Revision {
            id: ids.next_id(),
            author: author.to_string(),
            date: date.to_string(),
            text: matched,
        }));
    }
    if !new_text.is_empty() {
        nodes.push(Node::Insertion(Revision {
            id: ids.next_id(),
            author: author.to_string(),
            date: date.to_string(),
            text: new_text.to_string(),
        }));
    }
    if !after.is_empty() {
        nodes.push(Node::Run(Run::new(after)));
    }
    nodes
}
