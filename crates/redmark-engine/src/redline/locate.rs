//! Anchor search across a paragraph's run list.
//!
//! The flattened visible text is rebuilt per search: the tree mutates after
//! every successful apply, so cached offsets would go stale immediately.

use regex::RegexBuilder;

use crate::dom::Paragraph;

/// Offset range one run occupies in the paragraph's flattened text.
///
/// Runs with no visible text still get a (zero-length) span so the caller
/// can account for every node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSpan {
    pub node_index: usize,
    pub global_start: usize,
    pub global_end: usize,
    pub text: String,
}

/// One run's slice of a located match, with offsets local to the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunMatch {
    pub node_index: usize,
    pub local_start: usize,
    pub local_end: usize,
    pub text: String,
}

/// Every run overlapping one located query, in paragraph order.
pub type MatchSpan = Vec<RunMatch>;

/// Find the first occurrence of `query` in the paragraph's visible text.
///
/// Matching policy, in order:
/// 1. whitespace-flexible pattern (query tokens joined by `\s+`),
///    case-insensitive;
/// 2. exact substring match;
/// 3. `None`.
///
/// Returns `None` for a match no run overlaps, which can only happen for
/// degenerate zero-width matches.
pub fn locate_in_paragraph(paragraph: &Paragraph, query: &str) -> Option<MatchSpan> {
    let (flat, spans) = flatten_runs(paragraph);
    let (match_start, match_end) = find_bounds(&flat, query)?;

    let mut matched = Vec::new();
    for span in spans {
        if span.global_start < match_end && span.global_end > match_start {
            let local_start = match_start.saturating_sub(span.global_start);
            let local_end = (match_end - span.global_start).min(span.text.len());
            matched.push(RunMatch {
                node_index: span.node_index,
                local_start,
                local_end,
                text: span.text,
            });
        }
    }
    if matched.is_empty() {
        return None;
    }
    Some(matched)
}

/// Concatenate visible run text, recording each run's global offsets.
fn flatten_runs(paragraph: &Paragraph) -> (String, Vec<RunSpan>) {
    let mut flat = String::new();
    let mut spans = Vec::new();
    for (node_index, run) in paragraph.runs() {
        let global_start = flat.len();
        flat.push_str(&run.text);
        spans.push(RunSpan {
            node_index,
            global_start,
            global_end: flat.len(),
            text: run.text.clone(),
        });
    }
    (flat, spans)
}

fn find_bounds(flat: &str, query: &str) -> Option<(usize, usize)> {
    let tokens: Vec<String> = query.split_whitespace().map(|token| regex::escape(token)).collect();
    if tokens.is_empty() {
        return None;
    }
    if let Ok(pattern) = RegexBuilder::new(&tokens.join(r"\s+")).case_insensitive(true).build()
        && let Some(found) = pattern.find(flat)
    {
        return Some((found.start(), found.end()));
    }
    // Exact fallback for punctuation and casing the pattern cannot cover.
    flat.find(query).map(|start| (start, start + query.len()))
}
