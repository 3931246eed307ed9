//! LCS-based opcode alignment over two sequences.
//!
//! Classifies ranges of the two inputs as equal, replaced, deleted, or
//! inserted, in original order. The same alignment runs at line and at word
//! granularity.

use std::ops::Range;

/// Classification of one aligned range pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Equal,
    Replace,
    Delete,
    Insert,
}

/// One aligned range pair: `a` indexes the original sequence, `b` the
/// modified one. For `Delete` the `b` range is empty, for `Insert` the `a`
/// range is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opcode {
    pub tag: Tag,
    pub a: Range<usize>,
    pub b: Range<usize>,
}

/// Align two sequences and return grouped opcodes covering both in full.
///
/// Deterministic: ties in the underlying LCS table always resolve the same
/// way, so identical inputs produce identical opcodes.
pub fn align<T: PartialEq>(a: &[T], b: &[T]) -> Vec<Opcode> {
    let matches = lcs_matches(a, b);

    // Merge diagonal runs of matched index pairs into equal blocks, with a
    // zero-length sentinel so trailing non-equal ranges are emitted.
    let mut blocks: Vec<(usize, usize, usize)> = Vec::new();
    for &(ai, bi) in &matches {
        if let Some(last) = blocks.last_mut()
            && last.0 + last.2 == ai
            && last.1 + last.2 == bi
        {
            last.2 += 1;
        } else {
            blocks.push((ai, bi, 1));
        }
    }
    blocks.push((a.len(), b.len(), 0));

    let mut opcodes = Vec::new();
    let (mut ai, mut bi) = (0, 0);
    for &(block_a, block_b, len) in &blocks {
        let tag = match (ai < block_a, bi < block_b) {
            (true, true) => Some(Tag::Replace),
            (true, false) => Some(Tag::Delete),
            (false, true) => Some(Tag::Insert),
            (false, false) => None,
        };
        if let Some(tag) = tag {
            opcodes.push(Opcode {
                tag,
                a: ai..block_a,
                b: bi..block_b,
            });
        }
        if len > 0 {
            opcodes.push(Opcode {
                tag: Tag::Equal,
                a: block_a..block_a + len,
                b: block_b..block_b + len,
            });
        }
        ai = block_a + len;
        bi = block_b + len;
    }
    opcodes
}

/// Longest common subsequence as ascending (a-index, b-index) pairs.
fn lcs_matches<T: PartialEq>(a: &[T], b: &[T]) -> Vec<(usize, usize)> {
    let n = a.len();
    let m = b.len();
    if n == 0 || m == 0 {
        return Vec::new();
    }

    let mut dp = vec![vec![0usize; m + 1]; n + 1];
    for i in 1..=n {
        for j in 1..=m {
            if a[i - 1] == b[j - 1] {
                dp[i][j] = dp[i - 1][j - 1] + 1;
            } else {
                dp[i][j] = dp[i - 1][j].max(dp[i][j - 1]);
            }
        }
    }

    let mut matches = Vec::new();
    let mut i = n;
    let mut j = m;
    while i > 0 && j > 0 {
        if a[i - 1] == b[j - 1] {
            matches.push((i - 1, j - 1));
            i -= 1;
            j -= 1;
        } else if dp[i - 1][j] > dp[i][j - 1] {
            i -= 1;
        } else {
            j -= 1;
        }
    }
    matches.reverse();
    matches
}
