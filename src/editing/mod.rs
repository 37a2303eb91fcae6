//! Planning minimal line edits between original and formatted text
//!
//! The host editing surface patches a module in place through line-addressed
//! delete/insert primitives, so rather than rewriting the whole buffer we
//! plan an edit script: an ordered sequence of operations that partitions
//! both line sequences exactly, with untouched runs tagged `Equal`. A
//! consumer applies the non-equal operations in reverse order; later edits
//! go first so that earlier ones cannot shift their line numbers.

use std::ops::Range;

use serde::Serialize;
use tracing::debug;

/// What one operation does to its line ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EditKind {
    /// The ranges hold identical lines; nothing to do.
    Equal,
    /// Delete the source range, insert the dest range in its place.
    Replace,
    /// Delete the source range; the dest range is empty.
    Delete,
    /// Insert the dest range at the source position; the source range is
    /// empty.
    Insert,
}

/// One step of an edit script. `source` indexes the original line sequence,
/// `dest` the formatted one; both are half-open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditOperation {
    pub kind: EditKind,
    pub source: Range<usize>,
    pub dest: Range<usize>,
}

/// Compute the edit script that turns `original` into `formatted`. Returns
/// an empty script when the sequences are already equal, without running
/// the alignment at all. Otherwise the operations partition both index
/// ranges contiguously, in ascending order.
pub fn plan_edits<A, B>(original: &[A], formatted: &[B]) -> Vec<EditOperation>
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    if sequences_equal(original, formatted) {
        return Vec::new();
    }

    let blocks = matching_blocks(original, formatted);

    let mut operations = Vec::new();
    let mut i = 0;
    let mut j = 0;

    for (bi, bj, length) in blocks {
        push_gap(&mut operations, i..bi, j..bj);
        operations.push(EditOperation {
            kind: EditKind::Equal,
            source: bi..bi + length,
            dest: bj..bj + length,
        });
        i = bi + length;
        j = bj + length;
    }
    push_gap(&mut operations, i..original.len(), j..formatted.len());

    debug!("planned {} operations", operations.len());
    operations
}

/// Replay an edit script against a copy of `original`, bottom-up, driving
/// the same delete-then-insert primitives a live line buffer exposes. The
/// result must equal `formatted` exactly; tests lean on this to prove the
/// reverse-apply contract independently of any editing backend.
pub fn apply_edits<A, B>(
    original: &[A],
    formatted: &[B],
    operations: &[EditOperation],
) -> Vec<String>
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    let mut buffer: Vec<String> = original
        .iter()
        .map(|line| {
            line.as_ref()
                .to_string()
        })
        .collect();

    for operation in operations
        .iter()
        .rev()
    {
        match operation.kind {
            EditKind::Equal => {}
            EditKind::Replace | EditKind::Delete | EditKind::Insert => {
                buffer.drain(
                    operation
                        .source
                        .clone(),
                );
                for (offset, j) in operation
                    .dest
                    .clone()
                    .enumerate()
                {
                    buffer.insert(
                        operation
                            .source
                            .start
                            + offset,
                        formatted[j]
                            .as_ref()
                            .to_string(),
                    );
                }
            }
        }
    }

    buffer
}

fn sequences_equal<A, B>(original: &[A], formatted: &[B]) -> bool
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    original.len() == formatted.len()
        && original
            .iter()
            .zip(formatted)
            .all(|(a, b)| a.as_ref() == b.as_ref())
}

/// Classify the mismatched lines between two runs of equal ones.
fn push_gap(operations: &mut Vec<EditOperation>, source: Range<usize>, dest: Range<usize>) {
    let kind = if !source.is_empty() && !dest.is_empty() {
        EditKind::Replace
    } else if !source.is_empty() {
        EditKind::Delete
    } else if !dest.is_empty() {
        EditKind::Insert
    } else {
        return;
    };

    operations.push(EditOperation { kind, source, dest });
}

/// Longest-common-subsequence alignment, reported as maximal runs of
/// matching lines: `(source_start, dest_start, length)` triples in
/// ascending order. Quadratic table, fine for source-unit sizes. Where a
/// delete and an insert would do equally well, the original side is
/// consumed first.
fn matching_blocks<A, B>(original: &[A], formatted: &[B]) -> Vec<(usize, usize, usize)>
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    let n = original.len();
    let m = formatted.len();

    // lengths[i][j] holds the LCS length of original[i..] and formatted[j..].
    let mut lengths = vec![vec![0u32; m + 1]; n + 1];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            lengths[i][j] = if original[i].as_ref() == formatted[j].as_ref() {
                lengths[i + 1][j + 1] + 1
            } else {
                lengths[i + 1][j].max(lengths[i][j + 1])
            };
        }
    }

    let mut blocks: Vec<(usize, usize, usize)> = Vec::new();
    let mut i = 0;
    let mut j = 0;
    while i < n && j < m {
        if original[i].as_ref() == formatted[j].as_ref() {
            match blocks.last_mut() {
                Some((bi, bj, length)) if *bi + *length == i && *bj + *length == j => {
                    *length += 1;
                }
                _ => blocks.push((i, j, 1)),
            }
            i += 1;
            j += 1;
        } else if lengths[i + 1][j] >= lengths[i][j + 1] {
            i += 1;
        } else {
            j += 1;
        }
    }

    blocks
}
