//! Rotating cross-assignment.
//!
//! Each category column of the consumed rows is shifted down by its own
//! index, wrapping around. Category 0 stays put, category 1 moves one row,
//! category 2 two rows, and so on. Reading the shifted columns back row by
//! row gives each participant a consequence stitched together from several
//! respondents.
//!
//! With a single consumed row every shift is a no-op and the consequence is
//! that respondent's own answers.

use consequences_core::{Assignment, ResponseRow};

/// Source position for `position` after rotating a sequence of `len`
/// elements right by `offset`. `len` must be non-zero.
fn source_index(position: usize, offset: usize, len: usize) -> usize {
    (position + len - offset % len) % len
}

/// Rotate `seq` right by `offset`: `rotated[k] == seq[(k - offset) mod n]`.
pub fn rotate_right<T: Clone>(seq: &[T], offset: usize) -> Vec<T> {
    let len = seq.len();
    (0..len)
        .map(|k| seq[source_index(k, offset, len)].clone())
        .collect()
}

/// Split rows into one answer sequence per category, keeping row order.
pub fn transpose(rows: &[ResponseRow], categories: usize) -> Vec<Vec<String>> {
    (0..categories)
        .map(|category| {
            rows.iter()
                .map(|row| row.answer(category).to_string())
                .collect()
        })
        .collect()
}

/// Rebuild `count` assignments from per-category sequences: assignment `j`
/// takes element `j` of every sequence.
pub fn regroup(sequences: &[Vec<String>], count: usize) -> Vec<Assignment> {
    (0..count)
        .map(|j| {
            sequences
                .iter()
                .map(|seq| seq.get(j).cloned().unwrap_or_default())
                .collect()
        })
        .collect()
}

/// Cross-wire `rows` (oldest first) into one assignment per row.
///
/// Equivalent to `regroup` of each `transpose`d category rotated right by
/// its index, without materialising the rotated sequences.
pub fn cross_assign(rows: &[ResponseRow], categories: usize) -> Vec<Assignment> {
    let len = rows.len();
    (0..len)
        .map(|j| {
            (0..categories)
                .map(|category| rows[source_index(j, category, len)].answer(category))
                .collect()
        })
        .collect()
}
