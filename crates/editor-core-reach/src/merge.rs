//! Overlap merging of resolved edit ranges.

use crate::position::Direction;
use crate::selection::EditRange;

/// Fold overlapping or touching ranges into their union.
///
/// Ranges are ordered by start (descending for leftward commands so the fold walks the way
/// the command reaches) and each one is merged into the previous survivor when either of its
/// endpoints lies inside it, endpoints inclusive. Merged ranges are forward-oriented and lose
/// their `no_change` flag.
///
/// Returns the surviving ranges and how many were absorbed.
pub fn merge_ranges(mut ranges: Vec<EditRange>, direction: Direction) -> (Vec<EditRange>, usize) {
    let original = ranges.len();
    if original <= 1 {
        return (ranges, 0);
    }

    ranges.sort_by(|a, b| a.range.start.cmp(&b.range.start));
    if direction.is_left() {
        ranges.reverse();
    }

    let mut merged: Vec<EditRange> = Vec::with_capacity(original);
    for edit in ranges {
        if let Some(last) = merged.last_mut()
            && (last.range.contains_position(edit.range.start)
                || last.range.contains_position(edit.range.end))
        {
            *last = EditRange::new(last.range.union(&edit.range));
            continue;
        }
        merged.push(edit);
    }

    let absorbed = original - merged.len();
    (merged, absorbed)
}
