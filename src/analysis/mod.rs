//! Pure engines over entry snapshots. Nothing here touches storage or the clock; callers pass
//! the reference time in.
//!
//! Every tie is resolved in favour of the value seen first, so tallies are kept as ordered
//! vectors instead of hash maps.

pub mod charts;
pub mod filter;
pub mod insights;
pub mod matrix;
pub mod summary;
pub mod words;

/// Counts values in the order they first appear.
pub(crate) fn tally<T: PartialEq>(values: impl IntoIterator<Item = T>) -> Vec<(T, usize)> {
    let mut counts: Vec<(T, usize)> = Vec::new();
    for value in values {
        match counts.iter_mut().find(|(v, _)| *v == value) {
            Some((_, count)) => *count += 1,
            None => counts.push((value, 1)),
        }
    }
    counts
}

/// Most frequent value with its count. Ties go to the value seen first.
pub(crate) fn dominant<T: PartialEq>(values: impl IntoIterator<Item = T>) -> Option<(T, usize)> {
    let mut best: Option<(T, usize)> = None;
    for (value, count) in tally(values) {
        if best.as_ref().map_or(true, |(_, best_count)| count > *best_count) {
            best = Some((value, count));
        }
    }
    best
}
