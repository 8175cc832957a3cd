//! Dense indexing of unordered pairs `{a, b}` with `a < b < n`.
//!
//! Pair `(a, b)` owns slot
//!
//! ```text
//! slot(a, b) = a*n + b - (a+1)(a+2)/2
//! ```
//!
//! which enumerates the strict upper triangle of an `n x n` matrix row by row. Row `a`
//! occupies the contiguous range `[row_start(a), row_start(a) + n - a - 1)`, so the slot
//! buffer can be split into disjoint mutable rows and filled by independent workers
//! without synchronization. Summing the buffer in slot order afterwards gives a result
//! that does not depend on how the work was scheduled.

use rayon::prelude::*;

/// Number of unordered pairs among `n` sites.
#[inline]
pub fn pair_count(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

/// The slot of pair `(a, b)`, or `None` unless `a < b < n`.
#[inline]
pub fn slot(a: usize, b: usize, n: usize) -> Option<usize> {
    if a < b && b < n {
        Some(a * n + b - (a + 1) * (a + 2) / 2)
    } else {
        None
    }
}

/// The first slot of row `a`; equals [`pair_count`] for the last, empty row.
#[inline]
pub fn row_start(a: usize, n: usize) -> usize {
    debug_assert!(a < n);
    a * n + a + 1 - (a + 1) * (a + 2) / 2
}

/// Splits a slot buffer into the mutable rows `(a, row)` of the triangle.
fn split_rows(slots: &mut [f64], n: usize) -> Vec<(usize, &mut [f64])> {
    let mut rows = Vec::with_capacity(n.saturating_sub(1));
    let mut rest = slots;
    for a in 0..n.saturating_sub(1) {
        let (row, tail) = rest.split_at_mut(n - a - 1);
        rows.push((a, row));
        rest = tail;
    }
    rows
}

/// Writes `pair(a, b)` into the slot of every pair `a < b < n`, on the calling thread.
pub fn fill_sequential<F>(slots: &mut [f64], n: usize, pair: F)
where
    F: Fn(usize, usize) -> f64,
{
    assert_eq!(slots.len(), pair_count(n), "slot buffer does not match site count");
    for a in 0..n {
        for b in (a + 1)..n {
            if let Some(s) = slot(a, b, n) {
                slots[s] = pair(a, b);
            }
        }
    }
}

/// Parallel counterpart of [`fill_sequential`]: every row of the triangle is a rayon
/// task that owns its slice of the buffer.
///
/// Inside a row the full inner range `0..n` is visited and the slot guard discards
/// `b <= a`, so every pair is written exactly once and no two tasks share a slot.
pub fn fill_parallel<F>(slots: &mut [f64], n: usize, pair: F)
where
    F: Fn(usize, usize) -> f64 + Sync,
{
    assert_eq!(slots.len(), pair_count(n), "slot buffer does not match site count");
    split_rows(slots, n).into_par_iter().for_each(|(a, row)| {
        let start = row_start(a, n);
        for b in 0..n {
            if let Some(s) = slot(a, b, n) {
                row[s - start] = pair(a, b);
            }
        }
    });
}

/// Fills a fresh buffer in parallel and returns the slot-ordered sum.
pub fn parallel_sum<F>(n: usize, pair: F) -> f64
where
    F: Fn(usize, usize) -> f64 + Sync,
{
    let mut slots = vec![0.0; pair_count(n)];
    fill_parallel(&mut slots, n, pair);
    slots.iter().sum()
}
