//! Circular index arithmetic for the unbounded-to-bounded mapping.

/// Wrap an unbounded logical index onto a bounded data range.
///
/// Returns a value in `[0, size)` for any `i64` input, including large
/// negative indices.
///
/// # Panics
///
/// Panics when `size == 0` (remainder by zero). Callers must check dataset
/// emptiness before resolving a logical index.
pub fn wrap(index: i64, size: usize) -> usize {
    // Double modulo:
    // 1) index % size wraps but may be negative
    // 2) adding size makes the intermediate positive
    // 3) second modulo normalizes back into [0, size)
    let size = size as i64;
    (((index % size) + size) % size) as usize
}
