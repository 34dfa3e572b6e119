//! analysis::chunk
//!
//! Order-preserving fixed-size partitioning.
//!
//! # Design
//!
//! Chunks exist only to bound how much text one LLM call sees. Partitioning
//! is pure: for `n` items and chunk size `c` it yields `ceil(n / c)` chunks,
//! every chunk full except possibly the last, and concatenating the chunks
//! in order reconstructs the input exactly.

/// Partition `items` into chunks of at most `size`, preserving order.
///
/// `size` must be non-zero.
pub fn partition<T: Clone>(items: &[T], size: usize) -> Vec<Vec<T>> {
    debug_assert!(size > 0, "chunk size must be non-zero");
    items.chunks(size.max(1)).map(|c| c.to_vec()).collect()
}
