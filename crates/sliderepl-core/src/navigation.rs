//! Previous/next slide indices.

/// Indices of the slides around the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighbors {
    /// Index of the previous slide, never below zero.
    pub prev: i64,
    /// Index of the next slide, or `requested` on the last slide.
    pub next: i64,
}

/// Compute neighbors of `requested` in a deck of `total` slides.
///
/// `requested` itself is not validated; indexing the deck with it is the
/// caller's business.
pub fn neighbors(requested: i64, total: i64) -> Neighbors {
    let prev = requested.saturating_sub(1).max(0);
    let next = match requested.checked_add(1) {
        Some(next) if next < total => next,
        _ => requested,
    };
    Neighbors { prev, next }
}
