//! Debug-only assertions for protocol invariants.
//!
//! Active only in debug builds (`#[cfg(debug_assertions)]`), so there is
//! zero overhead in release builds. Mirrors a prior crate's own
//! `invariants.rs` convention of naming each macro after the invariant it
//! enforces.

/// Invariant: the ring's cursor is monotonic non-decreasing under the
/// normal producer barrier. The force-fill path
/// may create forward gaps but must never move the cursor backwards.
macro_rules! debug_assert_cursor_monotonic {
    ($old:expr, $new:expr) => {
        debug_assert!(
            $new >= $old,
            "cursor must be monotonic non-decreasing: {} -> {}",
            $old,
            $new
        )
    };
}

/// Invariant: `next_entry`/`claim_entry` never hand out a slot a tracked
/// consumer hasn't finished with yet:
/// `claimed - min(consumer_sequences) < capacity`.
macro_rules! debug_assert_gate_respected {
    ($claimed:expr, $min_consumer:expr, $capacity:expr) => {
        debug_assert!(
            $claimed - $min_consumer < $capacity,
            "gating invariant violated: claimed {} - min consumer {} >= capacity {}",
            $claimed,
            $min_consumer,
            $capacity
        )
    };
}

pub(crate) use debug_assert_cursor_monotonic;
pub(crate) use debug_assert_gate_respected;
