//! How a producer obtains the next sequence to publish.

/// Polymorphic policy for allocating the next sequence a producer will
/// write to. [`SingleThreadedClaimStrategy`] is the default and covers the
/// common single-writer case; [`AtomicClaimStrategy`] (feature
/// `multi-producer`) is an extension point for racing producers.
pub trait ClaimStrategy: Send + Sync {
    /// Returns the next sequence to publish and advances the counter.
    fn get_and_increment(&self) -> i64;

    /// Forces the counter to `seq`. Used only by the force-fill path to
    /// resynchronize the allocator after an out-of-order publication.
    fn set_sequence(&self, seq: i64);

    /// Blocks until the ring's cursor (read via `cursor`) reaches `target`.
    /// A no-op under single-threaded claim, since the same thread that
    /// claimed is the one publishing and the cursor can't lag it. Kept as a
    /// hook for a future multi-producer strategy where the last claimer
    /// must serialize cursor publication so the cursor advances in
    /// sequence order.
    fn wait_for_cursor(&self, _target: i64, _cursor: &dyn Fn() -> i64) {}
}

/// Default claim strategy: a plain, non-atomic counter.
///
/// Correct *only* under the precondition that at most one producer thread
/// ever calls [`ClaimStrategy::get_and_increment`] on a given instance —
/// documented as a precondition rather than an enforced invariant, the same
/// way a prior crate's SPSC ring documents its single-writer fields.
#[derive(Debug, Default)]
pub struct SingleThreadedClaimStrategy {
    next: std::cell::Cell<i64>,
}

// SAFETY: `Cell<i64>` is not `Sync` by default because an aliased `&Cell`
// from two threads could race on `get`/`set`. This type's entire contract
// is that callers never do that — at most one producer thread ever touches
// a given instance, per its documented precondition.
unsafe impl Sync for SingleThreadedClaimStrategy {}

impl SingleThreadedClaimStrategy {
    /// Initial counter value is `0`, so the first claim returns `0`.
    pub fn new() -> Self {
        Self {
            next: std::cell::Cell::new(0),
        }
    }
}

impl ClaimStrategy for SingleThreadedClaimStrategy {
    fn get_and_increment(&self) -> i64 {
        let seq = self.next.get();
        self.next.set(seq + 1);
        seq
    }

    fn set_sequence(&self, seq: i64) {
        self.next.set(seq);
    }
}

/// Multi-producer claim strategy: an atomic fetch-add counter.
///
/// `wait_for_cursor` spins until the cursor catches up to `target`,
/// serializing the order in which racing producers' commits become visible
/// — without this, two producers could claim sequences 5 and 6, and the
/// slower one could publish cursor=6 before the faster one publishes
/// cursor=5, creating a hole a consumer would observe as "available."
#[cfg(feature = "multi-producer")]
#[derive(Debug, Default)]
pub struct AtomicClaimStrategy {
    next: std::sync::atomic::AtomicI64,
}

#[cfg(feature = "multi-producer")]
impl AtomicClaimStrategy {
    pub fn new() -> Self {
        Self {
            next: std::sync::atomic::AtomicI64::new(0),
        }
    }
}

#[cfg(feature = "multi-producer")]
impl ClaimStrategy for AtomicClaimStrategy {
    fn get_and_increment(&self) -> i64 {
        self.next.fetch_add(1, std::sync::atomic::Ordering::SeqCst)
    }

    fn set_sequence(&self, seq: i64) {
        self.next.store(seq, std::sync::atomic::Ordering::SeqCst);
    }

    fn wait_for_cursor(&self, target: i64, cursor: &dyn Fn() -> i64) {
        let mut backoff = crate::backoff::Backoff::new();
        while cursor() != target {
            backoff.snooze();
        }
    }
}
