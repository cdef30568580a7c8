//! Sequence tracking primitives and the small numeric utilities the ring
//! and its barriers share.

use crossbeam_utils::CachePadded;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// Tracks one reader's (or writer's) progress through the ring as a single
/// `i64`, cache-line isolated so independent consumers advancing their own
/// `Sequence` don't false-share a line with each other or with the ring's
/// cursor.
///
/// [`crate::ConsumerBarrier::own_sequence`] hands out exactly this
/// type: construct one per consumer (implicitly, via `ConsumerBarrier::new`),
/// register its `Arc<Sequence>` as a tracked consumer on a
/// [`crate::ProducerBarrier`] or a downstream consumer barrier, and let the
/// owning barrier call [`Sequence::set`] as it finishes processing each
/// entry.
#[derive(Debug)]
pub struct Sequence {
    value: CachePadded<AtomicI64>,
}

impl Sequence {
    pub fn new(initial: i64) -> Self {
        Self {
            value: CachePadded::new(AtomicI64::new(initial)),
        }
    }

    #[inline]
    pub fn get(&self) -> i64 {
        self.value.load(Ordering::Acquire)
    }

    #[inline]
    pub fn set(&self, seq: i64) {
        self.value.store(seq, Ordering::Release);
    }
}

impl Default for Sequence {
    /// Starts at `-1`, matching the ring cursor's "nothing published yet"
    /// sentinel.
    fn default() -> Self {
        Self::new(-1)
    }
}

/// External handle a producer barrier gates publication against, and a
/// consumer barrier may track as an upstream dependency: "how far has this
/// reader gotten." Ownership is non-owning on the barrier side — the
/// consumer's lifetime must exceed the barrier's.
pub trait Consumer: Send + Sync {
    /// Highest sequence this consumer has finished processing.
    fn sequence(&self) -> i64;
    /// Lifecycle hook, opaque to the core.
    fn halt(&self) {}
}

impl Consumer for Sequence {
    fn sequence(&self) -> i64 {
        self.get()
    }
}

/// Smallest power of two `>= n`, `>= 1`.
pub fn ceil_pow2(n: usize) -> usize {
    n.max(1).next_power_of_two()
}

/// Minimum of the tracked consumers' sequences, each read exactly once.
/// Returns `sentinel` when `consumers` is empty.
pub fn min_sequence(consumers: &[Arc<dyn Consumer>], sentinel: i64) -> i64 {
    if consumers.is_empty() {
        return sentinel;
    }
    let mut min = i64::MAX;
    for consumer in consumers {
        let seq = consumer.sequence();
        if seq < min {
            min = seq;
        }
    }
    min
}
