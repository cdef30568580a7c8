//! The single-producer side of the protocol: claim a sequence, wait for
//! downstream consumers to free the slot, write, publish.

use crate::claim::ClaimStrategy;
use crate::error::NoTrackedConsumers;
use crate::ring_buffer::RingBuffer;
use crate::sequence::{min_sequence, Consumer};
use crate::wait::{AlertFlag, Alerted, CursorSource, WaitStrategy};
use std::sync::Arc;

/// Reads the slowest tracked consumer's sequence as if it were a cursor, so
/// the producer's capacity gate can reuse [`WaitStrategy::wait_for`]
/// unchanged instead of a bespoke spin loop.
struct GateCursor<'a> {
    consumers: &'a [Arc<dyn Consumer>],
}

impl CursorSource for GateCursor<'_> {
    fn cursor(&self) -> i64 {
        min_sequence(self.consumers, i64::MAX)
    }
}

/// Gates a single producer thread against the consumers it must not lap.
///
/// Construction fails with [`NoTrackedConsumers`] if `consumers` is empty:
/// without at least one downstream sequence to gate against, the capacity
/// check in [`ProducerBarrier::next_entry`] could never determine when a
/// slot is safe to reuse.
pub struct ProducerBarrier<'ring, E, C, W> {
    ring: &'ring RingBuffer<E>,
    claim: Arc<C>,
    wait: W,
    consumers: Vec<Arc<dyn Consumer>>,
    alert: AlertFlag,
}

impl<'ring, E, C, W> ProducerBarrier<'ring, E, C, W>
where
    C: ClaimStrategy,
    W: WaitStrategy,
{
    /// `claim` is an `Arc` so it can be shared with a
    /// [`crate::ForceFillProducerBarrier`] over the same ring: force-fill
    /// resynchronizes this counter on commit so a subsequent normal claim
    /// picks up after the forced sequence.
    pub fn new(
        ring: &'ring RingBuffer<E>,
        claim: Arc<C>,
        wait: W,
        consumers: Vec<Arc<dyn Consumer>>,
    ) -> Result<Self, NoTrackedConsumers> {
        if consumers.is_empty() {
            return Err(NoTrackedConsumers);
        }
        Ok(Self {
            ring,
            claim,
            wait,
            consumers,
            alert: AlertFlag::new(),
        })
    }

    /// Claims the next sequence, blocks until the slot is free, hands it to
    /// `write`, then publishes. Returns the published sequence, or
    /// `Err(Alerted)` if alerted while waiting for capacity.
    ///
    /// The slot at `seq & mask` was last used for `seq - capacity`; it is
    /// only safe to reuse once every tracked consumer has read that far.
    pub fn next_entry<F>(&self, write: F) -> Result<i64, Alerted>
    where
        E: crate::entry::SequencedEntry,
        F: FnOnce(&mut E),
    {
        let seq = self.claim.get_and_increment();
        if let Err(e) = self.wait_for_gate(seq) {
            // Claimed but never published: give the sequence back so the
            // next claim reuses it instead of leaving a hole a consumer
            // could observe as "available" once the cursor passes it.
            self.claim.set_sequence(seq);
            return Err(e);
        }

        crate::debug_assert_gate_respected!(
            seq,
            min_sequence(&self.consumers, i64::MAX),
            self.ring.capacity() as i64
        );

        unsafe {
            self.ring.with_entry_mut(seq, |entry| {
                write(entry);
                entry.set_sequence(seq);
            });
        }

        let ring = self.ring;
        self.claim.wait_for_cursor(seq, &|| ring.cursor());
        self.ring.publish(seq);
        self.wait.signal_all();
        Ok(seq)
    }

    fn wait_for_gate(&self, seq: i64) -> Result<(), Alerted> {
        let target = seq - self.ring.capacity() as i64;
        if target < 0 {
            if self.alert.is_set() {
                return Err(Alerted);
            }
            return Ok(());
        }
        let gate = GateCursor {
            consumers: &self.consumers,
        };
        self.wait.wait_for(target, &gate, &[], &self.alert)?;
        Ok(())
    }

    /// Sets the sticky alert flag and wakes any waiter, so a blocked
    /// `next_entry` call returns promptly instead of waiting out its full
    /// backoff.
    pub fn alert(&self) {
        self.alert.set();
        self.wait.signal_all();
    }

    pub fn clear_alert(&self) {
        self.alert.clear();
    }

    pub fn is_alerted(&self) -> bool {
        self.alert.is_set()
    }

    pub fn ring(&self) -> &RingBuffer<E> {
        self.ring
    }
}
