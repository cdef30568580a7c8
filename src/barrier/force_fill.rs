//! Out-of-order publication at an explicit sequence, bypassing the normal
//! claim counter.
//!
//! Exists for recovery paths that must resume publication at a sequence
//! recovered from durable storage rather than wherever a fresh claim
//! strategy would start counting from zero.

use crate::claim::ClaimStrategy;
use crate::entry::SequencedEntry;
use crate::error::NoTrackedConsumers;
use crate::ring_buffer::RingBuffer;
use crate::sequence::{min_sequence, Consumer};
use crate::wait::{AlertFlag, Alerted, CursorSource, WaitStrategy};
use std::sync::Arc;

struct GateCursor<'a> {
    consumers: &'a [Arc<dyn Consumer>],
}

impl CursorSource for GateCursor<'_> {
    fn cursor(&self) -> i64 {
        min_sequence(self.consumers, i64::MAX)
    }
}

/// Like [`crate::ProducerBarrier`] but the caller names the sequence to
/// publish at rather than letting a claim strategy allocate it.
///
/// The same capacity gate applies: a slot may not be overwritten until
/// every tracked consumer has read past it. Callers are responsible for
/// ensuring the sequences they force-fill don't regress the cursor (no
/// invariant here enforces increasing order the way the normal producer
/// barrier's claim counter does).
///
/// Holds the same `Arc<C>` claim strategy a sibling [`crate::ProducerBarrier`]
/// over this ring uses, so `force_fill`'s commit can resynchronize the
/// shared claim counter (spec §4.G step 1): after force-filling sequence
/// `s`, the next normal claim picks up at `s + 1` instead of wherever its
/// own counter last left off.
pub struct ForceFillProducerBarrier<'ring, E, C, W> {
    ring: &'ring RingBuffer<E>,
    claim: Arc<C>,
    wait: W,
    consumers: Vec<Arc<dyn Consumer>>,
    alert: AlertFlag,
}

impl<'ring, E, C, W> ForceFillProducerBarrier<'ring, E, C, W>
where
    C: ClaimStrategy,
    W: WaitStrategy,
{
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

    /// Writes and publishes `sequence` directly, waiting for the capacity
    /// gate exactly as [`crate::ProducerBarrier::next_entry`] does, then
    /// resynchronizes the shared claim counter to `sequence + 1`.
    pub fn force_fill<F>(&self, sequence: i64, write: F) -> Result<i64, Alerted>
    where
        E: SequencedEntry,
        F: FnOnce(&mut E),
    {
        self.wait_for_gate(sequence)?;
        unsafe {
            self.ring.with_entry_mut(sequence, |entry| {
                write(entry);
                entry.set_sequence(sequence);
            });
        }
        self.claim.set_sequence(sequence + 1);
        self.ring.publish(sequence);
        self.wait.signal_all();
        Ok(sequence)
    }

    fn wait_for_gate(&self, sequence: i64) -> Result<(), Alerted> {
        let target = sequence - self.ring.capacity() as i64;
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
}
