//! The consumer side: wait for newly published entries, read them, record
//! progress.

use crate::ring_buffer::RingBuffer;
use crate::sequence::{Consumer, Sequence};
use crate::wait::{AlertFlag, Alerted, WaitStrategy};
use std::sync::Arc;
use std::time::Duration;

/// One reader's view of the ring: what it waits on (the ring cursor, gated
/// by any upstream consumers it must not overtake), how it waits, and
/// where it records its own progress.
///
/// `own_sequence` is handed out as an `Arc<Sequence>` so the same handle can
/// be registered as a tracked consumer on a [`crate::ProducerBarrier`] or on
/// a downstream [`ConsumerBarrier`] in a processing pipeline.
pub struct ConsumerBarrier<'ring, E, W> {
    ring: &'ring RingBuffer<E>,
    wait: W,
    dependencies: Vec<Arc<dyn Consumer>>,
    alert: AlertFlag,
    own_sequence: Arc<Sequence>,
}

impl<'ring, E, W> ConsumerBarrier<'ring, E, W>
where
    W: WaitStrategy,
{
    pub fn new(
        ring: &'ring RingBuffer<E>,
        wait: W,
        dependencies: Vec<Arc<dyn Consumer>>,
    ) -> Self {
        Self {
            ring,
            wait,
            dependencies,
            alert: AlertFlag::new(),
            own_sequence: Arc::new(Sequence::default()),
        }
    }

    /// The handle to register with a producer barrier or a downstream
    /// consumer barrier as a dependency.
    pub fn own_sequence(&self) -> Arc<Sequence> {
        Arc::clone(&self.own_sequence)
    }

    /// Current ring cursor, independent of this consumer's own progress.
    pub fn get_cursor(&self) -> i64 {
        self.ring.cursor()
    }

    /// Blocks until the next sequence past what this consumer has already
    /// processed is available, or returns `Err(Alerted)` if alerted first.
    /// The returned sequence may be higher than "next" — callers should
    /// drain everything up to it in one pass.
    pub fn wait_for_next(&self) -> Result<i64, Alerted> {
        let next = self.own_sequence.get() + 1;
        self.wait
            .wait_for(next, self.ring, &self.dependencies, &self.alert)
    }

    /// As [`ConsumerBarrier::wait_for_next`], but gives up after `timeout`
    /// (not an error) instead of blocking forever.
    pub fn wait_for_next_timeout(&self, timeout: Duration) -> Result<i64, Alerted> {
        let next = self.own_sequence.get() + 1;
        self.wait
            .wait_for_timeout(next, self.ring, &self.dependencies, &self.alert, timeout)
    }

    /// Shared read of the entry at `sequence`. Callers must only read
    /// sequences already confirmed available by a prior `wait_for_next*`
    /// call.
    pub fn read<R>(&self, sequence: i64, f: impl FnOnce(&E) -> R) -> R {
        unsafe { self.ring.with_entry(sequence, f) }
    }

    /// Records that this consumer has finished processing up through
    /// `sequence`, and wakes anything parked waiting on this consumer as a
    /// dependency.
    pub fn processed_through(&self, sequence: i64) {
        self.own_sequence.set(sequence);
        self.wait.signal_all();
    }

    /// Sets the sticky alert flag and wakes this consumer if it's parked,
    /// so a blocked `wait_for_next` returns promptly.
    pub fn alert(&self) {
        self.alert.set();
        self.wait.signal_all();
    }

    /// Clears the alert flag. Must be called before the consumer may wait
    /// again; the flag is sticky by design so a single `alert()` call can't
    /// be missed by a waiter that hadn't started waiting yet.
    pub fn clear_alert(&self) {
        self.alert.clear();
    }

    pub fn is_alerted(&self) -> bool {
        self.alert.is_set()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::SequencedEntry;
    use crate::wait::BusySpinWaitStrategy;

    #[derive(Default, Clone, Copy)]
    struct Slot {
        sequence: i64,
        value: u64,
    }

    impl SequencedEntry for Slot {
        fn sequence(&self) -> i64 {
            self.sequence
        }
        fn set_sequence(&mut self, sequence: i64) {
            self.sequence = sequence;
        }
    }

    #[test]
    fn waits_for_timeout_when_nothing_published() {
        let ring: RingBuffer<Slot> = RingBuffer::new(4, Slot::default);
        let barrier = ConsumerBarrier::new(&ring, BusySpinWaitStrategy, vec![]);
        let result = barrier.wait_for_next_timeout(Duration::from_millis(5));
        assert_eq!(result, Ok(-1));
    }

    #[test]
    fn get_cursor_reflects_the_ring_cursor() {
        let ring: RingBuffer<Slot> = RingBuffer::new(4, Slot::default);
        let barrier = ConsumerBarrier::new(&ring, BusySpinWaitStrategy, vec![]);
        assert_eq!(barrier.get_cursor(), -1);

        unsafe {
            ring.with_entry_mut(0, |e| e.set_sequence(0));
        }
        ring.publish(0);
        assert_eq!(barrier.get_cursor(), 0);
    }

    #[test]
    fn reads_published_entry() {
        let ring: RingBuffer<Slot> = RingBuffer::new(4, Slot::default);
        unsafe {
            ring.with_entry_mut(0, |e| {
                e.value = 11;
                e.set_sequence(0);
            });
        }
        ring.publish(0);

        let barrier = ConsumerBarrier::new(&ring, BusySpinWaitStrategy, vec![]);
        let seq = barrier.wait_for_next().unwrap();
        assert_eq!(seq, 0);
        let value = barrier.read(seq, |e| e.value);
        assert_eq!(value, 11);
        barrier.processed_through(seq);
        assert_eq!(barrier.own_sequence().get(), 0);
    }

    #[test]
    fn alert_is_observed_and_idempotent_to_toggle() {
        let ring: RingBuffer<Slot> = RingBuffer::new(4, Slot::default);
        let barrier = ConsumerBarrier::new(&ring, BusySpinWaitStrategy, vec![]);
        barrier.alert();
        assert!(barrier.is_alerted());
        assert_eq!(barrier.wait_for_next(), Err(Alerted));

        barrier.clear_alert();
        assert!(!barrier.is_alerted());
        barrier.clear_alert();
        assert!(!barrier.is_alerted());
    }
}
