//! The ring itself: fixed-capacity storage, the published cursor, and the
//! entry points for building barriers on top of it.

use crate::entry::{EntryFactory, SequencedEntry};
use crate::error::NoTrackedConsumers;
use crate::sequence::ceil_pow2;
use crate::wait::CursorSource;
use crossbeam_utils::CachePadded;
use std::cell::UnsafeCell;
use std::sync::atomic::{AtomicI64, Ordering};

/// Fixed-capacity, lock-free ring of pre-constructed entry cells.
///
/// Entries are built once at construction time and overwritten in place on
/// every wrap — never reallocated, never moved out. Capacity is
/// rounded up to the next power of two so `sequence & mask` can replace the
/// modulo on the hot path.
pub struct RingBuffer<E> {
    entries: Box<[UnsafeCell<E>]>,
    mask: i64,
    cursor: CachePadded<AtomicI64>,
}

// SAFETY: entries are only ever accessed through the claim/commit protocol
// the barrier types enforce — a producer holds exclusive access to slot
// `seq & mask` between claiming `seq` and publishing it, and consumers only
// read a slot after observing its publication via the cursor/consumer
// sequences. The `UnsafeCell<E>` itself carries no thread-affinity.
unsafe impl<E: Send> Sync for RingBuffer<E> {}

impl<E> RingBuffer<E> {
    /// Builds a ring of at least `size` slots, rounded up to the next power
    /// of two. Calls `factory.create()` exactly
    /// `capacity` times.
    pub fn new<F>(size: usize, factory: F) -> Self
    where
        F: EntryFactory<E>,
    {
        let capacity = ceil_pow2(size);
        let entries = (0..capacity)
            .map(|_| UnsafeCell::new(factory.create()))
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Self {
            entries,
            mask: (capacity - 1) as i64,
            cursor: CachePadded::new(AtomicI64::new(-1)),
        }
    }

    /// Number of slots. Always a power of two.
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    fn index_of(&self, sequence: i64) -> usize {
        (sequence & self.mask) as usize
    }

    /// Raw pointer to the slot for `sequence`. Callers must uphold the
    /// claim/commit exclusivity protocol; this type itself enforces nothing.
    ///
    /// # Safety
    /// The caller must not alias this access with another live reference to
    /// the same slot.
    #[inline]
    pub(crate) unsafe fn slot(&self, sequence: i64) -> *mut E {
        self.entries[self.index_of(sequence)].get()
    }

    /// Reads the cursor with acquire ordering: synchronizes-with the
    /// release store in [`RingBuffer::publish`], making the just-published
    /// entry's writes visible to the reader.
    #[inline]
    pub fn cursor(&self) -> i64 {
        self.cursor.load(Ordering::Acquire)
    }

    /// Publishes `sequence` as the new cursor value with release ordering.
    /// Callers are responsible for ensuring publications become visible in
    /// sequence order.
    #[inline]
    pub(crate) fn publish(&self, sequence: i64) {
        crate::debug_assert_cursor_monotonic!(self.cursor.load(Ordering::Relaxed), sequence);
        self.cursor.store(sequence, Ordering::Release);
    }

    /// Runs `f` against the entry at `sequence`, giving exclusive access for
    /// the duration of the closure. Used by producer barriers during claim
    /// and by consumer barriers during read-out.
    ///
    /// # Safety
    /// The caller must hold the exclusive right to touch this slot: either
    /// it just claimed `sequence` from a [`crate::claim::ClaimStrategy`] and
    /// hasn't published yet, or it observed `sequence` as available via a
    /// consumer barrier and no other consumer of this barrier will touch the
    /// same slot concurrently.
    #[inline]
    pub(crate) unsafe fn with_entry_mut<R>(&self, sequence: i64, f: impl FnOnce(&mut E) -> R) -> R {
        let ptr = self.slot(sequence);
        f(&mut *ptr)
    }

    /// Shared read of the entry at `sequence`. Same exclusivity contract as
    /// [`RingBuffer::with_entry_mut`], relaxed to a shared borrow.
    ///
    /// # Safety
    /// See [`RingBuffer::with_entry_mut`].
    #[inline]
    pub(crate) unsafe fn with_entry<R>(&self, sequence: i64, f: impl FnOnce(&E) -> R) -> R {
        let ptr = self.slot(sequence);
        f(&*ptr)
    }
}

impl<E> CursorSource for RingBuffer<E> {
    fn cursor(&self) -> i64 {
        self.cursor()
    }
}

impl<E: SequencedEntry> RingBuffer<E> {
    /// True once at least `capacity` entries have ever been published,
    /// i.e. the ring has wrapped at least once. Exposed for diagnostics and
    /// tests; not required for correctness.
    pub fn has_wrapped(&self) -> bool {
        self.cursor() >= self.capacity() as i64
    }
}
