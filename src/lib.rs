//! disruptor-rs - a lock-free single-producer/multi-consumer ring buffer
//!
//! A Rust implementation of the LMAX Disruptor pattern: a fixed-capacity
//! ring of pre-constructed entries, a single producer that claims and
//! publishes sequences under a capacity gate, and any number of consumers
//! that wait for newly published sequences and read them back without
//! locks or allocation on the hot path.
//!
//! # Key features
//!
//! - 128-byte cache-line isolation on every hot atomic (`crossbeam_utils::CachePadded`)
//! - Entries are built once and reused in place — no per-message allocation
//! - Pluggable claim strategies (single-threaded by default, atomic under `multi-producer`)
//! - Pluggable wait strategies (busy-spin, yielding, blocking)
//! - Sticky, alertable consumer barriers for clean shutdown mid-wait
//!
//! # Example
//!
//! ```
//! use disruptor_rs::{
//!     ConsumerBarrier, ProducerBarrier, RingBuffer, SequencedEntry,
//!     SingleThreadedClaimStrategy, BusySpinWaitStrategy, Sequence,
//! };
//! use std::sync::Arc;
//!
//! #[derive(Default, Clone, Copy)]
//! struct Event {
//!     sequence: i64,
//!     payload: u64,
//! }
//!
//! impl SequencedEntry for Event {
//!     fn sequence(&self) -> i64 {
//!         self.sequence
//!     }
//!     fn set_sequence(&mut self, sequence: i64) {
//!         self.sequence = sequence;
//!     }
//! }
//!
//! let ring: RingBuffer<Event> = RingBuffer::new(1024, Event::default);
//!
//! let consumer = ConsumerBarrier::new(&ring, BusySpinWaitStrategy, vec![]);
//! let consumer_sequence: Arc<dyn disruptor_rs::Consumer> = consumer.own_sequence();
//!
//! let producer = ProducerBarrier::new(
//!     &ring,
//!     Arc::new(SingleThreadedClaimStrategy::new()),
//!     BusySpinWaitStrategy,
//!     vec![consumer_sequence],
//! )
//! .unwrap();
//!
//! producer.next_entry(|e| e.payload = 42).unwrap();
//!
//! let seq = consumer.wait_for_next().unwrap();
//! let payload = consumer.read(seq, |e| e.payload);
//! assert_eq!(payload, 42);
//! consumer.processed_through(seq);
//! ```

mod backoff;
mod barrier;
mod claim;
mod entry;
mod error;
mod invariants;
mod ring_buffer;
mod sequence;
mod wait;

pub(crate) use invariants::{debug_assert_cursor_monotonic, debug_assert_gate_respected};

pub use backoff::Backoff;
pub use barrier::{ConsumerBarrier, ForceFillProducerBarrier, ProducerBarrier};
pub use claim::{ClaimStrategy, SingleThreadedClaimStrategy};
pub use entry::{EntryFactory, SequencedEntry};
pub use error::NoTrackedConsumers;
pub use ring_buffer::RingBuffer;
pub use sequence::{ceil_pow2, min_sequence, Consumer, Sequence};
pub use wait::{
    AlertFlag, Alerted, BlockingWaitStrategy, BusySpinWaitStrategy, CursorSource, WaitStrategy,
    YieldingWaitStrategy,
};

#[cfg(feature = "multi-producer")]
pub use claim::AtomicClaimStrategy;
