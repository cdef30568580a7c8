//! The three barrier shapes built on top of [`crate::RingBuffer`]: the
//! single producer, the force-fill producer, and the consumer.

mod consumer;
mod force_fill;
mod producer;

pub use consumer::ConsumerBarrier;
pub use force_fill::ForceFillProducerBarrier;
pub use producer::ProducerBarrier;
