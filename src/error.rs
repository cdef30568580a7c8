use thiserror::Error;

/// Raised synchronously when a producer (or force-fill producer) barrier is
/// constructed with no tracked consumers: the capacity gate in
/// [`crate::ProducerBarrier::next_entry`] cannot function without at least
/// one downstream reference to gate against.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("producer barrier requires at least one tracked consumer")]
pub struct NoTrackedConsumers;
