//! The payload "shape" the ring buffer reuses in place, plus its factory.
//!
//! The core never allocates payload objects on the hot path: a fixed array
//! of entry cells is built once by an [`EntryFactory`] and overwritten in
//! place, indexed by `sequence & mask`.

/// A slot the ring buffer hands out on claim and reads back on commit.
///
/// Implementors carry whatever payload they need alongside the `sequence`
/// field the core writes on claim and reads on commit. Invariant: after a
/// successful commit for sequence `s`, the cell at `s & mask` has
/// `sequence() == s` — this is what lets consumers
/// distinguish wrap generations during debugging, though the barrier
/// protocol alone is sufficient for correctness.
pub trait SequencedEntry {
    /// The sequence this cell was last claimed for.
    fn sequence(&self) -> i64;
    /// Set by the core on claim; read back on commit.
    fn set_sequence(&mut self, sequence: i64);
}

/// Produces a fresh entry cell on demand during ring construction only.
///
/// Called exactly `capacity` times when the ring is built, then never
/// again — this is the sole extension point for the payload type.
pub trait EntryFactory<E> {
    fn create(&self) -> E;
}

/// Any `Fn() -> E` closure is an [`EntryFactory`], covering the common case
/// of a bare constructor (`|| MyEvent::default()`) without requiring a
/// dedicated factory type.
impl<E, F> EntryFactory<E> for F
where
    F: Fn() -> E,
{
    fn create(&self) -> E {
        self()
    }
}
