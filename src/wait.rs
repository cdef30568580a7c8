//! Pluggable policies for how a waiter spends CPU while a sequence is not
//! yet available.

use crate::backoff::Backoff;
use crate::sequence::{min_sequence, Consumer};
use crossbeam_utils::CachePadded;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};
use thiserror::Error;

/// The only supported cancellation signal. Raised from a wait strategy's
/// polling loop when the barrier's alert flag is observed set.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("wait aborted: consumer barrier was alerted")]
pub struct Alerted;

/// Sticky, cache-line isolated cancellation flag owned by a consumer
/// barrier. Cleared by the consumer before it may resume normal waiting.
#[derive(Debug, Default)]
pub struct AlertFlag {
    flag: CachePadded<AtomicBool>,
}

impl AlertFlag {
    pub fn new() -> Self {
        Self {
            flag: CachePadded::new(AtomicBool::new(false)),
        }
    }

    #[inline]
    pub fn is_set(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    #[inline]
    pub fn set(&self) {
        self.flag.store(true, Ordering::Release);
    }

    #[inline]
    pub fn clear(&self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// What a wait strategy reads the published cursor from, without needing
/// the ring's entry type as a generic parameter.
pub trait CursorSource: Send + Sync {
    fn cursor(&self) -> i64;
}

/// Returns the sequence a waiter may safely observe: the ring cursor when
/// there are no tracked consumers, otherwise the slowest tracked
/// consumer's sequence.
fn available(cursor: &dyn CursorSource, consumers: &[Arc<dyn Consumer>]) -> i64 {
    if consumers.is_empty() {
        cursor.cursor()
    } else {
        min_sequence(consumers, cursor.cursor())
    }
}

/// Contract: block until `sequence` becomes available (or the barrier is
/// alerted), then return the available sequence — which may exceed
/// `sequence`, letting callers batch-process. Every strategy must check
/// `alert.is_set()` at each polling step.
pub trait WaitStrategy: Send + Sync {
    /// Blocks indefinitely until `sequence` is available or alerted.
    fn wait_for(
        &self,
        sequence: i64,
        cursor: &dyn CursorSource,
        consumers: &[Arc<dyn Consumer>],
        alert: &AlertFlag,
    ) -> Result<i64, Alerted>;

    /// As `wait_for`, but gives up after `timeout` and returns `Ok(cursor)`
    /// (which may be less than `sequence`) instead of blocking forever.
    /// Timing out is not an error; an alert observed during the wait still
    /// is.
    fn wait_for_timeout(
        &self,
        sequence: i64,
        cursor: &dyn CursorSource,
        consumers: &[Arc<dyn Consumer>],
        alert: &AlertFlag,
        timeout: Duration,
    ) -> Result<i64, Alerted>;

    /// Wakes any waiter parked on this strategy. Producer barriers call
    /// this after every cursor advance; `AlertFlag::set` callers call it
    /// too so parked consumers notice promptly.
    fn signal_all(&self);
}

/// Tight spin loop, no yielding. Lowest latency, highest CPU use.
#[derive(Debug, Default)]
pub struct BusySpinWaitStrategy;

impl WaitStrategy for BusySpinWaitStrategy {
    fn wait_for(
        &self,
        sequence: i64,
        cursor: &dyn CursorSource,
        consumers: &[Arc<dyn Consumer>],
        alert: &AlertFlag,
    ) -> Result<i64, Alerted> {
        loop {
            if alert.is_set() {
                return Err(Alerted);
            }
            let avail = available(cursor, consumers);
            if avail >= sequence {
                return Ok(avail);
            }
            std::hint::spin_loop();
        }
    }

    fn wait_for_timeout(
        &self,
        sequence: i64,
        cursor: &dyn CursorSource,
        consumers: &[Arc<dyn Consumer>],
        alert: &AlertFlag,
        timeout: Duration,
    ) -> Result<i64, Alerted> {
        let deadline = Instant::now() + timeout;
        loop {
            if alert.is_set() {
                return Err(Alerted);
            }
            let avail = available(cursor, consumers);
            if avail >= sequence {
                return Ok(avail);
            }
            if Instant::now() >= deadline {
                return Ok(cursor.cursor());
            }
            std::hint::spin_loop();
        }
    }

    fn signal_all(&self) {}
}

/// Loop with a voluntary yield to the scheduler between polls, escalating
/// via [`Backoff`] the same way the producer-side gate does.
#[derive(Debug, Default)]
pub struct YieldingWaitStrategy;

impl WaitStrategy for YieldingWaitStrategy {
    fn wait_for(
        &self,
        sequence: i64,
        cursor: &dyn CursorSource,
        consumers: &[Arc<dyn Consumer>],
        alert: &AlertFlag,
    ) -> Result<i64, Alerted> {
        let mut backoff = Backoff::new();
        loop {
            if alert.is_set() {
                return Err(Alerted);
            }
            let avail = available(cursor, consumers);
            if avail >= sequence {
                return Ok(avail);
            }
            backoff.snooze();
        }
    }

    fn wait_for_timeout(
        &self,
        sequence: i64,
        cursor: &dyn CursorSource,
        consumers: &[Arc<dyn Consumer>],
        alert: &AlertFlag,
        timeout: Duration,
    ) -> Result<i64, Alerted> {
        let deadline = Instant::now() + timeout;
        let mut backoff = Backoff::new();
        loop {
            if alert.is_set() {
                return Err(Alerted);
            }
            let avail = available(cursor, consumers);
            if avail >= sequence {
                return Ok(avail);
            }
            if Instant::now() >= deadline {
                return Ok(cursor.cursor());
            }
            backoff.snooze();
        }
    }

    fn signal_all(&self) {}
}

/// Parks on a condition variable; `signal_all` wakes all waiters.
///
/// Uses a bounded `wait_timeout` internally (rather than an unbounded
/// `wait`) so the non-timed `wait_for` still re-checks the alert flag
/// periodically even if a `signal_all` notification races with a waiter
/// that hasn't parked yet — ordinary spurious-wakeup tolerance, just
/// applied proactively.
#[derive(Debug, Default)]
pub struct BlockingWaitStrategy {
    lock: Mutex<()>,
    condvar: Condvar,
}

impl BlockingWaitStrategy {
    const POLL_INTERVAL: Duration = Duration::from_millis(5);

    pub fn new() -> Self {
        Self {
            lock: Mutex::new(()),
            condvar: Condvar::new(),
        }
    }
}

impl WaitStrategy for BlockingWaitStrategy {
    fn wait_for(
        &self,
        sequence: i64,
        cursor: &dyn CursorSource,
        consumers: &[Arc<dyn Consumer>],
        alert: &AlertFlag,
    ) -> Result<i64, Alerted> {
        loop {
            if alert.is_set() {
                return Err(Alerted);
            }
            let avail = available(cursor, consumers);
            if avail >= sequence {
                return Ok(avail);
            }
            let guard = self.lock.lock().unwrap();
            if alert.is_set() {
                return Err(Alerted);
            }
            let avail = available(cursor, consumers);
            if avail >= sequence {
                return Ok(avail);
            }
            let _ = self.condvar.wait_timeout(guard, Self::POLL_INTERVAL);
        }
    }

    fn wait_for_timeout(
        &self,
        sequence: i64,
        cursor: &dyn CursorSource,
        consumers: &[Arc<dyn Consumer>],
        alert: &AlertFlag,
        timeout: Duration,
    ) -> Result<i64, Alerted> {
        let deadline = Instant::now() + timeout;
        loop {
            if alert.is_set() {
                return Err(Alerted);
            }
            let avail = available(cursor, consumers);
            if avail >= sequence {
                return Ok(avail);
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Ok(cursor.cursor());
            }
            let guard = self.lock.lock().unwrap();
            if alert.is_set() {
                return Err(Alerted);
            }
            let avail = available(cursor, consumers);
            if avail >= sequence {
                return Ok(avail);
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Ok(cursor.cursor());
            }
            let _ = self.condvar.wait_timeout(guard, remaining.min(Self::POLL_INTERVAL));
        }
    }

    fn signal_all(&self) {
        let _guard = self.lock.lock().unwrap();
        self.condvar.notify_all();
    }
}
