//! Poll-style debounce for a rapidly changing input value.
//!
//! The settled value only moves once the input has stopped changing for
//! the configured delay. Intermediate values are discarded, never
//! queued. The clock is always passed in, so tests drive it explicitly.

use std::time::Duration;

use tokio::time::Instant;

/// Quiet period applied to search-text edits before a refetch fires.
/// Other filter fields are deliberately not debounced.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// A value whose propagation is delayed until it stops changing.
#[derive(Debug)]
pub struct Debounce<T> {
    settled: T,
    pending: Option<(T, Instant)>,
    delay: Duration,
}

impl<T: Clone + PartialEq> Debounce<T> {
    pub fn new(initial: T, delay: Duration) -> Self {
        Self {
            settled: initial,
            pending: None,
            delay,
        }
    }

    /// Record a new input value. Each call restarts the quiet period;
    /// setting the value back to the settled one cancels the pending
    /// update.
    pub fn set(&mut self, value: T, now: Instant) {
        if value == self.settled {
            self.pending = None;
        } else {
            self.pending = Some((value, now + self.delay));
        }
    }

    /// Promote a pending value whose quiet period has elapsed.
    /// Returns `true` when the settled value changed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.pending.take() {
            Some((value, deadline)) if deadline <= now => {
                self.settled = value;
                true
            }
            still_waiting => {
                self.pending = still_waiting;
                false
            }
        }
    }

    /// The last value that survived a full quiet period.
    pub fn settled(&self) -> &T {
        &self.settled
    }

    /// The most recent input, pending or settled. This is what an input
    /// field should echo back to the user.
    pub fn latest(&self) -> &T {
        self.pending
            .as_ref()
            .map(|(value, _)| value)
            .unwrap_or(&self.settled)
    }

    /// When the pending value will settle, if one is waiting. Drivers
    /// sleep until this deadline before polling again.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }
}
