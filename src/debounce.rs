// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 Fieldform contributors

//! Deadline-based value debouncing for auto-save.
//!
//! Time is passed in explicitly so behavior is deterministic under test;
//! the UI polls once per frame and schedules a repaint for the deadline.

use std::time::{Duration, Instant};

/// Tracks a changing input and reports it once it has been stable for the
/// configured delay.
///
/// Emission is edge-triggered: each settled value is reported exactly
/// once, and settling on the previously reported value stays quiet. The
/// latest input always wins; intermediate values are never reported.
#[derive(Clone, Debug)]
pub struct Debounced<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
    last_emitted: Option<T>,
}

impl<T: Clone + PartialEq> Debounced<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
            last_emitted: None,
        }
    }

    /// Record a new input value, replacing any pending one and restarting
    /// the deadline at `now + delay`.
    pub fn set(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.delay));
    }

    /// Report the pending value once its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let (_, deadline) = self.pending.as_ref()?;
        if now < *deadline {
            return None;
        }
        let (value, _) = self.pending.take()?;
        if self.last_emitted.as_ref() == Some(&value) {
            return None;
        }
        self.last_emitted = Some(value.clone());
        Some(value)
    }

    /// Drop the pending value without reporting it. The last reported
    /// value is kept, so a later settle on that same value stays quiet.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Deadline of the pending value, for scheduling the next poll.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }
}
