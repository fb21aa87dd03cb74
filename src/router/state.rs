//! Navigation state machine
//!
//! At most one navigation is ever in flight. The two states are explicit,
//! the transition into `Navigating` is a synchronous compare-exchange taken
//! before any suspension point, and the transition back to `Idle` rides an
//! RAII guard so every exit path (success, error, fallback) releases the
//! slot.

use std::sync::atomic::{AtomicU8, Ordering};

/// Navigation controller states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavState {
    /// No navigation in progress
    Idle,
    /// A navigation request is being serviced
    Navigating,
}

const IDLE: u8 = 0;
const NAVIGATING: u8 = 1;

/// Atomic cell holding the controller state
#[derive(Debug, Default)]
pub(crate) struct NavCell(AtomicU8);

impl NavCell {
    /// Current state
    pub fn state(&self) -> NavState {
        if self.0.load(Ordering::Acquire) == NAVIGATING {
            NavState::Navigating
        } else {
            NavState::Idle
        }
    }

    /// Attempt `Idle -> Navigating`; `None` when a navigation is in flight
    pub fn begin(&self) -> Option<NavGuard<'_>> {
        self.0
            .compare_exchange(IDLE, NAVIGATING, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| NavGuard(self))
    }
}

/// Releases the navigation slot when dropped
pub(crate) struct NavGuard<'a>(&'a NavCell);

impl Drop for NavGuard<'_> {
    fn drop(&mut self) {
        self.0.0.store(IDLE, Ordering::Release);
    }
}

/// How a navigation request concluded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// Fetch, swap, and history update completed in place
    Completed,
    /// Discarded: another navigation was already in flight
    Dropped,
    /// The target already matched the current location; nothing to do
    AlreadyCurrent,
    /// In-place navigation failed; a full native load was requested instead
    FellBack,
}
