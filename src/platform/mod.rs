//! Platform capability strategies
//!
//! Optional platform features (view transitions, idle scheduling,
//! intersection observation) are probed once by the embedder and turned into
//! fixed strategies at initialization; nothing re-checks capabilities
//! afterwards.

use std::time::Duration;

/// Capability snapshot taken at initialization
#[derive(Debug, Clone, Copy)]
pub struct Capabilities {
    /// Whether the swap can be committed as one visual transition
    pub view_transitions: bool,
    /// Whether idle-callback scheduling is available
    pub idle_callback: bool,
    /// Whether viewport visibility can be observed
    pub intersection_observer: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            view_transitions: true,
            idle_callback: true,
            intersection_observer: true,
        }
    }
}

/// How the title+body swap is committed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapStrategy {
    /// Title and body committed as one visually-atomic mutation
    Transition,
    /// Stepwise mutation, no atomicity guarantee
    Direct,
}

impl SwapStrategy {
    /// Pick the strategy for the given capabilities
    pub fn select(capabilities: &Capabilities) -> Self {
        if capabilities.view_transitions {
            Self::Transition
        } else {
            Self::Direct
        }
    }
}

/// When (and whether) the document is scanned for viewport-prefetch links
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanSchedule {
    /// Scan once the idle budget elapses
    AfterIdle(Duration),
    /// Timer fallback when idle scheduling is unavailable
    AfterTimer(Duration),
    /// No intersection support: viewport prefetch stays off
    Disabled,
}

impl ScanSchedule {
    /// Pick the schedule for the given capabilities
    pub fn select(capabilities: &Capabilities, idle_budget: Duration, timer_delay: Duration) -> Self {
        if !capabilities.intersection_observer {
            Self::Disabled
        } else if capabilities.idle_callback {
            Self::AfterIdle(idle_budget)
        } else {
            Self::AfterTimer(timer_delay)
        }
    }

    /// Delay before the scan runs; `None` when scanning is disabled
    pub fn delay(&self) -> Option<Duration> {
        match self {
            Self::AfterIdle(delay) | Self::AfterTimer(delay) => Some(*delay),
            Self::Disabled => None,
        }
    }
}
