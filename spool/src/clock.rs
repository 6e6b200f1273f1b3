use core::cell::Cell;
#[cfg(feature = "std")]
use std::time::Instant;

/// A monotonic time source in nanoseconds.
///
/// Consecutive readings must be non-decreasing; [`crate::Scroller`] and
/// [`crate::AnimationDirector`] do not guard against a clock going backward.
pub trait Clock {
    fn now_ns(&self) -> i64;
}

/// Nanoseconds since the clock was created, backed by [`Instant`].
#[cfg(feature = "std")]
#[derive(Clone, Copy, Debug)]
pub struct InstantClock {
    origin: Instant,
}

#[cfg(feature = "std")]
impl Default for InstantClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl InstantClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Clock for InstantClock {
    fn now_ns(&self) -> i64 {
        i64::try_from(self.origin.elapsed().as_nanos()).unwrap_or(i64::MAX)
    }
}

/// A clock advanced by hand, for deterministic drivers and demos.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now_ns: Cell<i64>,
}

impl ManualClock {
    pub fn new(now_ns: i64) -> Self {
        Self {
            now_ns: Cell::new(now_ns),
        }
    }

    pub fn set(&self, now_ns: i64) {
        self.now_ns.set(now_ns);
    }

    pub fn advance(&self, by_ns: i64) -> i64 {
        let now = self.now_ns.get().saturating_add(by_ns);
        self.now_ns.set(now);
        now
    }
}

impl Clock for ManualClock {
    fn now_ns(&self) -> i64 {
        self.now_ns.get()
    }
}
