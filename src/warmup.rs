//! Sensor warm-up and calibration tracking.
//!
//! The monitor's notion of "how trustworthy is the sensor right now" is a pure
//! function of monotonic time since boot:
//!
//! | Elapsed | State |
//! |---------|-------|
//! | `< WARMUP_TIME` | [`WarmupState::NotWarmedUp`] |
//! | `WARMUP_TIME ..< CALIBRATION_TIME` | [`WarmupState::Warmed`] |
//! | `>= CALIBRATION_TIME` | [`WarmupState::FullyCalibrated`] |
//!
//! Nothing here is stored; the state is recomputed on every tick.

use embassy_time::{Duration, Instant};

use crate::config::{CALIBRATION_TIME, WARMUP_TIME};

/// Sensor trust level derived from uptime. Ordered: `NotWarmedUp < Warmed < FullyCalibrated`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WarmupState {
    /// Readings are not authoritative yet.
    NotWarmedUp,
    /// Readings are usable; on-chip calibration still converging.
    Warmed,
    /// A full auto-calibration cycle has elapsed; baselines may be persisted.
    FullyCalibrated,
}

impl WarmupState {
    /// Whether readings may be shown as real values.
    #[inline]
    pub const fn is_warmed_up(self) -> bool { !matches!(self, Self::NotWarmedUp) }
}

/// Time between two monotonic instants, zero if `now` precedes `start`.
#[inline]
pub fn elapsed_since(
    start: Instant,
    now: Instant,
) -> Duration {
    now.checked_duration_since(start).unwrap_or(Duration::from_ticks(0))
}

/// Classify elapsed uptime against the warm-up and calibration thresholds.
pub fn classify(elapsed: Duration) -> WarmupState {
    if elapsed < WARMUP_TIME {
        WarmupState::NotWarmedUp
    } else if elapsed < CALIBRATION_TIME {
        WarmupState::Warmed
    } else {
        WarmupState::FullyCalibrated
    }
}

/// Remembers the boot instant so the loop can ask for elapsed time and state.
#[derive(Clone, Copy, Debug)]
pub struct WarmupTracker {
    started: Instant,
}

impl WarmupTracker {
    /// Start tracking from `started` (normally the first clock reading).
    pub const fn new(started: Instant) -> Self { Self { started } }

    /// Uptime at `now`.
    #[inline]
    pub fn elapsed(
        &self,
        now: Instant,
    ) -> Duration {
        elapsed_since(self.started, now)
    }

    /// Warm-up state at `now`.
    #[inline]
    pub fn state(
        &self,
        now: Instant,
    ) -> WarmupState {
        classify(self.elapsed(now))
    }
}
