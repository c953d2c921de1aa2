//! Timing configuration.
//!
//! Durations for sensor warm-up, baseline lifecycle and the two loop cadences.

use embassy_time::Duration;

// =============================================================================
// Warm-up / Calibration
// =============================================================================

/// Readings before this are not authoritative (SGP30 reports 400 ppm / 0 ppb while warming).
pub const WARMUP_TIME: Duration = Duration::from_secs(15);

/// Time for the sensor's on-chip auto-calibration to converge. Baselines are only saved after it.
pub const CALIBRATION_TIME: Duration = Duration::from_secs(12 * 3600);

/// Minimum spacing between two baseline save attempts (flash wear).
pub const BASELINE_SAVE_INTERVAL: Duration = Duration::from_secs(3600);

// =============================================================================
// Loop Cadence
// =============================================================================

/// Sleep between ticks once real data is on screen.
pub const UPDATE_INTERVAL: Duration = Duration::from_secs(4);

/// Sleep between ticks while the loading animation runs.
pub const LOADING_PHASE_SLEEP: Duration = Duration::from_millis(10);

/// Spinner frame period, independent of the tick rate.
pub const LOADING_INTERVAL: Duration = Duration::from_millis(50);

const _: () = assert!(WARMUP_TIME.as_ticks() < CALIBRATION_TIME.as_ticks());
const _: () = assert!(BASELINE_SAVE_INTERVAL.as_ticks() < CALIBRATION_TIME.as_ticks());
const _: () = assert!(LOADING_PHASE_SLEEP.as_ticks() < LOADING_INTERVAL.as_ticks());
const _: () = assert!(LOADING_INTERVAL.as_ticks() < UPDATE_INTERVAL.as_ticks());
