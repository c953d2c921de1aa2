//! Application configuration.
//!
//! - `layout`: Display dimensions and element anchor points
//! - `sensors`: Alert thresholds and sensor compensation defaults
//! - `timing`: Warm-up, calibration, baseline and loop cadence durations
//!
//! There are no runtime settings: everything is a compile-time constant.

pub mod layout;
pub mod sensors;
pub mod timing;

// Re-export at config level for convenience
pub use layout::{SCREEN_HEIGHT, SCREEN_WIDTH};
pub use sensors::{CO2_THRESHOLD, VOC_THRESHOLD};
pub use timing::{
    BASELINE_SAVE_INTERVAL,
    CALIBRATION_TIME,
    LOADING_INTERVAL,
    LOADING_PHASE_SLEEP,
    UPDATE_INTERVAL,
    WARMUP_TIME,
};
