//! CO2 monitor library - testable modules for the monitor firmware.
//!
//! This library contains the core logic that can be tested on the host machine.
//! The binary (`main.rs`) uses this library and adds the embedded-specific code
//! (RP2350 peripherals, ST7735R panel, flash sector storage).
//!
//! # Layout
//!
//! - [`config`]: Thresholds, timing and layout constants
//! - [`warmup`]: Warm-up / calibration classification of elapsed time
//! - [`baseline`]: Durable calibration baseline record and its store
//! - [`sensor`]: Gas sensor capability trait and the [`sensor::Reading`] it produces
//! - [`drivers`]: Sensirion SCD4x and SGP30 drivers over `embedded-hal-async` I2C
//! - [`surface`]: Persistent on-screen elements (text, icon, background)
//! - [`render`]: Dirty-field renderer and its previous-frame cache
//! - [`animations`]: Loading spinner
//! - [`monitor`]: Loading/Steady loop controller
//! - [`time`]: Injectable clock and sleep primitives
//! - [`log_buffer`]: Recent log lines kept in RAM, forwarded to `defmt` on target
//!
//! # Testing
//!
//! Run tests on host with:
//! ```bash
//! cargo test --lib --target x86_64-unknown-linux-gnu  # Linux
//! cargo test --lib --target aarch64-apple-darwin      # macOS
//! ```
//!
//! Tests run with `std` enabled (via `cfg_attr`), allowing use of the standard
//! test framework while the actual firmware runs as `no_std`.

// Use no_std only when NOT testing (tests need std for the test harness)
#![cfg_attr(not(test), no_std)]
// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
// Traits are only implemented and awaited on a single executor thread
#![allow(async_fn_in_trait)]

// Logging macros must be defined before the modules that use them
#[macro_use]
pub mod log_buffer;

// Configuration
pub mod config;

// Core state machine
pub mod baseline;
pub mod monitor;
pub mod time;
pub mod warmup;

// Sensors
pub mod drivers;
pub mod sensor;

// Rendering
pub mod animations;
pub mod render;
pub mod surface;
pub mod ui;

pub use baseline::{BaselineRecord, BaselineStore, Storage, StorageError};
pub use monitor::{Monitor, Phase};
pub use render::{PreviousFrameCache, Renderer};
pub use sensor::{GasSensor, Reading, Secondary, SensorError, SensorKind};
pub use warmup::{WarmupState, WarmupTracker};
