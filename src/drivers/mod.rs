//! Sensor drivers over `embedded-hal-async` I2C.
//!
//! - `sensirion`: shared command/word framing and CRC-8 used by all Sensirion parts
//! - `scd4x`: SCD40/SCD41 photoacoustic CO2 sensor (CO2, temperature, humidity)
//! - `sgp30`: SGP30 MOX gas sensor (eCO2, TVOC, calibration baseline)

pub mod scd4x;
pub mod sensirion;
pub mod sgp30;

pub use scd4x::Scd4x;
pub use sgp30::Sgp30;
