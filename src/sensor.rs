//! Gas sensor capability and the reading it produces.
//!
//! Both supported parts (SCD4x true-CO2 and SGP30 eCO2/TVOC) sit behind one
//! [`GasSensor`] trait. What differs between them is carried by the
//! [`Secondary`] tag on each [`Reading`] and by the trait's associated consts.

use core::fmt;

use crate::baseline::BaselineRecord;
use crate::config::sensors::{is_high_co2, is_high_voc};

// =============================================================================
// Reading
// =============================================================================

/// Which sensor family produced a reading.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorKind {
    /// Sensirion SCD4x: photoacoustic CO2 with temperature and humidity.
    Scd4x,
    /// Sensirion SGP30: MOX eCO2 estimate with TVOC.
    Sgp30,
}

/// Second value shown next to CO2.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Secondary {
    /// Ambient temperature in whole degrees Fahrenheit.
    Temperature(i16),
    /// Total volatile organic compounds in ppb.
    Voc(u16),
}

/// One successful sensor poll.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reading {
    pub co2_ppm: u16,
    pub secondary: Secondary,
    /// Relative humidity in whole percent (SCD4x only).
    pub humidity: Option<u8>,
    /// `co2_ppm >= CO2_THRESHOLD`.
    pub is_high: bool,
}

impl Reading {
    /// Build a reading, classifying CO2 against the threshold.
    pub const fn new(
        co2_ppm: u16,
        secondary: Secondary,
        humidity: Option<u8>,
    ) -> Self {
        Self {
            co2_ppm,
            secondary,
            humidity,
            is_high: is_high_co2(co2_ppm),
        }
    }

    /// Whether the secondary value is itself over its threshold.
    ///
    /// Only VOC has a threshold; temperature never raises an alert.
    pub const fn secondary_high(&self) -> bool {
        match self.secondary {
            Secondary::Voc(ppb) => is_high_voc(ppb),
            Secondary::Temperature(_) => false,
        }
    }

    /// Whether the alert LED should be lit.
    #[inline]
    pub const fn alert(&self) -> bool { self.is_high || self.secondary_high() }
}

// =============================================================================
// Errors
// =============================================================================

/// Recoverable sensor failure. The loop logs it and skips the tick.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// I2C transaction failed (NACK, arbitration loss, bus fault).
    Bus,
    /// A data word failed its CRC check.
    Crc,
    /// `read` was called without a latched sample.
    NotReady,
}

impl fmt::Display for SensorError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Bus => f.write_str("I2C bus error"),
            Self::Crc => f.write_str("CRC mismatch"),
            Self::NotReady => f.write_str("no sample ready"),
        }
    }
}

// =============================================================================
// Capability Trait
// =============================================================================

/// A gas sensor the monitor can poll.
pub trait GasSensor {
    /// Sensor family.
    const KIND: SensorKind;

    /// Whether readings are meaningless until the warm-up period has passed.
    ///
    /// The SGP30 returns fixed 400 ppm / 0 ppb for its first ~15 s. The SCD4x
    /// only raises its data-ready flag once a real measurement exists.
    const NEEDS_WARMUP: bool;

    /// Put the sensor into continuous measurement.
    async fn start_measurement(&mut self) -> Result<(), SensorError>;

    /// Non-blocking check for a fresh sample.
    async fn has_new_sample(&mut self) -> Result<bool, SensorError>;

    /// Latest sample. Call only after [`has_new_sample`](Self::has_new_sample)
    /// returned `true`.
    async fn read(&mut self) -> Result<Reading, SensorError>;

    /// Factory serial number (48 bits).
    async fn serial_number(&mut self) -> Result<u64, SensorError>;

    /// Current calibration baseline, if the sensor exposes one.
    async fn baseline(&mut self) -> Result<Option<BaselineRecord>, SensorError> { Ok(None) }

    /// Restore a previously saved calibration baseline.
    async fn restore_baseline(
        &mut self,
        record: BaselineRecord,
    ) -> Result<(), SensorError> {
        let _ = record;
        Ok(())
    }
}

// =============================================================================
// Scripted sensor for tests
// =============================================================================

#[cfg(test)]
pub mod scripted {
    use std::collections::VecDeque;
    use std::vec::Vec;

    use super::{GasSensor, Reading, SensorError, SensorKind};
    use crate::baseline::BaselineRecord;

    /// What the next `has_new_sample` call reports.
    #[derive(Clone, Copy, Debug)]
    pub enum Step {
        NotReady,
        Ready(Reading),
        Fail(SensorError),
    }

    /// Sensor that replays a fixed script. An exhausted script is "not ready".
    ///
    /// `WARMUP` selects the SGP30-like behaviour (needs warm-up, exposes a
    /// baseline) over the SCD4x-like one.
    pub struct ScriptedSensor<const WARMUP: bool = false> {
        script: VecDeque<Step>,
        latched: Option<Reading>,
        pub polls: usize,
        pub reads: usize,
        pub started: bool,
        pub baseline: BaselineRecord,
        pub baseline_reads: usize,
        pub restored: Vec<BaselineRecord>,
    }

    impl<const WARMUP: bool> ScriptedSensor<WARMUP> {
        pub fn new(script: impl IntoIterator<Item = Step>) -> Self {
            Self {
                script: script.into_iter().collect(),
                latched: None,
                polls: 0,
                reads: 0,
                started: false,
                baseline: BaselineRecord {
                    co2_baseline: 0x8F3A,
                    voc_baseline: 0x9114,
                },
                baseline_reads: 0,
                restored: Vec::new(),
            }
        }
    }

    impl<const WARMUP: bool> GasSensor for ScriptedSensor<WARMUP> {
        const KIND: SensorKind = if WARMUP { SensorKind::Sgp30 } else { SensorKind::Scd4x };
        const NEEDS_WARMUP: bool = WARMUP;

        async fn start_measurement(&mut self) -> Result<(), SensorError> {
            self.started = true;
            Ok(())
        }

        async fn has_new_sample(&mut self) -> Result<bool, SensorError> {
            self.polls += 1;
            match self.script.pop_front().unwrap_or(Step::NotReady) {
                Step::NotReady => Ok(false),
                Step::Ready(reading) => {
                    self.latched = Some(reading);
                    Ok(true)
                }
                Step::Fail(e) => Err(e),
            }
        }

        async fn read(&mut self) -> Result<Reading, SensorError> {
            self.reads += 1;
            self.latched.take().ok_or(SensorError::NotReady)
        }

        async fn serial_number(&mut self) -> Result<u64, SensorError> { Ok(0x0000_BEEF_CAFE) }

        async fn baseline(&mut self) -> Result<Option<BaselineRecord>, SensorError> {
            self.baseline_reads += 1;
            Ok(WARMUP.then_some(self.baseline))
        }

        async fn restore_baseline(
            &mut self,
            record: BaselineRecord,
        ) -> Result<(), SensorError> {
            self.restored.push(record);
            Ok(())
        }
    }
}
