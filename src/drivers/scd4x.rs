//! Sensirion SCD40/SCD41 CO2 sensor.
//!
//! Runs in periodic measurement mode: a new sample every 5 s, signalled by the
//! data-ready status word.

use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;

use super::sensirion::{SensirionI2c, serial_from_words};
use crate::sensor::{GasSensor, Reading, Secondary, SensorError, SensorKind};

const ADDRESS: u8 = 0x62;

#[allow(unused)]
#[repr(u16)]
#[derive(Clone, Copy, Debug)]
enum Command {
    StartPeriodicMeasurement = 0x21b1,
    StopPeriodicMeasurement = 0x3f86,
    ReadMeasurement = 0xec05,
    GetSerialNumber = 0x3682,
    GetDataReady = 0xe4b8,
}

/// Time the sensor needs after a stop before it accepts commands again.
const STOP_SETTLE_MS: u32 = 500;

/// Execution time of read-type commands.
const READ_EXEC_MS: u32 = 1;

/// Lower 11 bits of the data-ready word are non-zero when a sample is waiting.
const DATA_READY_MASK: u16 = 0x07FF;

/// Raw measurement in SI units.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Measurement {
    pub co2: u16,
    pub celsius: f32,
    pub humidity: f32,
}

impl Measurement {
    fn from_words(words: [u16; 3]) -> Self {
        Self {
            co2: words[0],
            celsius: -45.0 + 175.0 * f32::from(words[1]) / f32::from(u16::MAX),
            humidity: 100.0 * f32::from(words[2]) / f32::from(u16::MAX),
        }
    }

    /// Temperature in whole degrees Fahrenheit, truncated toward zero.
    pub fn fahrenheit(&self) -> i16 { (self.celsius * 9.0 / 5.0 + 32.0) as i16 }

    /// Relative humidity in whole percent, truncated.
    pub fn humidity_percent(&self) -> u8 { self.humidity as u8 }
}

/// SCD4x on an async I2C bus.
pub struct Scd4x<I, D> {
    i2c: SensirionI2c<I, D>,
}

impl<I: I2c, D: DelayNs> Scd4x<I, D> {
    pub fn new(
        bus: I,
        delay: D,
    ) -> Self {
        Self {
            i2c: SensirionI2c::new(bus, delay),
        }
    }

    pub fn release(self) -> (I, D) { self.i2c.release() }

    pub async fn stop_periodic_measurement(&mut self) -> Result<(), SensorError> {
        self.i2c
            .write_command(ADDRESS, Command::StopPeriodicMeasurement as u16, STOP_SETTLE_MS)
            .await
    }

    pub async fn start_periodic_measurement(&mut self) -> Result<(), SensorError> {
        self.i2c
            .write_command(ADDRESS, Command::StartPeriodicMeasurement as u16, 0)
            .await
    }

    pub async fn read_measurement(&mut self) -> Result<Measurement, SensorError> {
        let words = self
            .i2c
            .read_words::<3>(ADDRESS, Command::ReadMeasurement as u16, READ_EXEC_MS)
            .await?;
        Ok(Measurement::from_words(words))
    }
}

impl<I: I2c, D: DelayNs> GasSensor for Scd4x<I, D> {
    const KIND: SensorKind = SensorKind::Scd4x;
    const NEEDS_WARMUP: bool = false;

    async fn start_measurement(&mut self) -> Result<(), SensorError> {
        // A warm reset leaves periodic mode running, which rejects a new start
        self.stop_periodic_measurement().await?;
        self.start_periodic_measurement().await
    }

    async fn has_new_sample(&mut self) -> Result<bool, SensorError> {
        let [status] = self
            .i2c
            .read_words::<1>(ADDRESS, Command::GetDataReady as u16, READ_EXEC_MS)
            .await?;
        Ok(status & DATA_READY_MASK != 0)
    }

    async fn read(&mut self) -> Result<Reading, SensorError> {
        let m = self.read_measurement().await?;
        Ok(Reading::new(
            m.co2,
            Secondary::Temperature(m.fahrenheit()),
            Some(m.humidity_percent()),
        ))
    }

    async fn serial_number(&mut self) -> Result<u64, SensorError> {
        let words = self
            .i2c
            .read_words::<3>(ADDRESS, Command::GetSerialNumber as u16, READ_EXEC_MS)
            .await?;
        Ok(serial_from_words(words))
    }
}
