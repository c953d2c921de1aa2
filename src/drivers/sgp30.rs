//! Sensirion SGP30 multi-pixel gas sensor.
//!
//! The SGP30 runs a dynamic baseline compensation algorithm on chip. After
//! `Init_air_quality` it must be polled with `Measure_air_quality`; each poll
//! here triggers one measurement and latches it until [`GasSensor::read`].
//!
//! Its baseline converges over ~12 h and is lost on power-down, so the monitor
//! reads it out periodically and restores it at boot.

use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;
use micromath::F32;

use super::sensirion::{SensirionI2c, serial_from_words};
use crate::baseline::BaselineRecord;
use crate::config::sensors::{SGP30_COMPENSATION_CELSIUS, SGP30_COMPENSATION_RH};
use crate::sensor::{GasSensor, Reading, Secondary, SensorError, SensorKind};

const ADDRESS: u8 = 0x58;

#[allow(unused)]
#[repr(u16)]
#[derive(Clone, Copy, Debug)]
enum Command {
    InitAirQuality = 0x2003,
    MeasureAirQuality = 0x2008,
    GetBaseline = 0x2015,
    SetBaseline = 0x201e,
    SetHumidity = 0x2061,
    GetSerialId = 0x3682,
}

// Max execution times from the datasheet (ms)
const INIT_EXEC_MS: u32 = 10;
const MEASURE_EXEC_MS: u32 = 12;
const BASELINE_EXEC_MS: u32 = 10;
const HUMIDITY_EXEC_MS: u32 = 10;
const SERIAL_EXEC_MS: u32 = 1;

/// Absolute humidity in g/m³ from temperature and relative humidity
/// (Magnus formula, as given in the SGP30 driver integration guide).
pub fn absolute_humidity(
    celsius: f32,
    relative_humidity: f32,
) -> f32 {
    let saturation = 6.112 * F32(17.62 * celsius / (243.12 + celsius)).exp().0;
    216.7 * (relative_humidity / 100.0 * saturation) / (273.15 + celsius)
}

/// Absolute humidity as the sensor's 8.8 fixed-point word. Zero disables compensation.
pub fn humidity_word(grams_per_m3: f32) -> u16 { (grams_per_m3 * 256.0) as u16 }

/// SGP30 on an async I2C bus.
pub struct Sgp30<I, D> {
    i2c: SensirionI2c<I, D>,
    latched: Option<(u16, u16)>,
}

impl<I: I2c, D: DelayNs> Sgp30<I, D> {
    pub fn new(
        bus: I,
        delay: D,
    ) -> Self {
        Self {
            i2c: SensirionI2c::new(bus, delay),
            latched: None,
        }
    }

    pub fn release(self) -> (I, D) { self.i2c.release() }

    pub async fn init_air_quality(&mut self) -> Result<(), SensorError> {
        self.i2c
            .write_command(ADDRESS, Command::InitAirQuality as u16, INIT_EXEC_MS)
            .await
    }

    /// Trigger one measurement, returning `(eCO2 ppm, TVOC ppb)`.
    pub async fn measure_air_quality(&mut self) -> Result<(u16, u16), SensorError> {
        let [eco2, tvoc] = self
            .i2c
            .read_words::<2>(ADDRESS, Command::MeasureAirQuality as u16, MEASURE_EXEC_MS)
            .await?;
        Ok((eco2, tvoc))
    }

    pub async fn set_absolute_humidity(
        &mut self,
        grams_per_m3: f32,
    ) -> Result<(), SensorError> {
        self.i2c
            .write_words(
                ADDRESS,
                Command::SetHumidity as u16,
                [humidity_word(grams_per_m3)],
                HUMIDITY_EXEC_MS,
            )
            .await
    }
}

impl<I: I2c, D: DelayNs> GasSensor for Sgp30<I, D> {
    const KIND: SensorKind = SensorKind::Sgp30;
    const NEEDS_WARMUP: bool = true;

    async fn start_measurement(&mut self) -> Result<(), SensorError> {
        self.init_air_quality().await?;
        self.set_absolute_humidity(absolute_humidity(SGP30_COMPENSATION_CELSIUS, SGP30_COMPENSATION_RH))
            .await
    }

    async fn has_new_sample(&mut self) -> Result<bool, SensorError> {
        self.latched = Some(self.measure_air_quality().await?);
        Ok(true)
    }

    async fn read(&mut self) -> Result<Reading, SensorError> {
        let (eco2, tvoc) = self.latched.take().ok_or(SensorError::NotReady)?;
        Ok(Reading::new(eco2, Secondary::Voc(tvoc), None))
    }

    async fn serial_number(&mut self) -> Result<u64, SensorError> {
        let words = self
            .i2c
            .read_words::<3>(ADDRESS, Command::GetSerialId as u16, SERIAL_EXEC_MS)
            .await?;
        Ok(serial_from_words(words))
    }

    async fn baseline(&mut self) -> Result<Option<BaselineRecord>, SensorError> {
        let [co2_baseline, voc_baseline] = self
            .i2c
            .read_words::<2>(ADDRESS, Command::GetBaseline as u16, BASELINE_EXEC_MS)
            .await?;
        Ok(Some(BaselineRecord {
            co2_baseline,
            voc_baseline,
        }))
    }

    async fn restore_baseline(
        &mut self,
        record: BaselineRecord,
    ) -> Result<(), SensorError> {
        // TVOC first, then eCO2
        self.i2c
            .write_words(
                ADDRESS,
                Command::SetBaseline as u16,
                [record.voc_baseline, record.co2_baseline],
                BASELINE_EXEC_MS,
            )
            .await
    }
}
