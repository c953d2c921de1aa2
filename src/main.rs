//! CO2 Monitor Firmware for Raspberry Pi Pico 2 (RP2350)
//!
//! Polls a Sensirion gas sensor over I2C and shows the reading on a 1.44"
//! ST7735R 128x128 TFT. The background turns white and the alert LED lights up
//! while CO2 is at or above the threshold.
//!
//! # Sensors
//!
//! - Default: SCD4x (CO2, temperature, humidity)
//! - `--features sgp30`: SGP30 (eCO2, TVOC) with baseline persistence
//!
//! # Wiring
//!
//! - I2C0: SDA GPIO4, SCL GPIO5 (100 kHz)
//! - Display: see [`display`]
//! - Alert LED: GPIO15 (active-high)
//! - Button A: GPIO12 (active-low), hold at boot to mount baseline storage read-only

#![no_std]
#![no_main]
// Crate-level lints (match lib.rs for consistency)
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

// Modules only used in the binary (not testable on host)
mod display;
mod flash;

#[cfg(not(feature = "sgp30"))]
use co2_monitor::drivers::Scd4x;
#[cfg(feature = "sgp30")]
use co2_monitor::drivers::Sgp30;
use co2_monitor::surface::GraphicsSurface;
use co2_monitor::time::{EmbassyClock, EmbassySleeper};
use co2_monitor::{BaselineStore, Monitor};
use defmt::info;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::flash::Flash;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_rp::spi::Spi;
use embassy_time::{Delay, Timer};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use crate::display::{SPI_BUFFER_LEN, display_spi_config, init_display};
use crate::flash::{FLASH_SIZE, FlashStorage};

// Program metadata for `picotool info`
#[unsafe(link_section = ".bi_entries")]
#[used]
pub static PICOTOOL_ENTRIES: [embassy_rp::binary_info::EntryAddr; 4] = [
    embassy_rp::binary_info::rp_program_name!(c"co2-monitor"),
    embassy_rp::binary_info::rp_program_description!(c"CO2 / VOC monitor on ST7735R 128x128 display"),
    embassy_rp::binary_info::rp_cargo_version!(),
    embassy_rp::binary_info::rp_program_build_attribute!(),
];

bind_interrupts!(struct Irqs {
    I2C0_IRQ => i2c::InterruptHandler<I2C0>;
});

/// Staging buffer for mipidsi SPI transfers.
static SPI_BUFFER: StaticCell<[u8; SPI_BUFFER_LEN]> = StaticCell::new();

/// Sensirion sensors are specified for standard-mode I2C.
const I2C_FREQUENCY: u32 = 100_000;

/// Button is sampled this many times at boot; all samples must read pressed.
const BUTTON_SAMPLES: u32 = 5;

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("CO2 monitor starting...");

    let p = embassy_rp::init(Default::default());

    // Alert LED off until the first reading
    let led = Output::new(p.PIN_15, Level::Low);

    // Button A held at boot: treat baseline storage as read-only
    let btn_a = Input::new(p.PIN_12, Pull::Up);
    let mut held = 0;
    for _ in 0..BUTTON_SAMPLES {
        if btn_a.is_low() {
            held += 1;
        }
        Timer::after_millis(10).await;
    }
    let read_only = held == BUTTON_SAMPLES;
    if read_only {
        info!("Button A held - baseline storage is read-only");
    }

    let flash = Flash::<_, _, FLASH_SIZE>::new_blocking(p.FLASH);
    let store = BaselineStore::new(FlashStorage::new(flash, read_only));

    // Display: CS=17, DC=16, CLK=18, MOSI=19, RST=9, Backlight=20
    let cs = Output::new(p.PIN_17, Level::High);
    let dc = Output::new(p.PIN_16, Level::Low);
    let rst = Output::new(p.PIN_9, Level::High);
    let _backlight = Output::new(p.PIN_20, Level::High);
    let spi = Spi::new_blocking_txonly(p.SPI0, p.PIN_18, p.PIN_19, display_spi_config());
    let buffer = SPI_BUFFER.init([0; SPI_BUFFER_LEN]);
    let surface = GraphicsSurface::new(init_display(spi, cs, dc, rst, buffer));

    info!("Display initialized!");

    // Sensor on I2C0: SDA=4, SCL=5
    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = I2C_FREQUENCY;
    let bus = I2c::new_async(p.I2C0, p.PIN_5, p.PIN_4, Irqs, i2c_config);

    #[cfg(not(feature = "sgp30"))]
    let sensor = Scd4x::new(bus, Delay);
    #[cfg(feature = "sgp30")]
    let sensor = Sgp30::new(bus, Delay);

    let mut monitor = Monitor::new(sensor, surface, store, EmbassyClock, led);

    info!("Starting main loop...");
    monitor.run(&mut EmbassySleeper).await
}
