//! Display driver for the 1.44" ST7735R 128x128 TFT breakout.
//!
//! Pin mapping:
//! - DC: GPIO16
//! - CS: GPIO17
//! - CLK: GPIO18 (SPI0 CLK)
//! - MOSI: GPIO19 (SPI0 TX)
//! - Backlight: GPIO20
//! - Reset: GPIO9

use co2_monitor::config::layout::{PANEL_COLUMN_OFFSET, PANEL_ROW_OFFSET, SCREEN_HEIGHT, SCREEN_WIDTH};
use embassy_rp::gpio::Output;
use embassy_rp::peripherals::SPI0;
use embassy_rp::spi::{Blocking, Config as SpiConfig, Spi};
use embedded_hal_bus::spi::{ExclusiveDevice, NoDelay};
use mipidsi::Builder;
use mipidsi::interface::SpiInterface;
use mipidsi::models::ST7735s;
use mipidsi::options::ColorOrder;

/// Size of the SPI staging buffer mipidsi batches pixels through.
pub const SPI_BUFFER_LEN: usize = 512;

/// Display type alias for the ST7735R on SPI0.
pub type MonitorDisplay<'d> = mipidsi::Display<
    SpiInterface<'d, ExclusiveDevice<Spi<'d, SPI0, Blocking>, Output<'d>, NoDelay>, Output<'d>>,
    ST7735s,
    Output<'d>,
>;

/// Initialize the ST7735R.
///
/// Returns the initialized display ready for drawing.
pub fn init_display<'d>(
    spi: Spi<'d, SPI0, Blocking>,
    cs: Output<'d>,
    dc: Output<'d>,
    rst: Output<'d>,
    buffer: &'d mut [u8],
) -> MonitorDisplay<'d> {
    let spi_device = defmt::unwrap!(ExclusiveDevice::new_no_delay(spi, cs));
    let di = SpiInterface::new(spi_device, dc, buffer);

    // 128x128 window sits at column 2, row 1 of the controller's 132x162 RAM
    defmt::unwrap!(
        Builder::new(ST7735s, di)
            .reset_pin(rst)
            .display_size(SCREEN_WIDTH as u16, SCREEN_HEIGHT as u16)
            .display_offset(PANEL_COLUMN_OFFSET, PANEL_ROW_OFFSET)
            .color_order(ColorOrder::Bgr)
            .init(&mut embassy_time::Delay)
            .map_err(|_| "display init failed")
    )
}

/// SPI configuration for the ST7735R.
///
/// The ST7735R write cycle is 66 ns minimum (~15 MHz).
pub fn display_spi_config() -> SpiConfig {
    let mut config = SpiConfig::default();
    config.frequency = 15_000_000;
    config
}
