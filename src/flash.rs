//! Baseline record storage in the last sector of on-board flash.
//!
//! The sector is reserved in `memory.x` (FLASH length is 4 MiB minus 4 KiB),
//! so the program image can never grow into it. A write erases the sector and
//! programs one page holding the framed record.

use co2_monitor::baseline::FRAME_LEN;
use co2_monitor::{Storage, StorageError};
use embassy_rp::flash::{Blocking, Flash};
use embassy_rp::peripherals::FLASH;

/// Pico 2 on-board QSPI flash size.
pub const FLASH_SIZE: usize = 4 * 1024 * 1024;

/// Flash erase granularity.
const SECTOR_SIZE: u32 = 4096;

/// Flash program granularity.
const PAGE_SIZE: usize = 256;

/// Offset of the reserved baseline sector.
const BASELINE_OFFSET: u32 = FLASH_SIZE as u32 - SECTOR_SIZE;

const _: () = assert!(FRAME_LEN <= PAGE_SIZE);

/// [`Storage`] over the reserved flash sector.
pub struct FlashStorage<'d> {
    flash: Flash<'d, FLASH, Blocking, FLASH_SIZE>,
    read_only: bool,
}

impl<'d> FlashStorage<'d> {
    /// Wrap the flash. With `read_only` every write reports [`StorageError::ReadOnly`].
    pub fn new(
        flash: Flash<'d, FLASH, Blocking, FLASH_SIZE>,
        read_only: bool,
    ) -> Self {
        Self { flash, read_only }
    }
}

impl Storage for FlashStorage<'_> {
    fn read(
        &mut self,
        buf: &mut [u8],
    ) -> Result<usize, StorageError> {
        let len = buf.len().min(FRAME_LEN);
        self.flash
            .blocking_read(BASELINE_OFFSET, &mut buf[..len])
            .map_err(|_| StorageError::Io)?;
        Ok(len)
    }

    fn write(
        &mut self,
        data: &[u8],
    ) -> Result<(), StorageError> {
        if self.read_only {
            return Err(StorageError::ReadOnly);
        }
        if data.len() > PAGE_SIZE {
            return Err(StorageError::Io);
        }

        let mut page = [0xFFu8; PAGE_SIZE];
        page[..data.len()].copy_from_slice(data);

        self.flash
            .blocking_erase(BASELINE_OFFSET, BASELINE_OFFSET + SECTOR_SIZE)
            .map_err(|_| StorageError::Io)?;
        self.flash
            .blocking_write(BASELINE_OFFSET, &page)
            .map_err(|_| StorageError::Io)
    }
}
