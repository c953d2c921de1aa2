//! Sensirion I2C framing.
//!
//! Every Sensirion sensor speaks the same protocol: a big-endian 16-bit
//! command, optionally followed by data words, and responses made of 16-bit
//! words each followed by a CRC-8 byte (polynomial 0x31, init 0xFF).
//!
//! ```text
//! write: | CMD hi | CMD lo | W0 hi | W0 lo | CRC(W0) | ...
//! read:  | W0 hi | W0 lo | CRC(W0) | W1 hi | W1 lo | CRC(W1) | ...
//! ```
//!
//! Commands need an execution delay between the write and the read; the
//! caller passes it per command.

use crc_all::Crc;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;

use crate::sensor::SensorError;

/// Largest number of words read or written in one transfer.
pub const MAX_WORDS: usize = 6;

/// Bytes per word on the wire (2 data + 1 CRC).
const WORD_LEN: usize = 3;

// =============================================================================
// CRC
// =============================================================================

/// Sensirion CRC-8 (poly 0x31, init 0xFF, no reflection, no final XOR).
pub struct SensirionCrc {
    inner: Crc<u8>,
}

impl SensirionCrc {
    pub fn new() -> Self {
        Self {
            inner: Crc::<u8>::new(0x31, 8, 0xff, 0x00, false),
        }
    }

    pub fn calculate(
        &mut self,
        input: &[u8],
    ) -> u8 {
        self.inner.init();
        self.inner.update(input);
        self.inner.finish()
    }
}

impl Default for SensirionCrc {
    fn default() -> Self { Self::new() }
}

/// One-shot Sensirion CRC-8 over `data`.
pub fn crc8(data: &[u8]) -> u8 { SensirionCrc::new().calculate(data) }

// =============================================================================
// Bus
// =============================================================================

/// I2C bus plus delay source, speaking Sensirion framing.
pub struct SensirionI2c<I, D> {
    bus: I,
    delay: D,
    crc: SensirionCrc,
}

impl<I: I2c, D: DelayNs> SensirionI2c<I, D> {
    pub fn new(
        bus: I,
        delay: D,
    ) -> Self {
        Self {
            bus,
            delay,
            crc: SensirionCrc::new(),
        }
    }

    /// Release the bus and delay.
    pub fn release(self) -> (I, D) { (self.bus, self.delay) }

    /// Send a bare command and wait for it to execute.
    pub async fn write_command(
        &mut self,
        address: u8,
        command: u16,
        exec_ms: u32,
    ) -> Result<(), SensorError> {
        self.write_words::<0>(address, command, [], exec_ms).await
    }

    /// Send a command followed by CRC-protected data words.
    pub async fn write_words<const N: usize>(
        &mut self,
        address: u8,
        command: u16,
        words: [u16; N],
        exec_ms: u32,
    ) -> Result<(), SensorError> {
        const { assert!(N <= MAX_WORDS) };

        let mut buffer = [0u8; 2 + WORD_LEN * MAX_WORDS];
        buffer[..2].copy_from_slice(&command.to_be_bytes());
        for (i, word) in words.iter().enumerate() {
            let at = 2 + i * WORD_LEN;
            buffer[at..at + 2].copy_from_slice(&word.to_be_bytes());
            buffer[at + 2] = self.crc.calculate(&buffer[at..at + 2]);
        }

        self.bus
            .write(address, &buffer[..2 + WORD_LEN * N])
            .await
            .map_err(|_| SensorError::Bus)?;
        self.delay.delay_ms(exec_ms).await;
        Ok(())
    }

    /// Send a command, wait `exec_ms`, then read `N` CRC-checked words.
    pub async fn read_words<const N: usize>(
        &mut self,
        address: u8,
        command: u16,
        exec_ms: u32,
    ) -> Result<[u16; N], SensorError> {
        const { assert!(N <= MAX_WORDS) };

        self.bus
            .write(address, &command.to_be_bytes())
            .await
            .map_err(|_| SensorError::Bus)?;
        self.delay.delay_ms(exec_ms).await;

        let mut buffer = [0u8; WORD_LEN * MAX_WORDS];
        let raw = &mut buffer[..WORD_LEN * N];
        self.bus.read(address, raw).await.map_err(|_| SensorError::Bus)?;

        let mut words = [0u16; N];
        for (word, chunk) in words.iter_mut().zip(raw.chunks_exact(WORD_LEN)) {
            if self.crc.calculate(&chunk[..2]) != chunk[2] {
                return Err(SensorError::Crc);
            }
            *word = u16::from_be_bytes([chunk[0], chunk[1]]);
        }
        Ok(words)
    }
}

/// Combine three serial-number words into a 48-bit value.
#[inline]
pub const fn serial_from_words(words: [u16; 3]) -> u64 {
    (words[0] as u64) << 32 | (words[1] as u64) << 16 | words[2] as u64
}

// =============================================================================
// Fake bus for tests
// =============================================================================
