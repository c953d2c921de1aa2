//! Durable calibration baseline.
//!
//! A gas sensor drifts and corrects itself with an internal baseline. Persisting
//! that baseline lets a warm restart skip the multi-hour re-calibration from
//! factory defaults. The store favours availability over strictness: a missing,
//! corrupt or unreadable record is "start fresh", and a read-only medium turns
//! saving into a logged no-op.
//!
//! # Record Format
//!
//! ```text
//! | MAGIC (2) | LEN (1) | postcard payload (LEN) | CRC-8 over LEN + payload (1) |
//! ```
//!
//! The payload is a postcard-encoded [`BaselineRecord`]. Erased flash (all
//! `0xFF`) is reported as a missing record rather than a corrupt one.

use core::fmt;

use embassy_time::Duration;
use serde::{Deserialize, Serialize};

use crate::config::CALIBRATION_TIME;
use crate::drivers::sensirion::crc8;

// =============================================================================
// Record
// =============================================================================

/// Sensor baseline pair as reported by the sensor (raw register values).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BaselineRecord {
    pub co2_baseline: u16,
    pub voc_baseline: u16,
}

/// Frame marker, distinguishes a record from erased or foreign data.
const MAGIC: [u8; 2] = [0xB5, 0x30];

/// Header size: magic + length byte.
const HEADER_LEN: usize = MAGIC.len() + 1;

/// Maximum frame size (two u16 varints are at most 3 bytes each).
pub const FRAME_LEN: usize = 16;

// =============================================================================
// Storage Collaborator
// =============================================================================

/// Failure reported by a [`Storage`] backend.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// No record has ever been written.
    NotFound,
    /// Medium is mounted read-only.
    ReadOnly,
    /// Any other device failure.
    Io,
}

impl fmt::Display for StorageError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::NotFound => f.write_str("not found"),
            Self::ReadOnly => f.write_str("read-only"),
            Self::Io => f.write_str("I/O error"),
        }
    }
}

/// Small blocking key-value slot holding one record.
pub trait Storage {
    /// Read the stored bytes into `buf`, returning how many were read.
    fn read(
        &mut self,
        buf: &mut [u8],
    ) -> Result<usize, StorageError>;

    /// Replace the stored bytes with `data`.
    fn write(
        &mut self,
        data: &[u8],
    ) -> Result<(), StorageError>;
}

// =============================================================================
// Errors and Outcomes
// =============================================================================

/// Why a load produced no record. Never escapes [`BaselineStore::load`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LoadError {
    /// Nothing stored yet.
    Missing,
    /// Stored bytes are not a valid record.
    Malformed,
    /// Storage failed for another reason.
    Io(StorageError),
}

impl fmt::Display for LoadError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Missing => f.write_str("no stored baseline"),
            Self::Malformed => f.write_str("stored baseline is malformed"),
            Self::Io(e) => write!(f, "storage {e}"),
        }
    }
}

/// Save failure the caller should log.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SaveError {
    /// Record could not be serialized into a frame.
    Encode,
    /// Storage write failed (other than read-only).
    Storage(StorageError),
}

impl fmt::Display for SaveError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Encode => f.write_str("encode failed"),
            Self::Storage(e) => write!(f, "storage {e}"),
        }
    }
}

/// What a successful [`BaselineStore::save`] call did.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SaveOutcome {
    /// Calibration has not converged yet; storage untouched.
    Skipped,
    /// Record written.
    Written,
    /// Medium is read-only; calibration continues in memory only.
    ReadOnly,
}

// =============================================================================
// Store
// =============================================================================

/// Owns the durable baseline record.
pub struct BaselineStore<S: Storage> {
    storage: S,
}

impl<S: Storage> BaselineStore<S> {
    pub const fn new(storage: S) -> Self { Self { storage } }

    /// Load the stored record. Every failure is logged and becomes `None`.
    pub fn load(&mut self) -> Option<BaselineRecord> {
        match self.try_load() {
            Ok(record) => {
                log_info!(
                    "Loaded stored baseline: eCO2 0x{:x}, TVOC 0x{:x}",
                    record.co2_baseline,
                    record.voc_baseline
                );
                Some(record)
            }
            Err(LoadError::Missing) => {
                log_info!("No stored baseline found - starting fresh calibration");
                None
            }
            Err(LoadError::Malformed) => {
                log_warn!("Stored baseline malformed - starting fresh calibration");
                None
            }
            Err(LoadError::Io(e)) => {
                log_warn!("Baseline storage {} - starting fresh calibration", e);
                None
            }
        }
    }

    /// Load the stored record, reporting why there is none.
    pub fn try_load(&mut self) -> Result<BaselineRecord, LoadError> {
        let mut frame = [0u8; FRAME_LEN];
        let len = match self.storage.read(&mut frame) {
            Ok(len) => len.min(FRAME_LEN),
            Err(StorageError::NotFound) => return Err(LoadError::Missing),
            Err(e) => return Err(LoadError::Io(e)),
        };
        decode_frame(&frame[..len])
    }

    /// Persist `record` once calibration has converged.
    ///
    /// `elapsed` is uptime since boot. At or below [`CALIBRATION_TIME`] this is a
    /// no-op. A read-only medium is logged and reported as
    /// [`SaveOutcome::ReadOnly`], not as an error.
    pub fn save(
        &mut self,
        record: BaselineRecord,
        elapsed: Duration,
    ) -> Result<SaveOutcome, SaveError> {
        if elapsed <= CALIBRATION_TIME {
            return Ok(SaveOutcome::Skipped);
        }

        let mut frame = [0u8; FRAME_LEN];
        let len = encode_frame(&record, &mut frame)?;

        match self.storage.write(&frame[..len]) {
            Ok(()) => {
                log_info!(
                    "Saved new baseline values: eCO2 0x{:x}, TVOC 0x{:x}",
                    record.co2_baseline,
                    record.voc_baseline
                );
                Ok(SaveOutcome::Written)
            }
            Err(StorageError::ReadOnly) => {
                log_warn!("Could not save baseline - storage is read-only");
                Ok(SaveOutcome::ReadOnly)
            }
            Err(e) => Err(SaveError::Storage(e)),
        }
    }
}

// =============================================================================
// Framing
// =============================================================================

fn encode_frame(
    record: &BaselineRecord,
    frame: &mut [u8; FRAME_LEN],
) -> Result<usize, SaveError> {
    let payload_len = {
        let (_, rest) = frame.split_at_mut(HEADER_LEN);
        // Leave room for the trailing CRC byte
        let room = rest.len() - 1;
        postcard::to_slice(record, &mut rest[..room]).map_err(|_| SaveError::Encode)?.len()
    };

    frame[..MAGIC.len()].copy_from_slice(&MAGIC);
    frame[MAGIC.len()] = payload_len as u8;
    let crc_at = HEADER_LEN + payload_len;
    frame[crc_at] = crc8(&frame[MAGIC.len()..crc_at]);
    Ok(crc_at + 1)
}

fn decode_frame(frame: &[u8]) -> Result<BaselineRecord, LoadError> {
    if frame.is_empty() || frame.iter().all(|&b| b == 0xFF) {
        return Err(LoadError::Missing);
    }
    if frame.len() < HEADER_LEN + 1 || frame[..MAGIC.len()] != MAGIC {
        return Err(LoadError::Malformed);
    }

    let payload_len = usize::from(frame[MAGIC.len()]);
    let crc_at = HEADER_LEN + payload_len;
    if crc_at >= frame.len() {
        return Err(LoadError::Malformed);
    }
    if crc8(&frame[MAGIC.len()..crc_at]) != frame[crc_at] {
        return Err(LoadError::Malformed);
    }

    postcard::from_bytes(&frame[HEADER_LEN..crc_at]).map_err(|_| LoadError::Malformed)
}

// =============================================================================
// In-memory storage for tests
// =============================================================================

#[cfg(test)]
pub mod mem {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::vec::Vec;

    use super::{Storage, StorageError};

    #[derive(Default)]
    struct Inner {
        data: Option<Vec<u8>>,
        read_only: bool,
        fail_reads: bool,
        fail_writes: bool,
        writes: usize,
    }

    /// RAM-backed [`Storage`]; clones share the same slot.
    #[derive(Clone, Default)]
    pub struct MemStorage {
        inner: Rc<RefCell<Inner>>,
    }

    impl MemStorage {
        pub fn new() -> Self { Self::default() }

        pub fn with_bytes(bytes: &[u8]) -> Self {
            let storage = Self::new();
            storage.inner.borrow_mut().data = Some(bytes.to_vec());
            storage
        }

        pub fn set_read_only(
            &self,
            read_only: bool,
        ) {
            self.inner.borrow_mut().read_only = read_only;
        }

        pub fn set_fail_reads(
            &self,
            fail: bool,
        ) {
            self.inner.borrow_mut().fail_reads = fail;
        }

        pub fn set_fail_writes(
            &self,
            fail: bool,
        ) {
            self.inner.borrow_mut().fail_writes = fail;
        }

        pub fn bytes(&self) -> Option<Vec<u8>> { self.inner.borrow().data.clone() }

        pub fn writes(&self) -> usize { self.inner.borrow().writes }
    }

    impl Storage for MemStorage {
        fn read(
            &mut self,
            buf: &mut [u8],
        ) -> Result<usize, StorageError> {
            let inner = self.inner.borrow();
            if inner.fail_reads {
                return Err(StorageError::Io);
            }
            let data = inner.data.as_ref().ok_or(StorageError::NotFound)?;
            let len = data.len().min(buf.len());
            buf[..len].copy_from_slice(&data[..len]);
            Ok(len)
        }

        fn write(
            &mut self,
            data: &[u8],
        ) -> Result<(), StorageError> {
            let mut inner = self.inner.borrow_mut();
            if inner.read_only {
                return Err(StorageError::ReadOnly);
            }
            if inner.fail_writes {
                return Err(StorageError::Io);
            }
            inner.data = Some(data.to_vec());
            inner.writes += 1;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mem::MemStorage;
    use super::*;
    use crate::log_buffer::{LogLevel, logged};

    const RECORD: BaselineRecord = BaselineRecord {
        co2_baseline: 0x8F3A,
        voc_baseline: 0x9114,
    };

    fn calibrated() -> Duration { CALIBRATION_TIME + Duration::from_secs(1) }

    #[test]
    fn test_save_then_load_round_trips_after_calibration() {
        let storage = MemStorage::new();
        let mut store = BaselineStore::new(storage.clone());

        assert_eq!(store.save(RECORD, calibrated()), Ok(SaveOutcome::Written));
        assert_eq!(store.load(), Some(RECORD));

        // A fresh store over the same medium sees the record too (warm restart)
        let mut restarted = BaselineStore::new(storage);
        assert_eq!(restarted.load(), Some(RECORD));
    }

    #[test]
    fn test_save_before_calibration_is_noop() {
        let storage = MemStorage::new();
        let mut store = BaselineStore::new(storage.clone());

        assert_eq!(store.save(RECORD, CALIBRATION_TIME), Ok(SaveOutcome::Skipped));
        assert_eq!(storage.writes(), 0);
        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_save_before_calibration_keeps_previous_record() {
        let storage = MemStorage::new();
        let mut store = BaselineStore::new(storage.clone());
        store.save(RECORD, calibrated()).ok();

        let newer = BaselineRecord {
            co2_baseline: 1,
            voc_baseline: 2,
        };
        assert_eq!(store.save(newer, Duration::from_secs(60)), Ok(SaveOutcome::Skipped));
        assert_eq!(store.load(), Some(RECORD));
        assert_eq!(storage.writes(), 1);
    }

    #[test]
    fn test_load_missing_is_none_and_logged() {
        let mut store = BaselineStore::new(MemStorage::new());
        assert_eq!(store.try_load(), Err(LoadError::Missing));
        assert_eq!(store.load(), None);
        assert!(logged(LogLevel::Info, "No stored baseline found"));
    }

    #[test]
    fn test_load_erased_flash_is_missing() {
        let mut store = BaselineStore::new(MemStorage::with_bytes(&[0xFF; FRAME_LEN]));
        assert_eq!(store.try_load(), Err(LoadError::Missing));
    }

    #[test]
    fn test_load_rejects_corrupt_frames() {
        let storage = MemStorage::new();
        let mut store = BaselineStore::new(storage.clone());
        store.save(RECORD, calibrated()).ok();
        let good = storage.bytes().unwrap_or_default();

        // Flipped payload bit fails the CRC
        let mut flipped = good.clone();
        flipped[HEADER_LEN] ^= 0x01;
        let mut store = BaselineStore::new(MemStorage::with_bytes(&flipped));
        assert_eq!(store.try_load(), Err(LoadError::Malformed));

        // Foreign data without the marker
        let mut store = BaselineStore::new(MemStorage::with_bytes(b"{\"eCO2\": 1}"));
        assert_eq!(store.try_load(), Err(LoadError::Malformed));
        assert_eq!(store.load(), None);

        // Truncated record (field missing)
        let mut store = BaselineStore::new(MemStorage::with_bytes(&good[..good.len() - 2]));
        assert_eq!(store.try_load(), Err(LoadError::Malformed));
    }

    #[test]
    fn test_load_io_error_is_none() {
        let storage = MemStorage::new();
        storage.set_fail_reads(true);
        let mut store = BaselineStore::new(storage);
        assert_eq!(store.try_load(), Err(LoadError::Io(StorageError::Io)));
        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_read_only_save_is_silent() {
        let storage = MemStorage::new();
        storage.set_read_only(true);
        let mut store = BaselineStore::new(storage.clone());

        assert_eq!(store.save(RECORD, calibrated()), Ok(SaveOutcome::ReadOnly));
        assert_eq!(storage.bytes(), None);
        assert!(logged(LogLevel::Warn, "storage is read-only"));
    }
}
