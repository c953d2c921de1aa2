//! Log buffer with levels and timestamps.
//!
//! Keeps the most recent log lines in RAM so they can be read back with a
//! debug probe after the fact, and forwards every line to `defmt` (RTT) when
//! the `defmt` feature is enabled.
//!
//! # Log Levels
//!
//! - `Debug`: debugging information
//! - `Info`: normal operation (readings, baseline saves)
//! - `Warn`: recoverable failures (sensor tick skipped, storage unavailable)
//! - `Error`: failures that leave the monitor degraded
//!
//! # Usage
//!
//! ```ignore
//! log_info!("Serial number: {:x}", serial);
//! log_warn!("Error reading sensor: {}", err);
//! ```

use core::fmt::Write;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use heapless::String;

/// Maximum number of log entries to keep.
pub const LOG_ENTRIES: usize = 32;

/// Maximum characters per log message.
pub const LOG_MSG_LEN: usize = 64;

/// Log severity level.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[repr(u8)]
pub enum LogLevel {
    Debug = 1,
    #[default]
    Info = 2,
    Warn = 3,
    Error = 4,
}

impl LogLevel {
    /// Get the single-character prefix for this level.
    pub const fn prefix(self) -> char {
        match self {
            Self::Debug => 'D',
            Self::Info => 'I',
            Self::Warn => 'W',
            Self::Error => 'E',
        }
    }
}

/// A single log entry with level, message, and timestamp.
#[derive(Clone)]
pub struct LogEntry {
    /// Log severity level.
    pub level: LogLevel,
    /// Log message (truncated to LOG_MSG_LEN).
    pub message: String<LOG_MSG_LEN>,
    /// Timestamp in milliseconds since boot.
    pub timestamp_ms: u64,
}

impl LogEntry {
    /// Create a new log entry, truncating the message on a char boundary.
    pub fn new(
        level: LogLevel,
        message: &str,
        timestamp_ms: u64,
    ) -> Self {
        let mut msg: String<LOG_MSG_LEN> = String::new();
        for c in message.chars() {
            if msg.push(c).is_err() {
                break;
            }
        }
        Self {
            level,
            message: msg,
            timestamp_ms,
        }
    }
}

/// Circular buffer of log entries.
pub struct LogBuffer {
    entries: [LogEntry; LOG_ENTRIES],
    head: usize, // Next write position
    count: usize,
}

impl LogBuffer {
    /// Create a new empty log buffer.
    pub const fn new() -> Self {
        Self {
            entries: [const {
                LogEntry {
                    level: LogLevel::Info,
                    message: String::new(),
                    timestamp_ms: 0,
                }
            }; LOG_ENTRIES],
            head: 0,
            count: 0,
        }
    }

    /// Push a new log entry. Oldest entry is dropped if buffer is full.
    pub fn push(
        &mut self,
        entry: LogEntry,
    ) {
        self.entries[self.head] = entry;
        self.head = (self.head + 1) % LOG_ENTRIES;
        if self.count < LOG_ENTRIES {
            self.count += 1;
        }
    }

    /// Get the number of entries in the buffer.
    #[inline]
    pub const fn len(&self) -> usize { self.count }

    /// Check if buffer is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool { self.count == 0 }

    /// Check if any retained entry at `level` contains `needle`.
    pub fn contains(
        &self,
        level: LogLevel,
        needle: &str,
    ) -> bool {
        self.iter().any(|e| e.level == level && e.message.contains(needle))
    }

    /// Iterate over entries from oldest to newest.
    pub fn iter(&self) -> LogBufferIter<'_> {
        let start = if self.count < LOG_ENTRIES { 0 } else { self.head };
        LogBufferIter {
            buffer: self,
            pos: start,
            remaining: self.count,
        }
    }
}

impl Default for LogBuffer {
    fn default() -> Self { Self::new() }
}

/// Iterator over log buffer entries (oldest to newest).
pub struct LogBufferIter<'a> {
    buffer: &'a LogBuffer,
    pos: usize,
    remaining: usize,
}

impl<'a> Iterator for LogBufferIter<'a> {
    type Item = &'a LogEntry;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let entry = &self.buffer.entries[self.pos];
        self.pos = (self.pos + 1) % LOG_ENTRIES;
        self.remaining -= 1;
        Some(entry)
    }
}

/// Global log buffer protected by a mutex.
pub static LOG_BUFFER: Mutex<CriticalSectionRawMutex, LogBuffer> = Mutex::new(LogBuffer::new());

/// Get the current timestamp in milliseconds for logging.
#[inline]
pub fn current_timestamp_ms() -> u64 { embassy_time::Instant::now().as_millis() }

/// Number of `try_lock` attempts before a log line is given up on.
const LOCK_ATTEMPTS: usize = 64;

/// Push a log entry to the global buffer.
///
/// This is non-blocking - if the mutex stays held, the log is dropped.
pub fn push_log(
    level: LogLevel,
    message: &str,
) {
    let entry = LogEntry::new(level, message, current_timestamp_ms());

    for _ in 0..LOCK_ATTEMPTS {
        if let Ok(mut buffer) = LOG_BUFFER.try_lock() {
            buffer.push(entry);
            return;
        }
        core::hint::spin_loop();
    }
}

/// Format `args` into a bounded line and push it. Overlong lines are truncated.
pub fn push_fmt(
    level: LogLevel,
    args: core::fmt::Arguments<'_>,
) {
    let mut buf: String<LOG_MSG_LEN> = String::new();
    let _ = buf.write_fmt(args);
    push_log(level, buf.as_str());
}

/// Check the global buffer for a message. Returns `false` if the buffer stays busy.
pub fn logged(
    level: LogLevel,
    needle: &str,
) -> bool {
    for _ in 0..LOCK_ATTEMPTS {
        if let Ok(buffer) = LOG_BUFFER.try_lock() {
            return buffer.contains(level, needle);
        }
        core::hint::spin_loop();
    }
    false
}

/// Log a message at Info level.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {{
        $crate::log_buffer::push_fmt($crate::log_buffer::LogLevel::Info, format_args!($($arg)*));
        #[cfg(feature = "defmt")]
        defmt::info!($($arg)*);
    }};
}

/// Log a message at Warn level.
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {{
        $crate::log_buffer::push_fmt($crate::log_buffer::LogLevel::Warn, format_args!($($arg)*));
        #[cfg(feature = "defmt")]
        defmt::warn!($($arg)*);
    }};
}

/// Log a message at Error level.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {{
        $crate::log_buffer::push_fmt($crate::log_buffer::LogLevel::Error, format_args!($($arg)*));
        #[cfg(feature = "defmt")]
        defmt::error!($($arg)*);
    }};
}

/// Log a message at Debug level.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {{
        $crate::log_buffer::push_fmt($crate::log_buffer::LogLevel::Debug, format_args!($($arg)*));
        #[cfg(feature = "defmt")]
        defmt::debug!($($arg)*);
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_truncates_long_message() {
        let long = "x".repeat(LOG_MSG_LEN * 2);
        let entry = LogEntry::new(LogLevel::Info, &long, 0);
        assert_eq!(entry.message.len(), LOG_MSG_LEN);
    }

    #[test]
    fn test_buffer_wraps_and_keeps_newest() {
        let mut buffer = LogBuffer::new();
        for i in 0..(LOG_ENTRIES + 3) {
            let mut msg: String<8> = String::new();
            let _ = write!(msg, "m{i}");
            buffer.push(LogEntry::new(LogLevel::Info, &msg, i as u64));
        }
        assert_eq!(buffer.len(), LOG_ENTRIES);
        let first = buffer.iter().next().map(|e| e.timestamp_ms);
        assert_eq!(first, Some(3));
        assert!(buffer.contains(LogLevel::Info, "m34"));
        assert!(!buffer.iter().any(|e| e.message.as_str() == "m2"));
    }

    #[test]
    fn test_contains_filters_by_level() {
        let mut buffer = LogBuffer::new();
        buffer.push(LogEntry::new(LogLevel::Warn, "storage is read-only", 1));
        assert!(buffer.contains(LogLevel::Warn, "read-only"));
        assert!(!buffer.contains(LogLevel::Info, "read-only"));
    }

    #[test]
    fn test_macro_reaches_global_buffer() {
        log_error!("macro check {}", 4711);
        assert!(logged(LogLevel::Error, "macro check 4711"));
    }
}
