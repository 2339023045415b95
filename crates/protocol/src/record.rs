//! Log record type and its delimiter-separated wire form
//!
//! A record travels as one segment of the post-handshake byte stream
//! (segments are separated by [`RECORD_SEPARATOR`](crate::RECORD_SEPARATOR)).
//! Within a segment, fields are joined by [`FIELD_SEPARATOR`](crate::FIELD_SEPARATOR)
//! in a fixed order. There is no escaping: field values must not contain
//! either separator.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::FIELD_SEPARATOR;

/// Severity of a log record
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    #[default]
    Info = 2,
    Warning = 3,
    Error = 4,
    Fatal = 5,
}

impl LogLevel {
    /// Parse from the wire value. Unknown values map to `Info`.
    #[inline]
    pub const fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Trace,
            1 => Self::Debug,
            2 => Self::Info,
            3 => Self::Warning,
            4 => Self::Error,
            5 => Self::Fatal,
            _ => Self::Info, // Default to Info for unknown values
        }
    }

    /// Uppercase label, fixed width friendly
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "TRACE",
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARN",
            Self::Error => "ERROR",
            Self::Fatal => "FATAL",
        }
    }

    /// True for `Error` and `Fatal`
    #[inline]
    pub const fn is_error(self) -> bool {
        matches!(self, Self::Error | Self::Fatal)
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One parsed or locally synthesized log entry
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// Name of the thread that produced the entry (may be empty)
    pub thread_name: String,
    /// Numeric id of that thread, 0 when unknown
    pub thread_id: i64,
    /// Severity
    pub level: LogLevel,
    /// Milliseconds since the Unix epoch
    pub timestamp_ms: i64,
    /// Free-text message; an empty message marks the record as absent
    pub message: String,
    /// Optional tag (error text for synthesized records)
    pub tag: String,
}

impl LogRecord {
    /// Decode one record segment.
    ///
    /// Lenient: missing trailing fields default, unparsable numbers become
    /// 0, an out-of-range level becomes `Info`, text fields are read as
    /// lossy UTF-8. Decoding never fails; callers detect an unusable
    /// segment by the empty `message` it produces.
    pub fn from_wire(segment: &[u8]) -> Self {
        let mut fields = segment.split(|&b| b == FIELD_SEPARATOR);
        LogRecord {
            thread_name: text_field(fields.next()),
            thread_id: int_field(fields.next()),
            level: level_field(fields.next()),
            timestamp_ms: int_field(fields.next()),
            message: text_field(fields.next()),
            tag: text_field(fields.next()),
        }
    }

    /// Encode into the wire segment form (without the record separator).
    pub fn to_wire(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(
            self.thread_name.len() + self.message.len() + self.tag.len() + 32,
        );
        out.extend_from_slice(self.thread_name.as_bytes());
        out.push(FIELD_SEPARATOR);
        out.extend_from_slice(self.thread_id.to_string().as_bytes());
        out.push(FIELD_SEPARATOR);
        out.extend_from_slice((self.level as u8).to_string().as_bytes());
        out.push(FIELD_SEPARATOR);
        out.extend_from_slice(self.timestamp_ms.to_string().as_bytes());
        out.push(FIELD_SEPARATOR);
        out.extend_from_slice(self.message.as_bytes());
        out.push(FIELD_SEPARATOR);
        out.extend_from_slice(self.tag.as_bytes());
        out
    }

    /// Current time in milliseconds since the Unix epoch
    pub fn timestamp_now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0)
    }
}

fn text_field(field: Option<&[u8]>) -> String {
    field
        .map(|b| String::from_utf8_lossy(b).into_owned())
        .unwrap_or_default()
}

fn int_field(field: Option<&[u8]>) -> i64 {
    field
        .and_then(|b| std::str::from_utf8(b).ok())
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0)
}

fn level_field(field: Option<&[u8]>) -> LogLevel {
    // A missing field defaults; a present one takes the numeric path,
    // where an unparsable value lands on 0 (Trace) and an out-of-range
    // one on Info.
    let Some(field) = field else {
        return LogLevel::default();
    };
    u8::try_from(int_field(Some(field)))
        .map(LogLevel::from_u8)
        .unwrap_or(LogLevel::Info)
}
