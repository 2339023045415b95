//! Human-readable record output
//!
//! Formats accepted records for the terminal, one per line:
//!
//! ```text
//! 07:34:59.161 INFO    worker request processed, batch 1
//! 07:34:59.162 ERROR   db     connection timeout, retrying
//! ```

use chrono::{TimeZone, Utc};
use owo_colors::{OwoColorize, Style};
use spool_protocol::{LogLevel, LogRecord};

/// Color styles for terminal output
struct Styles {
    timestamp: Style,
    thread: Style,
    tag: Style,
}

impl Styles {
    fn new(enabled: bool) -> Self {
        if enabled {
            Self {
                timestamp: Style::new().dimmed(),
                thread: Style::new().cyan(),
                tag: Style::new().dimmed(),
            }
        } else {
            Self {
                timestamp: Style::new(),
                thread: Style::new(),
                tag: Style::new(),
            }
        }
    }
}

/// Get style for log level
fn level_style(level: LogLevel, enabled: bool) -> Style {
    if !enabled {
        return Style::new();
    }
    match level {
        LogLevel::Fatal | LogLevel::Error => Style::new().red(),
        LogLevel::Warning => Style::new().yellow(),
        LogLevel::Info | LogLevel::Debug => Style::new(),
        LogLevel::Trace => Style::new().dimmed(),
    }
}

/// Prints accepted records to stdout
pub struct RecordPrinter {
    color: bool,
    styles: Styles,
}

impl RecordPrinter {
    pub fn new(color: bool) -> Self {
        Self {
            color,
            styles: Styles::new(color),
        }
    }

    pub fn print(&self, record: &LogRecord) {
        let ts = format_timestamp(record.timestamp_ms);
        let level_str = format!("{:7}", record.level.as_str());
        let thread = if record.thread_name.is_empty() {
            "-"
        } else {
            record.thread_name.as_str()
        };

        if record.tag.is_empty() {
            println!(
                "{} {} {} {}",
                ts.style(self.styles.timestamp),
                level_str.style(level_style(record.level, self.color)),
                thread.style(self.styles.thread),
                record.message,
            );
        } else {
            println!(
                "{} {} {} {} {}",
                ts.style(self.styles.timestamp),
                level_str.style(level_style(record.level, self.color)),
                thread.style(self.styles.thread),
                record.message,
                record.tag.style(self.styles.tag),
            );
        }
    }
}

/// Format timestamp as HH:MM:SS.mmm (from milliseconds)
fn format_timestamp(ts_millis: i64) -> String {
    Utc.timestamp_millis_opt(ts_millis)
        .single()
        .map(|dt| dt.format("%H:%M:%S%.3f").to_string())
        .unwrap_or_else(|| format!("{}", ts_millis))
}
