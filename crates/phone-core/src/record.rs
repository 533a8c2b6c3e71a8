//! Call register entries
//!
//! A [`CallRecord`] describes one call attempt as seen by one phone. Both
//! parties of an attempt get their own record; the caller's lands in its
//! outbound register and the callee's in its inbound register.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Local};

/// Timestamp layout used by the register export
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One call attempt from one phone's perspective
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRecord {
    counterparty_number: String,
    accepted: bool,
    was_available: bool,
    timestamp: DateTime<Local>,
    duration: Duration,
}

impl CallRecord {
    /// Create a record stamped with an explicit time
    pub fn new(
        counterparty_number: impl Into<String>,
        accepted: bool,
        was_available: bool,
        timestamp: DateTime<Local>,
        duration: Duration,
    ) -> Self {
        Self {
            counterparty_number: counterparty_number.into(),
            accepted,
            was_available,
            timestamp,
            duration,
        }
    }

    /// Create a record stamped with the current local time
    pub fn now(
        counterparty_number: impl Into<String>,
        accepted: bool,
        was_available: bool,
        duration: Duration,
    ) -> Self {
        Self::new(counterparty_number, accepted, was_available, Local::now(), duration)
    }

    /// Number of the other party
    pub fn counterparty_number(&self) -> &str {
        &self.counterparty_number
    }

    /// Whether the destination agreed to connect
    pub fn accepted(&self) -> bool {
        self.accepted
    }

    /// Whether the destination was free at attempt time
    pub fn was_available(&self) -> bool {
        self.was_available
    }

    /// When the attempt was recorded
    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    /// Intended conversation length, zero when nothing connected
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl fmt::Display for CallRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{{}, {}, {}, {}, {}}}",
            self.counterparty_number,
            if self.accepted { "Accepted" } else { "Rejected" },
            if self.was_available { "Available" } else { "Unavailable" },
            self.timestamp.format(TIMESTAMP_FORMAT),
            format_iso_duration(self.duration),
        )
    }
}

/// Render a duration in ISO-8601 form (`PT0S`, `PT2S`, `PT1M30S`, `PT1H`, `PT0.5S`)
///
/// Zero components are omitted; the seconds component carries a fractional
/// part with trailing zeros stripped.
pub fn format_iso_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    let nanos = duration.subsec_nanos();
    if total == 0 && nanos == 0 {
        return "PT0S".to_string();
    }

    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    let mut out = String::from("PT");
    if hours > 0 {
        out.push_str(&format!("{}H", hours));
    }
    if minutes > 0 {
        out.push_str(&format!("{}M", minutes));
    }
    if seconds > 0 || nanos > 0 {
        out.push_str(&seconds.to_string());
        if nanos > 0 {
            let fraction = format!("{:09}", nanos);
            out.push('.');
            out.push_str(fraction.trim_end_matches('0'));
        }
        out.push('S');
    }
    out
}
