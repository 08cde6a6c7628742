//! Upload audit-line format.
//!
//! One line per successful upload:
//!
//! ```text
//! <timestamp> - Uploaded: <n>, Image URL: <local_url>, DNS: <hostname>
//! ```

use std::fmt;

use chrono::{NaiveDateTime, Timelike};

/// Timestamp layout used in audit lines (microsecond precision, local time).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Layout for timestamps that fall on a whole second; the fraction is omitted.
pub const WHOLE_SECOND_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const SEQUENCE_MARKER: &str = " - Uploaded: ";
const URL_MARKER: &str = ", Image URL: ";
const HOST_MARKER: &str = ", DNS: ";

/// A single audit-log record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditLine {
    pub timestamp: NaiveDateTime,
    /// 1-based position of this line in the log.
    pub sequence: u64,
    pub local_url: String,
    pub hostname: String,
}

impl fmt::Display for AuditLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let layout = if self.timestamp.nanosecond() / 1_000 == 0 {
            WHOLE_SECOND_FORMAT
        } else {
            TIMESTAMP_FORMAT
        };
        write!(
            f,
            "{}{SEQUENCE_MARKER}{}{URL_MARKER}{}{HOST_MARKER}{}",
            self.timestamp.format(layout),
            self.sequence,
            self.local_url,
            self.hostname,
        )
    }
}

impl AuditLine {
    /// Parse a line previously produced by the `Display` impl.
    ///
    /// Returns `None` for anything that does not follow the format.
    pub fn parse(line: &str) -> Option<Self> {
        let (timestamp, rest) = line.split_once(SEQUENCE_MARKER)?;
        let (sequence, rest) = rest.split_once(URL_MARKER)?;
        let (local_url, hostname) = rest.rsplit_once(HOST_MARKER)?;

        Some(Self {
            timestamp: NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT)
                .or_else(|_| NaiveDateTime::parse_from_str(timestamp, WHOLE_SECOND_FORMAT))
                .ok()?,
            sequence: sequence.parse().ok()?,
            local_url: local_url.to_string(),
            hostname: hostname.trim_end().to_string(),
        })
    }
}
