// One event from a remote log stream.

use std::fmt;

/// A single log event as delivered by a page source.
///
/// `message` keeps its own line terminator when the source provides one; the
/// registry never adds separators between records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// Epoch milliseconds, if the source event carried a timestamp.
    pub timestamp: Option<i64>,
    pub message: String,
}

impl LogRecord {
    pub fn new(timestamp: i64, message: impl Into<String>) -> Self {
        Self {
            timestamp: Some(timestamp),
            message: message.into(),
        }
    }

    pub fn untimed(message: impl Into<String>) -> Self {
        Self {
            timestamp: None,
            message: message.into(),
        }
    }
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}
