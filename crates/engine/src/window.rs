//! Session window detection.
//!
//! The response log keeps every answer ever submitted. Rows from the current
//! session sit at the bottom, submitted within a few minutes of each other.
//! The extractor walks the timestamp column upwards from the newest row and
//! stops at the header (an unparsable timestamp) or at the first row that is
//! too old relative to the newest one.
//!
//! The scan is greedy and never backtracks: once a row falls outside the
//! tolerance, nothing above it is considered, even rows that would fit.
//! A stale row that happens to sit inside the tolerance is included.

use chrono::{DateTime, Local, NaiveDateTime};
use consequences_config::WindowConfig;
use serde::Serialize;
use tracing::debug;

/// Parses timestamp cells: RFC 3339 first, then each configured format.
///
/// Every result is local wall-clock time. Configured formats carry no offset
/// and are read as local; RFC 3339 cells are converted to the local zone, so
/// a log mixing both styles measures gaps consistently.
#[derive(Debug, Clone)]
pub struct TimestampParser {
    formats: Vec<String>,
}

impl TimestampParser {
    pub fn new(formats: Vec<String>) -> Self {
        Self { formats }
    }

    pub fn parse(&self, cell: &str) -> Option<NaiveDateTime> {
        let cell = cell.trim();
        if cell.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(cell) {
            return Some(dt.with_timezone(&Local).naive_local());
        }

        self.formats
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(cell, format).ok())
    }
}

impl Default for TimestampParser {
    fn default() -> Self {
        Self::new(WindowConfig::default().timestamp_formats)
    }
}

/// Why the window scan ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum WindowStop {
    /// Row `row` has no parsable timestamp (normally the header).
    Sentinel { row: usize },

    /// Row `row` is `gap_secs` older than the newest response.
    GapExceeded { row: usize, gap_secs: i64 },

    /// Every row of the column belongs to the window.
    Exhausted,
}

/// The trailing run of rows that belongs to the current session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionWindow {
    /// Number of trailing rows in the window
    pub size: usize,

    /// Timestamp of the newest row, when it parsed
    pub latest: Option<NaiveDateTime>,

    pub stop: WindowStop,
}

impl SessionWindow {
    fn empty(stop: WindowStop) -> Self {
        Self {
            size: 0,
            latest: None,
            stop,
        }
    }
}

/// Finds the current session's rows from the timestamp column.
#[derive(Debug, Clone)]
pub struct ResponseWindowExtractor {
    parser: TimestampParser,
    max_ok_range_secs: i64,
}

impl ResponseWindowExtractor {
    pub fn new(parser: TimestampParser, max_ok_range_secs: i64) -> Self {
        Self {
            parser,
            max_ok_range_secs,
        }
    }

    pub fn from_config(config: &WindowConfig) -> Self {
        Self::new(
            TimestampParser::new(config.timestamp_formats.clone()),
            config.max_ok_range_secs,
        )
    }

    /// Scan `column` (oldest first, header included) from the bottom up.
    ///
    /// The newest row always counts when its timestamp parses. An empty
    /// column, or one whose last cell does not parse (a log holding only its
    /// header), gives an empty window.
    pub fn extract<S: AsRef<str>>(&self, column: &[S]) -> SessionWindow {
        let Some((last, earlier)) = column.split_last() else {
            return SessionWindow::empty(WindowStop::Exhausted);
        };

        let Some(latest) = self.parser.parse(last.as_ref()) else {
            debug!(row = earlier.len(), "Newest row has no parsable timestamp");
            return SessionWindow::empty(WindowStop::Sentinel { row: earlier.len() });
        };

        let mut size = 1;
        for (row, cell) in earlier.iter().enumerate().rev() {
            let Some(submitted) = self.parser.parse(cell.as_ref()) else {
                debug!(row, size, "Window ends at unparsable timestamp");
                return SessionWindow {
                    size,
                    latest: Some(latest),
                    stop: WindowStop::Sentinel { row },
                };
            };

            let gap_secs = (latest - submitted).num_seconds();
            if gap_secs > self.max_ok_range_secs {
                debug!(row, size, gap_secs, "Window ends at stale response");
                return SessionWindow {
                    size,
                    latest: Some(latest),
                    stop: WindowStop::GapExceeded { row, gap_secs },
                };
            }

            size += 1;
        }

        SessionWindow {
            size,
            latest: Some(latest),
            stop: WindowStop::Exhausted,
        }
    }
}
