//! Trailing availability windows.
//!
//! A report run fixes "now" once; every availability and problem query of
//! that run uses windows derived from it.

use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The three trailing windows shown in the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityWindow {
    Day,
    Week,
    Month,
}

impl AvailabilityWindow {
    /// All windows in display order.
    pub const ALL: [AvailabilityWindow; 3] = [Self::Day, Self::Week, Self::Month];

    /// Column heading for the window.
    pub fn heading(&self) -> &'static str {
        match self {
            Self::Day => "Availability (% 1 day)",
            Self::Week => "Availability (% 1 week)",
            Self::Month => "Availability (% 1 month)",
        }
    }
}

impl fmt::Display for AvailabilityWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Day => write!(f, "1d"),
            Self::Week => write!(f, "1w"),
            Self::Month => write!(f, "1m"),
        }
    }
}

/// A closed time range `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn start_timestamp(&self) -> i64 {
        self.start.timestamp()
    }

    pub fn end_timestamp(&self) -> i64 {
        self.end.timestamp()
    }
}

/// Window boundaries fixed at the start of a report run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportWindows {
    pub now: DateTime<Utc>,
    pub day_start: DateTime<Utc>,
    pub week_start: DateTime<Utc>,
    pub month_start: DateTime<Utc>,
}

impl ReportWindows {
    /// Derive the windows from a fixed `now`. The month window goes back one
    /// calendar month, or 30 days when that date cannot be represented.
    pub fn at(now: DateTime<Utc>) -> Self {
        let month_start = now
            .checked_sub_months(Months::new(1))
            .unwrap_or_else(|| now - Duration::days(30));

        Self {
            now,
            day_start: now - Duration::days(1),
            week_start: now - Duration::weeks(1),
            month_start,
        }
    }

    pub fn now() -> Self {
        Self::at(Utc::now())
    }

    /// The time range of a window.
    pub fn range(&self, window: AvailabilityWindow) -> TimeWindow {
        let start = match window {
            AvailabilityWindow::Day => self.day_start,
            AvailabilityWindow::Week => self.week_start,
            AvailabilityWindow::Month => self.month_start,
        };
        TimeWindow::new(start, self.now)
    }

    /// Window used to look up currently active problems.
    pub fn current_state(&self) -> TimeWindow {
        self.range(AvailabilityWindow::Day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_window_boundaries() {
        let now = Utc.with_ymd_and_hms(2024, 3, 31, 12, 0, 0).unwrap();
        let windows = ReportWindows::at(now);

        assert_eq!(windows.day_start, Utc.with_ymd_and_hms(2024, 3, 30, 12, 0, 0).unwrap());
        assert_eq!(windows.week_start, Utc.with_ymd_and_hms(2024, 3, 24, 12, 0, 0).unwrap());
        // Calendar month back, clamped to the end of February
        assert_eq!(windows.month_start, Utc.with_ymd_and_hms(2024, 2, 29, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_ranges_end_now() {
        let windows = ReportWindows::now();
        for window in AvailabilityWindow::ALL {
            let range = windows.range(window);
            assert_eq!(range.end, windows.now);
            assert!(range.start < range.end);
        }
        assert_eq!(windows.current_state(), windows.range(AvailabilityWindow::Day));
    }
}
