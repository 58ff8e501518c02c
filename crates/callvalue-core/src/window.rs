//! Lookback windows bounding which calls a run considers.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WindowError {
    #[error("lookback {unit} must be between 1 and {max}, got {value}")]
    OutOfRange {
        unit: &'static str,
        value: i64,
        max: u32,
    },
}

/// Length of a lookback window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookback {
    Hours(u32),
    Days(u32),
}

impl Lookback {
    pub const DEFAULT_HOURS: u32 = 24;
    pub const MAX_DAYS: u32 = 3_660;
    pub const MAX_HOURS: u32 = Self::MAX_DAYS * 24;

    /// Pick a lookback from optional `hours` / `days` inputs.
    ///
    /// `days` wins when both are given; neither means the 24-hour default.
    ///
    /// # Errors
    ///
    /// Returns [`WindowError::OutOfRange`] for zero, negative, or oversized values.
    pub fn from_parts(hours: Option<i64>, days: Option<i64>) -> Result<Self, WindowError> {
        let bounded = |unit: &'static str, value: i64, max: u32| {
            u32::try_from(value)
                .ok()
                .filter(|v| (1..=max).contains(v))
                .ok_or(WindowError::OutOfRange { unit, value, max })
        };

        match (hours, days) {
            (_, Some(d)) => Ok(Lookback::Days(bounded("days", d, Self::MAX_DAYS)?)),
            (Some(h), None) => Ok(Lookback::Hours(bounded("hours", h, Self::MAX_HOURS)?)),
            (None, None) => Ok(Lookback::Hours(Self::DEFAULT_HOURS)),
        }
    }

    #[must_use]
    pub fn duration(self) -> Duration {
        match self {
            Lookback::Hours(h) => Duration::hours(i64::from(h)),
            Lookback::Days(d) => Duration::days(i64::from(d)),
        }
    }
}

impl std::fmt::Display for Lookback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Lookback::Hours(h) => write!(f, "{h}h"),
            Lookback::Days(d) => write!(f, "{d}d"),
        }
    }
}

/// Start and end instants of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl CallWindow {
    #[must_use]
    pub fn ending_at(end: DateTime<Utc>, lookback: Lookback) -> Self {
        Self {
            start: end - lookback.duration(),
            end,
        }
    }

    /// Calendar date sent to the provider as the inclusive start filter.
    #[must_use]
    pub fn start_date(&self) -> NaiveDate {
        self.start.date_naive()
    }

    /// Calendar date sent to the provider as the inclusive end filter.
    #[must_use]
    pub fn end_date(&self) -> NaiveDate {
        self.end.date_naive()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn defaults_to_24_hours() {
        assert_eq!(Lookback::from_parts(None, None), Ok(Lookback::Hours(24)));
    }

    #[test]
    fn days_take_precedence_over_hours() {
        assert_eq!(Lookback::from_parts(Some(6), Some(2)), Ok(Lookback::Days(2)));
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert_eq!(
            Lookback::from_parts(Some(0), None),
            Err(WindowError::OutOfRange {
                unit: "hours",
                value: 0,
                max: Lookback::MAX_HOURS,
            })
        );
        assert!(Lookback::from_parts(None, Some(-3)).is_err());
        assert!(Lookback::from_parts(None, Some(1_000_000)).is_err());
    }

    #[test]
    fn window_dates_span_calendar_days() {
        let end = Utc.with_ymd_and_hms(2024, 3, 15, 2, 0, 0).unwrap();
        let window = CallWindow::ending_at(end, Lookback::Hours(6));
        assert_eq!(window.start_date().to_string(), "2024-03-14");
        assert_eq!(window.end_date().to_string(), "2024-03-15");
    }

    #[test]
    fn days_lookback_duration() {
        let end = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
        let window = CallWindow::ending_at(end, Lookback::Days(7));
        assert_eq!(window.start, Utc.with_ymd_and_hms(2024, 3, 8, 12, 0, 0).unwrap());
    }
}
