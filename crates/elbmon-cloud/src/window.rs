use crate::error::{CloudProviderError, Result};
use chrono::{DateTime, Duration, SecondsFormat, Utc};

/// Length of every query window, also used as the query period so the
/// provider returns a single datapoint.
pub const WINDOW_SECS: i64 = 60;

/// Default offset from now, covering the provider's reporting delay.
pub const DEFAULT_FETCH_AGE_SECS: u64 = 60;

/// Query window `[start, end)` ending `fetch_age` seconds before now.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use elbmon_cloud::window::TimeWindow;
///
/// let now = Utc.timestamp_opt(1_000, 0).unwrap();
/// let window = TimeWindow::ending_before(now, 60).unwrap();
/// assert_eq!(window.end.timestamp(), 940);
/// assert_eq!(window.start.timestamp(), 880);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// # Errors
    ///
    /// Returns [`CloudProviderError::ConfigError`] when `fetch_age_secs`
    /// pushes the window outside the representable date range.
    pub fn ending_before(now: DateTime<Utc>, fetch_age_secs: u64) -> Result<Self> {
        let out_of_range = || {
            CloudProviderError::ConfigError(format!(
                "fetch age of {fetch_age_secs}s is out of range"
            ))
        };
        let fetch_age = i64::try_from(fetch_age_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .ok_or_else(out_of_range)?;
        let end = now
            .checked_sub_signed(fetch_age)
            .ok_or_else(out_of_range)?;
        let start = end
            .checked_sub_signed(Duration::seconds(WINDOW_SECS))
            .ok_or_else(out_of_range)?;
        Ok(Self { start, end })
    }

    pub fn length_secs(&self) -> i64 {
        (self.end - self.start).num_seconds()
    }

    /// `start` as an ISO-8601 string with an explicit UTC designator.
    pub fn start_rfc3339(&self) -> String {
        self.start.to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    pub fn end_rfc3339(&self) -> String {
        self.end.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}
