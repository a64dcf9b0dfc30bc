use chrono::{DateTime, Duration, FixedOffset, Local, NaiveDate, ParseError};

const DATE_FORMAT: &str = "%Y-%m-%d";
const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Inclusive range of calendar days ending today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn last_days(days: u32) -> Self {
        Self::ending_at(Local::now().date_naive(), days)
    }

    /// `days == 1` covers `end` alone.
    pub fn ending_at(end: NaiveDate, days: u32) -> Self {
        let back = i64::from(days.max(1)) - 1;
        Self {
            start: end - Duration::days(back),
            end,
        }
    }

    pub fn as_query(&self) -> (String, String) {
        (
            self.start.format(DATE_FORMAT).to_string(),
            self.end.format(DATE_FORMAT).to_string(),
        )
    }
}

pub fn parse_timestamp(value: &str) -> Result<DateTime<FixedOffset>, ParseError> {
    DateTime::parse_from_rfc3339(value)
}

/// Formats in the timestamp's own offset, as reported by the service.
pub fn format_timestamp(value: &DateTime<FixedOffset>) -> String {
    value.format(DISPLAY_FORMAT).to_string()
}
