// Resolves a symbolic time frame into the concrete date range sent to the provider.
use crate::error::Result;
use chrono::{Duration, NaiveDate};
use shared::models::{DateRange, TimeFrame};

/// Earliest date requested for the `max` time frame.
pub const MAX_START: (i32, u32, u32) = (2010, 1, 1);

/// Look-back in days. Months are fixed 30-day blocks and years 365 days,
/// matching historical output rather than calendar arithmetic.
pub fn lookback_days(token: TimeFrame) -> Option<i64> {
    match token {
        TimeFrame::OneDay => Some(1),
        TimeFrame::FiveDays => Some(5),
        TimeFrame::OneMonth => Some(30),
        TimeFrame::ThreeMonths => Some(3 * 30),
        TimeFrame::SixMonths => Some(6 * 30),
        TimeFrame::OneYear => Some(365),
        TimeFrame::TwoYears => Some(2 * 365),
        TimeFrame::FiveYears => Some(5 * 365),
        TimeFrame::Max => None,
    }
}

pub fn max_start() -> NaiveDate {
    let (y, m, d) = MAX_START;
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN)
}

pub fn resolve(token: TimeFrame, now: NaiveDate) -> DateRange {
    let start = match lookback_days(token) {
        Some(days) => now
            .checked_sub_signed(Duration::days(days))
            .unwrap_or(NaiveDate::MIN),
        // A clock set before the fixed start still yields start <= end.
        None => max_start().min(now),
    };
    DateRange { start, end: now }
}

/// Parses the token first; anything outside the nine known tokens is an invalid argument.
pub fn resolve_token(token: &str, now: NaiveDate) -> Result<DateRange> {
    let tf: TimeFrame = token.parse()?;
    Ok(resolve(tf, now))
}
