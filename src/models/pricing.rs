use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

/// Whole rental days between two calendar dates, floored at zero.
///
/// Calendar dates carry no time-of-day, so the day difference is already the
/// ceiling of the elapsed time in days.
pub fn rental_days(start: NaiveDate, end: NaiveDate) -> i64 {
    end.signed_duration_since(start).num_days().max(0)
}

pub fn price_for(days: i64, rate_per_day: Decimal) -> Decimal {
    Decimal::from(days) * rate_per_day
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// The range a detail page opens with: `today` through the next day.
    pub fn starting(today: NaiveDate) -> Self {
        Self {
            start: today,
            end: today + Duration::days(1),
        }
    }

    pub fn days(&self) -> i64 {
        rental_days(self.start, self.end)
    }

    pub fn is_inverted(&self) -> bool {
        self.end < self.start
    }
}

/// A price preview for renting one vehicle over a date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub range: DateRange,
    pub days: i64,
    pub rate_per_day: Decimal,
    pub total: Decimal,
}

impl Quote {
    pub fn new(rate_per_day: Decimal, range: DateRange) -> Self {
        let days = range.days();
        Self {
            range,
            days,
            rate_per_day,
            total: price_for(days, rate_per_day),
        }
    }
}
