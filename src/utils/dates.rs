//! Calendar-date helpers shared by the wire types and the CLI.
//!
//! The rental API sends ISO-8601 date-times (`2024-01-01T00:00:00.000Z`).
//! Rental pricing only looks at the calendar date, so time-of-day is dropped
//! when reading and midnight UTC is written back.

use chrono::{DateTime, Local, NaiveDate, NaiveTime, SecondsFormat, Utc};

/// Reads the calendar-date part of an ISO-8601 date or date-time.
pub fn parse_calendar_date(input: &str) -> Result<NaiveDate, chrono::ParseError> {
    let date_part = input.trim().split('T').next().unwrap_or_default();
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
}

/// Reads a full timestamp, accepting a bare date as midnight UTC.
pub fn parse_timestamp(input: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    match DateTime::parse_from_rfc3339(input.trim()) {
        Ok(dt) => Ok(dt.with_timezone(&Utc)),
        Err(_) => parse_calendar_date(input).map(midnight_utc),
    }
}

pub fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

pub fn to_iso_datetime(date: NaiveDate) -> String {
    midnight_utc(date).to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub mod iso_date {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::to_iso_datetime(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_calendar_date(&raw).map_err(de::Error::custom)
    }
}

pub mod iso_timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_timestamp(&raw).map_err(de::Error::custom)
    }
}
