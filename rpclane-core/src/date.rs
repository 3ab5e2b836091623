//! Calendar-date wire encoding.
//!
//! Dates travel as `YYYY-MM-DD`. Decoding reads the wire value as an instant
//! and keeps the calendar day it falls on in UTC, so a date never drifts by
//! one day when the local zone is behind or ahead of UTC.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use thiserror::Error;

pub const WIRE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("invalid wire date {0:?}")]
    Invalid(String),
    #[error("{date} has no local midnight in the target time zone")]
    NoLocalMidnight { date: NaiveDate },
}

/// Decode a wire date into the UTC calendar day it denotes.
///
/// Accepts a bare `YYYY-MM-DD` (read as UTC midnight) or a full RFC 3339
/// timestamp.
pub fn decode(wire: &str) -> Result<NaiveDate, DateError> {
    let wire = wire.trim();
    if let Ok(date) = NaiveDate::parse_from_str(wire, WIRE_FORMAT) {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(wire)
        .map(|instant| instant.with_timezone(&Utc).date_naive())
        .map_err(|_| DateError::Invalid(wire.to_string()))
}

/// Decode a wire date into local midnight of the same calendar day in `tz`.
pub fn decode_at<Tz: TimeZone>(wire: &str, tz: &Tz) -> Result<DateTime<Tz>, DateError> {
    let date = decode(wire)?;
    tz.from_local_datetime(&date.and_time(NaiveTime::MIN))
        .earliest()
        .ok_or(DateError::NoLocalMidnight { date })
}

pub fn encode(date: NaiveDate) -> String {
    date.format(WIRE_FORMAT).to_string()
}

/// Encode the calendar day a zoned value shows on its own wall clock.
pub fn encode_instant<Tz: TimeZone>(local: &DateTime<Tz>) -> String {
    encode(local.date_naive())
}

/// `#[serde(with = "rpclane_core::date::wire")]` for `NaiveDate` fields.
pub mod wire {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::encode(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::decode(&raw).map_err(de::Error::custom)
    }
}

/// `#[serde(with = "rpclane_core::date::wire_option")]` for `Option<NaiveDate>` fields.
pub mod wire_option {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        date: &Option<NaiveDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match date {
            Some(date) => serializer.serialize_str(&super::encode(*date)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|raw| super::decode(&raw).map_err(de::Error::custom))
            .transpose()
    }
}
