//! Fixed-precision timestamp encoding.
//!
//! Instants travel as signed 64-bit nanoseconds since the Unix epoch in both
//! directions. Use through `#[serde(with = "...")]`:
//!
//! ```ignore
//! #[serde(with = "docsync::codec::timestamp::nanos")]
//! pub posted_at: DateTime<Utc>,
//! ```
//!
//! Instants outside roughly 1677..2262 have no `i64` nanosecond form and fail
//! to encode instead of being truncated.

use chrono::{DateTime, Utc};

pub fn to_nanos(instant: &DateTime<Utc>) -> Option<i64> {
    instant.timestamp_nanos_opt()
}

pub fn from_nanos(nanos: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_nanos(nanos)
}

pub mod nanos {
    use chrono::{DateTime, Utc};
    use serde::{de, ser, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(instant: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let nanos = super::to_nanos(instant).ok_or_else(|| {
            ser::Error::custom(format!("timestamp {} out of nanosecond range", instant))
        })?;
        serializer.serialize_i64(nanos)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let nanos = i64::deserialize(deserializer).map_err(|e| {
            de::Error::custom(format!("expected epoch nanoseconds: {}", e))
        })?;
        Ok(super::from_nanos(nanos))
    }
}

pub mod nanos_option {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(instant: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match instant {
            Some(instant) => super::nanos::serialize(instant, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<i64>::deserialize(deserializer)?.map(super::from_nanos))
    }
}
