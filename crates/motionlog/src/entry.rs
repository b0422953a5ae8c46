//! Core motion event types.
//!
//! A [`MotionLogEntry`] is one recorded motion event. Its [`Timestamp`] is
//! whatever the sensor sent, kept verbatim: text stays text, integers stay
//! integers and reals stay reals, both in the database and on the wire.

use std::fmt;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};

/// A client-supplied event timestamp.
///
/// No parsing or timezone normalization is applied. Text, integers and
/// reals map onto the `SQLite` storage class of the same name and read back
/// unchanged. A boolean is echoed to the client as sent but stored as the
/// integer `0` or `1`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Timestamp {
    /// A whole number, e.g. milliseconds since boot or a Unix epoch.
    Integer(i64),
    /// A fractional number.
    Real(f64),
    /// Any string, e.g. an RFC 3339 date.
    Text(String),
    /// `true` or `false`.
    Boolean(bool),
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Real(x) => write!(f, "{x:?}"),
            Self::Text(s) => f.write_str(s),
            Self::Boolean(b) => write!(f, "{b}"),
        }
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(TimestampVisitor)
    }
}

struct TimestampVisitor;

impl Visitor<'_> for TimestampVisitor {
    type Value = Timestamp;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string, number or boolean timestamp")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Timestamp, E> {
        Ok(Timestamp::Boolean(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Timestamp, E> {
        Ok(Timestamp::Integer(v))
    }

    // Integers above i64::MAX cannot be stored without losing digits.
    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Timestamp, E> {
        i64::try_from(v)
            .map(Timestamp::Integer)
            .map_err(|_| E::custom(format!("integer timestamp {v} is too large to store")))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Timestamp, E> {
        Ok(Timestamp::Real(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Timestamp, E> {
        Ok(Timestamp::Text(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Timestamp, E> {
        Ok(Timestamp::Text(v))
    }
}

impl From<&str> for Timestamp {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Timestamp {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for Timestamp {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<f64> for Timestamp {
    fn from(x: f64) -> Self {
        Self::Real(x)
    }
}

impl ToSql for Timestamp {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Self::Integer(n) => ToSqlOutput::from(*n),
            Self::Real(x) => ToSqlOutput::from(*x),
            Self::Text(s) => ToSqlOutput::from(s.as_str()),
            Self::Boolean(b) => ToSqlOutput::from(i64::from(*b)),
        })
    }
}

impl FromSql for Timestamp {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Integer(n) => Ok(Self::Integer(n)),
            ValueRef::Real(x) => Ok(Self::Real(x)),
            ValueRef::Text(_) => value.as_str().map(Self::from),
            ValueRef::Null | ValueRef::Blob(_) => Err(FromSqlError::InvalidType),
        }
    }
}

/// One stored motion event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionLogEntry {
    /// Row id assigned by storage on insert. Never reused.
    pub id: i64,
    /// The timestamp exactly as the client sent it.
    pub timestamp: Timestamp,
}

impl MotionLogEntry {
    /// Create an entry from a stored row.
    #[must_use]
    pub fn new(id: i64, timestamp: impl Into<Timestamp>) -> Self {
        Self {
            id,
            timestamp: timestamp.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_deserialize_kinds() {
        let t: Timestamp = serde_json::from_str(r#""2024-01-01T00:00:00Z""#).unwrap();
        assert_eq!(t, Timestamp::Text("2024-01-01T00:00:00Z".to_string()));

        let t: Timestamp = serde_json::from_str("1704067200").unwrap();
        assert_eq!(t, Timestamp::Integer(1_704_067_200));

        let t: Timestamp = serde_json::from_str("12.5").unwrap();
        assert_eq!(t, Timestamp::Real(12.5));
    }

    #[test]
    fn test_timestamp_serializes_as_bare_value() {
        assert_eq!(
            serde_json::to_string(&Timestamp::from("now")).unwrap(),
            r#""now""#
        );
        assert_eq!(serde_json::to_string(&Timestamp::from(42_i64)).unwrap(), "42");
        assert_eq!(serde_json::to_string(&Timestamp::from(1.5)).unwrap(), "1.5");
    }

    #[test]
    fn test_timestamp_rejects_non_scalar() {
        for json in ["[1, 2]", r#"{"at": 1}"#, "null"] {
            let err = serde_json::from_str::<Timestamp>(json).unwrap_err().to_string();
            assert!(err.contains("a string, number or boolean timestamp"), "{err}");
        }
    }

    #[test]
    fn test_timestamp_boolean_kept_for_echo() {
        let t: Timestamp = serde_json::from_str("true").unwrap();
        assert_eq!(t, Timestamp::Boolean(true));
        assert_eq!(serde_json::to_string(&t).unwrap(), "true");
    }

    #[test]
    fn test_timestamp_u64_within_range() {
        let t: Timestamp = serde_json::from_str("9223372036854775807").unwrap();
        assert_eq!(t, Timestamp::Integer(i64::MAX));
    }

    #[test]
    fn test_timestamp_u64_out_of_range_is_rejected() {
        let err = serde_json::from_str::<Timestamp>("18446744073709551615")
            .unwrap_err()
            .to_string();
        assert!(err.contains("18446744073709551615"), "{err}");
        assert!(err.contains("too large"), "{err}");

        let value = serde_json::json!(9_223_372_036_854_775_808_u64);
        assert!(serde_json::from_value::<Timestamp>(value).is_err());
    }

    #[test]
    fn test_timestamp_display() {
        assert_eq!(Timestamp::from("2024-01-01").to_string(), "2024-01-01");
        assert_eq!(Timestamp::from(7_i64).to_string(), "7");
        assert_eq!(Timestamp::from(0.25).to_string(), "0.25");
        assert_eq!(Timestamp::from(1.0).to_string(), "1.0");
        assert_eq!(Timestamp::Boolean(false).to_string(), "false");
    }

    #[test]
    fn test_real_display_matches_json_echo() {
        for x in [1.0, 12.5, 1_704_067_200.0, -3.0] {
            let ts = Timestamp::from(x);
            assert_eq!(ts.to_string(), serde_json::to_string(&ts).unwrap());
        }
    }

    #[test]
    fn test_timestamp_boolean_stored_as_integer() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let (kind, back): (String, Timestamp) = conn
            .query_row("SELECT typeof(?1), ?1", [&Timestamp::Boolean(true)], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })
            .unwrap();
        assert_eq!(kind, "integer");
        assert_eq!(back, Timestamp::Integer(1));
    }

    #[test]
    fn test_timestamp_sql_storage_classes() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        for (value, expected_type) in [
            (Timestamp::from("text"), "text"),
            (Timestamp::from(3_i64), "integer"),
            (Timestamp::from(3.5), "real"),
        ] {
            let (kind, back): (String, Timestamp) = conn
                .query_row("SELECT typeof(?1), ?1", [&value], |row| {
                    Ok((row.get(0)?, row.get(1)?))
                })
                .unwrap();
            assert_eq!(kind, expected_type);
            assert_eq!(back, value);
        }
    }

    #[test]
    fn test_timestamp_from_null_column_fails() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let result: rusqlite::Result<Timestamp> =
            conn.query_row("SELECT NULL", [], |row| row.get(0));
        assert!(result.is_err());
    }

    #[test]
    fn test_entry_serialize() {
        let entry = MotionLogEntry::new(3, "2024-01-01T00:00:00Z");
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": 3, "timestamp": "2024-01-01T00:00:00Z"})
        );
    }
}
