//! Serde helpers for index documents
//!
//! The change stream transmits every column as a string: integers arrive as
//! `"5"`, flags as `"0"`/`"1"` and timestamps as `"2024-07-19 10:41:52"`.
//! Documents written by other tools may carry native JSON numbers instead, so
//! each helper accepts both.

use chrono::NaiveDateTime;
use serde::de::{self, Deserializer, Visitor};
use std::fmt;

use crate::util::DATETIME_FORMAT;

struct LenientI64;

impl<'de> Visitor<'de> for LenientI64 {
    type Value = i64;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an integer or a string-encoded integer")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
        Ok(v)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
        i64::try_from(v).map_err(|_| E::custom(format!("integer {v} out of range")))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<i64, E> {
        v.trim()
            .parse()
            .map_err(|_| E::custom(format!("invalid integer string {v:?}")))
    }
}

/// Deserialize an `i64` from a number or a numeric string
pub fn i64_lenient<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(LenientI64)
}

/// Deserialize an `i32` from a number or a numeric string
pub fn i32_lenient<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let v = deserializer.deserialize_any(LenientI64)?;
    i32::try_from(v).map_err(|_| de::Error::custom(format!("integer {v} out of i32 range")))
}

/// Optional variant of [`i64_lenient`]; `null` and `""` decode to `None`
pub fn i64_lenient_opt<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let v: Option<serde_json::Value> = serde::Deserialize::deserialize(deserializer)?;
    match v {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(v) => i64_lenient(v).map(Some).map_err(de::Error::custom),
    }
}

/// Deserialize a flag from `true`/`false`, `0`/`1` or `"0"`/`"1"`
pub fn flag_lenient<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    struct FlagVisitor;

    impl<'de> Visitor<'de> for FlagVisitor {
        type Value = bool;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a bool, 0/1, or \"0\"/\"1\"")
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<bool, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<bool, E> {
            Ok(v != 0)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<bool, E> {
            Ok(v != 0)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<bool, E> {
            match v.trim() {
                "1" | "true" => Ok(true),
                "0" | "false" | "" => Ok(false),
                other => Err(E::custom(format!("invalid flag {other:?}"))),
            }
        }
    }

    deserializer.deserialize_any(FlagVisitor)
}

/// Deserialize a `YYYY-MM-DD HH:MM:SS` timestamp (RFC 3339 is accepted too)
pub fn datetime<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let s: String = serde::Deserialize::deserialize(deserializer)?;
    parse_datetime(&s).map_err(de::Error::custom)
}

/// Optional variant of [`datetime`]; `null` and `""` decode to `None`
pub fn datetime_opt<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = serde::Deserialize::deserialize(deserializer)?;
    match s.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => parse_datetime(v).map(Some).map_err(de::Error::custom),
    }
}

fn parse_datetime(s: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(s, DATETIME_FORMAT)
        .or_else(|_| chrono::DateTime::parse_from_rfc3339(s).map(|dt| dt.naive_utc()))
        .map_err(|e| format!("invalid timestamp {s:?}: {e}"))
}
