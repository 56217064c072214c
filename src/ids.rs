//! # Id Formatting
//!
//! Row ids are PostgreSQL `BIGINT`s. On the wire they travel as decimal
//! strings, the way PostgreSQL clients hand 64-bit integers to JavaScript.
//! Request bodies may carry an id either as a JSON number or as a numeric
//! string.

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serializer};
use std::fmt;

/// Serialize an id as a decimal string.
pub fn serialize<S>(id: &i64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(id)
}

/// Serialize an optional id as a decimal string or `null`.
pub fn serialize_opt<S>(id: &Option<i64>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match id {
        Some(id) => serializer.collect_str(id),
        None => serializer.serialize_none(),
    }
}

/// Deserialize an optional id from a JSON number, a numeric string or `null`.
pub fn deserialize_opt<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<IdValue>::deserialize(deserializer).map(|v| v.map(|IdValue(id)| id))
}

struct IdValue(i64);

impl<'de> Deserialize<'de> for IdValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(IdVisitor)
    }
}

struct IdVisitor;

impl<'de> Visitor<'de> for IdVisitor {
    type Value = IdValue;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an integer id or a numeric string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<IdValue, E> {
        Ok(IdValue(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<IdValue, E> {
        i64::try_from(v)
            .map(IdValue)
            .map_err(|_| E::custom(format!("id {} out of range", v)))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<IdValue, E> {
        v.trim()
            .parse::<i64>()
            .map(IdValue)
            .map_err(|_| E::custom(format!("invalid id: {:?}", v)))
    }
}
