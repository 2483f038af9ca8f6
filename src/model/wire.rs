//! Field encodings of the persisted aggregate.
//!
//! Dates are always written with millisecond precision (`...00.000Z`) and
//! whole amounts as JSON integers, so loading and saving a stored value
//! leaves it byte-for-byte unchanged.

use serde::Serializer;

/// `#[serde(with = "wire::date_millis")]` for `DateTime<Utc>` fields.
pub mod date_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&date.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        DateTime::<Utc>::deserialize(d)
    }
}

// Integers beyond 2^53 are not exact in an f64 anyway.
const MAX_EXACT: f64 = 9_007_199_254_740_992.0;

/// Write `150.0` as `150` and `75.5` as `75.5`.
pub fn amount<S: Serializer>(n: &f64, s: S) -> Result<S::Ok, S::Error> {
    if n.fract() == 0.0 && n.abs() <= MAX_EXACT {
        s.serialize_i64(*n as i64)
    } else {
        s.serialize_f64(*n)
    }
}
