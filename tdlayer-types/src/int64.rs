//! 64-bit identifiers on the wire.
//!
//! The engine transmits `int64` values as decimal strings so they survive
//! transports that parse every number as a double. Decoding accepts either a
//! string or an integer; encoding always produces a string.
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Ids {
//!     #[serde(with = "tdlayer_types::int64")]
//!     chat_id: i64,
//! }
//!
//! let ids: Ids = serde_json::from_str(r#"{"chat_id":"9007199254740993"}"#).unwrap();
//! assert_eq!(ids.chat_id, 9_007_199_254_740_993);
//! assert_eq!(serde_json::to_string(&ids).unwrap(), r#"{"chat_id":"9007199254740993"}"#);
//! ```

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub fn serialize<S: Serializer>(value: &i64, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(value)
}

pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
    d.deserialize_any(Int64Visitor)
}

struct Int64Visitor;

impl Visitor<'_> for Int64Visitor {
    type Value = i64;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a 64-bit integer or its decimal string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
        Ok(v)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
        i64::try_from(v).map_err(|_| E::invalid_value(de::Unexpected::Unsigned(v), &self))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<i64, E> {
        v.trim().parse().map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
    }
}

/// Wrapper used by the collection codecs below.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
struct Int64(#[serde(with = "crate::int64")] i64);

/// `Option<i64>` codec; `null` and absent both decode to `None`.
pub mod option {
    use super::*;

    pub fn serialize<S: Serializer>(value: &Option<i64>, s: S) -> Result<S::Ok, S::Error> {
        value.map(Int64).serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
        Ok(Option::<Int64>::deserialize(d)?.map(|v| v.0))
    }
}

/// `Vec<i64>` codec.
pub mod vec {
    use super::*;

    pub fn serialize<S: Serializer>(value: &[i64], s: S) -> Result<S::Ok, S::Error> {
        s.collect_seq(value.iter().copied().map(Int64))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<i64>, D::Error> {
        Ok(Vec::<Int64>::deserialize(d)?.into_iter().map(|v| v.0).collect())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Probe {
        #[serde(with = "crate::int64")]
        id: i64,
        #[serde(default, with = "crate::int64::option")]
        maybe: Option<i64>,
        #[serde(default, with = "crate::int64::vec")]
        many: Vec<i64>,
    }

    #[test]
    fn full_range_survives_wire_form() {
        for v in [0, -1, 1, 9_007_199_254_740_993, -9_007_199_254_740_993, i64::MAX, i64::MIN] {
            let p = Probe { id: v, maybe: Some(v), many: vec![v, v] };
            let wire = serde_json::to_value(&p).unwrap();
            assert_eq!(wire["id"], json!(v.to_string()));
            let back: Probe = serde_json::from_value(wire).unwrap();
            assert_eq!(back, p);
        }
    }

    #[test]
    fn accepts_plain_numbers() {
        let p: Probe = serde_json::from_value(json!({"id": 42, "maybe": -7, "many": [1, "2"]})).unwrap();
        assert_eq!(p, Probe { id: 42, maybe: Some(-7), many: vec![1, 2] });
    }

    #[test]
    fn null_and_absent_optional() {
        let p: Probe = serde_json::from_value(json!({"id": "1", "maybe": null})).unwrap();
        assert_eq!(p.maybe, None);
        let p: Probe = serde_json::from_value(json!({"id": "1"})).unwrap();
        assert_eq!(p.maybe, None);
        assert!(p.many.is_empty());
    }

    #[test]
    fn rejects_garbage_and_overflow() {
        assert!(serde_json::from_value::<Probe>(json!({"id": "12ab"})).is_err());
        assert!(serde_json::from_value::<Probe>(json!({"id": u64::MAX})).is_err());
        assert!(serde_json::from_value::<Probe>(json!({"id": 1.5})).is_err());
    }
}
