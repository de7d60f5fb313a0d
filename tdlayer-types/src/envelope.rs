//! Routing metadata around a decoded object.

use std::str::FromStr;

use serde::Deserialize;
use serde_json::Value;

use crate::enums::Object;
use crate::{CLIENT_ID_FIELD, DecodeError, EXTRA_FIELD};

/// An object received from the engine together with its routing fields.
#[derive(Clone, Debug, PartialEq)]
pub struct Envelope {
    /// The client the event belongs to. `None` for process-wide events.
    pub client_id: Option<i32>,
    /// The `@extra` echoed from the request this object answers, if any.
    pub extra:     Option<Value>,
    pub object:    Object,
}

impl Envelope {
    /// Split off the routing fields and decode the rest as an [`Object`].
    pub fn from_value(value: Value) -> Result<Self, DecodeError> {
        let Value::Object(mut map) = value else {
            return Object::from_value(value).map(|object| Self { client_id: None, extra: None, object });
        };
        let client_id = map
            .remove(CLIENT_ID_FIELD)
            .and_then(|v| v.as_i64())
            .and_then(|id| i32::try_from(id).ok());
        let extra = map.remove(EXTRA_FIELD);
        let object = Object::from_value(Value::Object(map))?;
        Ok(Self { client_id, extra, object })
    }
}

impl FromStr for Envelope {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_value(serde_json::from_str(s)?)
    }
}

#[derive(Deserialize)]
struct Peek {
    #[serde(rename = "@client_id")]
    client_id: Option<i64>,
}

/// Read only `@client_id` out of a raw event.
///
/// The rest of the object is validated as JSON but not decoded. A missing
/// field or an id outside the `i32` range yields `None`.
pub fn peek_client_id(raw: &str) -> Result<Option<i32>, serde_json::Error> {
    let peek: Peek = serde_json::from_str(raw)?;
    Ok(peek.client_id.and_then(|id| i32::try_from(id).ok()))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn routing_fields_are_split_off() {
        let env = Envelope::from_value(json!({
            "@type": "ok",
            "@client_id": 3,
            "@extra": 17
        }))
        .unwrap();
        assert_eq!(env.client_id, Some(3));
        assert_eq!(env.extra, Some(json!(17)));
        assert!(matches!(env.object, Object::Ok(_)));
    }

    #[test]
    fn process_wide_event_has_no_client() {
        let env: Envelope = r#"{"@type":"updateOption","name":"version",
            "value":{"@type":"optionValueString","value":"1.8.0"}}"#
            .parse()
            .unwrap();
        assert_eq!(env.client_id, None);
    }

    #[test]
    fn peek_reads_only_the_client_id() {
        assert_eq!(peek_client_id(r#"{"@type":"x","@client_id":5,"deep":{"a":[1]}}"#).unwrap(), Some(5));
        assert_eq!(peek_client_id(r#"{"@type":"x"}"#).unwrap(), None);
        assert!(peek_client_id("{not json").is_err());
    }

    #[test]
    fn peek_ignores_out_of_range_ids() {
        assert_eq!(peek_client_id(r#"{"@client_id":99999999999}"#).unwrap(), None);
    }
}
