//! TDLib JSON wire model.
//!
//! Every object crossing the engine boundary is a flat JSON object whose
//! `@type` field selects its concrete shape. This crate maps that protocol
//! onto closed Rust types.
//!
//! # Overview
//!
//! | Module        | Contents                                                    |
//! |---------------|-------------------------------------------------------------|
//! | [`types`]     | Concrete shapes (one `struct` per `@type` value)            |
//! | [`enums`]     | Discriminated families, each with an `Unknown` fallback     |
//! | [`functions`] | Outgoing requests implementing [`RemoteCall`]               |
//! | [`int64`]     | Codec for 64-bit identifiers transmitted as decimal strings |
//!
//! # Decoding an event
//!
//! ```rust
//! use tdlayer_types::{Envelope, enums::Object};
//!
//! let raw = r#"{"@type":"updateOption","@client_id":1,
//!              "name":"version","value":{"@type":"optionValueString","value":"1.8.0"}}"#;
//! let env: Envelope = raw.parse().unwrap();
//! assert_eq!(env.client_id, Some(1));
//! assert!(matches!(env.object, Object::UpdateOption(_)));
//! ```

#![deny(unsafe_code)]

#[macro_use]
mod discriminated;

pub mod enums;
pub mod envelope;
pub mod functions;
pub mod int64;
pub mod types;

pub use discriminated::{DecodeError, UnknownObject};
pub use envelope::{Envelope, peek_client_id};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Discriminator field present on every object.
pub const TYPE_FIELD: &str = "@type";
/// Engine-assigned client id, present on every event routed to a client.
pub const CLIENT_ID_FIELD: &str = "@client_id";
/// Opaque value echoed back by the engine on the direct reply to a request.
pub const EXTRA_FIELD: &str = "@extra";

// ─── Core traits ──────────────────────────────────────────────────────────────

/// A concrete shape with a fixed `@type` value.
pub trait TdObject: Serialize + DeserializeOwned {
    /// The discriminator value for this shape.
    const TYPE: &'static str;
}

/// Anything a request can be answered with.
///
/// Implemented for every [`TdObject`] (accepting exactly its own `@type`) and
/// for every discriminated family (accepting any of its registered values).
pub trait Reply: DeserializeOwned {
    /// `true` if an object tagged `type_name` decodes into `Self`.
    fn accepts(type_name: &str) -> bool;

    /// Human-readable name of what is accepted, for error messages.
    fn expected() -> &'static str;
}

/// Marks a request that the engine answers with a reply object.
pub trait RemoteCall: TdObject {
    /// The shape of a successful reply.
    type Return: Reply;
}

/// Encode `obj` into a JSON object with its `@type` set.
pub fn to_value<T: TdObject>(obj: &T) -> serde_json::Result<Value> {
    let value = serde_json::to_value(obj)?;
    Ok(Value::Object(tag_object(T::TYPE, value)))
}

/// Encode `obj` into a JSON string with its `@type` set.
pub fn to_string<T: TdObject>(obj: &T) -> serde_json::Result<String> {
    serde_json::to_string(&to_value(obj)?)
}

/// Insert `@type` into an encoded shape. Non-object values are wrapped as empty objects.
pub(crate) fn tag_object(type_name: &str, value: Value) -> Map<String, Value> {
    let mut map = match value {
        Value::Object(m) => m,
        _ => Map::new(),
    };
    map.insert(TYPE_FIELD.to_owned(), Value::String(type_name.to_owned()));
    map
}
