//! Discriminator-driven decoding.
//!
//! [`td_enum!`] turns a list of `Variant(Shape) = "tag"` entries into a closed
//! enum plus an `Unknown` fallback. Decoding reads `@type`, looks the value up
//! in the family's table and deserializes the matching shape; a value with no
//! registered shape becomes [`UnknownObject`] with every field kept.

use serde::ser::{Error as _, SerializeMap};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::TYPE_FIELD;

// ─── DecodeError ──────────────────────────────────────────────────────────────

/// Why an object could not be decoded.
///
/// An unrecognized `@type` is *not* an error; see [`UnknownObject`].
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The bytes are not valid JSON.
    #[error("malformed JSON: {0}")]
    Syntax(#[from] serde_json::Error),
    /// Valid JSON, but not an object.
    #[error("expected a JSON object, got {0}")]
    NotAnObject(&'static str),
    /// The object has no string `@type`.
    #[error("missing `@type` discriminator")]
    MissingType,
    /// `@type` is registered but the fields do not fit its shape.
    #[error("invalid `{type_name}` object: {source}")]
    Shape {
        type_name: String,
        payload:   Map<String, Value>,
        #[source]
        source:    serde_json::Error,
    },
}

impl DecodeError {
    /// Salvage a [`DecodeError::Shape`] as an unknown object, keeping the
    /// discriminator and payload.
    pub fn into_unknown(self) -> Option<UnknownObject> {
        match self {
            Self::Shape { type_name, payload, .. } => Some(UnknownObject::new(type_name, payload)),
            _ => None,
        }
    }
}

// ─── UnknownObject ────────────────────────────────────────────────────────────

/// An object whose `@type` has no registered shape in the family it was
/// decoded as.
///
/// Re-encoding produces the same object that was decoded.
#[derive(Clone, Debug, PartialEq)]
pub struct UnknownObject {
    /// The raw `@type` value.
    pub type_name: String,
    /// Every other field, untouched.
    pub payload:   Map<String, Value>,
}

impl UnknownObject {
    pub fn new(type_name: impl Into<String>, payload: Map<String, Value>) -> Self {
        Self { type_name: type_name.into(), payload }
    }

    /// Look up a raw field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.payload.get(field)
    }
}

impl Serialize for UnknownObject {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        let mut map = s.serialize_map(Some(self.payload.len() + 1))?;
        map.serialize_entry(TYPE_FIELD, &self.type_name)?;
        for (k, v) in &self.payload {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

// ─── Helpers used by the macros ───────────────────────────────────────────────

/// Split an object into its `@type` and remaining fields.
pub(crate) fn split_tag(value: Value) -> Result<(String, Map<String, Value>), DecodeError> {
    let mut map = match value {
        Value::Object(m) => m,
        other => return Err(DecodeError::NotAnObject(json_kind(&other))),
    };
    match map.remove(TYPE_FIELD) {
        Some(Value::String(tag)) => Ok((tag, map)),
        _ => Err(DecodeError::MissingType),
    }
}

pub(crate) fn serialize_tagged<T: Serialize, S: Serializer>(
    tag:   &str,
    value: &T,
    s:     S,
) -> Result<S::Ok, S::Error> {
    let value = serde_json::to_value(value).map_err(S::Error::custom)?;
    crate::tag_object(tag, value).serialize(s)
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null      => "null",
        Value::Bool(_)   => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_)  => "an array",
        Value::Object(_) => "an object",
    }
}

// ─── Macros ───────────────────────────────────────────────────────────────────

/// Implement [`crate::TdObject`] and [`crate::Reply`] for concrete shapes.
macro_rules! td_object {
    ($($ty:ty => $tag:literal),* $(,)?) => {
        $(
            impl $crate::TdObject for $ty {
                const TYPE: &'static str = $tag;
            }

            impl $crate::Reply for $ty {
                fn accepts(type_name: &str) -> bool { type_name == $tag }
                fn expected() -> &'static str { $tag }
            }
        )*
    };
}

/// Declare a discriminated family.
macro_rules! td_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident($ty:ty) = $tag:literal
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                $variant($ty),
            )*
            /// A value whose `@type` has no registered shape in this family.
            Unknown($crate::UnknownObject),
        }

        impl $name {
            /// Every `@type` value with a registered shape in this family.
            pub const KNOWN_TYPES: &'static [&'static str] = &[$($tag),*];

            /// The discriminator of this value, including unrecognized ones.
            pub fn type_name(&self) -> &str {
                match self {
                    $(Self::$variant(_) => $tag,)*
                    Self::Unknown(u) => &u.type_name,
                }
            }

            /// `true` if the `@type` had no registered shape.
            pub fn is_unknown(&self) -> bool {
                matches!(self, Self::Unknown(_))
            }

            /// Decode a JSON object by its `@type`.
            pub fn from_value(value: serde_json::Value) -> Result<Self, $crate::DecodeError> {
                let (tag, map) = $crate::discriminated::split_tag(value)?;
                let value = serde_json::Value::Object(map);
                match tag.as_str() {
                    $(
                        $tag => match <$ty as serde::Deserialize>::deserialize(&value) {
                            Ok(v) => Ok(Self::$variant(v)),
                            Err(source) => Err($crate::DecodeError::Shape {
                                type_name: tag.clone(),
                                payload:   match value {
                                    serde_json::Value::Object(m) => m,
                                    _ => serde_json::Map::new(),
                                },
                                source,
                            }),
                        },
                    )*
                    _ => match value {
                        serde_json::Value::Object(m) => Ok(Self::Unknown($crate::UnknownObject::new(tag.clone(), m))),
                        _ => Ok(Self::Unknown($crate::UnknownObject::new(tag.clone(), serde_json::Map::new()))),
                    },
                }
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
                let value = <serde_json::Value as serde::Deserialize>::deserialize(d)?;
                Self::from_value(value).map_err(<D::Error as serde::de::Error>::custom)
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
                match self {
                    $(Self::$variant(v) => $crate::discriminated::serialize_tagged($tag, v, s),)*
                    Self::Unknown(u) => serde::Serialize::serialize(u, s),
                }
            }
        }

        impl $crate::Reply for $name {
            fn accepts(type_name: &str) -> bool {
                Self::KNOWN_TYPES.contains(&type_name)
            }

            fn expected() -> &'static str { stringify!($name) }
        }

        $(
            impl From<$ty> for $name {
                fn from(v: $ty) -> Self { Self::$variant(v) }
            }

            impl TryFrom<$name> for $ty {
                type Error = $name;

                fn try_from(v: $name) -> Result<Self, $name> {
                    match v {
                        $name::$variant(x) => Ok(x),
                        other => Err(other),
                    }
                }
            }
        )*
    };
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    use super::*;

    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Circle {
        radius: f64,
    }

    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Square {
        side: i32,
    }

    td_enum! {
        Shape {
            Circle(Circle) = "circle",
            Square(Square) = "square",
        }
    }

    #[test]
    fn registered_tag_picks_shape() {
        let s = Shape::from_value(json!({"@type": "square", "side": 3})).unwrap();
        assert_eq!(s, Shape::Square(Square { side: 3 }));
        assert_eq!(s.type_name(), "square");
    }

    #[test]
    fn unregistered_tag_keeps_payload() {
        let s = Shape::from_value(json!({"@type": "hexagon", "side": 2, "tilt": true})).unwrap();
        let Shape::Unknown(u) = &s else { panic!("expected fallback") };
        assert_eq!(u.type_name, "hexagon");
        assert_eq!(u.get("side"), Some(&json!(2)));
        assert_eq!(u.get("tilt"), Some(&json!(true)));
        assert_eq!(s.type_name(), "hexagon");
    }

    #[test]
    fn unknown_reencodes_to_original() {
        let original = json!({"@type": "hexagon", "side": 2});
        let s = Shape::from_value(original.clone()).unwrap();
        assert_eq!(serde_json::to_value(&s).unwrap(), original);
    }

    #[test]
    fn known_encodes_with_tag() {
        let v = serde_json::to_value(Shape::Circle(Circle { radius: 1.5 })).unwrap();
        assert_eq!(v, json!({"@type": "circle", "radius": 1.5}));
    }

    #[test]
    fn missing_tag_is_an_error() {
        let err = Shape::from_value(json!({"side": 3})).unwrap_err();
        assert!(matches!(err, DecodeError::MissingType));
    }

    #[test]
    fn non_object_is_an_error() {
        let err = Shape::from_value(json!([1, 2])).unwrap_err();
        assert!(matches!(err, DecodeError::NotAnObject("an array")));
    }

    #[test]
    fn bad_shape_can_be_salvaged() {
        let err = Shape::from_value(json!({"@type": "square", "side": "wide"})).unwrap_err();
        let u = err.into_unknown().expect("shape errors keep their payload");
        assert_eq!(u.type_name, "square");
        assert_eq!(u.get("side"), Some(&json!("wide")));
    }

    #[test]
    fn decoding_is_deterministic() {
        let v = json!({"@type": "triangle", "a": 1});
        assert_eq!(Shape::from_value(v.clone()).unwrap(), Shape::from_value(v).unwrap());
    }

    #[test]
    fn try_from_round_trips_variant() {
        let s: Shape = Square { side: 4 }.into();
        assert_eq!(Square::try_from(s).unwrap(), Square { side: 4 });
        let c: Shape = Circle { radius: 1.0 }.into();
        assert!(Square::try_from(c).is_err());
    }
}
