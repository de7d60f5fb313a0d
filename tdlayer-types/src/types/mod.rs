//! Concrete shapes, one `struct` per `@type` value.
//!
//! Shapes are grouped by domain but re-exported flat, so every one of them is
//! reachable as `types::Name`.

mod auth;
mod chat;
mod file;
mod markup;
mod message;
mod misc;
mod update;
mod user;

pub use auth::*;
pub use chat::*;
pub use file::*;
pub use markup::*;
pub use message::*;
pub use misc::*;
pub use update::*;
pub use user::*;

/// Decode a list that may contain `null` holes, dropping the holes.
pub(crate) fn skip_nulls<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::Deserialize<'de>,
{
    let items: Vec<Option<T>> = serde::Deserialize::deserialize(d)?;
    // `Ok` names the wire shape in this module.
    Result::Ok(items.into_iter().flatten().collect())
}

pub(crate) fn is_false(v: &bool) -> bool {
    !*v
}
