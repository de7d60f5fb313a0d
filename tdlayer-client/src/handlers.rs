//! Handler registrations for the per-client dispatcher.
//!
//! A [`Handlers`] set is a list of `(kind, filter, callback)` entries. For every
//! object delivered to a client, each entry whose kind matches and whose filter
//! accepts the payload fires, in registration order, one at a time.
//!
//! ```rust,no_run
//! use tdlayer_client::{Handlers, MessageFilter};
//! use tdlayer_types::types::UpdateOption;
//!
//! let handlers = Handlers::new()
//!     .on_authorization_state(|client, state| async move {
//!         println!("client {} is now in {}", client.id(), state.type_name());
//!     })
//!     .on_new_message(MessageFilter::new().outgoing(false), |client, msg| async move {
//!         if msg.text() == Some("/ping") {
//!             let _ = client.send_text(msg.chat_id, "pong").await;
//!         }
//!     })
//!     .on::<UpdateOption, _, _>(|_, opt| async move {
//!         println!("option {} changed", opt.name);
//!     });
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tdlayer_types::enums::{AuthorizationState, Object};
use tdlayer_types::types::Message;
use tdlayer_types::TdObject;

use crate::errors::TdError;
use crate::Client;

/// A boxed handler future.
pub type BoxFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// An optional predicate for [`Handlers::on_event`].
pub type EventFilter = Box<dyn Fn(&Object) -> bool + Send + Sync>;

// ─── Filters ──────────────────────────────────────────────────────────────────

/// A predicate over a decoded payload.
pub trait Filter<T>: Send + Sync + 'static {
    fn matches(&self, value: &T) -> bool;
}

impl<T, F> Filter<T> for F
where
    F: Fn(&T) -> bool + Send + Sync + 'static,
{
    fn matches(&self, value: &T) -> bool {
        self(value)
    }
}

/// Filter for new messages. Unset criteria accept everything.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MessageFilter {
    outgoing:     Option<bool>,
    chat_id:      Option<i64>,
    content_type: Option<String>,
}

impl MessageFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only messages sent (`true`) or received (`false`) by this account.
    pub fn outgoing(mut self, v: bool) -> Self {
        self.outgoing = Some(v); self
    }

    /// Only messages in `chat_id`.
    pub fn chat_id(mut self, chat_id: i64) -> Self {
        self.chat_id = Some(chat_id); self
    }

    /// Only messages whose content has this `@type`, e.g. `"messageText"`.
    pub fn content_type(mut self, t: impl Into<String>) -> Self {
        self.content_type = Some(t.into()); self
    }
}

impl Filter<Message> for MessageFilter {
    fn matches(&self, msg: &Message) -> bool {
        self.outgoing.is_none_or(|v| v == msg.is_outgoing)
            && self.chat_id.is_none_or(|id| id == msg.chat_id)
            && self.content_type.as_deref().is_none_or(|t| t == msg.content.type_name())
    }
}

// ─── Handler entries ──────────────────────────────────────────────────────────

type Erased = dyn Fn(&Client, &Object) -> Option<BoxFuture> + Send + Sync;

/// One type-erased registration.
pub(crate) struct Handler {
    kind: &'static str,
    call: Box<Erased>,
}

impl Handler {
    fn new<F>(kind: &'static str, call: F) -> Self
    where
        F: Fn(&Client, &Object) -> Option<BoxFuture> + Send + Sync + 'static,
    {
        Self { kind, call: Box::new(call) }
    }

    /// The callback future if this entry accepts `object`.
    pub(crate) fn prepare(&self, client: &Client, object: &Object) -> Option<BoxFuture> {
        (self.call)(client, object)
    }

    pub(crate) fn kind(&self) -> &'static str {
        self.kind
    }
}

// ─── Handlers ─────────────────────────────────────────────────────────────────

/// An ordered set of handler registrations.
#[derive(Clone, Default)]
pub struct Handlers {
    pub(crate) entries: Vec<Arc<Handler>>,
}

impl Handlers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push(mut self, handler: Handler) -> Self {
        self.entries.push(Arc::new(handler));
        self
    }

    /// Fire on every top-level object of shape `T`.
    pub fn on<T, F, Fut>(self, callback: F) -> Self
    where
        T: TdObject + TryFrom<Object> + Send + 'static,
        F: Fn(Client, T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.on_filtered(|_: &T| true, callback)
    }

    /// Like [`on`](Self::on), but only when `filter` accepts the payload.
    pub fn on_filtered<T, P, F, Fut>(self, filter: P, callback: F) -> Self
    where
        T: TdObject + TryFrom<Object> + Send + 'static,
        P: Filter<T>,
        F: Fn(Client, T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.push(Handler::new(T::TYPE, move |client, object| {
            if object.type_name() != T::TYPE {
                return None;
            }
            let value = T::try_from(object.clone()).ok()?;
            if !filter.matches(&value) {
                return None;
            }
            Some(Box::pin(callback(client.clone(), value)))
        }))
    }

    /// Fire on every object whose `@type` is `kind`, including objects that
    /// decoded to the `Unknown` fallback.
    pub fn on_event<F, Fut>(self, kind: &'static str, filter: Option<EventFilter>, callback: F) -> Self
    where
        F: Fn(Client, Object) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.push(Handler::new(kind, move |client, object| {
            if object.type_name() != kind || !filter.as_ref().is_none_or(|f| f(object)) {
                return None;
            }
            Some(Box::pin(callback(client.clone(), object.clone())))
        }))
    }

    /// Fire on every authorization state change.
    pub fn on_authorization_state<F, Fut>(self, callback: F) -> Self
    where
        F: Fn(Client, AuthorizationState) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.push(Handler::new("updateAuthorizationState", move |client, object| {
            let state = object.authorization_state()?;
            Some(Box::pin(callback(client.clone(), state)))
        }))
    }

    /// Fire on every `error` object not consumed by a correlated request.
    pub fn on_error<F, Fut>(self, callback: F) -> Self
    where
        F: Fn(Client, TdError) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.push(Handler::new("error", move |client, object| match object {
            Object::Error(e) => Some(Box::pin(callback(client.clone(), e.clone().into()))),
            _ => None,
        }))
    }

    /// Fire on every `updateNewMessage` whose message passes `filter`.
    pub fn on_new_message<F, Fut>(self, filter: MessageFilter, callback: F) -> Self
    where
        F: Fn(Client, Message) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.push(Handler::new("updateNewMessage", move |client, object| match object {
            Object::UpdateNewMessage(u) if filter.matches(&u.message) => {
                Some(Box::pin(callback(client.clone(), u.message.clone())))
            }
            _ => None,
        }))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn message(outgoing: bool, chat_id: i64, content: serde_json::Value) -> Message {
        serde_json::from_value(json!({
            "id": 1,
            "chat_id": chat_id,
            "is_outgoing": outgoing,
            "sender_id": {"@type": "messageSenderUser", "user_id": 1},
            "content": content,
        }))
        .unwrap()
    }

    fn text() -> serde_json::Value {
        json!({"@type": "messageText", "text": {"text": "hi"}})
    }

    #[test]
    fn empty_filter_accepts_everything() {
        let f = MessageFilter::new();
        assert!(f.matches(&message(true, 1, text())));
        assert!(f.matches(&message(false, 2, json!({"@type": "messageDice"}))));
    }

    #[test]
    fn criteria_combine() {
        let f = MessageFilter::new().outgoing(false).chat_id(5).content_type("messageText");
        assert!(f.matches(&message(false, 5, text())));
        assert!(!f.matches(&message(true, 5, text())));
        assert!(!f.matches(&message(false, 6, text())));
        assert!(!f.matches(&message(false, 5, json!({"@type": "messageUnsupported"}))));
    }

    #[test]
    fn unknown_content_matches_by_raw_type() {
        let f = MessageFilter::new().content_type("messageDice");
        assert!(f.matches(&message(false, 1, json!({"@type": "messageDice", "value": 3}))));
    }

    #[test]
    fn closures_are_filters() {
        let f = |m: &Message| m.chat_id < 0;
        assert!(f.matches(&message(false, -100, text())));
    }

    #[test]
    fn builder_keeps_registration_order() {
        let h = Handlers::new()
            .on_error(|_, _| async {})
            .on_new_message(MessageFilter::new(), |_, _| async {})
            .on_event("updateOption", None, |_, _| async {});
        let kinds: Vec<_> = h.entries.iter().map(|e| e.kind()).collect();
        assert_eq!(kinds, ["error", "updateNewMessage", "updateOption"]);
    }
}
