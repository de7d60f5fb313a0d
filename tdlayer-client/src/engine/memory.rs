use std::collections::VecDeque;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Condvar, Mutex, PoisonError};
use std::time::Duration;

use serde_json::{Value, json};
use tdlayer_types::{CLIENT_ID_FIELD, EXTRA_FIELD, TYPE_FIELD};

use super::{ClientId, Engine};

// ─── SentRequest ──────────────────────────────────────────────────────────────

/// A request submitted to a [`MemoryEngine`].
#[derive(Clone, Debug, PartialEq)]
pub struct SentRequest {
    /// `None` for requests passed to [`Engine::execute`].
    pub client_id: Option<ClientId>,
    pub body:      Value,
}

impl SentRequest {
    pub fn type_name(&self) -> &str {
        self.body.get(TYPE_FIELD).and_then(Value::as_str).unwrap_or_default()
    }

    pub fn extra(&self) -> Option<&Value> {
        self.body.get(EXTRA_FIELD)
    }
}

type Responder = dyn Fn(&SentRequest) -> Vec<Value> + Send + Sync;

// ─── MemoryEngine ─────────────────────────────────────────────────────────────

/// An in-process engine.
///
/// Events are injected with [`push_event`](Self::push_event) and come out of
/// [`Engine::receive`] in injection order. Every submitted request is
/// recorded. An optional responder turns requests into replies; each reply is
/// tagged with the requesting client id and, unless disabled with
/// [`echo_extra`](Self::echo_extra), the request's `@extra`.
///
/// ```rust
/// use serde_json::json;
/// use tdlayer_client::{Engine, MemoryEngine};
///
/// let engine = MemoryEngine::new().with_responder(|req| match req.type_name() {
///     "getMe" => vec![json!({"@type": "user", "id": 1, "type": {"@type": "userTypeRegular"}})],
///     _ => vec![json!({"@type": "ok"})],
/// });
/// let id = engine.create_client_id();
/// engine.send(id, r#"{"@type":"getMe","@extra":7}"#);
/// assert_eq!(engine.sent().len(), 1);
/// ```
pub struct MemoryEngine {
    next_id:    AtomicI32,
    queue:      Mutex<VecDeque<String>>,
    ready:      Condvar,
    sent:       Mutex<Vec<SentRequest>>,
    responder:  Option<Box<Responder>>,
    echo_extra: bool,
}

impl Default for MemoryEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryEngine {
    pub fn new() -> Self {
        Self {
            next_id:    AtomicI32::new(0),
            queue:      Mutex::new(VecDeque::new()),
            ready:      Condvar::new(),
            sent:       Mutex::new(Vec::new()),
            responder:  None,
            echo_extra: true,
        }
    }

    /// Answer every request with the objects `f` returns.
    pub fn with_responder<F>(mut self, f: F) -> Self
    where
        F: Fn(&SentRequest) -> Vec<Value> + Send + Sync + 'static,
    {
        self.responder = Some(Box::new(f));
        self
    }

    /// Whether replies carry the request's `@extra` (default: `true`).
    pub fn echo_extra(mut self, v: bool) -> Self {
        self.echo_extra = v;
        self
    }

    /// Queue a raw event exactly as given.
    pub fn push_raw(&self, raw: impl Into<String>) {
        let mut queue = self.queue.lock().unwrap_or_else(PoisonError::into_inner);
        queue.push_back(raw.into());
        self.ready.notify_one();
    }

    /// Queue an event, tagging it with `client_id` when given.
    pub fn push_event(&self, client_id: Option<ClientId>, mut event: Value) {
        if let (Some(id), Value::Object(map)) = (client_id, &mut event) {
            map.insert(CLIENT_ID_FIELD.to_owned(), json!(id));
        }
        self.push_raw(event.to_string());
    }

    /// Every request submitted so far, oldest first.
    pub fn sent(&self) -> Vec<SentRequest> {
        self.sent.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Submitted requests with the given `@type`.
    pub fn sent_of(&self, type_name: &str) -> Vec<SentRequest> {
        self.sent().into_iter().filter(|r| r.type_name() == type_name).collect()
    }

    /// Events queued but not yet received.
    pub fn queued(&self) -> usize {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn record(&self, client_id: Option<ClientId>, raw: &str) -> SentRequest {
        let body = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_owned()));
        let req = SentRequest { client_id, body };
        self.sent.lock().unwrap_or_else(PoisonError::into_inner).push(req.clone());
        req
    }

    fn respond(&self, req: &SentRequest) -> Vec<Value> {
        match &self.responder {
            Some(f) => f(req),
            None    => Vec::new(),
        }
    }
}

impl Engine for MemoryEngine {
    fn create_client_id(&self) -> ClientId {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn send(&self, client_id: ClientId, request: &str) {
        let req = self.record(Some(client_id), request);
        for mut reply in self.respond(&req) {
            if let Value::Object(map) = &mut reply {
                map.insert(CLIENT_ID_FIELD.to_owned(), json!(client_id));
                if let (true, Some(extra)) = (self.echo_extra, req.extra()) {
                    map.entry(EXTRA_FIELD).or_insert_with(|| extra.clone());
                }
            }
            self.push_raw(reply.to_string());
        }
    }

    fn receive(&self, timeout: Duration) -> Option<String> {
        let queue = self.queue.lock().unwrap_or_else(PoisonError::into_inner);
        let (mut queue, _) = self
            .ready
            .wait_timeout_while(queue, timeout, |q| q.is_empty())
            .unwrap_or_else(PoisonError::into_inner);
        queue.pop_front()
    }

    fn execute(&self, request: &str) -> Option<String> {
        let req = self.record(None, request);
        let reply = self.respond(&req).into_iter().next().unwrap_or_else(|| json!({"@type": "ok"}));
        Some(reply.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_ids_are_distinct() {
        let e = MemoryEngine::new();
        let a = e.create_client_id();
        let b = e.create_client_id();
        assert_ne!(a, b);
    }

    #[test]
    fn receive_times_out_when_empty() {
        let e = MemoryEngine::new();
        assert_eq!(e.receive(Duration::from_millis(10)), None);
    }

    #[test]
    fn events_come_out_in_order_with_client_tag() {
        let e = MemoryEngine::new();
        e.push_event(Some(4), json!({"@type": "ok"}));
        e.push_raw("{}");
        let first: Value = serde_json::from_str(&e.receive(Duration::ZERO).unwrap()).unwrap();
        assert_eq!(first["@client_id"], 4);
        assert_eq!(e.receive(Duration::ZERO).as_deref(), Some("{}"));
    }

    #[test]
    fn responder_replies_echo_extra() {
        let e = MemoryEngine::new().with_responder(|_| vec![json!({"@type": "ok"})]);
        e.send(2, r#"{"@type":"close","@extra":11}"#);
        let reply: Value = serde_json::from_str(&e.receive(Duration::ZERO).unwrap()).unwrap();
        assert_eq!(reply, json!({"@type": "ok", "@client_id": 2, "@extra": 11}));
        assert_eq!(e.sent_of("close").len(), 1);
    }

    #[test]
    fn echo_can_be_disabled() {
        let e = MemoryEngine::new().echo_extra(false).with_responder(|_| vec![json!({"@type": "ok"})]);
        e.send(2, r#"{"@type":"close","@extra":11}"#);
        let reply: Value = serde_json::from_str(&e.receive(Duration::ZERO).unwrap()).unwrap();
        assert!(reply.get("@extra").is_none());
    }

    #[test]
    fn execute_defaults_to_ok() {
        let e = MemoryEngine::new();
        assert_eq!(e.execute(r#"{"@type":"setLogVerbosityLevel","new_verbosity_level":1}"#).as_deref(), Some(r#"{"@type":"ok"}"#));
        assert_eq!(e.sent()[0].client_id, None);
    }
}
