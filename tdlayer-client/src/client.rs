//! One engine client: its reader, its handler runner and its correlator.
//!
//! Each client owns two tasks. The *reader* drains the client's inbound queue,
//! decodes every event, mirrors authorization state, fulfils pending
//! correlated requests and forwards everything else. The *runner* receives
//! forwarded objects and invokes handlers strictly one at a time, so a
//! handler may itself await a correlated request without stalling the reader.

use std::collections::{HashMap, VecDeque};
use std::num::NonZeroU32;
use std::ops::ControlFlow;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;

use serde_json::Value;
use tdlayer_types::enums::{AuthorizationState, Object};
use tdlayer_types::{
    CLIENT_ID_FIELD, EXTRA_FIELD, Envelope, RemoteCall, Reply, TYPE_FIELD, TdObject, UnknownObject, types,
};
use tokio::sync::{mpsc, oneshot, watch};
use tokio_util::sync::CancellationToken;

use crate::config::ClientConfig;
use crate::engine::ClientId;
use crate::errors::{InvocationError, RegistryError, TdError};
use crate::handlers::{Handler, Handlers};
use crate::manager::Manager;
use crate::registry::QueueReceiver;
use crate::retry::RetryContext;
use crate::update::UpdateStream;

// ─── Correlation ──────────────────────────────────────────────────────────────

/// How a correlated request finds its reply.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Correlation {
    /// Stamp `@extra` with a per-client request id and wait for the reply
    /// echoing it. TDLib echoes `@extra` on every direct reply.
    #[default]
    Extra,
    /// Take the next object of this `@type` (or the next `error`) on the
    /// client's stream. Assumes no other request of the same reply kind is in
    /// flight; for engines that do not echo `@extra`.
    NextOfKind(String),
}

// ─── Pending requests ─────────────────────────────────────────────────────────

#[derive(Default)]
struct Pending {
    slots:   HashMap<u64, oneshot::Sender<Value>>,
    /// `NextOfKind` waiters in submission order.
    by_kind: VecDeque<(u64, String)>,
    closed:  bool,
}

impl Pending {
    /// Take the slot `value` answers, if any.
    fn take_for(&mut self, value: &Value) -> Option<oneshot::Sender<Value>> {
        // A tagged reply belongs to its own request only; once that slot is
        // gone it is an ordinary event.
        if let Some(extra) = value.get(EXTRA_FIELD) {
            let key = extra.as_u64()?;
            let slot = self.slots.remove(&key)?;
            self.by_kind.retain(|(k, _)| *k != key);
            return Some(slot);
        }
        let type_name = value.get(TYPE_FIELD).and_then(Value::as_str)?;
        let pos = self
            .by_kind
            .iter()
            .position(|(_, kind)| kind == type_name || type_name == "error")?;
        let (key, _) = self.by_kind.remove(pos)?;
        self.slots.remove(&key)
    }

    fn forget(&mut self, key: u64) {
        self.slots.remove(&key);
        self.by_kind.retain(|(k, _)| *k != key);
    }

    /// Refuse new requests and drop every slot, failing waiters with `Dropped`.
    fn close(&mut self) {
        self.closed = true;
        self.slots.clear();
        self.by_kind.clear();
    }
}

// ─── Client ───────────────────────────────────────────────────────────────────

struct ClientInner {
    id:          ClientId,
    manager:     Manager,
    config:      ClientConfig,
    next_extra:  AtomicU64,
    pending:     Mutex<Pending>,
    handlers:    RwLock<Vec<Arc<Handler>>>,
    subscribers: Mutex<Vec<mpsc::UnboundedSender<Object>>>,
    auth:        watch::Sender<Option<AuthorizationState>>,
    cancel:      CancellationToken,
}

/// A registered engine client. Cheap to clone; internally Arc-wrapped.
///
/// The client keeps running until it is unregistered or the engine closes it
/// (`authorizationStateClosed`); dropping every handle does not stop it.
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client").field("id", &self.inner.id).finish_non_exhaustive()
    }
}

impl Client {
    /// Spawn the reader and runner for a freshly registered client.
    pub(crate) fn spawn(
        manager:  Manager,
        id:       ClientId,
        config:   ClientConfig,
        handlers: Handlers,
        queue:    QueueReceiver,
    ) -> Self {
        let (auth, _) = watch::channel(None);
        let client = Self {
            inner: Arc::new(ClientInner {
                id,
                manager,
                config,
                next_extra:  AtomicU64::new(0),
                pending:     Mutex::new(Pending::default()),
                handlers:    RwLock::new(handlers.entries),
                subscribers: Mutex::new(Vec::new()),
                auth,
                cancel:      CancellationToken::new(),
            }),
        };

        let (forward_tx, forward_rx) = mpsc::unbounded_channel();
        tokio::spawn(client.clone().read_loop(queue, forward_tx));
        tokio::spawn(client.clone().run_handlers(forward_rx));
        client
    }

    /// The engine-assigned id.
    pub fn id(&self) -> ClientId {
        self.inner.id
    }

    pub fn manager(&self) -> &Manager {
        &self.inner.manager
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// `false` once the client was unregistered or closed.
    pub fn is_running(&self) -> bool {
        !self.inner.cancel.is_cancelled() && !self.lock_pending().closed
    }

    // ── Handlers ───────────────────────────────────────────────────────────

    /// Append every registration in `handlers` after the existing ones.
    pub fn add_handlers(&self, handlers: Handlers) {
        self.inner
            .handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(handlers.entries);
    }

    /// Same as [`Handlers::on`], on a running client.
    pub fn on<T, F, Fut>(&self, callback: F)
    where
        T: TdObject + TryFrom<Object> + Send + 'static,
        F: Fn(Client, T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.add_handlers(Handlers::new().on(callback));
    }

    /// Same as [`Handlers::on_event`], on a running client.
    pub fn on_event<F, Fut>(&self, kind: &'static str, filter: Option<crate::EventFilter>, callback: F)
    where
        F: Fn(Client, Object) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.add_handlers(Handlers::new().on_event(kind, filter, callback));
    }

    /// A stream of every object delivered to this client from now on.
    pub fn updates(&self) -> UpdateStream {
        let (tx, rx) = mpsc::unbounded_channel();
        if self.is_running() {
            self.inner.subscribers.lock().unwrap_or_else(PoisonError::into_inner).push(tx);
        }
        UpdateStream::new(rx)
    }

    // ── Authorization state ────────────────────────────────────────────────

    /// The last authorization state seen, if any.
    pub fn authorization_state(&self) -> Option<AuthorizationState> {
        self.inner.auth.borrow().clone()
    }

    /// Wait until the authorization state satisfies `pred`.
    ///
    /// Checks the current state first, so a state reached before the call
    /// is not missed.
    pub async fn wait_for_authorization<P>(
        &self,
        pred:    P,
        timeout: Duration,
    ) -> Result<AuthorizationState, InvocationError>
    where
        P: Fn(&AuthorizationState) -> bool,
    {
        let mut rx = self.inner.auth.subscribe();
        let wait = async {
            loop {
                let current = rx.borrow_and_update().clone();
                if let Some(state) = current.filter(|s| pred(s)) {
                    return Ok(state);
                }
                if rx.changed().await.is_err() {
                    return Err(InvocationError::Dropped);
                }
            }
        };
        tokio::time::timeout(timeout, wait)
            .await
            .map_err(|_| InvocationError::Timeout(timeout))?
    }

    // ── Requests ───────────────────────────────────────────────────────────

    /// Submit `req` without waiting for a reply. Any reply goes to handlers.
    pub fn send<R: TdObject>(&self, req: &R) -> Result<(), InvocationError> {
        let body = tdlayer_types::to_value(req)?;
        if !self.is_running() {
            return Err(InvocationError::Dropped);
        }
        self.submit(&body);
        Ok(())
    }

    /// Submit `req` and wait for its reply, retrying under the configured policy.
    pub async fn invoke<R: RemoteCall>(&self, req: &R) -> Result<R::Return, InvocationError> {
        self.invoke_with(req, Correlation::Extra).await
    }

    /// [`invoke`](Self::invoke) with an explicit correlation strategy.
    pub async fn invoke_with<R: RemoteCall>(
        &self,
        req:         &R,
        correlation: Correlation,
    ) -> Result<R::Return, InvocationError> {
        let mut fail_count   = NonZeroU32::MIN;
        let mut slept_so_far = Duration::default();
        loop {
            match self.call_once(req, &correlation).await {
                Ok(reply) => return Ok(reply),
                Err(e) => {
                    let ctx = RetryContext { fail_count, slept_so_far, error: e };
                    match self.inner.config.retry_policy.should_retry(&ctx) {
                        ControlFlow::Continue(delay) => {
                            tokio::time::sleep(delay).await;
                            slept_so_far += delay;
                            fail_count = fail_count.saturating_add(1);
                        }
                        ControlFlow::Break(()) => return Err(ctx.error),
                    }
                }
            }
        }
    }

    async fn call_once<R: RemoteCall>(
        &self,
        req:         &R,
        correlation: &Correlation,
    ) -> Result<R::Return, InvocationError> {
        let mut body = tdlayer_types::to_value(req)?;
        let key = self.inner.next_extra.fetch_add(1, Ordering::Relaxed) + 1;

        let rx = {
            let mut pending = self.lock_pending();
            if pending.closed || self.inner.cancel.is_cancelled() {
                return Err(InvocationError::Dropped);
            }
            let (tx, rx) = oneshot::channel();
            pending.slots.insert(key, tx);
            match correlation {
                Correlation::Extra => {
                    if let Value::Object(map) = &mut body {
                        map.insert(EXTRA_FIELD.to_owned(), key.into());
                    }
                }
                Correlation::NextOfKind(kind) => pending.by_kind.push_back((key, kind.clone())),
            }
            rx
        };

        tracing::debug!("[tdlayer] client {} → {} (#{key})", self.inner.id, R::TYPE);
        self.submit(&body);

        let timeout = self.inner.config.request_timeout;
        match tokio::time::timeout(timeout, rx).await {
            Ok(Ok(reply)) => decode_reply::<R::Return>(reply),
            Ok(Err(_)) => Err(InvocationError::Dropped),
            Err(_) => {
                self.lock_pending().forget(key);
                tracing::warn!("[tdlayer] client {}: {} timed out after {timeout:?}", self.inner.id, R::TYPE);
                Err(InvocationError::Timeout(timeout))
            }
        }
    }

    fn submit(&self, body: &Value) {
        self.inner.manager.engine().send(self.inner.id, &body.to_string());
    }

    // ── Teardown ───────────────────────────────────────────────────────────

    /// Stop delivery to this client immediately.
    ///
    /// Events arriving afterwards go to the manager's unrouted sink. A handler
    /// already running finishes; no further handler starts. Pending requests
    /// fail with [`InvocationError::Dropped`].
    pub fn unregister(&self) -> Result<(), RegistryError> {
        self.inner.manager.registry().unregister(self.inner.id)?;
        self.inner.cancel.cancel();
        self.shut_down();
        tracing::info!("[tdlayer] client {} unregistered", self.inner.id);
        Ok(())
    }

    fn shut_down(&self) {
        self.lock_pending().close();
        self.inner.subscribers.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }

    fn lock_pending(&self) -> std::sync::MutexGuard<'_, Pending> {
        self.inner.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ── Tasks ──────────────────────────────────────────────────────────────

    async fn read_loop(self, mut queue: QueueReceiver, forward: mpsc::UnboundedSender<Object>) {
        let id = self.inner.id;
        loop {
            let raw = tokio::select! {
                biased;
                _ = self.inner.cancel.cancelled() => break,
                raw = queue.recv() => match raw {
                    Some(raw) => raw,
                    None => break,
                },
            };

            let value: Value = match serde_json::from_str(&raw) {
                Ok(v) => v,
                Err(e) => {
                    tracing::warn!("[tdlayer] client {id}: malformed event dropped: {e}");
                    continue;
                }
            };

            let slot = self.lock_pending().take_for(&value);
            if let Some(slot) = slot {
                self.mirror_reply_state(&value);
                // The caller may have timed out in between; its reply is then discarded.
                let _ = slot.send(value);
                continue;
            }

            let object = match value {
                Value::Object(mut map) if !map.get(TYPE_FIELD).is_some_and(Value::is_string) => {
                    tracing::warn!("[tdlayer] client {id}: event without @type delivered as unknown");
                    map.remove(CLIENT_ID_FIELD);
                    map.remove(EXTRA_FIELD);
                    Object::Unknown(UnknownObject::new(String::new(), map))
                }
                value => match Envelope::from_value(value) {
                    Ok(env) => env.object,
                    Err(e) => {
                        tracing::warn!("[tdlayer] client {id}: {e}");
                        match e.into_unknown() {
                            Some(unknown) => Object::Unknown(unknown),
                            None => continue,
                        }
                    }
                },
            };
            tracing::debug!("[tdlayer] client {id} ← {}", object.type_name());

            let state = match &object {
                Object::UpdateAuthorizationState(u) => Some(u.authorization_state.clone()),
                _ => None,
            };
            if let Some(state) = &state {
                self.inner.auth.send_replace(Some(state.clone()));
            }

            self.inner
                .subscribers
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .retain(|tx| tx.send(object.clone()).is_ok());

            if forward.send(object).is_err() {
                break;
            }

            if state.is_some_and(|s| s.is_closed()) {
                tracing::info!("[tdlayer] client {id} closed by the engine");
                self.shut_down();
                if let Err(e) = self.inner.manager.registry().unregister(id) {
                    tracing::debug!("[tdlayer] client {id}: {e}");
                }
                break;
            }
        }
        self.shut_down();
        tracing::debug!("[tdlayer] client {id} reader stopped");
    }

    /// Correlated replies bypass dispatch, so a bare `authorizationState*`
    /// reply updates the mirror here.
    fn mirror_reply_state(&self, value: &Value) {
        let is_state = value
            .get(TYPE_FIELD)
            .and_then(Value::as_str)
            .is_some_and(|t| t.starts_with("authorizationState"));
        if !is_state {
            return;
        }
        match AuthorizationState::from_value(value.clone()) {
            Ok(state) if !state.is_unknown() => {
                self.inner.auth.send_replace(Some(state));
            }
            Ok(_) => {}
            Err(e) => tracing::debug!("[tdlayer] client {}: {e}", self.inner.id),
        }
    }

    async fn run_handlers(self, mut objects: mpsc::UnboundedReceiver<Object>) {
        let id = self.inner.id;
        let cancel = self.inner.cancel.clone();
        loop {
            let object = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                object = objects.recv() => match object {
                    Some(object) => object,
                    None => break,
                },
            };

            let handlers = self.inner.handlers.read().unwrap_or_else(PoisonError::into_inner).clone();
            for handler in handlers {
                if cancel.is_cancelled() {
                    break;
                }
                let Some(fut) = handler.prepare(&self, &object) else { continue };
                if let Err(e) = tokio::spawn(fut).await {
                    if e.is_panic() {
                        tracing::error!(
                            "[tdlayer] client {id}: {} handler panicked on {}",
                            handler.kind(),
                            object.type_name(),
                        );
                    }
                }
            }
        }
        tracing::debug!("[tdlayer] client {id} handler runner stopped");
    }
}

/// Decode a reply value into `T`, turning an `error` object into [`TdError`].
pub(crate) fn decode_reply<T: Reply>(mut value: Value) -> Result<T, InvocationError> {
    if let Value::Object(map) = &mut value {
        map.remove(CLIENT_ID_FIELD);
        map.remove(EXTRA_FIELD);
    }
    let type_name = value.get(TYPE_FIELD).and_then(Value::as_str).unwrap_or_default().to_owned();
    if type_name == "error" {
        let e: types::Error = serde_json::from_value(value)?;
        return Err(TdError::from(e).into());
    }
    if !T::accepts(&type_name) {
        return Err(InvocationError::UnexpectedReply { expected: T::expected(), got: type_name });
    }
    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tdlayer_types::types::User;

    use super::*;

    #[test]
    fn reply_decodes_into_expected_shape() {
        let user: User = decode_reply(json!({
            "@type": "user", "@extra": 3, "@client_id": 1,
            "id": "777", "first_name": "Ada", "type": {"@type": "userTypeRegular"}
        }))
        .unwrap();
        assert_eq!(user.id, 777);
        assert_eq!(user.first_name, "Ada");
    }

    #[test]
    fn error_reply_becomes_td_error() {
        let err = decode_reply::<User>(json!({"@type": "error", "code": 400, "message": "USER_NOT_FOUND"})).unwrap_err();
        let InvocationError::Td(td) = err else { panic!("expected Td, got {err:?}") };
        assert_eq!(td, TdError { code: 400, message: "USER_NOT_FOUND".into() });
    }

    #[test]
    fn wrong_reply_kind_is_reported() {
        let err = decode_reply::<User>(json!({"@type": "ok"})).unwrap_err();
        assert!(matches!(err, InvocationError::UnexpectedReply { expected: "user", ref got } if got == "ok"));
    }

    #[test]
    fn family_reply_accepts_any_member() {
        let state: AuthorizationState = decode_reply(json!({"@type": "authorizationStateReady"})).unwrap();
        assert!(state.is_ready());
    }

    #[test]
    fn pending_matches_by_extra_then_kind() {
        let mut p = Pending::default();
        let (tx1, _rx1) = oneshot::channel();
        let (tx2, _rx2) = oneshot::channel();
        p.slots.insert(1, tx1);
        p.slots.insert(2, tx2);
        p.by_kind.push_back((2, "chats".into()));

        assert!(p.take_for(&json!({"@type": "updateOption"})).is_none());
        assert!(p.take_for(&json!({"@type": "ok", "@extra": 1})).is_some());
        assert!(p.take_for(&json!({"@type": "ok", "@extra": 1})).is_none());
        assert!(p.take_for(&json!({"@type": "error", "code": 1})).is_some());
        assert!(p.slots.is_empty() && p.by_kind.is_empty());
    }

    #[test]
    fn stale_tagged_reply_does_not_complete_kind_waiter() {
        let mut p = Pending::default();
        let (tx2, _rx2) = oneshot::channel();
        p.slots.insert(2, tx2);
        p.by_kind.push_back((2, "chats".into()));

        // Request 1 already timed out and forgot its slot.
        assert!(p.take_for(&json!({"@type": "error", "code": 500, "@extra": 1})).is_none());
        assert!(p.take_for(&json!({"@type": "chats", "@extra": 1})).is_none());
        assert_eq!(p.by_kind.len(), 1);

        assert!(p.take_for(&json!({"@type": "chats", "total_count": 0})).is_some());
        assert!(p.slots.is_empty() && p.by_kind.is_empty());
    }
}
