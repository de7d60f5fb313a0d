//! The process-wide poll loop and event router.
//!
//! One [`Manager`] owns the engine. Its poll loop repeatedly receives the next
//! raw event, peeks only at `@client_id`, and moves the untouched text onto
//! the owning client's queue. Full decoding happens later on the client's own
//! reader, so a slow or broken client never delays routing for the others.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tdlayer_client::{ClientConfig, Handlers, Manager, ManagerConfig, ManagerHandlers, MemoryEngine};
//!
//! # async fn f() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = Manager::start(
//!     Arc::new(MemoryEngine::new()),
//!     ManagerConfig::default(),
//!     ManagerHandlers::new().on_unrouted_event(|raw| async move {
//!         tracing::debug!("unrouted: {raw}");
//!     }),
//! );
//! let client = manager.new_client(ClientConfig::new(12345, "0123456789abcdef"), Handlers::new())?;
//! client.set_tdlib_parameters().await?;
//! # Ok(()) }
//! ```

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tdlayer_types::functions::{SetLogStream, SetLogVerbosityLevel};
use tdlayer_types::{RemoteCall, peek_client_id, types};
use tokio::sync::{Semaphore, mpsc};
use tokio_util::sync::CancellationToken;

use crate::client::decode_reply;
use crate::config::{ClientConfig, LogConfig, ManagerConfig};
use crate::engine::Engine;
use crate::errors::{InvocationError, ManagerError};
use crate::handlers::{BoxFuture, Handlers};
use crate::registry::ClientRegistry;
use crate::{Client, RawEvent};

// ─── ManagerHandlers ──────────────────────────────────────────────────────────

type RawCallback = Arc<dyn Fn(RawEvent) -> BoxFuture + Send + Sync>;

/// Manager-level hooks on raw events.
///
/// Each hook runs on its own task, one event at a time in arrival order, so a
/// slow hook never blocks routing.
#[derive(Clone, Default)]
pub struct ManagerHandlers {
    raw:      Option<RawCallback>,
    unrouted: Option<RawCallback>,
}

impl ManagerHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    /// See every event before it is routed, client-tagged or not.
    pub fn on_raw_event<F, Fut>(mut self, callback: F) -> Self
    where
        F: Fn(RawEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.raw = Some(Arc::new(move |raw| Box::pin(callback(raw))));
        self
    }

    /// See events with no `@client_id`, or with one that is not registered.
    pub fn on_unrouted_event<F, Fut>(mut self, callback: F) -> Self
    where
        F: Fn(RawEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.unrouted = Some(Arc::new(move |raw| Box::pin(callback(raw))));
        self
    }
}

/// Run `callback` for every event on `rx`, sequentially, surviving panics.
fn spawn_sink(name: &'static str, callback: RawCallback) -> mpsc::UnboundedSender<RawEvent> {
    let (tx, mut rx) = mpsc::unbounded_channel::<RawEvent>();
    tokio::spawn(async move {
        while let Some(raw) = rx.recv().await {
            if let Err(e) = tokio::spawn(callback(raw)).await {
                if e.is_panic() {
                    tracing::error!("[tdlayer] {name} handler panicked");
                }
            }
        }
    });
    tx
}

// ─── Manager ──────────────────────────────────────────────────────────────────

struct ManagerInner {
    engine:   Arc<dyn Engine>,
    registry: ClientRegistry,
    config:   ManagerConfig,
    gate:     Semaphore,
    /// Held from the engine pop until the event is queued, so routing
    /// follows engine order whatever the gate size.
    order:    Mutex<()>,
    raw:      Option<mpsc::UnboundedSender<RawEvent>>,
    unrouted: Option<mpsc::UnboundedSender<RawEvent>>,
    shutdown: CancellationToken,
}

/// Owns the engine, the client registry and the poll loop.
///
/// Cheap to clone; internally Arc-wrapped. Must be started inside a Tokio
/// runtime.
#[derive(Clone)]
pub struct Manager {
    inner: Arc<ManagerInner>,
}

impl std::fmt::Debug for Manager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Manager")
            .field("clients", &self.inner.registry.len())
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl Manager {
    /// Configure engine logging and start the poll loop.
    pub fn start(engine: Arc<dyn Engine>, config: ManagerConfig, handlers: ManagerHandlers) -> Self {
        let manager = Self {
            inner: Arc::new(ManagerInner {
                engine,
                registry: ClientRegistry::new(),
                gate:     Semaphore::new(config.max_concurrent_polls.max(1)),
                order:    Mutex::new(()),
                raw:      handlers.raw.map(|cb| spawn_sink("raw", cb)),
                unrouted: handlers.unrouted.map(|cb| spawn_sink("unrouted", cb)),
                shutdown: CancellationToken::new(),
                config,
            }),
        };
        manager.apply_log_config(&manager.inner.config.log);
        tokio::spawn(manager.clone().poll_loop());
        tracing::info!(
            "[tdlayer] manager started (interval {:?}, receive timeout {:?})",
            manager.inner.config.poll_interval,
            manager.inner.config.receive_timeout,
        );
        manager
    }

    fn apply_log_config(&self, log: &LogConfig) {
        if let Some(level) = log.verbosity {
            if let Err(e) = self.execute(&SetLogVerbosityLevel { new_verbosity_level: level }) {
                tracing::warn!("[tdlayer] setLogVerbosityLevel failed: {e}");
            }
        }
        if let Some(path) = &log.file {
            let stream = types::LogStreamFile {
                path:            path.clone(),
                max_file_size:   log.max_file_size,
                redirect_stderr: false,
            };
            if let Err(e) = self.execute(&SetLogStream { log_stream: stream.into() }) {
                tracing::warn!("[tdlayer] setLogStream to {path} failed: {e}");
            }
        }
    }

    pub fn engine(&self) -> &Arc<dyn Engine> {
        &self.inner.engine
    }

    pub fn registry(&self) -> &ClientRegistry {
        &self.inner.registry
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.inner.config
    }

    pub fn is_shutdown(&self) -> bool {
        self.inner.shutdown.is_cancelled()
    }

    // ── Clients ────────────────────────────────────────────────────────────

    /// Allocate a client id, register its queue and start its tasks.
    ///
    /// The engine activates the client on its first request, usually
    /// [`Client::set_tdlib_parameters`] or [`Client::get_authorization_state`].
    pub fn new_client(&self, config: ClientConfig, handlers: Handlers) -> Result<Client, ManagerError> {
        if self.is_shutdown() {
            return Err(ManagerError::Shutdown);
        }
        let id = self.inner.engine.create_client_id();
        let queue = self.inner.registry.register(id)?;
        let client = Client::spawn(self.clone(), id, config, handlers, queue);
        tracing::info!("[tdlayer] client {id} registered ({} live)", self.inner.registry.len());
        Ok(client)
    }

    /// Stop polling and close every client queue.
    pub fn shutdown(&self) {
        if self.inner.shutdown.is_cancelled() {
            return;
        }
        self.inner.shutdown.cancel();
        for id in self.inner.registry.ids() {
            // A client may unregister itself concurrently.
            let _ = self.inner.registry.unregister(id);
        }
        tracing::info!("[tdlayer] manager shut down");
    }

    // ── Engine calls ───────────────────────────────────────────────────────

    /// Run a request synchronously, outside any client.
    pub fn execute<R: RemoteCall>(&self, req: &R) -> Result<R::Return, InvocationError> {
        let body = tdlayer_types::to_string(req)?;
        let Some(reply) = self.inner.engine.execute(&body) else {
            return Err(InvocationError::UnexpectedReply {
                expected: <R::Return as tdlayer_types::Reply>::expected(),
                got:      String::new(),
            });
        };
        decode_reply(serde_json::from_str(&reply)?)
    }

    /// Poll the engine once and route what arrives.
    ///
    /// Shares the concurrency gate with the poll loop. Concurrent callers
    /// take turns on the engine, so each client still sees its events in the
    /// order the engine produced them.
    pub async fn receive_once(&self, timeout: Duration) -> Option<RawEvent> {
        let _permit = self.inner.gate.acquire().await.ok()?;
        let manager = self.clone();
        let received = tokio::task::spawn_blocking(move || {
            let _order = manager.inner.order.lock().unwrap_or_else(PoisonError::into_inner);
            let raw: RawEvent = Arc::from(manager.inner.engine.receive(timeout)?);
            manager.route(Arc::clone(&raw));
            Some(raw)
        });
        match received.await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!("[tdlayer] engine receive failed: {e}");
                None
            }
        }
    }

    async fn poll_loop(self) {
        let shutdown = self.inner.shutdown.clone();
        let interval = self.inner.config.poll_interval;
        let timeout = self.inner.config.receive_timeout;
        loop {
            if !interval.is_zero() {
                tokio::select! {
                    biased;
                    _ = shutdown.cancelled() => break,
                    _ = tokio::time::sleep(interval) => {}
                }
            }
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                _ = self.receive_once(timeout) => {}
            }
        }
        tracing::debug!("[tdlayer] poll loop stopped");
    }

    /// Deliver `raw` to its client, or to the unrouted hook.
    fn route(&self, raw: RawEvent) {
        if let Some(sink) = &self.inner.raw {
            let _ = sink.send(Arc::clone(&raw));
        }

        let client_id = match peek_client_id(&raw) {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!("[tdlayer] event without readable @client_id: {e}");
                None
            }
        };

        if let Some(id) = client_id {
            match self.inner.registry.lookup(id) {
                Some(queue) => match queue.send(raw) {
                    Ok(()) => return,
                    Err(mpsc::error::SendError(raw)) => {
                        tracing::debug!("[tdlayer] client {id} stopped, event unrouted");
                        self.unrouted(raw);
                        return;
                    }
                },
                None => tracing::debug!("[tdlayer] event for unregistered client {id}"),
            }
        }
        self.unrouted(raw);
    }

    fn unrouted(&self, raw: RawEvent) {
        if let Some(sink) = &self.inner.unrouted {
            let _ = sink.send(raw);
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tdlayer_types::enums::AuthorizationState;
    use tdlayer_types::functions::GetAuthorizationState;

    use super::*;
    use crate::engine::MemoryEngine;

    #[tokio::test]
    async fn start_applies_log_config() {
        let engine = Arc::new(MemoryEngine::new());
        let config = ManagerConfig::default().log(LogConfig::default().verbosity(2).file("/tmp/td.log", 1024));
        let manager = Manager::start(engine.clone(), config, ManagerHandlers::new());

        let sent = engine.sent();
        assert_eq!(sent[0].body, json!({"@type": "setLogVerbosityLevel", "new_verbosity_level": 2}));
        assert_eq!(sent[1].type_name(), "setLogStream");
        assert_eq!(sent[1].body["log_stream"]["@type"], "logStreamFile");
        assert_eq!(sent[1].body["log_stream"]["path"], "/tmp/td.log");
        manager.shutdown();
    }

    #[tokio::test]
    async fn execute_decodes_family_reply() {
        let engine = Arc::new(MemoryEngine::new().with_responder(|_| {
            vec![json!({"@type": "authorizationStateWaitPhoneNumber"})]
        }));
        let manager = Manager::start(engine, ManagerConfig::default(), ManagerHandlers::new());
        let state = manager.execute(&GetAuthorizationState {}).unwrap();
        assert!(matches!(state, AuthorizationState::WaitPhoneNumber(_)));
        manager.shutdown();
    }

    #[tokio::test]
    async fn new_client_fails_after_shutdown() {
        let manager = Manager::start(Arc::new(MemoryEngine::new()), ManagerConfig::default(), ManagerHandlers::new());
        manager.shutdown();
        assert!(matches!(
            manager.new_client(ClientConfig::default(), Handlers::new()),
            Err(ManagerError::Shutdown)
        ));
    }

    #[tokio::test]
    async fn shutdown_unregisters_clients() {
        let manager = Manager::start(Arc::new(MemoryEngine::new()), ManagerConfig::default(), ManagerHandlers::new());
        let a = manager.new_client(ClientConfig::default(), Handlers::new()).unwrap();
        assert!(manager.registry().contains(a.id()));
        manager.shutdown();
        assert!(manager.registry().is_empty());
    }
}
