//! # tdlayer-client
//!
//! Async multi-client bridge to the TDLib JSON interface.
//!
//! ## Features
//! - One [`Manager`] polls the engine and routes every event to its client by
//!   `@client_id`, without decoding it
//! - Per-client reader and handler tasks: strict arrival order inside a
//!   client, no head-of-line blocking across clients
//! - Typed handlers with filters, plus raw `@type` handlers that also see
//!   objects this crate has no shape for
//! - Correlated requests: [`Client::invoke`] returns the typed reply, matched
//!   by `@extra`
//! - Flood-wait auto-retry with a configurable [`RetryPolicy`]
//! - Authorization state mirroring and `wait_for_authorization`
//! - [`MemoryEngine`] for tests; `TdJson` (feature `tdjson`) for the real library
//!
//! ## Quick start
//! ```rust,no_run
//! use std::sync::Arc;
//! use tdlayer_client::{ClientConfig, Handlers, Manager, ManagerConfig, ManagerHandlers, MemoryEngine};
//! use tdlayer_types::enums::AuthorizationState;
//!
//! # async fn f() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = Manager::start(Arc::new(MemoryEngine::new()), ManagerConfig::default(), ManagerHandlers::new());
//! let handlers = Handlers::new().on_authorization_state(|client, state| async move {
//!     if let AuthorizationState::WaitTdlibParameters(_) = state {
//!         let _ = client.set_tdlib_parameters().await;
//!     }
//! });
//! let client = manager.new_client(ClientConfig::new(12345, "0123456789abcdef"), handlers)?;
//! client.get_authorization_state().await?;
//! # Ok(()) }
//! ```

#![deny(unsafe_code)]

mod auth;
mod client;
mod config;
mod engine;
mod errors;
mod handlers;
mod manager;
mod messages;
mod registry;
mod retry;
pub mod update;

pub use client::{Client, Correlation};
pub use config::{ClientConfig, LogConfig, ManagerConfig};
#[cfg(feature = "tdjson")]
pub use engine::TdJson;
pub use engine::{ClientId, Engine, MemoryEngine, SentRequest};
pub use errors::{InvocationError, ManagerError, RegistryError, TdError};
pub use handlers::{BoxFuture, EventFilter, Filter, Handlers, MessageFilter};
pub use manager::{Manager, ManagerHandlers};
pub use registry::{ClientRegistry, QueueReceiver, QueueSender};
pub use retry::{AutoSleep, NoRetries, RetryContext, RetryPolicy};
pub use update::UpdateStream;

pub use tdlayer_types as types;

use std::sync::Arc;

/// A raw event as received from the engine, shared without copying.
pub type RawEvent = Arc<str>;
