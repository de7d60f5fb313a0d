//! The boundary to the native engine.
//!
//! Everything above this module talks to TDLib through four primitives:
//! allocate a client id, submit a request, poll for the next event and run a
//! synchronous request. [`MemoryEngine`] implements them in-process;
//! `TdJson` (feature `tdjson`) binds `libtdjson`.

use std::time::Duration;

mod memory;
#[cfg(feature = "tdjson")]
mod tdjson;

pub use memory::{MemoryEngine, SentRequest};
#[cfg(feature = "tdjson")]
pub use tdjson::TdJson;

/// Engine-assigned client identifier.
pub type ClientId = i32;

/// A native engine instance shared by every client of a [`crate::Manager`].
pub trait Engine: Send + Sync + 'static {
    /// Allocate a new client id. The client becomes live on its first request.
    fn create_client_id(&self) -> ClientId;

    /// Submit a JSON request for `client_id`. Fire-and-forget.
    fn send(&self, client_id: ClientId, request: &str);

    /// Block up to `timeout` for the next event of any client.
    ///
    /// Returns `None` on timeout. Not required to be callable from more than
    /// a small fixed number of threads at once; the manager bounds that.
    fn receive(&self, timeout: Duration) -> Option<String>;

    /// Run a request synchronously. Only a few requests support this
    /// (log configuration, text parsing helpers).
    fn execute(&self, request: &str) -> Option<String>;
}
