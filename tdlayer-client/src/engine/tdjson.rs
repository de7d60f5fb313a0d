//! Binding to the native `libtdjson`.

#![allow(unsafe_code)]

use std::ffi::{CStr, CString, c_char, c_double, c_int};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use super::{ClientId, Engine};
use crate::errors::ManagerError;

#[link(name = "tdjson")]
unsafe extern "C" {
    fn td_create_client_id() -> c_int;
    fn td_send(client_id: c_int, request: *const c_char);
    fn td_receive(timeout: c_double) -> *const c_char;
    fn td_execute(request: *const c_char) -> *const c_char;
    fn td_set_log_message_callback(
        max_verbosity_level: c_int,
        callback:            Option<extern "C" fn(c_int, *const c_char)>,
    );
}

static INITIALISED: AtomicBool = AtomicBool::new(false);

/// Highest native verbosity forwarded to `tracing`.
const FORWARDED_VERBOSITY: c_int = 4;

/// The process-wide `libtdjson` instance.
///
/// Only one may be constructed per process: the native receive queue and log
/// callback are global. Share it between managers through an `Arc`.
pub struct TdJson {
    _private: (),
}

impl TdJson {
    /// Take ownership of the native engine and route its log into `tracing`.
    pub fn new() -> Result<Self, ManagerError> {
        if INITIALISED.swap(true, Ordering::SeqCst) {
            return Err(ManagerError::AlreadyInitialised);
        }
        // SAFETY: the callback is a plain `extern "C"` fn valid for the process lifetime.
        unsafe { td_set_log_message_callback(FORWARDED_VERBOSITY, Some(on_native_log)) };
        tracing::info!("[tdlayer] libtdjson initialised");
        Ok(Self { _private: () })
    }
}

fn to_cstring(request: &str) -> Option<CString> {
    match CString::new(request) {
        Ok(s) => Some(s),
        Err(e) => {
            tracing::error!("[tdlayer] request contains a NUL byte at {}, not sent", e.nul_position());
            None
        }
    }
}

/// Copy a native string out before the next call invalidates it.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string that stays valid
/// for the duration of this call.
unsafe fn copy_native(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    // SAFETY: upheld by the caller.
    let s = unsafe { CStr::from_ptr(ptr) };
    Some(s.to_string_lossy().into_owned())
}

impl Engine for TdJson {
    fn create_client_id(&self) -> ClientId {
        // SAFETY: no arguments, always safe to call after load.
        unsafe { td_create_client_id() }
    }

    fn send(&self, client_id: ClientId, request: &str) {
        if let Some(req) = to_cstring(request) {
            // SAFETY: `req` outlives the call; the engine copies it.
            unsafe { td_send(client_id, req.as_ptr()) };
        }
    }

    fn receive(&self, timeout: Duration) -> Option<String> {
        // SAFETY: the returned pointer is valid until the next td_receive,
        // and it is copied before returning.
        unsafe { copy_native(td_receive(timeout.as_secs_f64())) }
    }

    fn execute(&self, request: &str) -> Option<String> {
        let req = to_cstring(request)?;
        // SAFETY: as for `receive`, the result is copied immediately.
        unsafe { copy_native(td_execute(req.as_ptr())) }
    }
}

extern "C" fn on_native_log(verbosity: c_int, message: *const c_char) {
    // SAFETY: the engine passes a NUL-terminated string valid for this call.
    let Some(message) = (unsafe { copy_native(message) }) else { return };
    let message = message.trim_end();
    match verbosity {
        0 | 1 => tracing::error!(target: "tdlib", "{message}"),
        2     => tracing::warn!(target: "tdlib", "{message}"),
        3     => tracing::info!(target: "tdlib", "{message}"),
        4     => tracing::debug!(target: "tdlib", "{message}"),
        _     => tracing::trace!(target: "tdlib", "{message}"),
    }
}
