//! Manager and client configuration.

use std::sync::Arc;
use std::time::Duration;

use tdlayer_types::functions::SetTdlibParameters;

use crate::retry::{AutoSleep, RetryPolicy};

// ─── ManagerConfig ────────────────────────────────────────────────────────────

/// Configuration for [`crate::Manager::start`].
#[derive(Clone, Debug)]
pub struct ManagerConfig {
    /// Pause between polls. Zero polls back to back.
    pub poll_interval:        Duration,
    /// Longest a single `receive` may block.
    pub receive_timeout:      Duration,
    /// How many callers may wait on `receive` at once, the poll loop
    /// included. Pops and routing stay serialized in engine order.
    pub max_concurrent_polls: usize,
    /// Native engine log options, applied on start.
    pub log:                  LogConfig,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            poll_interval:        Duration::ZERO,
            receive_timeout:      Duration::from_secs(1),
            max_concurrent_polls: 1,
            log:                  LogConfig::default(),
        }
    }
}

impl ManagerConfig {
    pub fn poll_interval(mut self, v: Duration) -> Self {
        self.poll_interval = v; self
    }

    pub fn receive_timeout(mut self, v: Duration) -> Self {
        self.receive_timeout = v; self
    }

    /// Clamped to at least one.
    pub fn max_concurrent_polls(mut self, v: usize) -> Self {
        self.max_concurrent_polls = v.max(1); self
    }

    pub fn log(mut self, v: LogConfig) -> Self {
        self.log = v; self
    }
}

/// Native engine logging.
#[derive(Clone, Debug, PartialEq)]
pub struct LogConfig {
    /// TDLib verbosity: 0 fatal, 1 errors, 2 warnings, 3 info, 4 debug, 5 verbose.
    /// `None` leaves the engine default untouched.
    pub verbosity:     Option<i32>,
    /// Write the native log to this file instead of stderr.
    pub file:          Option<String>,
    /// Rotate the file after this many bytes.
    pub max_file_size: i64,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { verbosity: Some(1), file: None, max_file_size: 10 << 20 }
    }
}

impl LogConfig {
    pub fn verbosity(mut self, level: i32) -> Self {
        self.verbosity = Some(level); self
    }

    pub fn file(mut self, path: impl Into<String>, max_file_size: i64) -> Self {
        self.file = Some(path.into());
        self.max_file_size = max_file_size;
        self
    }
}

// ─── ClientConfig ─────────────────────────────────────────────────────────────

/// Configuration for [`crate::Manager::new_client`].
///
/// The TDLib fields are sent as `setTdlibParameters` by
/// [`crate::Client::set_tdlib_parameters`].
#[derive(Clone)]
pub struct ClientConfig {
    pub api_id:                 i32,
    pub api_hash:               String,
    pub use_test_dc:            bool,
    pub database_directory:     String,
    pub files_directory:        String,
    pub database_encryption_key: String,
    pub use_file_database:      bool,
    pub use_chat_info_database: bool,
    pub use_message_database:   bool,
    pub use_secret_chats:       bool,
    pub system_language_code:   String,
    pub device_model:           String,
    pub system_version:         String,
    pub application_version:    String,
    /// Bound on every correlated request.
    pub request_timeout:        Duration,
    pub retry_policy:           Arc<dyn RetryPolicy>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_id:                  0,
            api_hash:                String::new(),
            use_test_dc:             false,
            database_directory:      "tdlib".into(),
            files_directory:         String::new(),
            database_encryption_key: String::new(),
            use_file_database:       true,
            use_chat_info_database:  true,
            use_message_database:    true,
            use_secret_chats:        false,
            system_language_code:    "en".into(),
            device_model:            "Desktop".into(),
            system_version:          String::new(),
            application_version:     env!("CARGO_PKG_VERSION").into(),
            request_timeout:         Duration::from_secs(30),
            retry_policy:            Arc::new(AutoSleep::default()),
        }
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_id", &self.api_id)
            .field("use_test_dc", &self.use_test_dc)
            .field("database_directory", &self.database_directory)
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}

impl ClientConfig {
    pub fn new(api_id: i32, api_hash: impl Into<String>) -> Self {
        Self { api_id, api_hash: api_hash.into(), ..Default::default() }
    }

    pub fn database_directory(mut self, dir: impl Into<String>) -> Self {
        self.database_directory = dir.into(); self
    }

    pub fn files_directory(mut self, dir: impl Into<String>) -> Self {
        self.files_directory = dir.into(); self
    }

    pub fn test_dc(mut self, v: bool) -> Self {
        self.use_test_dc = v; self
    }

    pub fn device(mut self, model: impl Into<String>, system_version: impl Into<String>) -> Self {
        self.device_model = model.into();
        self.system_version = system_version.into();
        self
    }

    pub fn application_version(mut self, v: impl Into<String>) -> Self {
        self.application_version = v.into(); self
    }

    pub fn language(mut self, code: impl Into<String>) -> Self {
        self.system_language_code = code.into(); self
    }

    pub fn request_timeout(mut self, v: Duration) -> Self {
        self.request_timeout = v; self
    }

    pub fn retry_policy(mut self, p: impl RetryPolicy) -> Self {
        self.retry_policy = Arc::new(p); self
    }

    /// The `setTdlibParameters` request for this configuration.
    pub fn tdlib_parameters(&self) -> SetTdlibParameters {
        SetTdlibParameters {
            use_test_dc:             self.use_test_dc,
            database_directory:      self.database_directory.clone(),
            files_directory:         self.files_directory.clone(),
            database_encryption_key: self.database_encryption_key.clone(),
            use_file_database:       self.use_file_database,
            use_chat_info_database:  self.use_chat_info_database,
            use_message_database:    self.use_message_database,
            use_secret_chats:        self.use_secret_chats,
            api_id:                  self.api_id,
            api_hash:                self.api_hash.clone(),
            system_language_code:    self.system_language_code.clone(),
            device_model:            self.device_model.clone(),
            system_version:          self.system_version.clone(),
            application_version:     self.application_version.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tdlib_parameters_carry_config() {
        let cfg = ClientConfig::new(12345, "abc").database_directory("/tmp/td").test_dc(true);
        let v = tdlayer_types::to_value(&cfg.tdlib_parameters()).unwrap();
        assert_eq!(v["@type"], "setTdlibParameters");
        assert_eq!(v["api_id"], 12345);
        assert_eq!(v["api_hash"], "abc");
        assert_eq!(v["database_directory"], "/tmp/td");
        assert_eq!(v["use_test_dc"], true);
    }

    #[test]
    fn gate_size_is_at_least_one() {
        assert_eq!(ManagerConfig::default().max_concurrent_polls(0).max_concurrent_polls, 1);
    }
}
