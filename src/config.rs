//! Server configuration values.
//!
//! The scaffold never reads these from disk: the hosting application
//! returns a [`ServerConfig`] from its `server_conf` callback, once per
//! run. The types still derive Serde so hosts can embed them in their own
//! configuration files.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Listening configuration, produced by the application once per run.
///
/// A port of `0` disables that scheme. At least one of `port` and
/// `tls_port` must be non-zero or startup fails before any listener is
/// created.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host or IP to bind (e.g. "0.0.0.0", "127.0.0.1"). An empty host
    /// binds all interfaces.
    pub host: String,

    /// Plain HTTP port. `0` disables the plain listener.
    pub port: u16,

    /// TLS port. `0` disables the TLS listener.
    pub tls_port: u16,

    /// Path to the TLS certificate chain (PEM). Only read when
    /// `tls_port > 0`.
    pub tls_cert_file: PathBuf,

    /// Path to the TLS private key (PEM). Only read when `tls_port > 0`.
    pub tls_key_file: PathBuf,

    /// Budget for reading a request body, in seconds. `0` disables the
    /// limit.
    pub read_timeout_secs: u64,

    /// Budget for producing a response, in seconds. `0` disables the
    /// limit.
    pub write_timeout_secs: u64,

    /// How long a stopping listener waits for in-flight requests, in
    /// seconds. `0` means wait indefinitely.
    pub graceful_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            tls_port: 0,
            tls_cert_file: PathBuf::new(),
            tls_key_file: PathBuf::new(),
            read_timeout_secs: 30,
            write_timeout_secs: 30,
            graceful_timeout_secs: 10,
        }
    }
}

impl ServerConfig {
    /// True when at least one scheme is enabled.
    pub fn has_listener(&self) -> bool {
        self.port > 0 || self.tls_port > 0
    }

    /// `host:port` string for one of the configured ports.
    pub fn addr_for(&self, port: u16) -> String {
        if self.host.is_empty() {
            format!("0.0.0.0:{port}")
        } else {
            format!("{}:{}", self.host, port)
        }
    }

    /// TLS material paths, as configured.
    pub fn tls_files(&self) -> TlsConfig {
        TlsConfig {
            cert_file: self.tls_cert_file.clone(),
            key_file: self.tls_key_file.clone(),
        }
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        nonzero_secs(self.read_timeout_secs)
    }

    pub fn write_timeout(&self) -> Option<Duration> {
        nonzero_secs(self.write_timeout_secs)
    }

    pub fn graceful_timeout(&self) -> Option<Duration> {
        nonzero_secs(self.graceful_timeout_secs)
    }
}

/// TLS material for the TLS listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Certificate chain file (PEM).
    pub cert_file: PathBuf,

    /// Private key file (PEM).
    pub key_file: PathBuf,
}

fn nonzero_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}
