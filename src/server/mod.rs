//! Listener strategy and the production server implementation.
//!
//! # Responsibilities
//! - Define the [`Listen`] strategy the orchestrator starts listeners with
//! - Provide the axum-server implementation with TLS and graceful drain
//! - Keep listener start substitutable so tests can observe orchestration
//!   without opening sockets

pub mod graceful;
pub mod tls;

pub use graceful::GracefulServer;

use std::future::Future;
use std::io;
use std::time::Duration;

use axum::Router;

use crate::config::TlsConfig;
use crate::lifecycle::Shutdown;

/// Everything one listener needs to serve one scheme.
#[derive(Debug, Clone)]
pub struct Binding {
    /// `host:port` to bind.
    pub addr: String,

    /// TLS certificate/key paths; `Some` makes this a TLS listener.
    pub tls: Option<TlsConfig>,

    /// Budget for reading a request body. `None` disables the limit.
    pub read_timeout: Option<Duration>,

    /// Budget for producing a response. `None` disables the limit.
    pub write_timeout: Option<Duration>,

    /// Drain budget once told to stop. `None` waits indefinitely.
    pub graceful_timeout: Option<Duration>,
}

/// Strategy that turns a binding and a composed handler into a running
/// listener.
///
/// The orchestrator spawns one `serve` call per configured scheme. The
/// future resolves once the listener has fully stopped; draining is the
/// implementation's business, keyed off the shutdown coordinator.
pub trait Listen: Send + Sync + 'static {
    fn serve(
        &self,
        binding: Binding,
        app: Router,
        shutdown: Shutdown,
    ) -> impl Future<Output = io::Result<()>> + Send;
}
