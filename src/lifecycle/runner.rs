//! Lifecycle orchestration.
//!
//! # Data Flow
//! ```text
//! load_config → configure_logging → init_resources → configure_routes
//!     → middleware (chain built, first unit outermost)
//!     → server_conf → on_start
//!     → spawn one listener task per configured scheme
//!     → join barrier over all listener tasks
//!     → on_stopped
//! ```
//!
//! # Design Decisions
//! - Callbacks run strictly ordered, once per run
//! - The composed router is built before any listener starts and cloned
//!   per listener; nothing in this layer locks
//! - Listener start goes through the [`Listen`] strategy so tests can
//!   observe orchestration without opening sockets
//! - The port check is the only fatal startup error this layer owns;
//!   listener runtime failures are logged and the run keeps going until
//!   every task has exited

use std::sync::Arc;

use thiserror::Error;
use tokio::task::JoinSet;

use super::app::App;
use super::shutdown::Shutdown;
use super::signals;
use crate::config::ServerConfig;
use crate::middleware;
use crate::routing::RouteTable;
use crate::server::{Binding, GracefulServer, Listen};

/// Fatal startup error.
#[derive(Debug, Error)]
pub enum RunError {
    /// Neither `port` nor `tls_port` is set; there is nothing to listen
    /// on.
    #[error("no listening scheme configured: set port and/or tls_port in ServerConfig")]
    NoListeners,
}

/// Orchestrates one application run.
///
/// [`Runner::new`] wires production defaults: the axum-server listener and
/// OS-signal shutdown. Both are swappable before [`Runner::run`].
pub struct Runner<A, L = GracefulServer> {
    app: A,
    listener: L,
    shutdown: Shutdown,
    signal_driven: bool,
}

impl<A: App> Runner<A, GracefulServer> {
    pub fn new(app: A) -> Self {
        Self {
            app,
            listener: GracefulServer::new(),
            shutdown: Shutdown::new(),
            signal_driven: true,
        }
    }
}

impl<A: App, L: Listen> Runner<A, L> {
    /// Swap the listener strategy (tests, embedded runtimes).
    pub fn listener<M: Listen>(self, listener: M) -> Runner<A, M> {
        Runner {
            app: self.app,
            listener,
            shutdown: self.shutdown,
            signal_driven: self.signal_driven,
        }
    }

    /// Handle for triggering shutdown explicitly.
    pub fn shutdown_handle(&self) -> Shutdown {
        self.shutdown.clone()
    }

    /// Skip installing signal handlers; shutdown then comes only from
    /// [`Runner::shutdown_handle`].
    pub fn manual_shutdown(mut self) -> Self {
        self.signal_driven = false;
        self
    }

    /// Drive the full lifecycle. Resolves once the service has stopped,
    /// or immediately with [`RunError::NoListeners`] when no scheme is
    /// configured.
    pub async fn run(self) -> Result<(), RunError> {
        let Runner {
            mut app,
            listener,
            shutdown,
            signal_driven,
        } = self;

        let conf = app.load_config();
        app.configure_logging(&conf);

        tracing::debug!("initializing resources");
        app.init_resources(&conf);

        let mut routes = RouteTable::new();
        app.configure_routes(&mut routes, &conf);

        let units = app.middleware(&conf);
        tracing::debug!(units = units.len(), "building middleware chain");
        let router = middleware::compose(routes.into_router(), units);

        let server_conf = app.server_conf(&conf);
        app.on_start(&server_conf.host, server_conf.port, server_conf.tls_port);

        if !server_conf.has_listener() {
            return Err(RunError::NoListeners);
        }

        let signal_task = signal_driven
            .then(|| tokio::spawn(signals::trigger_on_signal(shutdown.clone())));

        let listener = Arc::new(listener);
        let mut listeners = JoinSet::new();

        if server_conf.port > 0 {
            let binding = scheme_binding(&server_conf, server_conf.port, false);
            spawn_listener(&mut listeners, &listener, binding, router.clone(), shutdown.clone());
        }
        if server_conf.tls_port > 0 {
            let binding = scheme_binding(&server_conf, server_conf.tls_port, true);
            spawn_listener(&mut listeners, &listener, binding, router.clone(), shutdown.clone());
        }

        // The join barrier: each listener drains independently; this only
        // resolves once every started task has exited.
        while let Some(joined) = listeners.join_next().await {
            if let Err(err) = joined {
                tracing::error!(error = %err, "listener task failed");
            }
        }

        if let Some(task) = signal_task {
            task.abort();
        }

        tracing::info!("all listeners stopped");
        app.on_stopped();
        Ok(())
    }
}

fn scheme_binding(conf: &ServerConfig, port: u16, tls: bool) -> Binding {
    Binding {
        addr: conf.addr_for(port),
        tls: tls.then(|| conf.tls_files()),
        read_timeout: conf.read_timeout(),
        write_timeout: conf.write_timeout(),
        graceful_timeout: conf.graceful_timeout(),
    }
}

fn spawn_listener<L: Listen>(
    tasks: &mut JoinSet<()>,
    listener: &Arc<L>,
    binding: Binding,
    app: axum::Router,
    shutdown: Shutdown,
) {
    let listener = Arc::clone(listener);
    tasks.spawn(async move {
        let addr = binding.addr.clone();
        if let Err(err) = listener.serve(binding, app, shutdown).await {
            tracing::error!(addr = %addr, error = %err, "listener exited with error");
        }
    });
}

/// Run `app` with production defaults; resolves once the service has
/// stopped.
pub async fn run<A: App>(app: A) -> Result<(), RunError> {
    Runner::new(app).run().await
}
