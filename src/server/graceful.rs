//! Production listener backed by axum-server.
//!
//! One `serve` call per scheme. The listener subscribes to the shutdown
//! coordinator; on the signal it stops accepting connections and drains
//! in-flight requests within the binding's graceful budget, then the call
//! resolves.

use std::io;
use std::net::{SocketAddr, ToSocketAddrs};
use std::time::Duration;

use axum::body::Body;
use axum::extract::Request;
use axum::Router;
use axum_server::Handle;
use tower::ServiceBuilder;
use tower_http::timeout::{RequestBodyTimeoutLayer, TimeoutBody, TimeoutLayer};

use super::{Binding, Listen};
use crate::lifecycle::Shutdown;
use crate::server::tls;

/// The default [`Listen`] implementation.
#[derive(Debug, Clone, Default)]
pub struct GracefulServer;

impl GracefulServer {
    pub fn new() -> Self {
        Self
    }
}

impl Listen for GracefulServer {
    async fn serve(&self, binding: Binding, app: Router, shutdown: Shutdown) -> io::Result<()> {
        let addr = resolve(&binding.addr)?;
        let app = apply_timeouts(app, &binding);

        let handle = Handle::new();
        let drain = tokio::spawn(drain_on_shutdown(
            handle.clone(),
            shutdown,
            binding.graceful_timeout,
        ));

        tracing::info!(addr = %addr, tls = binding.tls.is_some(), "listener starting");

        let served = match &binding.tls {
            Some(tls_files) => {
                let config = match tls::load(tls_files).await {
                    Ok(config) => config,
                    Err(err) => {
                        drain.abort();
                        return Err(err);
                    }
                };
                axum_server::bind_rustls(addr, config)
                    .handle(handle)
                    .serve(app.into_make_service())
                    .await
            }
            None => {
                axum_server::bind(addr)
                    .handle(handle)
                    .serve(app.into_make_service())
                    .await
            }
        };

        drain.abort();
        tracing::info!(addr = %addr, "listener stopped");
        served
    }
}

async fn drain_on_shutdown(handle: Handle, shutdown: Shutdown, grace: Option<Duration>) {
    // A dropped coordinator counts as a stop request.
    let _ = shutdown.subscribe().recv().await;
    tracing::info!("listener draining");
    handle.graceful_shutdown(grace);
}

/// Bound request reading and response production per the binding. Zeroed
/// (absent) budgets leave the corresponding limit off.
fn apply_timeouts(app: Router, binding: &Binding) -> Router {
    let mut app = app;
    if let Some(write) = binding.write_timeout {
        app = app.layer(TimeoutLayer::new(write));
    }
    if let Some(read) = binding.read_timeout {
        app = app.layer(
            ServiceBuilder::new()
                .layer(RequestBodyTimeoutLayer::new(read))
                .map_request(unerase_body as fn(Request<TimeoutBody<Body>>) -> Request),
        );
    }
    app
}

// The body-timeout wrapper changes the request body type; fold it back
// into axum's erased body so the router below still applies.
fn unerase_body(req: Request<TimeoutBody<Body>>) -> Request {
    req.map(Body::new)
}

fn resolve(addr: &str) -> io::Result<SocketAddr> {
    addr.to_socket_addrs()?.next().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::AddrNotAvailable,
            format!("no usable address for {addr}"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_literal_addresses() {
        assert_eq!(
            resolve("127.0.0.1:8080").unwrap(),
            "127.0.0.1:8080".parse::<SocketAddr>().unwrap()
        );
    }

    #[test]
    fn rejects_garbage_addresses() {
        assert!(resolve("not an address").is_err());
    }
}
