//! Application scaffolding for axum web services.
//!
//! `gantry` sequences a web service's lifecycle so the host only fills in
//! callbacks: load config, configure logging, init resources, register
//! routes, pick middleware, and say where to listen. The scaffold builds
//! the middleware chain around the router, starts a plain and/or TLS
//! listener, drains them gracefully on shutdown, and fires a final
//! teardown hook once both have stopped.
//!
//! Routing, middleware chaining, listeners and compression are delegated
//! to axum, tower, axum-server and tower-http; this crate only sequences
//! them and ships three stock middleware units: panic recovery, request
//! logging, and gzip compression.

pub mod config;
pub mod lifecycle;
pub mod middleware;
pub mod observability;
pub mod routing;
pub mod server;

pub use config::{ServerConfig, TlsConfig};
pub use lifecycle::{run, App, RunError, Runner, Shutdown};
pub use middleware::Middleware;
pub use routing::{HandlerMapping, RouteTable};
pub use server::{Binding, GracefulServer, Listen};
