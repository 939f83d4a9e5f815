//! The lifecycle callback contract.

use crate::config::ServerConfig;
use crate::middleware::Middleware;
use crate::routing::RouteTable;

/// Callback interface a hosted web service implements.
///
/// The runner invokes each hook once per run, in declaration order.
/// `load_config` produces an application-defined configuration value that
/// every later hook receives by reference. Hooks other than `load_config`,
/// `configure_routes` and `server_conf` default to no-ops.
pub trait App: Send + 'static {
    /// Application-defined configuration passed to the later hooks.
    type Config: Send + Sync + 'static;

    /// Produce the application config. Runs first.
    fn load_config(&mut self) -> Self::Config;

    /// Configure logging from the loaded config, e.g. via
    /// [`observability::init`](crate::observability::init).
    fn configure_logging(&mut self, conf: &Self::Config) {
        let _ = conf;
    }

    /// Set up resources: connections, caches, background workers.
    fn init_resources(&mut self, conf: &Self::Config) {
        let _ = conf;
    }

    /// Register the service's routes.
    fn configure_routes(&mut self, routes: &mut RouteTable, conf: &Self::Config);

    /// Supply the middleware chain, first unit outermost.
    fn middleware(&mut self, conf: &Self::Config) -> Vec<Middleware> {
        let _ = conf;
        Vec::new()
    }

    /// Supply the listening configuration.
    fn server_conf(&mut self, conf: &Self::Config) -> ServerConfig;

    /// Fired with the resolved host and ports right before listening
    /// begins.
    fn on_start(&mut self, host: &str, port: u16, tls_port: u16) {
        let _ = (host, port, tls_port);
    }

    /// Fired after every started listener has fully stopped. Teardown
    /// goes here.
    fn on_stopped(&mut self) {}
}
