//! Cross-cutting middleware units.
//!
//! A [`Middleware`] is one interceptor in the chain the application returns
//! from its `middleware` callback. Units wrap the router in supply order:
//! the first unit is outermost, the last innermost. Each unit erases an
//! ordinary tower [`Layer`], so anything that layers onto an axum router
//! can join the chain via [`Middleware::from_layer`].

pub mod compression;
pub mod logging;
pub mod recovery;

pub use logging::{LoggingLayer, PostLogFn, PreLogFn};
pub use recovery::{panic_message, PanicPayload, RecoverFn, RecoveryLayer};

use std::convert::Infallible;
use std::fmt;

use axum::extract::Request;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use axum::routing::Route;
use axum::Router;
use tower::{Layer, Service};

/// A single, named, type-erased middleware unit.
pub struct Middleware {
    name: &'static str,
    apply: Box<dyn FnOnce(Router) -> Router + Send>,
}

impl Middleware {
    /// Erase an arbitrary tower layer into a chain unit.
    pub fn from_layer<L>(name: &'static str, layer: L) -> Self
    where
        L: Layer<Route> + Clone + Send + Sync + 'static,
        L::Service: Service<Request> + Clone + Send + Sync + 'static,
        <L::Service as Service<Request>>::Response: IntoResponse + 'static,
        <L::Service as Service<Request>>::Error: Into<Infallible> + 'static,
        <L::Service as Service<Request>>::Future: Send + 'static,
    {
        Self {
            name,
            apply: Box::new(move |router| router.layer(layer)),
        }
    }

    /// Panic recovery; `on_panic` builds the response for a caught panic.
    pub fn recovery<F>(on_panic: F) -> Self
    where
        F: Fn(&Parts, PanicPayload) -> Response + Send + Sync + 'static,
    {
        Self::from_layer("recovery", RecoveryLayer::new(on_panic))
    }

    /// Request logging with the hooks configured on `layer`.
    pub fn logging(layer: LoggingLayer) -> Self {
        Self::from_layer("logging", layer)
    }

    /// Gzip response compression. Supply this unit last so the rest of the
    /// chain sees uncompressed headers and bodies.
    pub fn compression() -> Self {
        Self::from_layer("compression", compression::layer())
    }

    /// Unit name, for logs.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn wrap(self, router: Router) -> Router {
        (self.apply)(router)
    }
}

impl fmt::Debug for Middleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Middleware").field("name", &self.name).finish()
    }
}

/// Compose `units` around `router`, first unit outermost.
///
/// axum makes the last-applied layer the outermost one, so units are
/// applied in reverse supply order.
pub(crate) fn compose(router: Router, units: Vec<Middleware>) -> Router {
    units.into_iter().rev().fold(router, |router, unit| {
        tracing::debug!(unit = unit.name(), "applying middleware");
        unit.wrap(router)
    })
}
