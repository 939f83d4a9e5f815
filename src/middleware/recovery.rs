//! Panic recovery middleware.
//!
//! Wraps the inner service so a panic raised while handling one request is
//! turned into a response by the configured callback instead of unwinding
//! into the listener runtime. Requests running concurrently are untouched.
//! Without a callback the panic is resumed unchanged.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::extract::Request;
use axum::http::request::Parts;
use axum::response::Response;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use tower::{Layer, Service};

/// Value carried by a panic, as captured by `catch_unwind`.
pub type PanicPayload = Box<dyn Any + Send + 'static>;

/// Callback producing the response for a recovered panic. Receives the
/// preserved request head and the panic payload.
pub type RecoverFn = Arc<dyn Fn(&Parts, PanicPayload) -> Response + Send + Sync>;

/// Best-effort text of a panic payload.
pub fn panic_message(payload: &PanicPayload) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "opaque panic payload"
    }
}

/// Installs [`Recovery`] around the inner service.
#[derive(Clone)]
pub struct RecoveryLayer {
    on_panic: Option<RecoverFn>,
}

impl RecoveryLayer {
    /// Recover panics by answering the request with `on_panic`'s response.
    pub fn new<F>(on_panic: F) -> Self
    where
        F: Fn(&Parts, PanicPayload) -> Response + Send + Sync + 'static,
    {
        Self {
            on_panic: Some(Arc::new(on_panic)),
        }
    }

    /// No callback: panics propagate to the caller unchanged.
    pub fn passthrough() -> Self {
        Self { on_panic: None }
    }
}

impl<S> Layer<S> for RecoveryLayer {
    type Service = Recovery<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Recovery {
            inner,
            on_panic: self.on_panic.clone(),
        }
    }
}

/// Middleware service produced by [`RecoveryLayer`].
#[derive(Clone)]
pub struct Recovery<S> {
    inner: S,
    on_panic: Option<RecoverFn>,
}

impl<S> Service<Request> for Recovery<S>
where
    S: Service<Request, Response = Response>,
    S::Future: Send + 'static,
    S::Error: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Response, S::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let Some(on_panic) = self.on_panic.clone() else {
            return Box::pin(self.inner.call(req));
        };

        // Preserve the request head; the body has moved on by the time a
        // panic surfaces.
        let (parts, body) = req.into_parts();
        let head = parts.clone();
        let req = Request::from_parts(parts, body);

        let fut = match std::panic::catch_unwind(AssertUnwindSafe(|| self.inner.call(req))) {
            Ok(fut) => fut,
            Err(payload) => {
                return Box::pin(std::future::ready(Ok(on_panic(&head, payload))));
            }
        };

        Box::pin(async move {
            match AssertUnwindSafe(fut).catch_unwind().await {
                Ok(result) => result,
                Err(payload) => Ok(on_panic(&head, payload)),
            }
        })
    }
}
