//! Request logging middleware.
//!
//! Fires an optional hook just before the inner service runs and another
//! after it finishes. The post hook receives the response status when one
//! was produced; `None` means the status was not observable: the inner
//! service failed, or a panic is being recovered further out in the chain.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

use axum::extract::Request;
use axum::http::{Method, StatusCode};
use axum::response::Response;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use tower::{Layer, Service};

/// Hook invoked with `{method, path, start}` before the inner service.
pub type PreLogFn = Arc<dyn Fn(&Method, &str, Instant) + Send + Sync>;

/// Hook invoked with `{method, path, status, elapsed}` after the inner
/// service.
pub type PostLogFn = Arc<dyn Fn(&Method, &str, Option<StatusCode>, Duration) + Send + Sync>;

/// Installs [`Logging`] around the inner service. Hooks are optional;
/// either may be left unset.
#[derive(Clone, Default)]
pub struct LoggingLayer {
    pre: Option<PreLogFn>,
    post: Option<PostLogFn>,
}

impl LoggingLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hook to run before the request is handled.
    pub fn on_request<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Method, &str, Instant) + Send + Sync + 'static,
    {
        self.pre = Some(Arc::new(hook));
        self
    }

    /// Hook to run after the request is handled.
    pub fn on_response<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Method, &str, Option<StatusCode>, Duration) + Send + Sync + 'static,
    {
        self.post = Some(Arc::new(hook));
        self
    }
}

impl<S> Layer<S> for LoggingLayer {
    type Service = Logging<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Logging {
            inner,
            pre: self.pre.clone(),
            post: self.post.clone(),
        }
    }
}

/// Middleware service produced by [`LoggingLayer`].
#[derive(Clone)]
pub struct Logging<S> {
    inner: S,
    pre: Option<PreLogFn>,
    post: Option<PostLogFn>,
}

impl<S> Service<Request> for Logging<S>
where
    S: Service<Request, Response = Response>,
    S::Future: Send + 'static,
    S::Error: 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Response, S::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let start = Instant::now();
        let method = req.method().clone();
        let path = req.uri().path().to_owned();

        if let Some(pre) = &self.pre {
            pre(&method, &path, start);
        }

        let post = self.post.clone();
        let outcome = std::panic::catch_unwind(AssertUnwindSafe(|| self.inner.call(req)));

        Box::pin(async move {
            let result = match outcome {
                Ok(fut) => AssertUnwindSafe(fut).catch_unwind().await,
                Err(payload) => Err(payload),
            };
            let elapsed = start.elapsed();
            match result {
                Ok(Ok(response)) => {
                    if let Some(post) = &post {
                        post(&method, &path, Some(response.status()), elapsed);
                    }
                    Ok(response)
                }
                Ok(Err(err)) => {
                    if let Some(post) = &post {
                        post(&method, &path, None, elapsed);
                    }
                    Err(err)
                }
                Err(payload) => {
                    // The fault keeps unwinding; a recovery unit installed
                    // outside this one still sees it.
                    if let Some(post) = &post {
                        post(&method, &path, None, elapsed);
                    }
                    std::panic::resume_unwind(payload)
                }
            }
        })
    }
}
