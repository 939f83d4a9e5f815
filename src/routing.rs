//! Route registration surface handed to the application.
//!
//! The routing table itself is axum's; this layer only collects
//! `{pattern, handler}` pairs from the `configure_routes` callback and
//! hands the finished router to the middleware chain.

use axum::routing::MethodRouter;
use axum::Router;

/// One route pattern bound to a handler.
pub struct HandlerMapping {
    /// axum route pattern, e.g. `/users/{id}`.
    pub route: String,
    /// Handler (with method filters) for the pattern.
    pub handler: MethodRouter,
}

/// Handle the application registers its routes against.
#[derive(Default)]
pub struct RouteTable {
    router: Router,
}

impl RouteTable {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Register one pattern/handler pair.
    pub fn route(&mut self, pattern: &str, handler: MethodRouter) -> &mut Self {
        let router = std::mem::take(&mut self.router);
        self.router = router.route(pattern, handler);
        self
    }

    /// Register a prepared mapping.
    pub fn register(&mut self, mapping: HandlerMapping) -> &mut Self {
        self.route(&mapping.route, mapping.handler)
    }

    pub(crate) fn into_router(self) -> Router {
        self.router
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::get;
    use tower::ServiceExt;

    use super::*;

    async fn status_of(table: RouteTable, path: &str) -> StatusCode {
        let request = Request::builder().uri(path).body(Body::empty()).unwrap();
        table.into_router().oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn registered_routes_are_served() {
        let mut table = RouteTable::new();
        table
            .route("/ping", get(|| async { "pong" }))
            .register(HandlerMapping {
                route: "/mapped".to_string(),
                handler: get(|| async { "mapped" }),
            });
        let router = table.into_router();

        for (path, body) in [("/ping", "pong"), ("/mapped", "mapped")] {
            let request = Request::builder().uri(path).body(Body::empty()).unwrap();
            let response = router.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            assert_eq!(&bytes[..], body.as_bytes());
        }
    }

    #[tokio::test]
    async fn unknown_routes_fall_through_to_404() {
        let mut table = RouteTable::new();
        table.route("/ping", get(|| async { "pong" }));
        assert_eq!(status_of(table, "/nope").await, StatusCode::NOT_FOUND);
    }
}
