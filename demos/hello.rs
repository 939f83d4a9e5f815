//! Minimal host application for the scaffold.
//!
//! Run with `cargo run --example hello`, then:
//!
//! ```text
//! curl -i http://127.0.0.1:8080/hello
//! curl -i http://127.0.0.1:8080/boom
//! ```
//!
//! Ctrl+C drains in-flight requests and fires the teardown hook.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use gantry::middleware::{panic_message, LoggingLayer};
use gantry::{observability, App, Middleware, RouteTable, ServerConfig};

#[derive(Clone)]
struct HelloConfig {
    listen_port: u16,
    greeting: String,
}

struct HelloApp;

impl App for HelloApp {
    type Config = HelloConfig;

    fn load_config(&mut self) -> HelloConfig {
        let listen_port = std::env::var("HELLO_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);
        HelloConfig {
            listen_port,
            greeting: "hello from gantry".to_string(),
        }
    }

    fn configure_logging(&mut self, _conf: &HelloConfig) {
        observability::init("hello=debug,gantry=debug");
    }

    fn configure_routes(&mut self, routes: &mut RouteTable, conf: &HelloConfig) {
        let greeting = conf.greeting.clone();
        routes
            .route(
                "/hello",
                get(move || {
                    let greeting = greeting.clone();
                    async move { greeting }
                }),
            )
            .route(
                "/boom",
                get(|| async {
                    if true {
                        panic!("the demo asked for it");
                    }
                    "unreachable"
                }),
            );
    }

    fn middleware(&mut self, _conf: &HelloConfig) -> Vec<Middleware> {
        vec![
            Middleware::recovery(|head, payload| {
                tracing::error!(
                    path = %head.uri.path(),
                    panic = panic_message(&payload),
                    "request panicked"
                );
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
            }),
            Middleware::logging(LoggingLayer::new().on_response(
                |method, path, status, elapsed| {
                    let status = status.map(|s| s.as_u16()).unwrap_or(0);
                    tracing::info!(%method, path, status, ?elapsed, "request finished");
                },
            )),
            Middleware::compression(),
        ]
    }

    fn server_conf(&mut self, conf: &HelloConfig) -> ServerConfig {
        ServerConfig {
            host: "127.0.0.1".into(),
            port: conf.listen_port,
            ..ServerConfig::default()
        }
    }

    fn on_start(&mut self, host: &str, port: u16, _tls_port: u16) {
        tracing::info!(host, port, "hello app starting");
    }

    fn on_stopped(&mut self) {
        tracing::info!("hello app stopped");
    }
}

#[tokio::main]
async fn main() -> Result<(), gantry::RunError> {
    gantry::run(HelloApp).await
}
