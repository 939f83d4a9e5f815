//! Shared fixtures for the lifecycle integration tests.

#![allow(dead_code)]

use std::io;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::routing::get;
use axum::Router;
use gantry::{App, Binding, Listen, Middleware, RouteTable, ServerConfig, Shutdown};

/// Thread-safe, cloneable event recorder.
#[derive(Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<String>>>);

impl EventLog {
    pub fn push(&self, event: impl Into<String>) {
        self.0.lock().unwrap().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, event: &str) -> usize {
        self.0.lock().unwrap().iter().filter(|e| *e == event).count()
    }

    pub fn contains(&self, event: &str) -> bool {
        self.count(event) > 0
    }
}

/// Minimal application that records every lifecycle hook the runner
/// fires.
pub struct RecordingApp {
    pub events: EventLog,
    pub conf: ServerConfig,
}

impl RecordingApp {
    pub fn new(conf: ServerConfig) -> Self {
        Self {
            events: EventLog::default(),
            conf,
        }
    }
}

impl App for RecordingApp {
    type Config = ();

    fn load_config(&mut self) -> Self::Config {
        self.events.push("load_config");
    }

    fn configure_logging(&mut self, _conf: &()) {
        self.events.push("configure_logging");
    }

    fn init_resources(&mut self, _conf: &()) {
        self.events.push("init_resources");
    }

    fn configure_routes(&mut self, routes: &mut RouteTable, _conf: &()) {
        self.events.push("configure_routes");
        routes.route("/ping", get(|| async { "pong" }));
    }

    fn middleware(&mut self, _conf: &()) -> Vec<Middleware> {
        self.events.push("middleware");
        Vec::new()
    }

    fn server_conf(&mut self, _conf: &()) -> ServerConfig {
        self.events.push("server_conf");
        self.conf.clone()
    }

    fn on_start(&mut self, host: &str, port: u16, tls_port: u16) {
        self.events.push(format!("on_start {host} {port} {tls_port}"));
    }

    fn on_stopped(&mut self) {
        self.events.push("on_stopped");
    }
}

/// Listener fake: records each binding, then stays "listening" until the
/// shutdown signal fires.
#[derive(Clone, Default)]
pub struct FakeListener {
    pub bindings: Arc<Mutex<Vec<Binding>>>,
    pub active: Arc<AtomicU32>,
}

impl FakeListener {
    pub fn started(&self) -> usize {
        self.bindings.lock().unwrap().len()
    }

    pub fn binding_addrs(&self) -> Vec<String> {
        self.bindings.lock().unwrap().iter().map(|b| b.addr.clone()).collect()
    }
}

impl Listen for FakeListener {
    async fn serve(&self, binding: Binding, _app: Router, shutdown: Shutdown) -> io::Result<()> {
        let mut stop = shutdown.subscribe();
        self.bindings.lock().unwrap().push(binding);
        self.active.fetch_add(1, Ordering::SeqCst);
        let _ = stop.recv().await;
        self.active.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Poll `cond` until it holds or two seconds pass.
pub async fn wait_until(mut cond: impl FnMut() -> bool) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while !cond() {
        if tokio::time::Instant::now() > deadline {
            panic!("condition not reached within two seconds");
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
