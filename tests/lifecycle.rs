//! Orchestration tests against a fake listener: callback ordering, the
//! fatal no-listener abort, and the join barrier over both schemes.

use std::io;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::time::Duration;

use axum::Router;
use gantry::{Binding, Listen, RunError, Runner, ServerConfig, Shutdown};

mod common;
use common::{wait_until, EventLog, FakeListener, RecordingApp};

fn plain_conf(port: u16) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".into(),
        port,
        tls_port: 0,
        read_timeout_secs: 5,
        write_timeout_secs: 7,
        graceful_timeout_secs: 9,
        ..ServerConfig::default()
    }
}

#[tokio::test]
async fn callbacks_fire_in_order_and_stop_after_the_listener() {
    let app = RecordingApp::new(plain_conf(8080));
    let events = app.events.clone();
    let fake = FakeListener::default();
    let bindings = fake.bindings.clone();

    let runner = Runner::new(app).listener(fake).manual_shutdown();
    let shutdown = runner.shutdown_handle();
    let run = tokio::spawn(runner.run());

    wait_until(|| bindings.lock().unwrap().len() == 1).await;
    assert!(!events.contains("on_stopped"));

    shutdown.trigger();
    run.await.unwrap().unwrap();

    assert_eq!(
        events.events(),
        vec![
            "load_config",
            "configure_logging",
            "init_resources",
            "configure_routes",
            "middleware",
            "server_conf",
            "on_start 127.0.0.1 8080 0",
            "on_stopped",
        ]
    );

    let recorded = bindings.lock().unwrap();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].addr, "127.0.0.1:8080");
    assert!(recorded[0].tls.is_none());
    assert_eq!(recorded[0].read_timeout, Some(Duration::from_secs(5)));
    assert_eq!(recorded[0].write_timeout, Some(Duration::from_secs(7)));
    assert_eq!(recorded[0].graceful_timeout, Some(Duration::from_secs(9)));
}

#[tokio::test]
async fn both_schemes_get_their_own_listener() {
    let conf = ServerConfig {
        host: "127.0.0.1".into(),
        port: 8080,
        tls_port: 8443,
        tls_cert_file: PathBuf::from("certs/server.crt"),
        tls_key_file: PathBuf::from("certs/server.key"),
        ..ServerConfig::default()
    };
    let app = RecordingApp::new(conf);
    let events = app.events.clone();
    let fake = FakeListener::default();
    let bindings = fake.bindings.clone();

    let runner = Runner::new(app).listener(fake).manual_shutdown();
    let shutdown = runner.shutdown_handle();
    let run = tokio::spawn(runner.run());

    wait_until(|| bindings.lock().unwrap().len() == 2).await;
    shutdown.trigger();
    run.await.unwrap().unwrap();

    let recorded = bindings.lock().unwrap();
    let mut addrs: Vec<&str> = recorded.iter().map(|b| b.addr.as_str()).collect();
    addrs.sort();
    assert_eq!(addrs, vec!["127.0.0.1:8080", "127.0.0.1:8443"]);

    let tls_binding = recorded.iter().find(|b| b.tls.is_some()).unwrap();
    assert_eq!(tls_binding.addr, "127.0.0.1:8443");
    let tls = tls_binding.tls.as_ref().unwrap();
    assert_eq!(tls.cert_file, PathBuf::from("certs/server.crt"));
    assert_eq!(tls.key_file, PathBuf::from("certs/server.key"));

    assert_eq!(events.count("on_stopped"), 1);
}

#[tokio::test]
async fn no_listening_scheme_aborts_before_any_listener() {
    let app = RecordingApp::new(ServerConfig {
        port: 0,
        tls_port: 0,
        ..ServerConfig::default()
    });
    let events = app.events.clone();
    let fake = FakeListener::default();
    let bindings = fake.bindings.clone();

    let result = Runner::new(app).listener(fake).manual_shutdown().run().await;

    assert!(matches!(result, Err(RunError::NoListeners)));
    // on_start still observes the (mis)configured ports, per contract.
    assert!(events.contains("on_start 0.0.0.0 0 0"));
    assert!(!events.contains("on_stopped"));
    assert!(bindings.lock().unwrap().is_empty());
}

/// Listener fake where the plain scheme exits as soon as it starts while
/// the TLS scheme keeps listening until shutdown.
#[derive(Clone)]
struct PlainExitsEarly {
    inner: FakeListener,
    events: EventLog,
}

impl Listen for PlainExitsEarly {
    async fn serve(&self, binding: Binding, app: Router, shutdown: Shutdown) -> io::Result<()> {
        if binding.tls.is_none() {
            self.events.push("plain exited");
            return Ok(());
        }
        self.inner.serve(binding, app, shutdown).await
    }
}

#[tokio::test]
async fn one_listener_exiting_does_not_stop_the_other() {
    let conf = ServerConfig {
        host: "127.0.0.1".into(),
        port: 8080,
        tls_port: 8443,
        ..ServerConfig::default()
    };
    let app = RecordingApp::new(conf);
    let events = app.events.clone();
    let fake = PlainExitsEarly {
        inner: FakeListener::default(),
        events: events.clone(),
    };
    let active = fake.inner.active.clone();

    let runner = Runner::new(app).listener(fake).manual_shutdown();
    let shutdown = runner.shutdown_handle();
    let run = tokio::spawn(runner.run());

    // The plain listener has come and gone; the TLS listener is still up,
    // so the run must not have completed.
    wait_until(|| events.contains("plain exited")).await;
    wait_until(|| active.load(Ordering::SeqCst) == 1).await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!events.contains("on_stopped"));
    assert!(!run.is_finished());

    shutdown.trigger();
    run.await.unwrap().unwrap();

    assert_eq!(events.count("on_stopped"), 1);
    assert_eq!(active.load(Ordering::SeqCst), 0);
}
