//! Lifecycle subsystem: the application contract and the orchestrator.
//!
//! # Data Flow
//! ```text
//! Startup (runner.rs):
//!     app callbacks in order → router + middleware chain → listeners
//!
//! Shutdown (shutdown.rs, signals.rs):
//!     SIGINT/SIGTERM or an explicit trigger → every listener drains
//!     → join barrier → on_stopped
//! ```

pub mod app;
pub mod runner;
pub mod shutdown;
pub mod signals;

pub use app::App;
pub use runner::{run, RunError, Runner};
pub use shutdown::Shutdown;
