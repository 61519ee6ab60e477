//! Lifecycle subsystem.
//!
//! # Data Flow
//! ```text
//! State machine (state.rs):
//!     CREATED → STARTING → RUNNING → STOPPING → STOPPED
//!     any non-terminal state → ERROR
//!
//! Shutdown (shutdown.rs):
//!     Module stop / signal → trigger → every component handle observes
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → graceful shutdown
//!
//! Runner (runner.rs):
//!     construct → start → run until signal or completion → stop → report
//! ```
//!
//! # Design Decisions
//! - One cancellation trigger per module, broadcast to every component;
//!   components observe it cooperatively at suspension points
//! - Shutdown has a grace deadline: unresponsive components are reported,
//!   never force-killed
//! - Construction failures abort before anything starts

pub mod runner;
pub mod shutdown;
pub mod signals;
pub mod state;

pub use runner::{run_module, run_with_shutdown, RunOutcome};
pub use shutdown::{Shutdown, ShutdownHandle};
pub use signals::shutdown_signal;
pub use state::LifecycleState;
