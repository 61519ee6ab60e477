//! Component subsystem.
//!
//! # Data Flow
//! ```text
//! Module::start
//!     → one supervision task per component, in registration order
//!     → on_start (CREATED → STARTING)
//!     → on_run   (RUNNING; observes cancellation at suspension points)
//!     → on_stop  (STOPPING → STOPPED; runs on every exit path)
//! ```
//!
//! # Design Decisions
//! - Lifecycle hooks are an explicit callback sequence invoked by the
//!   framework, not overridable base methods
//! - Components see their parent only through [`ComponentContext`]: shared
//!   read-only config/dependencies, a nested logger, the cancellation
//!   handle — never sibling components
//! - A fault in `on_start`/`on_run` lands the component in ERROR and is
//!   reported to the parent; retries are the caller's policy

pub mod context;

pub use context::ComponentContext;

use async_trait::async_trait;

use crate::module::error::OperationError;

/// A named unit of work supervised by its parent module.
///
/// The run body may suspend indefinitely, but must re-check
/// [`ComponentContext::cancelled`] at every suspension point; a body that
/// never suspends can stall shutdown until the module's grace deadline.
#[async_trait]
pub trait Component: Send + 'static {
    /// Component name; unique within its module, used as the log prefix
    /// segment.
    fn name(&self) -> &str;

    /// Setup before the run body. Runs exactly once.
    async fn on_start(&mut self, _ctx: &ComponentContext) -> Result<(), OperationError> {
        Ok(())
    }

    /// Main body; entering it is the readiness signal.
    async fn on_run(&mut self, ctx: &ComponentContext) -> Result<(), OperationError>;

    /// Release scoped resources. Runs on every exit path: normal
    /// completion, cancellation, and failure.
    async fn on_stop(&mut self, _ctx: &ComponentContext) -> Result<(), OperationError> {
        Ok(())
    }
}
