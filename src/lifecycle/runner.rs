//! Run-to-completion orchestration.
//!
//! # Responsibilities
//! - Construct the logger and module (fail fast: validation errors abort
//!   before any component starts)
//! - Drive STARTING → RUNNING
//! - Block until an external shutdown trigger or natural completion
//! - Drive STOPPING to the terminal state and report it
//!
//! # Design Decisions
//! - `run_module` is the single blocking entry point; OS signal wiring is
//!   the only thing it adds over `run_with_shutdown`
//! - The outcome always carries a definite terminal state; the first
//!   captured error rides along iff that state is ERROR

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::dependency::Collaborator;
use crate::lifecycle::signals;
use crate::lifecycle::state::LifecycleState;
use crate::logging::{LogLevel, Logger};
use crate::module::{Module, ModuleError, ModuleSpec, OperationError};

/// What a full module run ended as.
#[derive(Debug)]
pub struct RunOutcome {
    /// The module's terminal state: STOPPED or ERROR.
    pub state: LifecycleState,
    /// First error a component reported; present iff `state` is ERROR.
    pub error: Option<OperationError>,
    /// Terminal state of every component, in registration order.
    pub component_states: Vec<(String, LifecycleState)>,
}

impl RunOutcome {
    pub fn is_clean(&self) -> bool {
        self.state == LifecycleState::Stopped
    }
}

/// Construct and run a module through its full lifecycle, shutting down on
/// SIGINT/SIGTERM.
///
/// Blocks until the module reaches a terminal state. Construction failures
/// surface as `Err` before anything starts; component failures surface in
/// the returned outcome.
pub async fn run_module(
    spec: ModuleSpec,
    overrides: &Map<String, Value>,
    collaborators: &HashMap<String, Arc<dyn Collaborator>>,
    log_level: LogLevel,
) -> Result<RunOutcome, ModuleError> {
    let logger = Logger::new(log_level, spec.name().to_string());
    run_with_shutdown(spec, overrides, collaborators, logger, signals::shutdown_signal()).await
}

/// Like [`run_module`], but with an explicit shutdown future in place of OS
/// signals and a caller-supplied logger.
pub async fn run_with_shutdown(
    spec: ModuleSpec,
    overrides: &Map<String, Value>,
    collaborators: &HashMap<String, Arc<dyn Collaborator>>,
    logger: Logger,
    shutdown: impl Future<Output = ()>,
) -> Result<RunOutcome, ModuleError> {
    let mut module = Module::new(spec, overrides, collaborators, Some(logger))?;
    module.start().await?;

    tokio::select! {
        _ = shutdown => {
            module.logger().info("Shutdown requested");
        }
        _ = module.wait() => {}
    }

    let state = module.stop().await;
    let component_states = module.component_states();
    let error = module.take_first_error();

    Ok(RunOutcome {
        state,
        error,
        component_states,
    })
}
