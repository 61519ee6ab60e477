//! Module runtime: construction, supervision, shutdown.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, Value};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time;
use uuid::Uuid;

use crate::component::{Component, ComponentContext};
use crate::config::ValidatedConfig;
use crate::dependency::{Collaborator, ValidatedDependencies};
use crate::lifecycle::{LifecycleState, Shutdown};
use crate::logging::{LogLevel, Logger};
use crate::module::error::{ModuleError, OperationError};
use crate::module::spec::ModuleSpec;

/// One registered component and its supervision bookkeeping.
struct ComponentCell {
    name: String,
    state_tx: watch::Sender<LifecycleState>,
    state_rx: watch::Receiver<LifecycleState>,
    /// Taken when the supervision task is spawned.
    component: Option<Box<dyn Component>>,
    handle: Option<JoinHandle<()>>,
}

/// The root container: validated config and dependencies, an
/// insertion-ordered component table, and the lifecycle state machine that
/// drives them.
pub struct Module {
    name: Arc<str>,
    instance_id: Uuid,
    config: Arc<ValidatedConfig>,
    dependencies: Arc<ValidatedDependencies>,
    logger: Logger,
    state: LifecycleState,
    components: Vec<ComponentCell>,
    shutdown: Shutdown,
    shutdown_grace: Duration,
    error_tx: mpsc::UnboundedSender<OperationError>,
    error_rx: mpsc::UnboundedReceiver<OperationError>,
    first_error: Option<OperationError>,
}

impl std::fmt::Debug for Module {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Module")
            .field("name", &self.name)
            .field("instance_id", &self.instance_id)
            .field("state", &self.state)
            .field("components", &self.components.len())
            .finish()
    }
}

impl Module {
    /// Construct a module from its declarations and raw inputs.
    ///
    /// Config and dependency validation happen here, synchronously; a
    /// failure aborts before any concurrent work begins. With no logger
    /// supplied, a default INFO logger prefixed with the module name is
    /// used.
    pub fn new(
        spec: ModuleSpec,
        overrides: &Map<String, Value>,
        collaborators: &HashMap<String, Arc<dyn Collaborator>>,
        logger: Option<Logger>,
    ) -> Result<Self, ModuleError> {
        let logger = logger.unwrap_or_else(|| Logger::new(LogLevel::Info, spec.name.clone()));

        let config = Arc::new(spec.config.validate(overrides)?);
        let dependencies = Arc::new(spec.dependencies.validate(collaborators)?);

        let mut components = Vec::with_capacity(spec.components.len());
        for component in spec.components {
            let name = component.name().to_string();
            if components.iter().any(|cell: &ComponentCell| cell.name == name) {
                return Err(ModuleError::DuplicateComponent(name));
            }
            let (state_tx, state_rx) = watch::channel(LifecycleState::Created);
            components.push(ComponentCell {
                name,
                state_tx,
                state_rx,
                component: Some(component),
                handle: None,
            });
        }

        let (error_tx, error_rx) = mpsc::unbounded_channel();

        Ok(Self {
            name: spec.name.into(),
            instance_id: Uuid::new_v4(),
            config,
            dependencies,
            logger,
            state: LifecycleState::Created,
            components,
            shutdown: Shutdown::new(),
            shutdown_grace: spec.shutdown_grace,
            error_tx,
            error_rx,
            first_error: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn instance_id(&self) -> Uuid {
        self.instance_id
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn config(&self) -> &ValidatedConfig {
        &self.config
    }

    pub fn dependencies(&self) -> &ValidatedDependencies {
        &self.dependencies
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Current state of every component, in registration order.
    pub fn component_states(&self) -> Vec<(String, LifecycleState)> {
        self.components
            .iter()
            .map(|cell| (cell.name.clone(), *cell.state_rx.borrow()))
            .collect()
    }

    /// The first error any component reported, if one did.
    pub fn first_error(&self) -> Option<&OperationError> {
        self.first_error.as_ref()
    }

    pub fn take_first_error(&mut self) -> Option<OperationError> {
        self.first_error.take()
    }

    fn transition(&mut self, to: LifecycleState) -> Result<(), ModuleError> {
        if !self.state.can_transition(to) {
            return Err(ModuleError::InvalidTransition {
                from: self.state,
                to,
            });
        }
        self.state = to;
        Ok(())
    }

    /// Start every registered component concurrently, requesting start in
    /// registration order, then wait until each has reached RUNNING or
    /// ERROR before reporting the module itself as RUNNING.
    ///
    /// Calling this twice is a usage error.
    pub async fn start(&mut self) -> Result<(), ModuleError> {
        self.transition(LifecycleState::Starting)?;
        self.logger.info(format!(
            "Starting module (instance {})",
            self.instance_id
        ));

        for cell in &mut self.components {
            let Some(component) = cell.component.take() else {
                continue;
            };
            let ctx = ComponentContext::new(
                Arc::clone(&self.name),
                cell.name.as_str().into(),
                Arc::clone(&self.config),
                Arc::clone(&self.dependencies),
                self.logger.child(&cell.name),
                self.shutdown.handle(),
            );
            cell.handle = Some(tokio::spawn(supervise(
                component,
                ctx,
                cell.state_tx.clone(),
                self.error_tx.clone(),
            )));
        }

        // Readiness barrier: a component that already finished or failed
        // counts as having passed RUNNING.
        for cell in &self.components {
            let mut state_rx = cell.state_rx.clone();
            let _ = state_rx
                .wait_for(|state| {
                    matches!(
                        state,
                        LifecycleState::Running
                            | LifecycleState::Stopping
                            | LifecycleState::Stopped
                            | LifecycleState::Error
                    )
                })
                .await;
        }

        self.transition(LifecycleState::Running)?;
        self.logger.info("Module running");
        Ok(())
    }

    /// The run phase: resolves once shutdown is triggered or every
    /// component has reached a terminal state on its own.
    ///
    /// A module with no components idles until shutdown.
    pub async fn wait(&self) {
        let shutdown = self.shutdown.handle();
        if self.components.is_empty() {
            shutdown.cancelled().await;
            return;
        }

        let receivers: Vec<_> = self
            .components
            .iter()
            .map(|cell| cell.state_rx.clone())
            .collect();

        let all_terminal = async {
            for mut state_rx in receivers {
                let _ = state_rx.wait_for(|state| state.is_terminal()).await;
            }
        };

        tokio::select! {
            _ = shutdown.cancelled() => {}
            _ = all_terminal => {}
        }
    }

    /// Broadcast cancellation, wait for every component to reach a terminal
    /// state (bounded by the grace deadline), and derive the module's own
    /// terminal state: ERROR iff at least one component ended in ERROR.
    ///
    /// Components still running at the deadline are reported by name and
    /// left to wind down on their own; they are never force-killed.
    pub async fn stop(&mut self) -> LifecycleState {
        if self.state.is_terminal() {
            return self.state;
        }
        if self.state == LifecycleState::Created {
            // Nothing ever started; there is nothing to wind down.
            self.state = LifecycleState::Stopped;
            self.logger.info("Module stopped (never started)");
            return self.state;
        }

        self.state = LifecycleState::Stopping;
        self.logger.info("Stopping module");
        self.shutdown.trigger();

        let deadline = time::Instant::now() + self.shutdown_grace;
        let mut stalled: Vec<String> = Vec::new();
        for cell in &mut self.components {
            let Some(handle) = cell.handle.take() else {
                continue;
            };
            match time::timeout_at(deadline, handle).await {
                Ok(Ok(())) => {}
                Ok(Err(join_err)) => {
                    // A panicked hook is contained like any other fault.
                    let message = format!("component '{}' panicked: {join_err}", cell.name);
                    self.logger.error(&message);
                    cell.state_tx.send_replace(LifecycleState::Error);
                    let _ = self.error_tx.send(OperationError::new(message));
                }
                Err(_) => stalled.push(cell.name.clone()),
            }
        }

        if !stalled.is_empty() {
            self.logger.warning(format!(
                "Components did not shut down cleanly within {:?}: {}",
                self.shutdown_grace,
                stalled.join(", ")
            ));
        }

        while let Ok(err) = self.error_rx.try_recv() {
            if self.first_error.is_none() {
                self.first_error = Some(err);
            }
        }

        let any_failed = self
            .components
            .iter()
            .any(|cell| *cell.state_rx.borrow() == LifecycleState::Error);
        self.state = if any_failed {
            LifecycleState::Error
        } else {
            LifecycleState::Stopped
        };

        match self.state {
            LifecycleState::Error => {
                let detail = self
                    .first_error
                    .as_ref()
                    .map(|e| e.to_string())
                    .unwrap_or_else(|| "component failure".to_string());
                self.logger.error(format!("Module stopped with errors: {detail}"));
            }
            _ => self.logger.info("Module stopped"),
        }
        self.state
    }
}

/// Drive one component through its lifecycle, containing its faults.
///
/// `on_stop` runs on every exit path; its own failures are logged, never
/// escalated.
async fn supervise(
    mut component: Box<dyn Component>,
    ctx: ComponentContext,
    state: watch::Sender<LifecycleState>,
    errors: mpsc::UnboundedSender<OperationError>,
) {
    state.send_replace(LifecycleState::Starting);
    ctx.logger().info("Starting component");

    if let Err(err) = component.on_start(&ctx).await {
        ctx.logger().error(format!("Start failed: {err}"));
        state.send_replace(LifecycleState::Error);
        let _ = errors.send(err);
        if let Err(stop_err) = component.on_stop(&ctx).await {
            ctx.logger()
                .error(format!("Cleanup after failed start also failed: {stop_err}"));
        }
        return;
    }

    state.send_replace(LifecycleState::Running);
    ctx.logger().info("Component running");

    let run_result = component.on_run(&ctx).await;
    if let Err(err) = &run_result {
        ctx.logger().error(format!("Component failed: {err}"));
    }

    state.send_replace(LifecycleState::Stopping);
    ctx.logger().verbose("Stopping component");
    if let Err(stop_err) = component.on_stop(&ctx).await {
        ctx.logger().error(format!("Cleanup failed: {stop_err}"));
    }

    match run_result {
        Ok(()) => {
            state.send_replace(LifecycleState::Stopped);
            ctx.logger().info("Component stopped");
        }
        Err(err) => {
            state.send_replace(LifecycleState::Error);
            let _ = errors.send(err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct Idle;

    #[async_trait]
    impl Component for Idle {
        fn name(&self) -> &str {
            "idle"
        }

        async fn on_run(&mut self, ctx: &ComponentContext) -> Result<(), OperationError> {
            ctx.cancelled().await;
            Ok(())
        }
    }

    fn empty_module(spec: ModuleSpec) -> Module {
        Module::new(spec, &Map::new(), &HashMap::new(), None).unwrap()
    }

    #[test]
    fn test_new_module_is_created() {
        let module = empty_module(ModuleSpec::new("demo").component(Idle));
        assert_eq!(module.state(), LifecycleState::Created);
        assert_eq!(
            module.component_states(),
            vec![("idle".to_string(), LifecycleState::Created)]
        );
        assert!(module.first_error().is_none());
    }

    #[test]
    fn test_duplicate_component_names_are_rejected() {
        let spec = ModuleSpec::new("demo").component(Idle).component(Idle);
        let err = Module::new(spec, &Map::new(), &HashMap::new(), None).unwrap_err();
        assert!(matches!(err, ModuleError::DuplicateComponent(name) if name == "idle"));
    }

    #[tokio::test]
    async fn test_stop_before_start_is_a_clean_noop() {
        let mut module = empty_module(ModuleSpec::new("demo").component(Idle));
        assert_eq!(module.stop().await, LifecycleState::Stopped);
        // Terminal: a second stop is idempotent.
        assert_eq!(module.stop().await, LifecycleState::Stopped);
    }

    #[tokio::test]
    async fn test_double_start_is_a_usage_error() {
        let mut module = empty_module(ModuleSpec::new("demo").component(Idle));
        module.start().await.unwrap();
        let err = module.start().await.unwrap_err();
        assert!(matches!(
            err,
            ModuleError::InvalidTransition {
                from: LifecycleState::Running,
                to: LifecycleState::Starting,
            }
        ));
        module.stop().await;
    }
}
