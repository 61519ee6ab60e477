//! Component execution context.

use std::sync::Arc;

use crate::config::ValidatedConfig;
use crate::dependency::ValidatedDependencies;
use crate::lifecycle::ShutdownHandle;
use crate::logging::Logger;

/// A component's window onto its parent module.
///
/// Non-owning: carries the module's frozen config and dependency mappings
/// (shared read-only), a logger prefixed `module.component`, and the
/// module's cancellation handle. Dropping a context never extends or ends
/// the parent's lifetime.
#[derive(Debug, Clone)]
pub struct ComponentContext {
    module_name: Arc<str>,
    component_name: Arc<str>,
    config: Arc<ValidatedConfig>,
    dependencies: Arc<ValidatedDependencies>,
    logger: Logger,
    shutdown: ShutdownHandle,
}

impl ComponentContext {
    pub(crate) fn new(
        module_name: Arc<str>,
        component_name: Arc<str>,
        config: Arc<ValidatedConfig>,
        dependencies: Arc<ValidatedDependencies>,
        logger: Logger,
        shutdown: ShutdownHandle,
    ) -> Self {
        Self {
            module_name,
            component_name,
            config,
            dependencies,
            logger,
            shutdown,
        }
    }

    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    pub fn name(&self) -> &str {
        &self.component_name
    }

    /// The parent module's validated configuration.
    pub fn config(&self) -> &ValidatedConfig {
        &self.config
    }

    /// The parent module's validated dependencies.
    pub fn dependencies(&self) -> &ValidatedDependencies {
        &self.dependencies
    }

    /// Logger prefixed `module.component`.
    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Whether shutdown has been requested. Non-blocking check for tight
    /// spots between suspension points.
    pub fn is_cancelled(&self) -> bool {
        self.shutdown.is_triggered()
    }

    /// Resolves once the module broadcasts shutdown. Use in `select!` arms
    /// at every suspension point of the run body.
    pub async fn cancelled(&self) {
        self.shutdown.cancelled().await;
    }
}
