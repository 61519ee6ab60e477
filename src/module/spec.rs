//! Module declaration bundle.

use std::fmt;
use std::time::Duration;

use crate::component::Component;
use crate::config::{ConfigParam, ConfigSpec};
use crate::dependency::{Dependency, DependencySpec};

/// Default time allowed for components to wind down after cancellation.
pub const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Everything a module declares about itself: configuration parameters,
/// dependency contracts, components, and shutdown policy.
///
/// Ordinary data passed explicitly to [`Module::new`](super::Module::new);
/// registration order is meaningful (components start in this order).
pub struct ModuleSpec {
    pub(crate) name: String,
    pub(crate) config: ConfigSpec,
    pub(crate) dependencies: DependencySpec,
    pub(crate) components: Vec<Box<dyn Component>>,
    pub(crate) shutdown_grace: Duration,
}

impl ModuleSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config: ConfigSpec::new(),
            dependencies: DependencySpec::new(),
            components: Vec::new(),
            shutdown_grace: DEFAULT_SHUTDOWN_GRACE,
        }
    }

    pub fn param(mut self, param: ConfigParam) -> Self {
        self.config = self.config.param(param);
        self
    }

    pub fn dependency(mut self, dependency: Dependency) -> Self {
        self.dependencies = self.dependencies.dependency(dependency);
        self
    }

    /// Register a component; components start in registration order.
    pub fn component(mut self, component: impl Component) -> Self {
        self.components.push(Box::new(component));
        self
    }

    pub fn boxed_component(mut self, component: Box<dyn Component>) -> Self {
        self.components.push(component);
        self
    }

    /// How long [`Module::stop`](super::Module::stop) waits for components
    /// to reach a terminal state before reporting stragglers.
    pub fn shutdown_grace(mut self, grace: Duration) -> Self {
        self.shutdown_grace = grace;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for ModuleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleSpec")
            .field("name", &self.name)
            .field("params", &self.config.params().len())
            .field("dependencies", &self.dependencies.declarations().len())
            .field("components", &self.components.len())
            .field("shutdown_grace", &self.shutdown_grace)
            .finish()
    }
}
