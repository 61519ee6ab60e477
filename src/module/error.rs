//! Module-level error definitions.

use thiserror::Error;

use crate::config::ConfigError;
use crate::lifecycle::LifecycleState;

/// Errors raised while constructing or driving a module.
///
/// All variants are fatal to the attempt that produced them; none are
/// raised once the module is running.
#[derive(Debug, Error)]
pub enum ModuleError {
    /// Configuration validation failed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A required dependency was not supplied.
    #[error("missing required dependency: '{name}' - {description}")]
    MissingDependency { name: String, description: String },

    /// A supplied collaborator lacks a declared method.
    #[error("dependency '{dependency}' missing required method '{method}'")]
    MissingMethod { dependency: String, method: String },

    /// Lifecycle usage error, e.g. starting a module twice.
    #[error("invalid lifecycle transition from {from} to {to}")]
    InvalidTransition {
        from: LifecycleState,
        to: LifecycleState,
    },

    /// Two components registered under the same name.
    #[error("duplicate component '{0}'")]
    DuplicateComponent(String),
}

/// Error raised by a component's own logic during STARTING or RUNNING.
///
/// Contained at the component boundary: the offending component lands in
/// ERROR, the module logs it and keeps supervising the rest.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct OperationError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl OperationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
