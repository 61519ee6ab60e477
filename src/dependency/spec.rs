//! Dependency declarations and capability validation.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::module::error::ModuleError;

/// An object another party supplies to satisfy a declared dependency.
///
/// The framework never calls the collaborator's domain operations; it only
/// checks that the advertised method surface covers what the declaration
/// demands. Anything exposing the right names qualifies.
pub trait Collaborator: Send + Sync + 'static {
    /// Names of the operations this collaborator exposes.
    fn methods(&self) -> &[&'static str];

    /// Escape hatch for callers that know the concrete type they were
    /// given.
    fn as_any(&self) -> &dyn Any;
}

/// Declaration of a required or optional collaborator.
#[derive(Debug, Clone)]
pub struct Dependency {
    name: String,
    description: String,
    required: bool,
    methods: Vec<String>,
}

impl Dependency {
    /// Dependencies are required unless marked [`optional`](Self::optional).
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required: true,
            methods: Vec::new(),
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Add a method the supplied collaborator must expose. Order matters
    /// only for which missing method gets named first in errors.
    pub fn method(mut self, name: impl Into<String>) -> Self {
        self.methods.push(name.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn required_methods(&self) -> &[String] {
        &self.methods
    }

    fn check(&self, supplied: &Arc<dyn Collaborator>) -> Result<(), ModuleError> {
        let surface = supplied.methods();
        for method in &self.methods {
            if !surface.iter().any(|have| have == method) {
                return Err(ModuleError::MissingMethod {
                    dependency: self.name.clone(),
                    method: method.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Resolution of one declared dependency.
///
/// `Absent` marks an optional dependency nobody supplied; it is distinct
/// from a present collaborator so callers must check before use.
#[derive(Clone)]
pub enum DependencySlot {
    Present(Arc<dyn Collaborator>),
    Absent,
}

impl DependencySlot {
    pub fn is_present(&self) -> bool {
        matches!(self, DependencySlot::Present(_))
    }

    pub fn collaborator(&self) -> Option<&Arc<dyn Collaborator>> {
        match self {
            DependencySlot::Present(collaborator) => Some(collaborator),
            DependencySlot::Absent => None,
        }
    }
}

impl fmt::Debug for DependencySlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DependencySlot::Present(c) => write!(f, "Present({:?})", c.methods()),
            DependencySlot::Absent => f.write_str("Absent"),
        }
    }
}

/// Ordered set of dependency declarations for one module.
#[derive(Debug, Default)]
pub struct DependencySpec {
    declarations: Vec<Dependency>,
}

impl DependencySpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dependency(mut self, dependency: Dependency) -> Self {
        self.declarations.push(dependency);
        self
    }

    pub fn declarations(&self) -> &[Dependency] {
        &self.declarations
    }

    /// Check every declaration against the supplied collaborators.
    ///
    /// Collaborators supplied under names nobody declared are ignored.
    pub fn validate(
        &self,
        supplied: &HashMap<String, Arc<dyn Collaborator>>,
    ) -> Result<ValidatedDependencies, ModuleError> {
        let mut slots = HashMap::with_capacity(self.declarations.len());
        for declaration in &self.declarations {
            match supplied.get(declaration.name()) {
                Some(collaborator) => {
                    declaration.check(collaborator)?;
                    slots.insert(
                        declaration.name().to_string(),
                        DependencySlot::Present(Arc::clone(collaborator)),
                    );
                }
                None if declaration.is_required() => {
                    return Err(ModuleError::MissingDependency {
                        name: declaration.name().to_string(),
                        description: declaration.description().to_string(),
                    });
                }
                None => {
                    slots.insert(declaration.name().to_string(), DependencySlot::Absent);
                }
            }
        }
        Ok(ValidatedDependencies { slots })
    }
}

/// Immutable dependency-name → collaborator mapping produced by validation.
#[derive(Debug, Clone, Default)]
pub struct ValidatedDependencies {
    slots: HashMap<String, DependencySlot>,
}

impl ValidatedDependencies {
    /// The collaborator for `name`, `None` when absent or undeclared.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Collaborator>> {
        self.slots.get(name).and_then(DependencySlot::collaborator)
    }

    /// The slot for `name`, distinguishing absent-optional from
    /// never-declared.
    pub fn slot(&self, name: &str) -> Option<&DependencySlot> {
        self.slots.get(name)
    }

    pub fn is_present(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// The collaborator for `name` as its concrete type.
    pub fn downcast_ref<T: 'static>(&self, name: &str) -> Option<&T> {
        self.get(name)?.as_any().downcast_ref()
    }
}
