//! Configuration parameter declarations and validation.
//!
//! # Responsibilities
//! - Declare parameters (name, default, type tag, validators, description)
//! - Merge user overrides onto defaults
//! - Coerce raw values against the declared type
//! - Run validators in declaration order
//!
//! # Design Decisions
//! - Values stay dynamic (`serde_json::Value`); the type tag plus coercion
//!   rules stand in for a schema
//! - A declared default goes through the same coercion and validators as an
//!   override, so a bad default fails at construction, not at use
//! - Failure is first-error: validation stops at the first offending
//!   parameter

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use serde_json::{Map, Value};
use thiserror::Error;

/// Predicate applied to a coerced parameter value.
pub type ValidatorFn = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Errors produced while building a validated configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required parameter '{0}'")]
    MissingParameter(String),

    #[error("parameter '{name}' should be of type {expected}, got {actual}")]
    TypeMismatch {
        name: String,
        expected: ParamType,
        actual: String,
    },

    #[error("parameter '{name}' failed validation (validator {index}): value={value}")]
    ValidatorFailed {
        name: String,
        index: usize,
        value: Value,
    },

    #[error("unknown parameter '{0}'")]
    UnknownParameter(String),

    #[error("duplicate parameter '{0}'")]
    DuplicateParameter(String),

    #[error("configuration file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("error reading configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON in configuration file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("configuration file must contain a JSON object, got {0}")]
    NotAnObject(String),
}

/// Type tag a parameter's values are coerced against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    Bool,
    Int,
    Float,
    Str,
    List,
    Map,
}

impl ParamType {
    pub fn name(self) -> &'static str {
        match self {
            ParamType::Bool => "bool",
            ParamType::Int => "int",
            ParamType::Float => "float",
            ParamType::Str => "str",
            ParamType::List => "list",
            ParamType::Map => "map",
        }
    }

    /// Infer the tag from a concrete value. `Null` carries no type.
    pub fn of(value: &Value) -> Option<ParamType> {
        match value {
            Value::Null => None,
            Value::Bool(_) => Some(ParamType::Bool),
            Value::Number(n) => {
                if n.is_i64() || n.is_u64() {
                    Some(ParamType::Int)
                } else {
                    Some(ParamType::Float)
                }
            }
            Value::String(_) => Some(ParamType::Str),
            Value::Array(_) => Some(ParamType::List),
            Value::Object(_) => Some(ParamType::Map),
        }
    }

    /// Coerce `value` to this type, `None` on mismatch.
    ///
    /// Coercions accepted: numeric strings parse, floats truncate to int,
    /// the usual yes/no spellings read as bool, scalars render to strings,
    /// comma-separated strings split to lists.
    fn coerce(self, value: &Value) -> Option<Value> {
        match self {
            ParamType::Bool => match value {
                Value::Bool(_) => Some(value.clone()),
                Value::Number(n) => n.as_f64().map(|f| Value::Bool(f != 0.0)),
                Value::String(s) => match s.to_ascii_lowercase().as_str() {
                    "true" | "yes" | "1" | "y" => Some(Value::Bool(true)),
                    "false" | "no" | "0" | "n" => Some(Value::Bool(false)),
                    _ => None,
                },
                _ => None,
            },
            ParamType::Int => match value {
                Value::Number(n) => n
                    .as_i64()
                    .or_else(|| n.as_f64().map(|f| f as i64))
                    .map(Value::from),
                Value::String(s) => s.trim().parse::<i64>().ok().map(Value::from),
                Value::Bool(b) => Some(Value::from(i64::from(*b))),
                _ => None,
            },
            ParamType::Float => match value {
                Value::Number(n) => n.as_f64().map(Value::from),
                Value::String(s) => s.trim().parse::<f64>().ok().map(Value::from),
                Value::Bool(b) => Some(Value::from(f64::from(u8::from(*b)))),
                _ => None,
            },
            ParamType::Str => match value {
                Value::String(_) => Some(value.clone()),
                Value::Bool(b) => Some(Value::String(b.to_string())),
                Value::Number(n) => Some(Value::String(n.to_string())),
                _ => None,
            },
            ParamType::List => match value {
                Value::Array(_) => Some(value.clone()),
                Value::String(s) => Some(Value::Array(
                    s.split(',')
                        .map(|item| Value::String(item.trim().to_string()))
                        .collect(),
                )),
                _ => None,
            },
            ParamType::Map => match value {
                Value::Object(_) => Some(value.clone()),
                _ => None,
            },
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Declaration of a single configuration parameter.
#[derive(Clone)]
pub struct ConfigParam {
    name: String,
    description: String,
    default: Option<Value>,
    ty: Option<ParamType>,
    required: bool,
    validators: Vec<ValidatorFn>,
}

impl ConfigParam {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            default: None,
            ty: None,
            required: false,
            validators: Vec::new(),
        }
    }

    /// Declare a default. The type tag is inferred from it when not set
    /// explicitly.
    pub fn default_value(mut self, value: Value) -> Self {
        if self.ty.is_none() {
            self.ty = ParamType::of(&value);
        }
        self.default = Some(value);
        self
    }

    /// Set the type tag explicitly, overriding inference.
    pub fn type_tag(mut self, ty: ParamType) -> Self {
        self.ty = Some(ty);
        self
    }

    /// Mark the parameter as required: absence with no usable default fails
    /// validation.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Append a validator; validators run in the order they were added.
    pub fn validator(mut self, validator: ValidatorFn) -> Self {
        self.validators.push(validator);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Resolve the supplied override (or its absence) to the final value.
    fn resolve(&self, supplied: Option<&Value>) -> Result<Value, ConfigError> {
        let raw = match supplied {
            Some(value) => value,
            None => match &self.default {
                Some(default) => default,
                None if self.required => {
                    return Err(ConfigError::MissingParameter(self.name.clone()));
                }
                // Optional with no default: explicit null, no checks apply.
                None => return Ok(Value::Null),
            },
        };

        let coerced = match self.ty {
            Some(ty) => ty.coerce(raw).ok_or_else(|| ConfigError::TypeMismatch {
                name: self.name.clone(),
                expected: ty,
                actual: ParamType::of(raw).map_or("null", ParamType::name).to_string(),
            })?,
            None => raw.clone(),
        };

        for (i, validator) in self.validators.iter().enumerate() {
            if !validator(&coerced) {
                return Err(ConfigError::ValidatorFailed {
                    name: self.name.clone(),
                    index: i + 1,
                    value: coerced,
                });
            }
        }

        Ok(coerced)
    }
}

// Validators are opaque closures; Debug shows everything else.
impl fmt::Debug for ConfigParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigParam")
            .field("name", &self.name)
            .field("default", &self.default)
            .field("ty", &self.ty)
            .field("required", &self.required)
            .field("validators", &self.validators.len())
            .finish()
    }
}

/// Ordered set of parameter declarations for one module.
#[derive(Debug, Default)]
pub struct ConfigSpec {
    params: Vec<ConfigParam>,
}

impl ConfigSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn param(mut self, param: ConfigParam) -> Self {
        self.params.push(param);
        self
    }

    pub fn params(&self) -> &[ConfigParam] {
        &self.params
    }

    /// Validate `overrides` against the declarations.
    ///
    /// Pure and side-effect free; runs once at module construction.
    pub fn validate(&self, overrides: &Map<String, Value>) -> Result<ValidatedConfig, ConfigError> {
        for (i, param) in self.params.iter().enumerate() {
            if self.params[..i].iter().any(|p| p.name == param.name) {
                return Err(ConfigError::DuplicateParameter(param.name.clone()));
            }
        }

        for key in overrides.keys() {
            if !self.params.iter().any(|p| p.name == *key) {
                return Err(ConfigError::UnknownParameter(key.clone()));
            }
        }

        let mut values = HashMap::with_capacity(self.params.len());
        for param in &self.params {
            values.insert(param.name.clone(), param.resolve(overrides.get(&param.name))?);
        }

        Ok(ValidatedConfig { values })
    }
}

/// Immutable parameter-name → value mapping produced by validation.
#[derive(Debug, Clone, Default)]
pub struct ValidatedConfig {
    values: HashMap<String, Value>,
}

impl ValidatedConfig {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.values.get(name).and_then(Value::as_i64)
    }

    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.values.get(name).and_then(Value::as_f64)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.values.get(name).and_then(Value::as_bool)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.values.get(name).and_then(Value::as_str)
    }

    pub fn get_array(&self, name: &str) -> Option<&Vec<Value>> {
        self.values.get(name).and_then(Value::as_array)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
