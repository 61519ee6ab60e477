//! Configuration subsystem.
//!
//! # Data Flow
//! ```text
//! override file (JSON, optional)
//!     → loader.rs (parse & pick module section)
//!     → ConfigSpec::validate (spec.rs)
//!         merge overrides onto declared defaults
//!         → type coercion against each param's type tag
//!         → validators in declaration order
//!     → ValidatedConfig (immutable, shared via Arc by all components)
//! ```
//!
//! # Design Decisions
//! - Parameters are declared as ordinary data (an ordered list of
//!   `ConfigParam` records), not attached to types
//! - Validation is pure, runs once at module construction, and the result
//!   never changes afterwards
//! - Unknown override keys are rejected to catch typos early

pub mod loader;
pub mod spec;
pub mod validators;

pub use spec::{ConfigError, ConfigParam, ConfigSpec, ParamType, ValidatedConfig, ValidatorFn};
