//! module-host — a runtime scaffold for long-running application modules.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────────┐
//!                    │                    MODULE HOST                   │
//!                    │                                                  │
//!   raw config ──────┼─▶ ┌─────────┐    ┌────────────┐                  │
//!   raw deps   ──────┼─▶ │ config/ │    │ dependency/│                  │
//!                    │   │ validate│    │  validate  │                  │
//!                    │   └────┬────┘    └─────┬──────┘                  │
//!                    │        └───────┬───────┘                         │
//!                    │                ▼                                 │
//!                    │         ┌────────────┐     ┌──────────────┐      │
//!   run_module ──────┼────────▶│   module/  │────▶│  component/  │      │
//!   (lifecycle/)     │         │ supervisor │ 1:N │  on_start    │      │
//!                    │         └─────┬──────┘     │  on_run      │      │
//!                    │               │            │  on_stop     │      │
//!                    │      shutdown │ broadcast  └──────┬───────┘      │
//!                    │               ▼                   │              │
//!                    │         ┌────────────┐            ▼              │
//!                    │         │ lifecycle/ │      ┌───────────┐        │
//!   SIGINT/SIGTERM ──┼────────▶│ state machine     │ logging/  │        │
//!                    │         └────────────┘      │ prefix+filter      │
//!                    │                             └───────────┘        │
//!                    └──────────────────────────────────────────────────┘
//! ```
//!
//! A module declares its configuration parameters, dependency capability
//! contracts, and components as ordinary data ([`ModuleSpec`]); the host
//! validates the declarations, starts every component concurrently,
//! supervises them with fault containment, and winds everything down on a
//! single broadcast cancellation signal.

// Declarations and validation
pub mod config;
pub mod dependency;

// Runtime
pub mod component;
pub mod lifecycle;
pub mod module;

// Cross-cutting
pub mod logging;

pub use component::{Component, ComponentContext};
pub use config::{ConfigError, ConfigParam, ConfigSpec, ParamType, ValidatedConfig};
pub use dependency::{Collaborator, Dependency, DependencySlot, DependencySpec, ValidatedDependencies};
pub use lifecycle::{run_module, run_with_shutdown, LifecycleState, RunOutcome, Shutdown, ShutdownHandle};
pub use logging::{LogLevel, LogSink, Logger, MemorySink, TracingSink};
pub use module::{Module, ModuleError, ModuleSpec, OperationError};
