//! Module subsystem.
//!
//! # Data Flow
//! ```text
//! ModuleSpec (spec.rs: params + dependencies + components)
//!     → Module::new (supervisor.rs)
//!         config validation → dependency validation → component table
//!     → Module::start
//!         spawn supervision tasks in registration order
//!         → barrier: every component RUNNING or ERROR
//!     → Module::wait (run phase)
//!     → Module::stop
//!         broadcast cancellation → join with grace deadline
//!         → terminal state: ERROR iff any component ended in ERROR
//! ```
//!
//! # Design Decisions
//! - Construction failures are synchronous; nothing runs on a bad spec
//! - A component fault is contained at its boundary: siblings keep running,
//!   the first error is surfaced at shutdown
//! - Components unresponsive at the grace deadline are reported by name,
//!   never force-killed

pub mod error;
pub mod spec;
pub mod supervisor;

pub use error::{ModuleError, OperationError};
pub use spec::ModuleSpec;
pub use supervisor::Module;
