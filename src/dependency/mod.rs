//! Dependency subsystem.
//!
//! # Data Flow
//! ```text
//! supplied collaborators (name → Arc<dyn Collaborator>)
//!     → DependencySpec::validate (spec.rs)
//!         required & absent        → error
//!         present & missing method → error
//!         optional & absent        → DependencySlot::Absent
//!     → ValidatedDependencies (immutable, shared via Arc by all components)
//! ```
//!
//! # Design Decisions
//! - Contracts are capability sets (method names), checked structurally at
//!   construction; no nominal typing, no interface coercion
//! - Collaborators stay opaque; callers that know the concrete type reach
//!   it through `downcast_ref`
//! - Extra collaborators nobody declared are ignored for forward
//!   compatibility

pub mod spec;

pub use spec::{Collaborator, Dependency, DependencySlot, DependencySpec, ValidatedDependencies};
