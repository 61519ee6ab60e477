//! Lifecycle state machine shared by modules and components.
//!
//! # States
//! ```text
//! CREATED → STARTING → RUNNING → STOPPING → STOPPED
//!     any non-terminal state → ERROR
//! ```
//!
//! # Design Decisions
//! - STOPPED and ERROR are terminal; nothing leaves them
//! - Transition legality is checked centrally so module and component
//!   supervision cannot drift apart

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    Created,
    Starting,
    Running,
    Stopping,
    Stopped,
    Error,
}

impl LifecycleState {
    pub fn is_terminal(self) -> bool {
        matches!(self, LifecycleState::Stopped | LifecycleState::Error)
    }

    /// Whether moving from `self` to `to` is a legal transition.
    pub fn can_transition(self, to: LifecycleState) -> bool {
        match (self, to) {
            (LifecycleState::Created, LifecycleState::Starting)
            | (LifecycleState::Starting, LifecycleState::Running)
            | (LifecycleState::Running, LifecycleState::Stopping)
            | (LifecycleState::Stopping, LifecycleState::Stopped) => true,
            (from, LifecycleState::Error) => !from.is_terminal(),
            _ => false,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            LifecycleState::Created => "CREATED",
            LifecycleState::Starting => "STARTING",
            LifecycleState::Running => "RUNNING",
            LifecycleState::Stopping => "STOPPING",
            LifecycleState::Stopped => "STOPPED",
            LifecycleState::Error => "ERROR",
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
