//! Core controller types and logic.
//!
//! This module contains the pure core of the controller:
//! - State definitions (`AsyncStatus`, `AsyncState`)
//! - The `transition` reducer over `Action`
//! - The `MountGuard` liveness flag
//! - Immutable history tracking
//!
//! Nothing in this module spawns tasks or touches a runtime.

mod guard;
mod history;
mod machine;
mod state;

pub use guard::MountGuard;
pub use history::{StateHistory, StateTransition};
pub use machine::{transition, Action};
pub use state::{AsyncState, AsyncStatus, State};
