//! Builder API for controller construction.
//!
//! Construction is where a controller picks up its configuration: the
//! initial state, a label for log output, how much history it keeps and
//! the runtime its delivery tasks are spawned on.

pub mod controller;
pub mod error;

pub use controller::{ControllerBuilder, DEFAULT_HISTORY_LIMIT};
pub use error::BuildError;
