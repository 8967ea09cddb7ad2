//! Liveguard: a safe asynchronous state controller
//!
//! Liveguard tracks the lifecycle of one in-flight asynchronous operation and
//! exposes its result as a small state machine, while guaranteeing that no
//! state change is delivered after the owning context has been torn down.
//!
//! The crate follows a "pure core, imperative shell" split: the state types
//! and the transition reducer are pure; spawning and delivery live in the
//! shell.
//!
//! # Core Concepts
//!
//! - **AsyncState**: `Idle`, `Pending`, `Resolved(data)` or `Rejected(error)`
//! - **transition**: Pure reducer over `Action`
//! - **MountGuard**: Liveness flag: unattached, attached, then detached for good
//! - **SafeDispatcher**: Drops state changes once the guard is detached
//! - **AsyncController**: Composes the above behind `run`/`start`
//!
//! The underlying operation is never cancelled. Detaching only stops its
//! result from being delivered.
//!
//! # Example
//!
//! ```rust
//! use liveguard::{AsyncController, AsyncState};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let controller = AsyncController::<u32, String>::new()?;
//!
//! let settlement = controller.start(async { Err("boom".to_string()) });
//! assert_eq!(controller.state(), AsyncState::Pending);
//!
//! settlement.settled().await?;
//! assert_eq!(controller.state(), AsyncState::Rejected("boom".to_string()));
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod core;
pub mod effects;

// Re-export commonly used types
pub use crate::builder::{BuildError, ControllerBuilder};
pub use crate::core::{transition, Action, AsyncState, AsyncStatus, MountGuard, State};
pub use crate::effects::{AsyncController, Delivery, SafeDispatcher, SettleError, Settlement};
