//! Effectful controller operations.
//!
//! This module provides the "imperative shell" around the pure core:
//! spawning the tracked operation on a tokio runtime and delivering its
//! settlement through a liveness-checked dispatcher.
//!
//! # Key Concepts
//!
//! - **SafeDispatcher**: Runs a state mutation only while the owner is alive
//! - **AsyncController**: Submits operations and exposes their status
//! - **Settlement**: Lets a caller wait for a delivery without cancelling it

mod controller;
mod dispatch;

pub use controller::{AsyncController, Delivery, SettleError, Settlement};
pub use dispatch::{RawDispatch, SafeDispatcher};
