//! State types for the asynchronous state controller.
//!
//! `AsyncStatus` is the four-valued lifecycle of a tracked operation and
//! `AsyncState` is the full snapshot a consumer reads. Both are plain values:
//! every transition replaces the snapshot wholesale.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for state machine states.
///
/// All methods are pure - no side effects. States represent immutable
/// values that describe the current position in a state machine.
///
/// # Required Traits
///
/// - `Clone`: States must be cloneable for history tracking
/// - `PartialEq`: States must be comparable for transition logic
/// - `Debug`: States must be debuggable for diagnostics
/// - `Serialize` + `Deserialize`: States must be serializable for snapshots
pub trait State:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Get the state's name for display/logging.
    fn name(&self) -> &str;

    /// Check if this is a final (terminal) state.
    ///
    /// Default implementation returns `false`.
    fn is_final(&self) -> bool {
        false
    }

    /// Check if this is an error state.
    ///
    /// Default implementation returns `false`.
    fn is_error(&self) -> bool {
        false
    }
}

/// Lifecycle position of the tracked operation.
///
/// # Example
///
/// ```rust
/// use liveguard::core::{AsyncStatus, State};
///
/// assert_eq!(AsyncStatus::Pending.name(), "pending");
/// assert!(AsyncStatus::Resolved.is_final());
/// assert!(AsyncStatus::Rejected.is_error());
/// assert!(!AsyncStatus::Idle.is_final());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AsyncStatus {
    /// Nothing started.
    Idle,
    /// An operation has been submitted and has not settled yet.
    Pending,
    /// The last delivered settlement was a success.
    Resolved,
    /// The last delivered settlement was a failure.
    Rejected,
}

impl State for AsyncStatus {
    fn name(&self) -> &str {
        match self {
            Self::Idle => "idle",
            Self::Pending => "pending",
            Self::Resolved => "resolved",
            Self::Rejected => "rejected",
        }
    }

    fn is_final(&self) -> bool {
        matches!(self, Self::Resolved | Self::Rejected)
    }

    fn is_error(&self) -> bool {
        matches!(self, Self::Rejected)
    }
}

/// Snapshot of a controller: status plus the data or error that goes with it.
///
/// Data is only ever present in `Resolved` and an error only in `Rejected`;
/// `Idle` and `Pending` carry neither. The enum makes any other combination
/// unrepresentable.
///
/// # Example
///
/// ```rust
/// use liveguard::core::{AsyncState, AsyncStatus};
///
/// let state: AsyncState<u32, String> = AsyncState::Resolved(42);
/// assert_eq!(state.status(), AsyncStatus::Resolved);
/// assert_eq!(state.data(), Some(&42));
/// assert_eq!(state.error(), None);
/// ```
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "lowercase")]
pub enum AsyncState<T, E> {
    /// No operation has been submitted.
    Idle,
    /// An operation is in flight; any earlier data or error is cleared.
    Pending,
    /// The operation succeeded with this value.
    Resolved(T),
    /// The operation failed with this error.
    Rejected(E),
}

impl<T, E> Default for AsyncState<T, E> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<T, E> AsyncState<T, E> {
    /// Status of this snapshot, without its payload.
    pub fn status(&self) -> AsyncStatus {
        match self {
            Self::Idle => AsyncStatus::Idle,
            Self::Pending => AsyncStatus::Pending,
            Self::Resolved(_) => AsyncStatus::Resolved,
            Self::Rejected(_) => AsyncStatus::Rejected,
        }
    }

    /// Result value, present only when resolved.
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Resolved(data) => Some(data),
            _ => None,
        }
    }

    /// Failure value, present only when rejected.
    pub fn error(&self) -> Option<&E> {
        match self {
            Self::Rejected(error) => Some(error),
            _ => None,
        }
    }

    /// Whether nothing has been submitted yet.
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Whether an operation is in flight.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Whether the last delivered settlement succeeded.
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    /// Whether the last delivered settlement failed.
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }

    /// Hand a rejected state's error to an external boundary.
    ///
    /// Returns `Err` with the error when rejected, otherwise `Ok` with the
    /// state unchanged. The controller itself never raises the error; this
    /// is how a consumer propagates it with `?`.
    pub fn into_result(self) -> Result<Self, E> {
        match self {
            Self::Rejected(error) => Err(error),
            other => Ok(other),
        }
    }
}
