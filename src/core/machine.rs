//! Pure transition function for the asynchronous state machine.
//!
//! The reducer accepts every action from every state: there is no
//! `pending -> pending` guard and no tagging of which run an action came
//! from. Whatever is delivered last is what the state shows.

use super::state::{AsyncState, AsyncStatus};
use serde::{Deserialize, Serialize};

/// Everything that can move an [`AsyncState`].
///
/// The set is closed, so an unrecognized action cannot be constructed.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Action<T, E> {
    /// An operation was submitted.
    Pending,
    /// The operation settled successfully.
    Resolved(T),
    /// The operation settled with a failure.
    Rejected(E),
}

impl<T, E> Action<T, E> {
    /// Status an action moves the state into.
    pub fn target(&self) -> AsyncStatus {
        match self {
            Self::Pending => AsyncStatus::Pending,
            Self::Resolved(_) => AsyncStatus::Resolved,
            Self::Rejected(_) => AsyncStatus::Rejected,
        }
    }
}

impl<T, E> From<Result<T, E>> for Action<T, E> {
    fn from(settlement: Result<T, E>) -> Self {
        match settlement {
            Ok(data) => Self::Resolved(data),
            Err(error) => Self::Rejected(error),
        }
    }
}

/// Compute the next state (pure).
///
/// The current state is accepted for the reducer shape but does not
/// influence the result.
///
/// # Example
///
/// ```rust
/// use liveguard::core::{transition, Action, AsyncState};
///
/// let state: AsyncState<u32, String> = AsyncState::Idle;
/// let state = transition(state, Action::Pending);
/// assert!(state.is_pending());
///
/// let state = transition(state, Action::Resolved(42));
/// assert_eq!(state.data(), Some(&42));
/// ```
pub fn transition<T, E>(_state: AsyncState<T, E>, action: Action<T, E>) -> AsyncState<T, E> {
    match action {
        Action::Pending => AsyncState::Pending,
        Action::Resolved(data) => AsyncState::Resolved(data),
        Action::Rejected(error) => AsyncState::Rejected(error),
    }
}
