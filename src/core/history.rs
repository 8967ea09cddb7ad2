//! State transition history tracking.
//!
//! Provides immutable tracking of applied transitions over time. Only
//! transitions that were actually delivered are recorded; a suppressed
//! delivery leaves no trace here.

use super::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{vec_deque, VecDeque};
use std::time::Duration;

/// Record of a single applied transition.
///
/// # Example
///
/// ```rust
/// use liveguard::core::{AsyncStatus, StateTransition};
/// use chrono::Utc;
///
/// let transition = StateTransition {
///     from: AsyncStatus::Idle,
///     to: AsyncStatus::Pending,
///     run: 1,
///     timestamp: Utc::now(),
/// };
/// assert_eq!(transition.run, 1);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateTransition<S: State> {
    /// The state being transitioned from
    pub from: S,
    /// The state being transitioned to
    pub to: S,
    /// Sequence number of the `run` call that produced the action
    pub run: u64,
    /// When the transition was applied
    pub timestamp: DateTime<Utc>,
}

/// Ordered history of applied transitions.
///
/// History is immutable - the `record` method returns a new history
/// with the transition added.
///
/// # Example
///
/// ```rust
/// use liveguard::core::{AsyncStatus, StateHistory, StateTransition};
/// use chrono::Utc;
///
/// let history = StateHistory::new()
///     .record(StateTransition {
///         from: AsyncStatus::Idle,
///         to: AsyncStatus::Pending,
///         run: 1,
///         timestamp: Utc::now(),
///     })
///     .record(StateTransition {
///         from: AsyncStatus::Pending,
///         to: AsyncStatus::Resolved,
///         run: 1,
///         timestamp: Utc::now(),
///     });
///
/// assert_eq!(
///     history.get_path(),
///     vec![&AsyncStatus::Idle, &AsyncStatus::Pending, &AsyncStatus::Resolved]
/// );
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateHistory<S: State> {
    transitions: VecDeque<StateTransition<S>>,
    #[serde(default)]
    limit: Option<usize>,
}

impl<S: State> Default for StateHistory<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> StateHistory<S> {
    /// Create an empty, unbounded history.
    pub fn new() -> Self {
        Self {
            transitions: VecDeque::new(),
            limit: None,
        }
    }

    /// Create an empty history that keeps at most `limit` transitions,
    /// dropping the oldest first.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            transitions: VecDeque::with_capacity(limit.min(64)),
            limit: Some(limit),
        }
    }

    /// Maximum number of retained transitions, if bounded.
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Record a transition, returning a new history.
    ///
    /// Does not mutate the existing history.
    pub fn record(&self, transition: StateTransition<S>) -> Self {
        let mut history = self.clone();
        history.push(transition);
        history
    }

    /// Append a transition in place, evicting the oldest past the limit.
    pub fn push(&mut self, transition: StateTransition<S>) {
        if self.limit == Some(0) {
            return;
        }
        if let Some(limit) = self.limit {
            while self.transitions.len() >= limit {
                self.transitions.pop_front();
            }
        }
        self.transitions.push_back(transition);
    }

    /// Get the path of states traversed.
    ///
    /// Returns references to states in order: the oldest retained `from`
    /// state, then the `to` state of each transition.
    pub fn get_path(&self) -> Vec<&S> {
        let mut path = Vec::with_capacity(self.transitions.len() + 1);
        if let Some(first) = self.transitions.front() {
            path.push(&first.from);
        }
        for transition in &self.transitions {
            path.push(&transition.to);
        }
        path
    }

    /// Most recently applied transition.
    pub fn last(&self) -> Option<&StateTransition<S>> {
        self.transitions.back()
    }

    /// Calculate total duration from first to last retained transition.
    ///
    /// Returns `None` if there are no transitions.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.front(), self.transitions.back()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    /// Retained transitions, oldest first.
    pub fn transitions(&self) -> vec_deque::Iter<'_, StateTransition<S>> {
        self.transitions.iter()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}
