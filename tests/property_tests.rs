//! Property-based tests for the pure core.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated inputs.

use chrono::Utc;
use liveguard::core::{
    transition, Action, AsyncState, AsyncStatus, MountGuard, State, StateHistory, StateTransition,
};
use liveguard::effects::SafeDispatcher;
use proptest::prelude::*;
use std::sync::{Arc, Mutex};

type TestState = AsyncState<i32, String>;
type TestAction = Action<i32, String>;

prop_compose! {
    fn arbitrary_state()(variant in 0..4u8, data in any::<i32>(), error in "[a-z]{1,8}") -> TestState {
        match variant {
            0 => AsyncState::Idle,
            1 => AsyncState::Pending,
            2 => AsyncState::Resolved(data),
            _ => AsyncState::Rejected(error),
        }
    }
}

prop_compose! {
    fn arbitrary_action()(variant in 0..3u8, data in any::<i32>(), error in "[a-z]{1,8}") -> TestAction {
        match variant {
            0 => Action::Pending,
            1 => Action::Resolved(data),
            _ => Action::Rejected(error),
        }
    }
}

fn invariant_holds(state: &TestState) -> bool {
    match state.status() {
        AsyncStatus::Idle | AsyncStatus::Pending => {
            state.data().is_none() && state.error().is_none()
        }
        AsyncStatus::Resolved => state.data().is_some() && state.error().is_none(),
        AsyncStatus::Rejected => state.data().is_none() && state.error().is_some(),
    }
}

proptest! {
    #[test]
    fn transition_ignores_current_state(
        first in arbitrary_state(),
        second in arbitrary_state(),
        action in arbitrary_action(),
    ) {
        let a = transition(first, action.clone());
        let b = transition(second, action);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn transition_lands_on_action_target(state in arbitrary_state(), action in arbitrary_action()) {
        let target = action.target();
        prop_assert_eq!(transition(state, action).status(), target);
    }

    #[test]
    fn data_and_error_match_status(
        state in arbitrary_state(),
        actions in prop::collection::vec(arbitrary_action(), 0..10),
    ) {
        let mut state = state;
        prop_assert!(invariant_holds(&state));
        for action in actions {
            state = transition(state, action);
            prop_assert!(invariant_holds(&state));
        }
    }

    #[test]
    fn last_action_wins(actions in prop::collection::vec(arbitrary_action(), 1..10)) {
        let last = actions.last().cloned().unwrap();
        let folded = actions.into_iter().fold(TestState::Idle, transition);
        prop_assert_eq!(folded, transition(TestState::Idle, last));
    }

    #[test]
    fn status_flags_are_consistent(state in arbitrary_state()) {
        let status = state.status();
        prop_assert_eq!(status.is_error(), state.is_rejected());
        prop_assert_eq!(status.is_final(), state.is_resolved() || state.is_rejected());
    }

    #[test]
    fn detach_any_number_of_times_leaves_guard_dead(times in 1..6usize) {
        let guard = MountGuard::attached();
        let performed: usize = (0..times).filter(|_| guard.mark_detached()).count();

        prop_assert_eq!(performed, 1);
        prop_assert!(!guard.is_alive());
        prop_assert!(!guard.mark_alive());
    }

    #[test]
    fn dispatcher_delivers_exactly_the_prefix_before_detach(
        values in prop::collection::vec(any::<i32>(), 0..10),
        cut in 0..10usize,
    ) {
        let guard = MountGuard::attached();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let dispatcher = {
            let seen = Arc::clone(&seen);
            SafeDispatcher::new(guard.clone(), move |v: i32| seen.lock().unwrap().push(v))
        };

        let cut = cut.min(values.len());
        for (i, value) in values.iter().enumerate() {
            if i == cut {
                guard.mark_detached();
            }
            dispatcher.dispatch(*value);
        }

        prop_assert_eq!(&*seen.lock().unwrap(), &values[..cut]);
    }

    #[test]
    fn history_preserves_order(actions in prop::collection::vec(arbitrary_action(), 1..10)) {
        let mut history = StateHistory::new();
        let mut state = TestState::Idle;
        let mut expected = vec![AsyncStatus::Idle];

        for (run, action) in actions.into_iter().enumerate() {
            let from = state.status();
            state = transition(state, action);
            history = history.record(StateTransition {
                from,
                to: state.status(),
                run: run as u64 + 1,
                timestamp: Utc::now(),
            });
            expected.push(state.status());
        }

        let path: Vec<AsyncStatus> = history.get_path().into_iter().copied().collect();
        prop_assert_eq!(path, expected);
    }

    #[test]
    fn state_roundtrip_serialization(state in arbitrary_state()) {
        let json = serde_json::to_string(&state).unwrap();
        let deserialized: TestState = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(state, deserialized);
    }
}
