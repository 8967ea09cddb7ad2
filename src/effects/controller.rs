//! Controller that tracks one in-flight operation at a time.

use crate::builder::{BuildError, ControllerBuilder};
use crate::core::{
    transition, Action, AsyncState, AsyncStatus, MountGuard, StateHistory, StateTransition,
};
use crate::effects::dispatch::SafeDispatcher;
use chrono::Utc;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use uuid::Uuid;

/// Outcome of delivering a settled operation.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Delivery {
    /// The settlement was applied and the state now has this status.
    Applied(AsyncStatus),
    /// The controller was detached; the settlement was dropped.
    Suppressed(AsyncStatus),
}

impl Delivery {
    pub fn was_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }
}

/// Errors from waiting on a [`Settlement`].
#[derive(Debug, thiserror::Error)]
pub enum SettleError {
    #[error("Operation for run {run} panicked before settling")]
    Panicked { run: u64 },

    #[error("Operation for run {run} was dropped by its runtime")]
    Cancelled { run: u64 },
}

/// Handle on the delivery task spawned by [`AsyncController::run`].
///
/// Dropping it does not stop the operation.
#[derive(Debug)]
pub struct Settlement {
    run: u64,
    task: JoinHandle<Delivery>,
}

impl Settlement {
    /// Sequence number of the run this settlement belongs to.
    pub fn run(&self) -> u64 {
        self.run
    }

    pub fn is_settled(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait until the operation settled and its delivery was attempted.
    pub async fn settled(self) -> Result<Delivery, SettleError> {
        let run = self.run;
        self.task.await.map_err(|err| {
            if err.is_panic() {
                SettleError::Panicked { run }
            } else {
                SettleError::Cancelled { run }
            }
        })
    }
}

/// State and history shared between a controller and its delivery tasks.
///
/// Locks are always taken in the order watch channel, guard, history. A
/// delivery takes the watch write lock first and only then checks the
/// guard, so a consumer holding a `borrow()` never blocks a detach.
struct Store<T, E> {
    state: watch::Sender<AsyncState<T, E>>,
    history: Mutex<StateHistory<AsyncStatus>>,
    guard: MountGuard,
}

impl<T, E> Store<T, E> {
    /// Apply `action` unless the guard was detached; returns whether it landed.
    ///
    /// Subscribers are only notified when the state actually changed hands.
    fn apply(&self, run: u64, action: Action<T, E>) -> bool {
        self.state.send_if_modified(|state| {
            self.guard
                .deliver(|| {
                    let from = state.status();
                    *state = transition(std::mem::take(state), action);

                    self.history
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .push(StateTransition {
                            from,
                            to: state.status(),
                            run,
                            timestamp: Utc::now(),
                        });
                })
                .is_some()
        })
    }
}

/// Tracks a single asynchronous operation and exposes its status.
///
/// `run` moves the state to pending immediately and spawns a task that
/// delivers the settlement through a [`SafeDispatcher`]. Once the
/// controller is detached (explicitly or by dropping it), deliveries are
/// dropped and the state stays as it was at detachment.
///
/// Overlapping runs are not told apart: whichever settles last is what
/// the state shows.
///
/// # Example
///
/// ```rust
/// use liveguard::{AsyncController, AsyncStatus};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let controller = AsyncController::<u32, String>::new()?;
/// assert_eq!(controller.status(), AsyncStatus::Idle);
///
/// let settlement = controller.start(async { Ok(42) });
/// assert_eq!(controller.status(), AsyncStatus::Pending);
///
/// settlement.settled().await?;
/// assert_eq!(controller.state().data(), Some(&42));
/// # Ok(())
/// # }
/// ```
pub struct AsyncController<T, E> {
    id: Uuid,
    label: Option<String>,
    guard: MountGuard,
    dispatcher: SafeDispatcher<(u64, Action<T, E>), bool>,
    store: Arc<Store<T, E>>,
    runs: AtomicU64,
    runtime: Handle,
}

impl<T, E> AsyncController<T, E>
where
    T: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    /// Create an idle controller on the current tokio runtime.
    pub fn new() -> Result<Self, BuildError> {
        ControllerBuilder::new().build()
    }

    /// Create a controller that starts in `initial` instead of idle.
    pub fn with_initial(initial: AsyncState<T, E>) -> Result<Self, BuildError> {
        ControllerBuilder::new().initial(initial).build()
    }

    pub fn builder() -> ControllerBuilder<T, E> {
        ControllerBuilder::new()
    }

    pub(crate) fn from_parts(
        initial: AsyncState<T, E>,
        label: Option<String>,
        history_limit: usize,
        runtime: Handle,
    ) -> Self {
        let (state, _) = watch::channel(initial);
        let guard = MountGuard::attached();
        let store = Arc::new(Store {
            state,
            history: Mutex::new(StateHistory::with_limit(history_limit)),
            guard: guard.clone(),
        });
        let dispatcher = {
            let store = Arc::clone(&store);
            SafeDispatcher::new(guard.clone(), move |(run, action): (u64, Action<T, E>)| {
                store.apply(run, action)
            })
        };

        let controller = Self {
            id: Uuid::new_v4(),
            label,
            guard,
            dispatcher,
            store,
            runs: AtomicU64::new(0),
            runtime,
        };
        debug!(
            controller = %controller.id,
            label = controller.label(),
            status = ?controller.status(),
            "controller attached"
        );
        controller
    }

    /// Start tracking `operation`, or do nothing when it is `None`.
    pub fn run<F>(&self, operation: Option<F>) -> Option<Settlement>
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
    {
        operation.map(|operation| self.start(operation))
    }

    /// Start tracking `operation`.
    ///
    /// The pending transition is applied before this returns. The
    /// operation's failure is delivered as a rejected state, never as an
    /// error from this call.
    pub fn start<F>(&self, operation: F) -> Settlement
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
    {
        let run = self.runs.fetch_add(1, Ordering::Relaxed) + 1;
        debug!(controller = %self.id, label = self.label(), run, "operation submitted");
        if self.dispatcher.dispatch((run, Action::Pending)) != Some(true) {
            debug!(controller = %self.id, run, "controller detached; pending not applied");
        }

        let dispatcher = self.dispatcher.clone();
        let id = self.id;
        let task = self.runtime.spawn(async move {
            let action = Action::from(operation.await);
            let status = action.target();
            if dispatcher.dispatch((run, action)) == Some(true) {
                debug!(controller = %id, run, status = ?status, "operation settled");
                Delivery::Applied(status)
            } else {
                debug!(controller = %id, run, status = ?status, "stale settlement suppressed");
                Delivery::Suppressed(status)
            }
        });

        Settlement { run, task }
    }

    /// Re-assert liveness. Has no effect after [`AsyncController::detach`].
    pub fn attach(&self) -> bool {
        let alive = self.guard.mark_alive();
        if !alive {
            warn!(controller = %self.id, label = self.label(), "attach after detach ignored");
        }
        alive
    }

    /// Stop delivering settlements to this controller. Idempotent.
    ///
    /// Waits for a delivery that is already writing the state, then
    /// returns. No transition lands after this returns. Safe to call while
    /// holding a `borrow()` from [`AsyncController::subscribe`].
    pub fn detach(&self) {
        if self.guard.mark_detached() {
            debug!(controller = %self.id, label = self.label(), "controller detached");
        }
    }

    /// Whether settlements are still being delivered.
    pub fn is_attached(&self) -> bool {
        self.guard.is_alive()
    }
}

impl<T, E> AsyncController<T, E> {
    /// Unique id attached to this controller's log events.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Liveness guard shared with this controller's delivery tasks.
    ///
    /// Cloning it lets a caller observe detachment after the controller is
    /// dropped.
    pub fn guard(&self) -> &MountGuard {
        &self.guard
    }

    /// Current status without cloning the payload.
    pub fn status(&self) -> AsyncStatus {
        self.store.state.borrow().status()
    }

    /// Receiver notified on every applied transition.
    pub fn subscribe(&self) -> watch::Receiver<AsyncState<T, E>> {
        self.store.state.subscribe()
    }

    /// Snapshot of the most recent applied transitions, oldest first.
    ///
    /// Bounded by [`ControllerBuilder::history_limit`].
    pub fn history(&self) -> StateHistory<AsyncStatus> {
        self.store
            .history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of operations submitted so far.
    pub fn runs(&self) -> u64 {
        self.runs.load(Ordering::Relaxed)
    }
}

impl<T: Clone, E: Clone> AsyncController<T, E> {
    /// Current `{status, data, error}` snapshot.
    pub fn state(&self) -> AsyncState<T, E> {
        self.store.state.borrow().clone()
    }
}

impl<T, E> Drop for AsyncController<T, E> {
    fn drop(&mut self) {
        if self.guard.mark_detached() {
            debug!(controller = %self.id, label = self.label(), "controller dropped");
        }
    }
}
