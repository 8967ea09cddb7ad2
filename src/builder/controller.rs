//! Builder for constructing controllers.

use crate::builder::error::BuildError;
use crate::core::AsyncState;
use crate::effects::AsyncController;
use tokio::runtime::Handle;

/// Transitions a controller keeps unless told otherwise.
pub const DEFAULT_HISTORY_LIMIT: usize = 256;

/// Builder for constructing an [`AsyncController`] with a fluent API.
///
/// # Example
///
/// ```rust
/// use liveguard::builder::ControllerBuilder;
/// use liveguard::core::{AsyncState, AsyncStatus};
///
/// let runtime = tokio::runtime::Runtime::new().unwrap();
/// let controller = ControllerBuilder::<String, String>::new()
///     .initial(AsyncState::Pending)
///     .label("profile")
///     .runtime(runtime.handle().clone())
///     .build()
///     .unwrap();
///
/// assert_eq!(controller.status(), AsyncStatus::Pending);
/// assert_eq!(controller.label(), Some("profile"));
/// ```
pub struct ControllerBuilder<T, E> {
    initial: AsyncState<T, E>,
    label: Option<String>,
    history_limit: usize,
    runtime: Option<Handle>,
}

impl<T, E> ControllerBuilder<T, E>
where
    T: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    /// Create a new builder. The controller starts idle unless overridden.
    pub fn new() -> Self {
        Self {
            initial: AsyncState::Idle,
            label: None,
            history_limit: DEFAULT_HISTORY_LIMIT,
            runtime: None,
        }
    }

    /// Set the state the controller starts in.
    pub fn initial(mut self, state: AsyncState<T, E>) -> Self {
        self.initial = state;
        self
    }

    /// Name the controller in log output.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Keep at most `limit` transitions in the controller's history.
    ///
    /// Older transitions are evicted first. Defaults to
    /// [`DEFAULT_HISTORY_LIMIT`].
    pub fn history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// Runtime that drives delivery tasks. Defaults to the current runtime.
    pub fn runtime(mut self, handle: Handle) -> Self {
        self.runtime = Some(handle);
        self
    }

    /// Build the controller, attached and ready to run.
    pub fn build(self) -> Result<AsyncController<T, E>, BuildError> {
        if self.label.as_deref().is_some_and(|label| label.trim().is_empty()) {
            return Err(BuildError::EmptyLabel);
        }
        if self.history_limit == 0 {
            return Err(BuildError::ZeroHistoryLimit);
        }
        let runtime = match self.runtime {
            Some(handle) => handle,
            None => Handle::try_current().map_err(|_| BuildError::NoRuntime)?,
        };

        Ok(AsyncController::from_parts(
            self.initial,
            self.label,
            self.history_limit,
            runtime,
        ))
    }
}

impl<T, E> Default for ControllerBuilder<T, E>
where
    T: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::AsyncStatus;

    #[test]
    fn build_outside_runtime_fails() {
        let result = ControllerBuilder::<i32, String>::new().build();
        assert!(matches!(result, Err(BuildError::NoRuntime)));
    }

    #[test]
    fn explicit_runtime_allows_build_outside_runtime() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();

        let controller = ControllerBuilder::<i32, String>::new()
            .runtime(runtime.handle().clone())
            .build()
            .unwrap();

        assert_eq!(controller.status(), AsyncStatus::Idle);
    }

    #[test]
    fn empty_label_is_rejected() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();

        let result = ControllerBuilder::<i32, String>::new()
            .label("   ")
            .runtime(runtime.handle().clone())
            .build();

        assert!(matches!(result, Err(BuildError::EmptyLabel)));
    }

    #[test]
    fn zero_history_limit_is_rejected() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();

        let result = ControllerBuilder::<i32, String>::new()
            .history_limit(0)
            .runtime(runtime.handle().clone())
            .build();

        assert!(matches!(result, Err(BuildError::ZeroHistoryLimit)));
    }

    #[tokio::test]
    async fn history_limit_defaults_and_overrides() {
        let default = ControllerBuilder::<i32, String>::new().build().unwrap();
        assert_eq!(default.history().limit(), Some(DEFAULT_HISTORY_LIMIT));

        let small = ControllerBuilder::<i32, String>::new()
            .history_limit(2)
            .build()
            .unwrap();
        assert_eq!(small.history().limit(), Some(2));
    }

    #[tokio::test]
    async fn builder_applies_initial_state_and_label() {
        let controller = ControllerBuilder::<i32, String>::default()
            .initial(AsyncState::Rejected("stale".to_string()))
            .label("search")
            .build()
            .unwrap();

        assert_eq!(controller.status(), AsyncStatus::Rejected);
        assert_eq!(controller.label(), Some("search"));
    }

    #[tokio::test]
    async fn each_controller_gets_a_distinct_id() {
        let first = ControllerBuilder::<i32, String>::new().build().unwrap();
        let second = ControllerBuilder::<i32, String>::new().build().unwrap();

        assert_ne!(first.id(), second.id());
    }
}
