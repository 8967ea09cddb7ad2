//! Dispatch that is a no-op once its owner is gone.

use crate::core::MountGuard;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// Type alias for the raw state-mutation function a dispatcher wraps.
pub type RawDispatch<A, R = ()> = Arc<dyn Fn(A) -> R + Send + Sync>;

/// Wraps a raw dispatch so it only runs while a [`MountGuard`] is alive.
///
/// Liveness is checked when [`SafeDispatcher::dispatch`] is called, not
/// when the dispatcher is created. The guard's lock is released before the
/// raw function runs, so the raw function may take its own locks freely.
/// A raw function that must not run after a concurrent detach rechecks
/// with [`MountGuard::deliver`] under its own lock.
///
/// Clones share the raw function and the guard, so a clone compares equal
/// under [`SafeDispatcher::ptr_eq`] and can serve as a stable memoization
/// key.
///
/// # Example
///
/// ```rust
/// use liveguard::core::MountGuard;
/// use liveguard::effects::SafeDispatcher;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// let count = Arc::new(AtomicUsize::new(0));
/// let guard = MountGuard::attached();
/// let dispatch = {
///     let count = Arc::clone(&count);
///     SafeDispatcher::new(guard.clone(), move |n: usize| {
///         count.fetch_add(n, Ordering::SeqCst);
///     })
/// };
///
/// assert!(dispatch.dispatch(2).is_some());
/// guard.mark_detached();
/// assert!(dispatch.dispatch(5).is_none());
/// assert_eq!(count.load(Ordering::SeqCst), 2);
/// ```
pub struct SafeDispatcher<A, R = ()> {
    raw: RawDispatch<A, R>,
    guard: MountGuard,
}

impl<A, R> SafeDispatcher<A, R> {
    /// Bind `raw` to `guard`.
    pub fn new<F>(guard: MountGuard, raw: F) -> Self
    where
        F: Fn(A) -> R + Send + Sync + 'static,
    {
        Self::from_shared(guard, Arc::new(raw))
    }

    /// Wrap an already shared raw dispatch.
    ///
    /// Dispatchers built from the same `raw` and guard are interchangeable.
    pub fn from_shared(guard: MountGuard, raw: RawDispatch<A, R>) -> Self {
        Self { raw, guard }
    }

    /// Deliver `action` if the guard is alive right now.
    ///
    /// Returns the raw dispatch's result, or `None` when the action was
    /// dropped. A dropped action is not an error.
    pub fn dispatch(&self, action: A) -> Option<R> {
        if !self.guard.is_alive() {
            trace!("guard not alive; dropping stale dispatch");
            return None;
        }
        Some((self.raw)(action))
    }

    /// Guard this dispatcher checks.
    pub fn guard(&self) -> &MountGuard {
        &self.guard
    }

    /// Whether both dispatchers wrap the same raw function and guard.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.raw, &other.raw) && self.guard.ptr_eq(&other.guard)
    }
}

impl<A, R> Clone for SafeDispatcher<A, R> {
    fn clone(&self) -> Self {
        Self {
            raw: Arc::clone(&self.raw),
            guard: self.guard.clone(),
        }
    }
}

impl<A, R> fmt::Debug for SafeDispatcher<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SafeDispatcher")
            .field("alive", &self.guard.is_alive())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn recording(guard: MountGuard) -> (SafeDispatcher<i32>, Arc<Mutex<Vec<i32>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let dispatcher = SafeDispatcher::new(guard, move |n: i32| sink.lock().unwrap().push(n));
        (dispatcher, seen)
    }

    #[test]
    fn delivers_while_alive() {
        let (dispatcher, seen) = recording(MountGuard::attached());

        assert!(dispatcher.dispatch(1).is_some());
        assert!(dispatcher.dispatch(2).is_some());
        assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
    }

    #[test]
    fn drops_after_detach() {
        let guard = MountGuard::attached();
        let (dispatcher, seen) = recording(guard.clone());

        dispatcher.dispatch(1);
        guard.mark_detached();

        assert!(dispatcher.dispatch(2).is_none());
        assert_eq!(*seen.lock().unwrap(), vec![1]);
    }

    #[test]
    fn drops_before_attach() {
        let guard = MountGuard::new();
        let (dispatcher, seen) = recording(guard.clone());

        assert!(dispatcher.dispatch(1).is_none());
        guard.mark_alive();
        assert!(dispatcher.dispatch(2).is_some());
        assert_eq!(*seen.lock().unwrap(), vec![2]);
    }

    #[test]
    fn liveness_is_checked_at_dispatch_time() {
        let guard = MountGuard::attached();
        let (dispatcher, seen) = recording(guard.clone());
        let deferred = dispatcher.clone();

        guard.mark_detached();

        assert!(deferred.dispatch(7).is_none());
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn clones_are_referentially_stable() {
        let (dispatcher, _) = recording(MountGuard::attached());
        let clone = dispatcher.clone();
        let (other, _) = recording(MountGuard::attached());

        assert!(dispatcher.ptr_eq(&clone));
        assert!(!dispatcher.ptr_eq(&other));
    }

    #[test]
    fn shared_raw_yields_equal_dispatchers() {
        let guard = MountGuard::attached();
        let raw: RawDispatch<i32> = Arc::new(|_: i32| {});

        let first = SafeDispatcher::from_shared(guard.clone(), Arc::clone(&raw));
        let second = SafeDispatcher::from_shared(guard, raw);

        assert!(first.ptr_eq(&second));
    }

    #[test]
    fn raw_result_is_returned() {
        let dispatcher = SafeDispatcher::new(MountGuard::attached(), |n: i32| n * 2);
        assert_eq!(dispatcher.dispatch(21), Some(42));
    }

    #[test]
    fn raw_may_take_locks_while_guard_is_detached_elsewhere() {
        let guard = MountGuard::attached();
        let lock = Arc::new(Mutex::new(0));
        let dispatcher = {
            let lock = Arc::clone(&lock);
            let guard = guard.clone();
            SafeDispatcher::new(guard.clone(), move |n: i32| {
                let mut slot = lock.lock().unwrap();
                // Detaching from inside the raw call must not block.
                guard.mark_detached();
                *slot = n;
            })
        };

        assert!(dispatcher.dispatch(5).is_some());
        assert_eq!(*lock.lock().unwrap(), 5);
        assert!(dispatcher.dispatch(6).is_none());
    }
}
