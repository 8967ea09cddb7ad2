//! Liveness guard for the owning context of a controller.
//!
//! A `MountGuard` is attached when its owner is established and detached
//! when the owner is torn down. Detachment is terminal: once a guard has
//! been detached it never reports alive again, and nothing delivers
//! through a guard that was never attached.

use std::sync::{Arc, PoisonError, RwLock};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Liveness {
    Unattached,
    Attached,
    Detached,
}

/// Shared liveness flag checked at delivery time.
///
/// Clones are handles onto the same flag, so a guard can be moved into a
/// completion task while its owner keeps the ability to detach it.
///
/// # Example
///
/// ```rust
/// use liveguard::core::MountGuard;
///
/// let guard = MountGuard::new();
/// let handle = guard.clone();
/// assert!(!handle.is_alive());
///
/// assert!(guard.mark_alive());
/// assert!(handle.is_alive());
///
/// guard.mark_detached();
/// assert!(!handle.is_alive());
///
/// // Detach is terminal.
/// assert!(!guard.mark_alive());
/// assert!(!handle.is_alive());
/// ```
#[derive(Clone, Debug)]
pub struct MountGuard {
    liveness: Arc<RwLock<Liveness>>,
}

impl Default for MountGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl MountGuard {
    /// Create a guard that has not been attached yet.
    pub fn new() -> Self {
        Self {
            liveness: Arc::new(RwLock::new(Liveness::Unattached)),
        }
    }

    /// Create a guard and attach it immediately.
    pub fn attached() -> Self {
        let guard = Self::new();
        guard.mark_alive();
        guard
    }

    /// Mark the owner alive.
    ///
    /// Has no effect on a detached guard. Returns whether the guard is
    /// alive afterward.
    pub fn mark_alive(&self) -> bool {
        let mut liveness = self
            .liveness
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if *liveness == Liveness::Unattached {
            *liveness = Liveness::Attached;
        }
        *liveness == Liveness::Attached
    }

    /// Mark the owner detached.
    ///
    /// Waits for any delivery running under [`MountGuard::deliver`] to
    /// finish; no delivery starts after this returns. Returns `true` only
    /// for the call that performed the detach.
    ///
    /// Never call this while holding a lock that a `deliver` closure waits
    /// on.
    pub fn mark_detached(&self) -> bool {
        let mut liveness = self
            .liveness
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let first = *liveness != Liveness::Detached;
        *liveness = Liveness::Detached;
        first
    }

    /// Whether the owner is attached right now.
    pub fn is_alive(&self) -> bool {
        *self.liveness.read().unwrap_or_else(PoisonError::into_inner) == Liveness::Attached
    }

    /// Run `deliver` only if the guard is alive, holding liveness steady
    /// for its duration.
    ///
    /// `deliver` must not detach this guard and must not block on anything
    /// a detaching thread may hold. Take outer locks before calling this,
    /// not inside `deliver`.
    pub fn deliver<R>(&self, deliver: impl FnOnce() -> R) -> Option<R> {
        let liveness = self.liveness.read().unwrap_or_else(PoisonError::into_inner);
        match *liveness {
            Liveness::Attached => Some(deliver()),
            Liveness::Unattached | Liveness::Detached => None,
        }
    }

    /// Whether two handles refer to the same guard.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.liveness, &other.liveness)
    }
}
