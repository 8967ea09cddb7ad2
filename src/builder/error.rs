//! Build errors for controller construction.

use thiserror::Error;

/// Errors that can occur when building a controller.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("No tokio runtime available. Build inside a runtime or call .runtime(handle)")]
    NoRuntime,

    #[error("Controller label must not be empty")]
    EmptyLabel,

    #[error("History limit must be at least 1")]
    ZeroHistoryLimit,
}
