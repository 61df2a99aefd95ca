/// Error type for graft operations.
///
/// Driver backends fold the error domain of the underlying runtime into
/// this enumeration so that callers can match on a small, stable set of
/// categories.
#[derive(thiserror::Error, Debug)]
pub enum GraftError {
    /// An argument was rejected before it reached the runtime.
    #[error("{0}")]
    InvalidInput(String),

    /// The operation is not supported for this platform or target.
    #[error("{0}")]
    NotSupported(String),

    /// The caller lacks the privileges required for the operation.
    #[error("{0}")]
    PermissionDenied(String),

    /// The target process does not exist.
    #[error("process not found: {0}")]
    ProcessNotFound(i32),

    /// The instrumentation runtime is missing or failed to initialize.
    #[error("{0}")]
    RuntimeUnavailable(String),

    /// The runtime reported an error with no more specific category.
    #[error("{0}")]
    Runtime(String),

    /// I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
