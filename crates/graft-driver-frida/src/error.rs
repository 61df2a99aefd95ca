use std::ffi::c_int;

use graft_core::GraftError;

use crate::ffi;

/// Error type for frida driver operations, mirroring the shim error kinds.
#[derive(Debug)]
pub enum Error {
    /// An argument was rejected before or at the shim boundary.
    InvalidArgument(String),
    /// The runtime cannot perform the operation on this platform or target.
    NotSupported(String),
    /// The runtime lacks the privileges required for the operation.
    PermissionDenied(String),
    /// The target process does not exist.
    ProcessNotFound(i32),
    /// The runtime reported an error with no more specific category.
    Runtime(String),
    /// The runtime is not linked or failed to initialize.
    Unavailable(String),
}

impl Error {
    /// Folds a shim error kind and message into a driver error.
    ///
    /// `pid` carries the target of the failed operation when the caller
    /// knows it. A process-not-found report without a known pid degrades
    /// to [`Error::Runtime`] rather than inventing one.
    pub(crate) fn from_shim(kind: c_int, message: String, pid: Option<i32>) -> Self {
        match kind {
            ffi::GRAFT_SHIM_ERROR_INVALID_ARGUMENT => Self::InvalidArgument(message),
            ffi::GRAFT_SHIM_ERROR_NOT_SUPPORTED => Self::NotSupported(message),
            ffi::GRAFT_SHIM_ERROR_PERMISSION_DENIED => Self::PermissionDenied(message),
            ffi::GRAFT_SHIM_ERROR_PROCESS_NOT_FOUND => match pid {
                Some(pid) => Self::ProcessNotFound(pid),
                None => Self::Runtime(message),
            },
            ffi::GRAFT_SHIM_ERROR_RUNTIME | _ => Self::Runtime(message),
        }
    }
}

impl From<Error> for GraftError {
    fn from(value: Error) -> Self {
        match value {
            Error::InvalidArgument(message) => Self::InvalidInput(message),
            Error::NotSupported(message) => Self::NotSupported(message),
            Error::PermissionDenied(message) => Self::PermissionDenied(message),
            Error::ProcessNotFound(pid) => Self::ProcessNotFound(pid),
            Error::Runtime(message) => Self::Runtime(message),
            Error::Unavailable(message) => Self::RuntimeUnavailable(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg() -> String {
        "boom".to_string()
    }

    #[test]
    fn folds_every_shim_kind() {
        assert!(matches!(
            Error::from_shim(ffi::GRAFT_SHIM_ERROR_INVALID_ARGUMENT, msg(), None),
            Error::InvalidArgument(_)
        ));
        assert!(matches!(
            Error::from_shim(ffi::GRAFT_SHIM_ERROR_NOT_SUPPORTED, msg(), None),
            Error::NotSupported(_)
        ));
        assert!(matches!(
            Error::from_shim(ffi::GRAFT_SHIM_ERROR_PERMISSION_DENIED, msg(), None),
            Error::PermissionDenied(_)
        ));
        assert!(matches!(
            Error::from_shim(ffi::GRAFT_SHIM_ERROR_PROCESS_NOT_FOUND, msg(), Some(42)),
            Error::ProcessNotFound(42)
        ));
        assert!(matches!(
            Error::from_shim(ffi::GRAFT_SHIM_ERROR_RUNTIME, msg(), None),
            Error::Runtime(_)
        ));
    }

    #[test]
    fn process_not_found_without_a_pid_degrades_to_runtime() {
        let err = Error::from_shim(ffi::GRAFT_SHIM_ERROR_PROCESS_NOT_FOUND, msg(), None);
        assert!(matches!(err, Error::Runtime(message) if message == "boom"));
    }

    #[test]
    fn unknown_kinds_map_to_runtime() {
        for kind in [ffi::GRAFT_SHIM_ERROR_NONE, 99, -1] {
            let err = Error::from_shim(kind, msg(), Some(42));
            assert!(matches!(err, Error::Runtime(_)), "kind {kind}");
        }
    }

    #[test]
    fn converts_into_the_core_error_domain() {
        let cases = [
            (
                Error::InvalidArgument(msg()),
                "InvalidInput",
            ),
            (Error::NotSupported(msg()), "NotSupported"),
            (Error::PermissionDenied(msg()), "PermissionDenied"),
            (Error::ProcessNotFound(42), "ProcessNotFound"),
            (Error::Runtime(msg()), "Runtime"),
            (Error::Unavailable(msg()), "RuntimeUnavailable"),
        ];

        for (driver_err, expected) in cases {
            let core_err = GraftError::from(driver_err);
            let name = match core_err {
                GraftError::InvalidInput(_) => "InvalidInput",
                GraftError::NotSupported(_) => "NotSupported",
                GraftError::PermissionDenied(_) => "PermissionDenied",
                GraftError::ProcessNotFound(_) => "ProcessNotFound",
                GraftError::RuntimeUnavailable(_) => "RuntimeUnavailable",
                GraftError::Runtime(_) => "Runtime",
                GraftError::Io(_) => "Io",
            };
            assert_eq!(name, expected);
        }
    }
}
