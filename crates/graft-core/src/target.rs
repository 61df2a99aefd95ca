use crate::GraftError;

/// Handle to a process that payloads can be injected into.
///
/// A `Target` is a verified process identifier. [`Target::from_pid`]
/// probes the process before handing out the handle; the probe is a
/// point-in-time check and the process can still exit before a later
/// operation reaches it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Target {
    pid: i32,
}

impl Target {
    /// Creates a target handle after verifying that `pid` refers to a live
    /// process.
    ///
    /// Returns [`GraftError::InvalidInput`] for non-positive pids,
    /// [`GraftError::ProcessNotFound`] when no such process exists and
    /// [`GraftError::PermissionDenied`] when the probe itself is refused.
    /// A refused probe is not read as "exists".
    pub fn from_pid(pid: i32) -> Result<Self, GraftError> {
        if pid <= 0 {
            return Err(GraftError::InvalidInput(format!(
                "pid must be positive, got {pid}"
            )));
        }

        if process_exists(pid)? {
            Ok(Self { pid })
        } else {
            Err(GraftError::ProcessNotFound(pid))
        }
    }

    /// Creates a target handle without probing the process.
    ///
    /// # Safety
    ///
    /// The caller must ensure that `pid` refers to a live process, for
    /// example because it was just spawned by the same driver.
    pub unsafe fn from_pid_unchecked(pid: i32) -> Self {
        Self { pid }
    }

    /// Returns the process identifier.
    pub fn pid(&self) -> i32 {
        self.pid
    }
}

impl TryFrom<i32> for Target {
    type Error = GraftError;

    fn try_from(pid: i32) -> Result<Self, Self::Error> {
        Self::from_pid(pid)
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.pid)
    }
}

/// Probes for process existence with `kill(pid, 0)`.
///
/// Signal 0 performs the existence and permission checks without
/// delivering anything.
#[cfg(unix)]
fn process_exists(pid: i32) -> Result<bool, GraftError> {
    let result = unsafe { libc::kill(pid, 0) };
    if result == 0 {
        return Ok(true);
    }

    let err = std::io::Error::last_os_error();
    match err.raw_os_error() {
        Some(libc::ESRCH) => Ok(false),
        Some(libc::EPERM) => Err(GraftError::PermissionDenied(format!(
            "not allowed to probe process {pid}"
        ))),
        _ => Err(GraftError::Io(err)),
    }
}

/// Probes for process existence by opening a query-only process handle.
#[cfg(windows)]
fn process_exists(pid: i32) -> Result<bool, GraftError> {
    use windows_sys::Win32::Foundation::{CloseHandle, ERROR_ACCESS_DENIED, GetLastError};
    use windows_sys::Win32::System::Threading::{OpenProcess, PROCESS_QUERY_LIMITED_INFORMATION};

    let handle = unsafe { OpenProcess(PROCESS_QUERY_LIMITED_INFORMATION, 0, pid as u32) };
    if !handle.is_null() {
        unsafe { CloseHandle(handle) };
        return Ok(true);
    }

    // Access denied implies the process exists but is protected; surface
    // that instead of claiming it is gone.
    if unsafe { GetLastError() } == ERROR_ACCESS_DENIED {
        return Err(GraftError::PermissionDenied(format!(
            "not allowed to probe process {pid}"
        )));
    }

    Ok(false)
}
