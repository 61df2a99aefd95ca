//! Argument marshaling for the shim boundary.

use std::{
    ffi::{CString, OsStr, c_char},
    ptr,
};

use graft_core::{Launch, Stdio};

use crate::error::Error;

/// Owned backing for a NULL-terminated array of C strings.
///
/// The stored `CString`s keep the pointed-to bytes alive; the array is
/// valid for as long as this value is.
pub(crate) struct CStringArray {
    _storage: Vec<CString>,
    ptrs: Vec<*const c_char>,
}

impl CStringArray {
    fn new(storage: Vec<CString>) -> Self {
        let mut ptrs: Vec<*const c_char> = storage.iter().map(|s| s.as_ptr()).collect();
        ptrs.push(ptr::null());
        Self {
            _storage: storage,
            ptrs,
        }
    }

    pub(crate) fn as_ptr(&self) -> *const *const c_char {
        self.ptrs.as_ptr()
    }
}

/// Builds the NULL-terminated argv array, program first.
pub(crate) fn build_argv(launch: &Launch, program: &CString) -> Result<CStringArray, Error> {
    let mut storage = vec![program.clone()];
    for arg in launch.command().get_args() {
        storage.push(os_str_to_cstring(arg, "argument")?);
    }
    Ok(CStringArray::new(storage))
}

/// Builds the NULL-terminated `KEY=VALUE` envp array.
///
/// Entries removed with `env_remove` carry no value and are skipped.
pub(crate) fn build_envp(launch: &Launch) -> Result<CStringArray, Error> {
    let mut storage = Vec::new();
    for (key, value) in launch.command().get_envs() {
        let Some(value) = value else { continue };
        let mut entry = key.to_string_lossy().into_owned();
        entry.push('=');
        entry.push_str(&value.to_string_lossy());
        storage.push(CString::new(entry).map_err(|_| {
            Error::InvalidArgument("environment entry contains an interior NUL byte".to_string())
        })?);
    }
    Ok(CStringArray::new(storage))
}

/// Converts the configured working directory, when one is set.
pub(crate) fn build_cwd(launch: &Launch) -> Result<Option<CString>, Error> {
    launch
        .command()
        .get_current_dir()
        .map(|dir| os_str_to_cstring(dir.as_os_str(), "working directory"))
        .transpose()
}

/// Converts an OS string for the shim boundary.
///
/// On unix the raw bytes cross unchanged; elsewhere the string is
/// converted lossily through UTF-8.
pub(crate) fn os_str_to_cstring(
    value: impl AsRef<OsStr>,
    label: &'static str,
) -> Result<CString, Error> {
    #[cfg(unix)]
    let bytes = {
        use std::os::unix::ffi::OsStrExt as _;
        value.as_ref().as_bytes().to_vec()
    };

    #[cfg(not(unix))]
    let bytes = value.as_ref().to_string_lossy().into_owned().into_bytes();

    CString::new(bytes)
        .map_err(|_| Error::InvalidArgument(format!("{label} contains an interior NUL byte")))
}

/// Maps the stdio disposition to its wire value.
pub(crate) fn stdio_code(stdio: Stdio) -> i32 {
    match stdio {
        Stdio::Inherit => 0,
        Stdio::Null => 1,
        Stdio::Piped => 2,
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::CStr;

    use super::*;

    fn read_array(array: &CStringArray) -> Vec<Option<String>> {
        array
            .ptrs
            .iter()
            .map(|&ptr| {
                if ptr.is_null() {
                    None
                } else {
                    Some(unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned())
                }
            })
            .collect()
    }

    #[test]
    fn argv_starts_with_the_program_and_ends_with_null() {
        let mut launch = Launch::new("/bin/echo");
        launch.arg("one").arg("two");
        let program = os_str_to_cstring("/bin/echo", "program").unwrap();

        let argv = build_argv(&launch, &program).unwrap();
        assert_eq!(
            read_array(&argv),
            vec![
                Some("/bin/echo".to_string()),
                Some("one".to_string()),
                Some("two".to_string()),
                None,
            ]
        );
    }

    #[test]
    fn envp_formats_entries_as_key_value() {
        let mut launch = Launch::new("/bin/echo");
        launch.env("GRAFT_A", "1").env("GRAFT_B", "two");

        let envp = build_envp(&launch).unwrap();
        let entries = read_array(&envp);
        assert_eq!(entries.last(), Some(&None));
        assert!(entries.contains(&Some("GRAFT_A=1".to_string())));
        assert!(entries.contains(&Some("GRAFT_B=two".to_string())));
    }

    #[test]
    fn envp_without_entries_is_only_the_terminator() {
        let launch = Launch::new("/bin/echo");
        let envp = build_envp(&launch).unwrap();
        assert_eq!(read_array(&envp), vec![None]);
    }

    #[test]
    fn envp_skips_removed_entries() {
        let mut launch = Launch::new("/bin/echo");
        launch.env("GRAFT_KEEP", "1").env_remove("GRAFT_DROP");

        let envp = build_envp(&launch).unwrap();
        let entries = read_array(&envp);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], Some("GRAFT_KEEP=1".to_string()));
    }

    #[test]
    fn interior_nul_bytes_are_rejected() {
        let err = os_str_to_cstring("bad\0arg", "argument").unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_bytes_cross_unchanged() {
        use std::os::unix::ffi::OsStrExt as _;

        let os = OsStr::from_bytes(b"\xff\xfe");
        let converted = os_str_to_cstring(os, "argument").unwrap();
        assert_eq!(converted.as_bytes(), b"\xff\xfe");
    }

    #[test]
    fn cwd_is_forwarded_only_when_set() {
        let launch = Launch::new("/bin/echo");
        assert!(build_cwd(&launch).unwrap().is_none());

        let mut launch = Launch::new("/bin/echo");
        launch.current_dir("/tmp");
        let cwd = build_cwd(&launch).unwrap().expect("cwd");
        assert_eq!(cwd.to_bytes(), b"/tmp");
    }

    #[test]
    fn stdio_wire_codes_are_stable() {
        assert_eq!(stdio_code(Stdio::Inherit), 0);
        assert_eq!(stdio_code(Stdio::Null), 1);
        assert_eq!(stdio_code(Stdio::Piped), 2);
    }
}
