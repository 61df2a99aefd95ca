use std::{
    ffi::{CStr, CString},
    path::{Path, PathBuf},
};

use crate::GraftError;

/// Symbol the runtime calls in an injected library unless overridden.
pub const DEFAULT_ENTRYPOINT: &str = "frida_agent_main";

const DEFAULT_ENTRYPOINT_C: &CStr = c"frida_agent_main";

/// Where the injectable library image comes from.
#[derive(Debug, Clone)]
pub enum PayloadSource {
    /// A shared library on disk.
    File(PathBuf),
    /// An in-memory library image.
    Blob(Vec<u8>),
}

/// An injectable shared library together with the entrypoint symbol to call
/// and the data string passed to it.
///
/// The entrypoint defaults to [`DEFAULT_ENTRYPOINT`] and the data string to
/// empty. Both are stored NUL-terminated so they can cross the runtime
/// boundary without re-validation.
#[derive(Debug, Clone)]
pub struct Payload {
    source: PayloadSource,
    entrypoint: CString,
    data: CString,
}

impl Payload {
    /// Creates a payload from a shared library on disk.
    ///
    /// The path must refer to an existing regular file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, GraftError> {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path)?;
        if !metadata.is_file() {
            return Err(GraftError::InvalidInput(format!(
                "payload path is not a file: {}",
                path.display()
            )));
        }

        Ok(Self {
            source: PayloadSource::File(path.to_path_buf()),
            entrypoint: default_entrypoint(),
            data: CString::default(),
        })
    }

    /// Creates a payload from an in-memory library image.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self, GraftError> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(GraftError::InvalidInput("payload blob is empty".into()));
        }

        Ok(Self {
            source: PayloadSource::Blob(bytes),
            entrypoint: default_entrypoint(),
            data: CString::default(),
        })
    }

    /// Creates a payload from a Rust cdylib crate, building it if needed.
    ///
    /// `path` points at the crate directory or its `Cargo.toml`. The crate
    /// must declare `crate-type = ["cdylib"]`. An optional metadata table
    /// overrides the entrypoint and data defaults:
    ///
    /// ```text
    /// [package.metadata.graft]
    /// entrypoint = "my_agent_entry"
    /// data = "config"
    /// ```
    ///
    /// An already-built artifact is preferred; otherwise `cargo build` is
    /// run once for the crate.
    pub fn from_crate(path: impl AsRef<Path>) -> Result<Self, GraftError> {
        let agent = graft_build::AgentCrate::load(path)
            .map_err(|err| GraftError::InvalidInput(format!("agent crate: {err}")))?;
        let artifact = agent
            .resolve()
            .map_err(|err| GraftError::InvalidInput(format!("agent crate: {err}")))?;

        Ok(Self {
            source: PayloadSource::File(artifact),
            entrypoint: match agent.entrypoint() {
                Some(entrypoint) => payload_cstring(entrypoint, "entrypoint")?,
                None => default_entrypoint(),
            },
            data: match agent.data() {
                Some(data) => payload_cstring(data, "data")?,
                None => CString::default(),
            },
        })
    }

    /// Replaces the entrypoint symbol.
    ///
    /// Fails when the symbol contains an interior NUL byte.
    pub fn with_entrypoint(mut self, entrypoint: impl AsRef<str>) -> Result<Self, GraftError> {
        self.entrypoint = payload_cstring(entrypoint.as_ref(), "entrypoint")?;
        Ok(self)
    }

    /// Replaces the data string passed to the entrypoint.
    ///
    /// Fails when the string contains an interior NUL byte.
    pub fn with_data(mut self, data: impl AsRef<str>) -> Result<Self, GraftError> {
        self.data = payload_cstring(data.as_ref(), "data")?;
        Ok(self)
    }

    /// Returns the library image source.
    pub fn source(&self) -> &PayloadSource {
        &self.source
    }

    /// Returns the entrypoint symbol.
    pub fn entrypoint(&self) -> &CStr {
        &self.entrypoint
    }

    /// Returns the data string passed to the entrypoint.
    pub fn data(&self) -> &CStr {
        &self.data
    }
}

fn default_entrypoint() -> CString {
    DEFAULT_ENTRYPOINT_C.to_owned()
}

fn payload_cstring(value: &str, label: &str) -> Result<CString, GraftError> {
    CString::new(value)
        .map_err(|_| GraftError::InvalidInput(format!("{label} contains an interior NUL byte")))
}
