//! Build support for graft agent crates.
//!
//! An agent crate is an ordinary Rust `cdylib` whose built artifact gets
//! injected into a target process. This crate resolves agent metadata and
//! artifacts at runtime, and (behind the `devkit` feature) fetches the
//! frida-core devkit that driver build scripts compile against.

use std::{
    path::{Path, PathBuf},
    process::{Command, ExitStatus},
};

#[cfg(feature = "devkit")]
mod devkit;

#[cfg(feature = "devkit")]
pub use self::devkit::{
    DevkitLink, detect_platform, devkit_link, download_devkit, probe_pkg, resolve_platform,
    resolve_versions,
};

/// Error type for agent crate resolution and devkit handling.
#[derive(thiserror::Error, Debug)]
pub enum BuildError {
    /// No `Cargo.toml` exists at the given path.
    #[error("missing Cargo.toml under {0}")]
    ManifestMissing(PathBuf),

    /// The manifest could not be read or is structurally invalid.
    #[error("invalid Cargo.toml: {0}")]
    Manifest(String),

    /// The crate does not produce a `cdylib` artifact.
    #[error("crate `{0}` is not configured as cdylib; add [lib] crate-type = [\"cdylib\"]")]
    NotCdylib(String),

    /// `cargo build` exited with a failure status.
    #[error("cargo build failed with {0}")]
    Cargo(ExitStatus),

    /// The built artifact could not be located.
    #[error("cdylib `{0}` not found after build")]
    ArtifactMissing(String),

    /// The build target has no known devkit asset.
    #[error("no devkit asset for platform {0}")]
    UnsupportedPlatform(String),

    /// An external command could not be run or reported failure.
    #[error("{0}")]
    Command(String),

    /// I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Metadata of a Rust `cdylib` crate usable as an injectable agent.
///
/// Loaded from a crate directory or a direct manifest path. The optional
/// `[package.metadata.graft]` table overrides the entrypoint symbol and the
/// data string:
///
/// ```text
/// [package.metadata.graft]
/// entrypoint = "my_agent_entry"
/// data = "config"
/// ```
#[derive(Debug)]
pub struct AgentCrate {
    package_name: String,
    manifest_path: PathBuf,
    crate_dir: PathBuf,
    entrypoint: Option<String>,
    data: Option<String>,
}

impl AgentCrate {
    /// Loads agent metadata from a crate directory or a `Cargo.toml` path.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BuildError> {
        let path = path.as_ref();
        let manifest_path = if path.is_dir() {
            path.join("Cargo.toml")
        } else {
            path.to_path_buf()
        };
        if !manifest_path.is_file() {
            return Err(BuildError::ManifestMissing(path.to_path_buf()));
        }

        let text = std::fs::read_to_string(&manifest_path)?;
        let manifest: toml::Value =
            toml::from_str(&text).map_err(|err| BuildError::Manifest(err.to_string()))?;

        let package_name = manifest
            .get("package")
            .and_then(|package| package.get("name"))
            .and_then(|name| name.as_str())
            .ok_or_else(|| BuildError::Manifest("missing [package].name".into()))?
            .to_string();

        let is_cdylib = manifest
            .get("lib")
            .and_then(|lib| lib.get("crate-type"))
            .and_then(|kinds| kinds.as_array())
            .is_some_and(|kinds| kinds.iter().any(|kind| kind.as_str() == Some("cdylib")));
        if !is_cdylib {
            return Err(BuildError::NotCdylib(package_name));
        }

        let metadata = manifest
            .get("package")
            .and_then(|package| package.get("metadata"))
            .and_then(|metadata| metadata.get("graft"));
        let entrypoint = metadata
            .and_then(|table| table.get("entrypoint"))
            .and_then(|value| value.as_str())
            .map(str::to_string);
        let data = metadata
            .and_then(|table| table.get("data"))
            .and_then(|value| value.as_str())
            .map(str::to_string);

        let crate_dir = manifest_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Self {
            package_name,
            manifest_path,
            crate_dir,
            entrypoint,
            data,
        })
    }

    /// Returns the package name.
    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    /// Returns the path of the crate manifest.
    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    /// Returns the entrypoint override from `[package.metadata.graft]`.
    pub fn entrypoint(&self) -> Option<&str> {
        self.entrypoint.as_deref()
    }

    /// Returns the data override from `[package.metadata.graft]`.
    pub fn data(&self) -> Option<&str> {
        self.data.as_deref()
    }

    /// Returns the platform-specific filename of the built artifact.
    pub fn artifact_name(&self) -> String {
        cdylib_filename(&self.package_name)
    }

    /// Searches the likely target directories for an already-built artifact.
    ///
    /// `CARGO_TARGET_DIR` is honored first, then the crate's own `target`
    /// directory and the `target` directories of up to four ancestors, for
    /// workspace layouts. Within each, `release` wins over `debug`.
    pub fn find_artifact(&self) -> Option<PathBuf> {
        let filename = self.artifact_name();

        let mut roots = Vec::new();
        if let Some(dir) = std::env::var_os("CARGO_TARGET_DIR") {
            roots.push(PathBuf::from(dir));
        }
        roots.push(self.crate_dir.join("target"));

        let mut dir = self.crate_dir.as_path();
        for _ in 0..4 {
            let Some(parent) = dir.parent() else { break };
            roots.push(parent.join("target"));
            dir = parent;
        }

        for root in roots {
            for profile in ["release", "debug"] {
                let candidate = root.join(profile).join(&filename);
                if candidate.is_file() {
                    return Some(candidate);
                }
            }
        }

        None
    }

    /// Builds the crate with `cargo build` and returns the artifact path.
    pub fn build(&self) -> Result<PathBuf, BuildError> {
        let status = Command::new("cargo")
            .arg("build")
            .arg("--manifest-path")
            .arg(&self.manifest_path)
            .status()
            .map_err(|err| BuildError::Command(format!("failed to invoke cargo: {err}")))?;
        if !status.success() {
            return Err(BuildError::Cargo(status));
        }

        self.find_artifact()
            .ok_or_else(|| BuildError::ArtifactMissing(self.artifact_name()))
    }

    /// Returns the built artifact, running `cargo build` once if none is
    /// found.
    pub fn resolve(&self) -> Result<PathBuf, BuildError> {
        if let Some(artifact) = self.find_artifact() {
            return Ok(artifact);
        }
        self.build()
    }
}

/// Returns the platform-specific filename of the cdylib a crate produces.
pub fn cdylib_filename(package_name: &str) -> String {
    let stem = package_name.replace('-', "_");
    if cfg!(windows) {
        format!("{stem}.dll")
    } else if cfg!(target_os = "macos") {
        format!("lib{stem}.dylib")
    } else {
        format!("lib{stem}.so")
    }
}
