//! frida-core devkit resolution and download.
//!
//! Driver build scripts compile a C shim against a frida-core devkit, a
//! prebuilt archive published with each frida release. This module detects
//! the devkit platform string, resolves the versions to try, downloads an
//! archive using the host's `curl` and `tar` (or PowerShell for zip
//! archives on Windows) and classifies the layout of an extracted devkit.

use std::{
    env,
    path::{Path, PathBuf},
    process::Command,
};

use crate::BuildError;

/// Probes a pkg-config dependency required to compile against the devkit.
///
/// # Panics
///
/// Panics when the dependency cannot be found. This is meant to be called
/// from build scripts, where a panic is the failure mode.
pub fn probe_pkg(name: &str) -> pkg_config::Library {
    pkg_config::Config::new()
        .probe(name)
        .unwrap_or_else(|err| panic!("missing pkg-config dependency {name}: {err}"))
}

/// Detects the devkit platform string for the current build target.
///
/// Inside a build script this follows `CARGO_CFG_TARGET_OS` and
/// `CARGO_CFG_TARGET_ARCH`, so cross-compilation picks the devkit of the
/// target rather than the host.
pub fn detect_platform() -> Result<String, BuildError> {
    let os = env::var("CARGO_CFG_TARGET_OS").unwrap_or_else(|_| env::consts::OS.to_string());
    let arch = env::var("CARGO_CFG_TARGET_ARCH").unwrap_or_else(|_| env::consts::ARCH.to_string());

    let platform = match (os.as_str(), arch.as_str()) {
        ("macos", "aarch64") => "macos-arm64",
        ("macos", "x86_64") => "macos-x86_64",
        ("linux", "aarch64") => "linux-arm64",
        ("linux", "x86_64") => "linux-x86_64",
        ("windows", "aarch64") => "windows-arm64",
        ("windows", "x86_64") => "windows-x86_64",
        _ => return Err(BuildError::UnsupportedPlatform(format!("{os}-{arch}"))),
    };

    Ok(platform.to_string())
}

/// Resolves the devkit platform string, honoring `GRAFT_DEVKIT_PLATFORM`.
pub fn resolve_platform() -> Result<String, BuildError> {
    if let Ok(platform) = env::var("GRAFT_DEVKIT_PLATFORM") {
        return Ok(platform);
    }
    detect_platform()
}

/// Resolves the devkit versions to try, in order, plus whether falling back
/// past the first entry is allowed.
///
/// `GRAFT_DEVKIT_VERSION` pins a single version and disables fallback.
/// Otherwise `default` is tried first, followed by the remaining entries of
/// `supported`.
pub fn resolve_versions(default: &str, supported: &[&str]) -> (Vec<String>, bool) {
    if let Ok(version) = env::var("GRAFT_DEVKIT_VERSION") {
        return (vec![version], false);
    }

    let mut versions = vec![default.to_string()];
    for &version in supported {
        if !versions.iter().any(|known| known == version) {
            versions.push(version.to_string());
        }
    }

    (versions, true)
}

/// Downloads and extracts a frida-core devkit into `out_dir`.
///
/// With `platform` unset the current build target is detected. Returns the
/// directory the archive was extracted into.
pub fn download_devkit(
    version: &str,
    out_dir: impl AsRef<Path>,
    platform: Option<&str>,
) -> Result<PathBuf, BuildError> {
    let platform = match platform {
        Some(platform) => platform.to_string(),
        None => detect_platform()?,
    };

    let out_dir = out_dir.as_ref();
    std::fs::create_dir_all(out_dir)?;

    // Windows devkits have shipped as both tar.xz and zip across releases.
    let extensions: &[&str] = if platform.starts_with("windows-") {
        &["tar.xz", "zip"]
    } else {
        &["tar.xz"]
    };

    let mut last_error = None;
    for extension in extensions {
        let filename = format!("frida-core-devkit-{version}-{platform}.{extension}");
        let archive = out_dir.join(&filename);
        let url = format!("https://github.com/frida/frida/releases/download/{version}/{filename}");

        match fetch_and_extract(&url, &archive, out_dir, extension) {
            Ok(()) => return Ok(out_dir.to_path_buf()),
            Err(err) => last_error = Some(err),
        }
    }

    Err(last_error
        .unwrap_or_else(|| BuildError::Command("no devkit archive candidates".to_string())))
}

fn fetch_and_extract(
    url: &str,
    archive: &Path,
    out_dir: &Path,
    extension: &str,
) -> Result<(), BuildError> {
    run(Command::new("curl").args(["-fL", "-o"]).arg(archive).arg(url))?;

    if extension == "zip" {
        let script = format!(
            "Expand-Archive -Force -Path '{}' -DestinationPath '{}'",
            archive.display(),
            out_dir.display()
        );
        run(Command::new("powershell").args(["-NoProfile", "-Command", &script]))
    } else {
        run(Command::new("tar").arg("-xf").arg(archive).arg("-C").arg(out_dir))
    }
}

fn run(command: &mut Command) -> Result<(), BuildError> {
    let status = command
        .status()
        .map_err(|err| BuildError::Command(format!("failed to run {command:?}: {err}")))?;
    if !status.success() {
        return Err(BuildError::Command(format!(
            "{command:?} exited with {status}"
        )));
    }
    Ok(())
}

/// Link kind of the frida-core library a devkit ships.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DevkitLink {
    /// `libfrida-core.a`.
    Static,
    /// `libfrida-core.so`, `libfrida-core.dylib`, `frida-core.lib` or
    /// `frida-core.dll`.
    Dynamic,
}

impl DevkitLink {
    /// Returns the matching `cargo:rustc-link-lib` kind.
    pub fn kind(self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Dynamic => "dylib",
        }
    }
}

const SHARED_LIBRARIES: &[&str] = &[
    "libfrida-core.so",
    "libfrida-core.dylib",
    "frida-core.lib",
    "frida-core.dll",
];

/// Classifies a devkit directory and returns how frida-core links.
///
/// A devkit holds `frida-core.h` next to the frida-core library. Shared
/// builds take precedence over the static archive when both are present.
/// Returns `None` for directories without a devkit layout.
pub fn devkit_link(dir: impl AsRef<Path>) -> Option<DevkitLink> {
    let dir = dir.as_ref();
    if !dir.join("frida-core.h").is_file() {
        return None;
    }

    if SHARED_LIBRARIES.iter().any(|name| dir.join(name).is_file()) {
        return Some(DevkitLink::Dynamic);
    }
    if dir.join("libfrida-core.a").is_file() {
        return Some(DevkitLink::Static);
    }

    None
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!("graft-devkit-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).expect("create scratch dir");
        dir
    }

    fn touch(path: impl AsRef<Path>) {
        fs::write(path, b"").expect("create file");
    }

    #[test]
    fn static_devkit_links_statically() {
        let dir = scratch_dir("static");
        touch(dir.join("frida-core.h"));
        touch(dir.join("libfrida-core.a"));

        assert_eq!(devkit_link(&dir), Some(DevkitLink::Static));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn shared_only_devkit_links_dynamically() {
        let dir = scratch_dir("shared");
        touch(dir.join("frida-core.h"));
        touch(dir.join("libfrida-core.so"));

        assert_eq!(devkit_link(&dir), Some(DevkitLink::Dynamic));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn shared_library_wins_over_the_static_archive() {
        let dir = scratch_dir("mixed");
        touch(dir.join("frida-core.h"));
        touch(dir.join("libfrida-core.a"));
        touch(dir.join("libfrida-core.dylib"));

        assert_eq!(devkit_link(&dir), Some(DevkitLink::Dynamic));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn header_without_a_library_is_not_a_devkit() {
        let dir = scratch_dir("header-only");
        touch(dir.join("frida-core.h"));

        assert_eq!(devkit_link(&dir), None);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn library_without_the_header_is_not_a_devkit() {
        let dir = scratch_dir("lib-only");
        touch(dir.join("libfrida-core.a"));

        assert_eq!(devkit_link(&dir), None);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn link_kinds_match_the_cargo_directives() {
        assert_eq!(DevkitLink::Static.kind(), "static");
        assert_eq!(DevkitLink::Dynamic.kind(), "dylib");
    }
}
