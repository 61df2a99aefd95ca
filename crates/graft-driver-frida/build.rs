use std::{
    env,
    path::{Path, PathBuf},
};

use graft_build::DevkitLink;

const DEFAULT_DEVKIT_VERSION: &str = "17.6.2";

/// Devkit releases the shim is known to compile against.
const SUPPORTED_DEVKIT_VERSIONS: &[&str] = &["17.6.2", "17.5.2"];

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=native/graft_shim.c");
    println!("cargo:rerun-if-changed=native/graft_shim.h");
    println!("cargo:rerun-if-env-changed=GRAFT_DEVKIT_DIR");
    println!("cargo:rerun-if-env-changed=GRAFT_DEVKIT_VERSION");
    println!("cargo:rerun-if-env-changed=GRAFT_DEVKIT_PLATFORM");
    println!("cargo:rerun-if-env-changed=CARGO_TARGET_DIR");

    if env::var_os("CARGO_FEATURE_RUNTIME").is_none() {
        println!(
            "cargo:warning=frida runtime disabled, building the stub driver \
             (enable with --features runtime)"
        );
        return;
    }

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());

    if let Some(dir) = env::var_os("GRAFT_DEVKIT_DIR") {
        build_shim(&manifest_dir, &PathBuf::from(dir));
        return;
    }

    if let Some(dir) = obtain_devkit() {
        build_shim(&manifest_dir, &dir);
        return;
    }

    panic!(
        "failed to obtain a frida-core devkit; set GRAFT_DEVKIT_DIR to a \
         prebuilt devkit directory"
    );
}

fn build_shim(manifest_dir: &Path, devkit_dir: &Path) {
    let (devkit, link) = find_devkit(devkit_dir)
        .unwrap_or_else(|| panic!("no frida-core devkit found in {}", devkit_dir.display()));

    let glib = graft_build::probe_pkg("glib-2.0");
    let gobject = graft_build::probe_pkg("gobject-2.0");
    let json_glib = graft_build::probe_pkg("json-glib-1.0");

    let mut build = cc::Build::new();
    build
        .file(manifest_dir.join("native/graft_shim.c"))
        .include(manifest_dir.join("native"))
        .include(&devkit);
    for library in [&glib, &gobject, &json_glib] {
        for path in &library.include_paths {
            build.include(path);
        }
    }
    build.compile("graft_shim");

    println!("cargo:rustc-link-search=native={}", devkit.display());
    println!("cargo:rustc-link-lib={}=frida-core", link.kind());

    link_system_libs(link);
}

fn link_system_libs(link: DevkitLink) {
    let os = target_os();
    match os.as_str() {
        "linux" | "android" => {
            for lib in ["dl", "m", "rt", "resolv", "pthread"] {
                println!("cargo:rustc-link-lib=dylib={lib}");
            }
        }
        "macos" | "ios" => {
            for lib in ["bsm", "resolv", "pthread"] {
                println!("cargo:rustc-link-lib=dylib={lib}");
            }
            // The shared devkit resolves these internally; the static
            // archive leaves them to the final link.
            if os == "macos" && link == DevkitLink::Static {
                for framework in ["CoreFoundation", "Foundation", "AppKit", "IOKit", "Security"] {
                    println!("cargo:rustc-link-lib=framework={framework}");
                }
                println!("cargo:rustc-link-lib=dylib=objc");
            }
        }
        "windows" => {
            for lib in [
                "advapi32", "crypt32", "dnsapi", "gdi32", "iphlpapi", "ole32", "psapi",
                "secur32", "setupapi", "shell32", "shlwapi", "user32", "winmm", "ws2_32",
            ] {
                println!("cargo:rustc-link-lib=dylib={lib}");
            }
        }
        _ => {}
    }
}

fn target_os() -> String {
    env::var("CARGO_CFG_TARGET_OS").unwrap_or_else(|_| env::consts::OS.to_string())
}

/// Finds a cached devkit or downloads one into the cargo target
/// directory, trying the supported versions in order.
fn obtain_devkit() -> Option<PathBuf> {
    let platform = match graft_build::resolve_platform() {
        Ok(platform) => platform,
        Err(err) => {
            println!("cargo:warning={err}");
            return None;
        }
    };

    let (versions, allow_fallback) =
        graft_build::resolve_versions(DEFAULT_DEVKIT_VERSION, SUPPORTED_DEVKIT_VERSIONS);
    let cache_root = devkit_cache_dir().join("frida-devkit");

    for version in &versions {
        let out_dir = cache_root.join(version).join(&platform);
        if find_devkit(&out_dir).is_some() {
            return Some(out_dir);
        }

        match graft_build::download_devkit(version, &out_dir, Some(&platform)) {
            Ok(dir) if find_devkit(&dir).is_some() => return Some(dir),
            Ok(dir) => println!(
                "cargo:warning=devkit {version} extracted into {} without the expected files",
                dir.display()
            ),
            Err(err) => println!("cargo:warning=failed to fetch devkit {version}: {err}"),
        }

        if !allow_fallback {
            break;
        }
    }

    None
}

fn devkit_cache_dir() -> PathBuf {
    if let Some(dir) = env::var_os("CARGO_TARGET_DIR") {
        return PathBuf::from(dir);
    }

    // OUT_DIR is <target>/<profile>/build/<pkg>-<hash>/out.
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    out_dir
        .ancestors()
        .nth(4)
        .map(Path::to_path_buf)
        .unwrap_or(out_dir)
}

/// Locates the devkit files in `dir` or one of its immediate
/// subdirectories, for archives that extract into a nested folder.
fn find_devkit(dir: &Path) -> Option<(PathBuf, DevkitLink)> {
    if let Some(link) = graft_build::devkit_link(dir) {
        return Some((dir.to_path_buf(), link));
    }

    for entry in std::fs::read_dir(dir).ok()?.flatten() {
        let path = entry.path();
        if path.is_dir() {
            if let Some(link) = graft_build::devkit_link(&path) {
                return Some((path, link));
            }
        }
    }

    None
}
