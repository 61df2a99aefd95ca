use std::path::{Path, PathBuf};

use graft_build::{AgentCrate, BuildError, cdylib_filename};

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../fixtures")
}

#[test]
fn loads_fixture_agent_metadata() {
    let agent = AgentCrate::load(fixtures_dir().join("agent")).expect("fixture agent");

    assert_eq!(agent.package_name(), "graft-fixture-agent");
    assert_eq!(agent.entrypoint(), Some("graft_agent_entry"));
    assert_eq!(agent.data(), Some("fixture"));
    assert!(agent.manifest_path().ends_with("Cargo.toml"));
}

#[test]
fn accepts_a_direct_manifest_path() {
    let agent =
        AgentCrate::load(fixtures_dir().join("agent/Cargo.toml")).expect("direct manifest");
    assert_eq!(agent.package_name(), "graft-fixture-agent");
}

#[test]
fn rejects_a_crate_without_cdylib() {
    // The sleeper fixture is a plain bin crate.
    let err = AgentCrate::load(fixtures_dir().join("target")).expect_err("bin crate");
    assert!(matches!(err, BuildError::NotCdylib(_)));
    assert!(err.to_string().contains("not configured as cdylib"));
}

#[test]
fn reports_a_missing_manifest() {
    let dir = std::env::temp_dir().join(format!("graft-build-missing-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("create dir");

    let err = AgentCrate::load(&dir).expect_err("no manifest");
    assert!(matches!(err, BuildError::ManifestMissing(_)));
    assert!(err.to_string().contains("missing Cargo.toml"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn reports_an_unparsable_manifest() {
    let dir = std::env::temp_dir().join(format!("graft-build-broken-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("create dir");
    std::fs::write(dir.join("Cargo.toml"), "[package\nname = broken").expect("write manifest");

    let err = AgentCrate::load(&dir).expect_err("broken manifest");
    assert!(matches!(err, BuildError::Manifest(_)));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn artifact_name_follows_the_platform_convention() {
    let agent = AgentCrate::load(fixtures_dir().join("agent")).expect("fixture agent");
    assert_eq!(agent.artifact_name(), cdylib_filename("graft-fixture-agent"));
}

#[test]
fn cdylib_filename_replaces_dashes() {
    let name = cdylib_filename("foo-bar");
    if cfg!(windows) {
        assert_eq!(name, "foo_bar.dll");
    } else if cfg!(target_os = "macos") {
        assert_eq!(name, "libfoo_bar.dylib");
    } else {
        assert_eq!(name, "libfoo_bar.so");
    }
}
