use std::{ffi::OsStr, process::Command};

use graft_core::{Launch, Stdio};

#[test]
fn new_captures_the_program() {
    let launch = Launch::new("/bin/echo");
    assert_eq!(launch.command().get_program(), OsStr::new("/bin/echo"));
    assert_eq!(launch.stdio_value(), Stdio::Inherit);
}

#[test]
fn deref_exposes_command_builders() {
    let mut launch = Launch::new("/bin/echo");
    launch.arg("hello").arg("world").env("GRAFT_TEST", "1");

    let args: Vec<_> = launch.command().get_args().collect();
    assert_eq!(args, [OsStr::new("hello"), OsStr::new("world")]);

    let envs: Vec<_> = launch.command().get_envs().collect();
    assert!(envs.contains(&(OsStr::new("GRAFT_TEST"), Some(OsStr::new("1")))));
}

#[test]
fn stdio_setter_is_recorded() {
    let launch = Launch::new("/bin/echo").stdio(Stdio::Null);
    assert_eq!(launch.stdio_value(), Stdio::Null);

    let launch = Launch::new("/bin/echo").stdio(Stdio::Piped);
    assert_eq!(launch.stdio_value(), Stdio::Piped);
}

#[test]
fn conversions_build_equivalent_launches() {
    let from_str = Launch::from("/bin/echo");
    assert_eq!(from_str.command().get_program(), OsStr::new("/bin/echo"));

    let from_os_str = Launch::from(OsStr::new("/bin/echo"));
    assert_eq!(from_os_str.command().get_program(), OsStr::new("/bin/echo"));

    let mut command = Command::new("/bin/echo");
    command.arg("hi");
    let from_command = Launch::from(command);
    let args: Vec<_> = from_command.command().get_args().collect();
    assert_eq!(args, [OsStr::new("hi")]);
}

#[test]
fn into_command_preserves_the_configuration() {
    let mut launch = Launch::new("/bin/echo");
    launch.arg("hi");

    let command = launch.into_command();
    assert_eq!(command.get_program(), OsStr::new("/bin/echo"));
    let args: Vec<_> = command.get_args().collect();
    assert_eq!(args, [OsStr::new("hi")]);
}

#[cfg(unix)]
#[test]
fn into_command_spawns_directly() {
    use std::process::Stdio as ProcessStdio;

    let mut command = Launch::new("/bin/echo").stdio(Stdio::Null).into_command();
    let status = command
        .stdout(ProcessStdio::null())
        .status()
        .expect("spawn echo");
    assert!(status.success());
}
