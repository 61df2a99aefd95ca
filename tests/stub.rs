//! Behavior of the convenience API when the native runtime is not linked.

#![cfg(all(feature = "driver-frida", not(feature = "frida-runtime")))]

use graft::{GraftError, Launch, Payload, Target};

fn payload() -> Payload {
    Payload::from_bytes(vec![0x7f]).expect("payload")
}

#[test]
fn every_operation_reports_runtime_unavailable() {
    let target = unsafe { Target::from_pid_unchecked(1234) };

    assert!(matches!(
        graft::session().expect_err("session"),
        GraftError::RuntimeUnavailable(_)
    ));
    assert!(matches!(
        graft::spawn_suspended(Launch::new("/usr/bin/true")).expect_err("spawn"),
        GraftError::RuntimeUnavailable(_)
    ));
    assert!(matches!(
        graft::inject(target, &payload()).expect_err("inject"),
        GraftError::RuntimeUnavailable(_)
    ));
    assert!(matches!(
        graft::launch("/usr/bin/true", &payload()).expect_err("launch"),
        GraftError::RuntimeUnavailable(_)
    ));
}

#[test]
fn the_unavailable_message_mentions_the_stub_and_is_stable() {
    let first = graft::session().expect_err("session").to_string();
    let second = graft::session().expect_err("session").to_string();

    assert_eq!(first, second);
    assert!(first.contains("stub"), "unexpected message: {first}");
}

#[test]
fn input_validation_still_runs_without_the_runtime() {
    // Payload and target checks happen before any driver is touched.
    assert!(matches!(
        Payload::from_bytes(Vec::new()).expect_err("empty blob"),
        GraftError::InvalidInput(_)
    ));
    assert!(matches!(
        Target::from_pid(-1).expect_err("bad pid"),
        GraftError::InvalidInput(_)
    ));
}
