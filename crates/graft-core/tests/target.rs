use graft_core::{GraftError, Target};

#[test]
fn from_pid_rejects_nonpositive_pids() {
    for pid in [0, -1, i32::MIN] {
        let err = Target::from_pid(pid).expect_err("nonpositive pid");
        assert!(matches!(err, GraftError::InvalidInput(_)), "pid {pid}");
    }
}

#[test]
fn from_pid_accepts_the_current_process() -> Result<(), GraftError> {
    let pid = std::process::id() as i32;
    let target = Target::from_pid(pid)?;
    assert_eq!(target.pid(), pid);
    Ok(())
}

#[test]
fn from_pid_reports_a_missing_process() {
    // Far above any real pid range on the supported platforms.
    let err = Target::from_pid(i32::MAX).expect_err("absent pid");
    assert!(matches!(err, GraftError::ProcessNotFound(pid) if pid == i32::MAX));
}

#[test]
fn try_from_probes_like_from_pid() {
    let pid = std::process::id() as i32;
    let target = Target::try_from(pid).expect("current process");
    assert_eq!(target.pid(), pid);

    assert!(Target::try_from(0).is_err());
}

#[test]
fn from_pid_unchecked_skips_the_probe() {
    let target = unsafe { Target::from_pid_unchecked(i32::MAX) };
    assert_eq!(target.pid(), i32::MAX);
}

#[test]
fn display_prints_the_pid() {
    let target = unsafe { Target::from_pid_unchecked(1234) };
    assert_eq!(target.to_string(), "1234");
}
