//! Test agent that writes a stamp file to the path passed as data.

use std::{
    ffi::{CStr, c_char, c_void},
    fs,
};

/// Entrypoint invoked by the injector; `data` carries the stamp file path.
#[unsafe(no_mangle)]
pub extern "C" fn graft_agent_entry(
    data: *const c_char,
    _stay_resident: *mut i32,
    _state: *mut c_void,
) {
    if data.is_null() {
        return;
    }

    let path = unsafe { CStr::from_ptr(data) }.to_string_lossy();
    if path.is_empty() {
        return;
    }

    let _ = fs::write(path.as_ref(), b"ok");
}
