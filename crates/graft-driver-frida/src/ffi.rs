//! Bindings for the C shim over frida-core.
//!
//! With the `runtime` feature enabled the declarations link against the
//! shim compiled by the build script. Without it, signature-identical Rust
//! stubs stand in so the crate builds and runs with no native dependency;
//! every stub reports the runtime as unavailable through the shared error
//! protocol.

#[cfg(feature = "runtime")]
use std::ffi::c_char;
use std::ffi::c_int;

/// Opaque shim context bundling the frida device manager, local device and
/// injector handles.
#[repr(C)]
pub(crate) struct GraftShimCtx {
    _private: [u8; 0],
}

pub(crate) const GRAFT_SHIM_ERROR_NONE: c_int = 0;
pub(crate) const GRAFT_SHIM_ERROR_INVALID_ARGUMENT: c_int = 1;
pub(crate) const GRAFT_SHIM_ERROR_NOT_SUPPORTED: c_int = 2;
pub(crate) const GRAFT_SHIM_ERROR_PERMISSION_DENIED: c_int = 3;
pub(crate) const GRAFT_SHIM_ERROR_PROCESS_NOT_FOUND: c_int = 4;
pub(crate) const GRAFT_SHIM_ERROR_RUNTIME: c_int = 5;

#[cfg(feature = "runtime")]
unsafe extern "C" {
    pub(crate) fn graft_shim_new(
        error_kind_out: *mut c_int,
        error_out: *mut *mut c_char,
    ) -> *mut GraftShimCtx;

    pub(crate) fn graft_shim_free(ctx: *mut GraftShimCtx);

    pub(crate) fn graft_shim_spawn(
        ctx: *mut GraftShimCtx,
        program: *const c_char,
        argv: *const *const c_char,
        envp: *const *const c_char,
        cwd: *const c_char,
        stdio: i32,
        out_pid: *mut u32,
        error_kind_out: *mut c_int,
        error_out: *mut *mut c_char,
    ) -> c_int;

    pub(crate) fn graft_shim_resume(
        ctx: *mut GraftShimCtx,
        pid: u32,
        error_kind_out: *mut c_int,
        error_out: *mut *mut c_char,
    ) -> c_int;

    pub(crate) fn graft_shim_inject_file(
        ctx: *mut GraftShimCtx,
        pid: i32,
        library_path: *const c_char,
        entrypoint: *const c_char,
        data: *const c_char,
        out_id: *mut u32,
        error_kind_out: *mut c_int,
        error_out: *mut *mut c_char,
    ) -> c_int;

    pub(crate) fn graft_shim_inject_blob(
        ctx: *mut GraftShimCtx,
        pid: i32,
        blob: *const u8,
        blob_len: usize,
        entrypoint: *const c_char,
        data: *const c_char,
        out_id: *mut u32,
        error_kind_out: *mut c_int,
        error_out: *mut *mut c_char,
    ) -> c_int;

    pub(crate) fn graft_shim_launch(
        ctx: *mut GraftShimCtx,
        program: *const c_char,
        argv: *const *const c_char,
        envp: *const *const c_char,
        cwd: *const c_char,
        stdio: i32,
        library_path: *const c_char,
        entrypoint: *const c_char,
        data: *const c_char,
        out_pid: *mut u32,
        out_id: *mut u32,
        error_kind_out: *mut c_int,
        error_out: *mut *mut c_char,
    ) -> c_int;

    pub(crate) fn graft_shim_demonitor(
        ctx: *mut GraftShimCtx,
        id: u32,
        error_kind_out: *mut c_int,
        error_out: *mut *mut c_char,
    ) -> c_int;

    pub(crate) fn graft_shim_string_free(s: *mut c_char);
}

#[cfg(not(feature = "runtime"))]
pub(crate) use self::stub::*;

#[cfg(not(feature = "runtime"))]
mod stub {
    use std::{
        ffi::{CStr, CString, c_char, c_int},
        ptr,
    };

    use super::{GRAFT_SHIM_ERROR_RUNTIME, GraftShimCtx};

    const UNAVAILABLE: &CStr = c"frida runtime unavailable (stub)";

    unsafe fn set_unavailable(error_kind_out: *mut c_int, error_out: *mut *mut c_char) {
        unsafe {
            if !error_kind_out.is_null() {
                *error_kind_out = GRAFT_SHIM_ERROR_RUNTIME;
            }
            if !error_out.is_null() {
                // Released by `graft_shim_string_free`.
                *error_out = UNAVAILABLE.to_owned().into_raw();
            }
        }
    }

    pub(crate) unsafe fn graft_shim_new(
        error_kind_out: *mut c_int,
        error_out: *mut *mut c_char,
    ) -> *mut GraftShimCtx {
        unsafe { set_unavailable(error_kind_out, error_out) };
        ptr::null_mut()
    }

    pub(crate) unsafe fn graft_shim_free(_ctx: *mut GraftShimCtx) {}

    pub(crate) unsafe fn graft_shim_spawn(
        _ctx: *mut GraftShimCtx,
        _program: *const c_char,
        _argv: *const *const c_char,
        _envp: *const *const c_char,
        _cwd: *const c_char,
        _stdio: i32,
        _out_pid: *mut u32,
        error_kind_out: *mut c_int,
        error_out: *mut *mut c_char,
    ) -> c_int {
        unsafe { set_unavailable(error_kind_out, error_out) };
        0
    }

    pub(crate) unsafe fn graft_shim_resume(
        _ctx: *mut GraftShimCtx,
        _pid: u32,
        error_kind_out: *mut c_int,
        error_out: *mut *mut c_char,
    ) -> c_int {
        unsafe { set_unavailable(error_kind_out, error_out) };
        0
    }

    pub(crate) unsafe fn graft_shim_inject_file(
        _ctx: *mut GraftShimCtx,
        _pid: i32,
        _library_path: *const c_char,
        _entrypoint: *const c_char,
        _data: *const c_char,
        _out_id: *mut u32,
        error_kind_out: *mut c_int,
        error_out: *mut *mut c_char,
    ) -> c_int {
        unsafe { set_unavailable(error_kind_out, error_out) };
        0
    }

    pub(crate) unsafe fn graft_shim_inject_blob(
        _ctx: *mut GraftShimCtx,
        _pid: i32,
        _blob: *const u8,
        _blob_len: usize,
        _entrypoint: *const c_char,
        _data: *const c_char,
        _out_id: *mut u32,
        error_kind_out: *mut c_int,
        error_out: *mut *mut c_char,
    ) -> c_int {
        unsafe { set_unavailable(error_kind_out, error_out) };
        0
    }

    pub(crate) unsafe fn graft_shim_launch(
        _ctx: *mut GraftShimCtx,
        _program: *const c_char,
        _argv: *const *const c_char,
        _envp: *const *const c_char,
        _cwd: *const c_char,
        _stdio: i32,
        _library_path: *const c_char,
        _entrypoint: *const c_char,
        _data: *const c_char,
        _out_pid: *mut u32,
        _out_id: *mut u32,
        error_kind_out: *mut c_int,
        error_out: *mut *mut c_char,
    ) -> c_int {
        unsafe { set_unavailable(error_kind_out, error_out) };
        0
    }

    pub(crate) unsafe fn graft_shim_demonitor(
        _ctx: *mut GraftShimCtx,
        _id: u32,
        error_kind_out: *mut c_int,
        error_out: *mut *mut c_char,
    ) -> c_int {
        unsafe { set_unavailable(error_kind_out, error_out) };
        0
    }

    pub(crate) unsafe fn graft_shim_string_free(s: *mut c_char) {
        if !s.is_null() {
            drop(unsafe { CString::from_raw(s) });
        }
    }
}
