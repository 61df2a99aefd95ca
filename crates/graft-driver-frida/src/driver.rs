use std::{
    ffi::{CStr, c_char, c_int},
    path::Path,
    ptr,
};

use graft_core::{InjectionId, Launch, Payload, PayloadSource, Target};

use crate::error::Error;
use crate::ffi::{self, GraftShimCtx};
use crate::marshal::{build_argv, build_cwd, build_envp, os_str_to_cstring, stdio_code};

/// Internal driver owning the shim context.
pub(crate) struct FridaDriver {
    ctx: *mut GraftShimCtx,
}

// The shim context only wraps frida-core handles whose API is documented
// as safe for concurrent use, and the driver never hands the raw pointer
// out.
unsafe impl Send for FridaDriver {}
unsafe impl Sync for FridaDriver {}

impl Drop for FridaDriver {
    fn drop(&mut self) {
        if !self.ctx.is_null() {
            unsafe { ffi::graft_shim_free(self.ctx) };
            self.ctx = ptr::null_mut();
        }
    }
}

impl FridaDriver {
    pub fn new() -> Result<Self, Error> {
        let mut err_kind: c_int = ffi::GRAFT_SHIM_ERROR_NONE;
        let mut err_msg: *mut c_char = ptr::null_mut();

        let ctx = unsafe { ffi::graft_shim_new(&mut err_kind, &mut err_msg) };
        if ctx.is_null() {
            return Err(Error::Unavailable(read_error(err_msg)));
        }

        tracing::debug!("frida shim context created");
        Ok(Self { ctx })
    }

    pub fn spawn_suspended(&self, launch: &Launch) -> Result<Target, Error> {
        tracing::debug!(
            program = ?launch.command().get_program(),
            "spawning suspended"
        );

        let program = os_str_to_cstring(launch.command().get_program(), "program")?;
        let argv = build_argv(launch, &program)?;
        let envp = build_envp(launch)?;
        let cwd = build_cwd(launch)?;

        let mut err_kind: c_int = ffi::GRAFT_SHIM_ERROR_NONE;
        let mut err_msg: *mut c_char = ptr::null_mut();
        let mut pid: u32 = 0;

        let ok = unsafe {
            ffi::graft_shim_spawn(
                self.ctx,
                program.as_ptr(),
                argv.as_ptr(),
                envp.as_ptr(),
                cwd.as_ref().map_or(ptr::null(), |dir| dir.as_ptr()),
                stdio_code(launch.stdio_value()),
                &mut pid,
                &mut err_kind,
                &mut err_msg,
            )
        };
        if ok <= 0 {
            return Err(Error::from_shim(err_kind, read_error(err_msg), None));
        }

        tracing::debug!(pid, "spawned suspended");
        Ok(unsafe { Target::from_pid_unchecked(pid as i32) })
    }

    pub fn resume(&self, target: Target) -> Result<(), Error> {
        tracing::debug!(pid = target.pid(), "resuming process");

        let mut err_kind: c_int = ffi::GRAFT_SHIM_ERROR_NONE;
        let mut err_msg: *mut c_char = ptr::null_mut();

        let ok = unsafe {
            ffi::graft_shim_resume(self.ctx, target.pid() as u32, &mut err_kind, &mut err_msg)
        };
        if ok <= 0 {
            return Err(Error::from_shim(
                err_kind,
                read_error(err_msg),
                Some(target.pid()),
            ));
        }

        Ok(())
    }

    pub fn inject(&self, target: Target, payload: &Payload) -> Result<InjectionId, Error> {
        match payload.source() {
            PayloadSource::File(path) => self.inject_file(target, path, payload),
            PayloadSource::Blob(bytes) => self.inject_blob(target, bytes, payload),
        }
    }

    fn inject_file(
        &self,
        target: Target,
        path: &Path,
        payload: &Payload,
    ) -> Result<InjectionId, Error> {
        tracing::debug!(pid = target.pid(), path = %path.display(), "injecting library file");

        let library_path = os_str_to_cstring(path.as_os_str(), "library path")?;

        let mut err_kind: c_int = ffi::GRAFT_SHIM_ERROR_NONE;
        let mut err_msg: *mut c_char = ptr::null_mut();
        let mut id: u32 = 0;

        let ok = unsafe {
            ffi::graft_shim_inject_file(
                self.ctx,
                target.pid(),
                library_path.as_ptr(),
                payload.entrypoint().as_ptr(),
                payload.data().as_ptr(),
                &mut id,
                &mut err_kind,
                &mut err_msg,
            )
        };
        if ok <= 0 {
            return Err(Error::from_shim(
                err_kind,
                read_error(err_msg),
                Some(target.pid()),
            ));
        }

        tracing::debug!(pid = target.pid(), id, "library injected");
        Ok(InjectionId(id))
    }

    fn inject_blob(
        &self,
        target: Target,
        bytes: &[u8],
        payload: &Payload,
    ) -> Result<InjectionId, Error> {
        tracing::debug!(
            pid = target.pid(),
            len = bytes.len(),
            "injecting library blob"
        );

        let mut err_kind: c_int = ffi::GRAFT_SHIM_ERROR_NONE;
        let mut err_msg: *mut c_char = ptr::null_mut();
        let mut id: u32 = 0;

        let ok = unsafe {
            ffi::graft_shim_inject_blob(
                self.ctx,
                target.pid(),
                bytes.as_ptr(),
                bytes.len(),
                payload.entrypoint().as_ptr(),
                payload.data().as_ptr(),
                &mut id,
                &mut err_kind,
                &mut err_msg,
            )
        };
        if ok <= 0 {
            return Err(Error::from_shim(
                err_kind,
                read_error(err_msg),
                Some(target.pid()),
            ));
        }

        tracing::debug!(pid = target.pid(), id, "library injected");
        Ok(InjectionId(id))
    }

    pub fn launch(
        &self,
        launch: &Launch,
        payload: &Payload,
    ) -> Result<(Target, InjectionId), Error> {
        match payload.source() {
            PayloadSource::File(path) => self.launch_file(launch, path, payload),
            PayloadSource::Blob(_) => {
                // The one-shot shim call takes a library path; blob payloads
                // go through spawn, inject and resume instead.
                tracing::trace!("blob payload, composing spawn + inject + resume");
                let target = self.spawn_suspended(launch)?;
                let id = self.inject(target, payload)?;
                self.resume(target)?;
                Ok((target, id))
            }
        }
    }

    fn launch_file(
        &self,
        launch: &Launch,
        path: &Path,
        payload: &Payload,
    ) -> Result<(Target, InjectionId), Error> {
        tracing::debug!(
            program = ?launch.command().get_program(),
            path = %path.display(),
            "launching with injection"
        );

        let program = os_str_to_cstring(launch.command().get_program(), "program")?;
        let argv = build_argv(launch, &program)?;
        let envp = build_envp(launch)?;
        let cwd = build_cwd(launch)?;
        let library_path = os_str_to_cstring(path.as_os_str(), "library path")?;

        let mut err_kind: c_int = ffi::GRAFT_SHIM_ERROR_NONE;
        let mut err_msg: *mut c_char = ptr::null_mut();
        let mut pid: u32 = 0;
        let mut id: u32 = 0;

        let ok = unsafe {
            ffi::graft_shim_launch(
                self.ctx,
                program.as_ptr(),
                argv.as_ptr(),
                envp.as_ptr(),
                cwd.as_ref().map_or(ptr::null(), |dir| dir.as_ptr()),
                stdio_code(launch.stdio_value()),
                library_path.as_ptr(),
                payload.entrypoint().as_ptr(),
                payload.data().as_ptr(),
                &mut pid,
                &mut id,
                &mut err_kind,
                &mut err_msg,
            )
        };
        if ok <= 0 {
            return Err(Error::from_shim(err_kind, read_error(err_msg), None));
        }

        tracing::debug!(pid, id, "launched with injection");
        Ok((unsafe { Target::from_pid_unchecked(pid as i32) }, InjectionId(id)))
    }

    pub fn demonitor(&self, id: InjectionId) -> Result<(), Error> {
        // Id 0 is the "nothing to monitor" sentinel.
        if id.0 == 0 {
            tracing::trace!("injection id 0, nothing to demonitor");
            return Ok(());
        }

        tracing::debug!(id = id.0, "demonitoring injection");

        let mut err_kind: c_int = ffi::GRAFT_SHIM_ERROR_NONE;
        let mut err_msg: *mut c_char = ptr::null_mut();

        let ok =
            unsafe { ffi::graft_shim_demonitor(self.ctx, id.0, &mut err_kind, &mut err_msg) };
        if ok <= 0 {
            return Err(Error::from_shim(err_kind, read_error(err_msg), None));
        }

        Ok(())
    }
}

/// Copies a shim-owned error message and releases it.
fn read_error(message: *mut c_char) -> String {
    if message.is_null() {
        return "unknown error".to_string();
    }

    unsafe {
        let copied = CStr::from_ptr(message).to_string_lossy().into_owned();
        ffi::graft_shim_string_free(message);
        copied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Every shim call fails against a null context, in stub and runtime
    // builds alike, so an Ok can only come from a path that never crosses
    // the boundary.
    fn null_driver() -> FridaDriver {
        FridaDriver {
            ctx: ptr::null_mut(),
        }
    }

    #[test]
    fn demonitor_accepts_id_zero_without_a_shim_call() {
        let driver = null_driver();
        driver.demonitor(InjectionId(0)).expect("id 0 is a no-op");
    }

    #[test]
    fn demonitor_forwards_nonzero_ids_to_the_shim() {
        let driver = null_driver();
        assert!(driver.demonitor(InjectionId(7)).is_err());
    }
}
