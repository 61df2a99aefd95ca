//! Injection driver backed by the frida-core instrumentation runtime.
//!
//! The driver talks to frida-core through a small C shim
//! (`native/graft_shim.c`) that is compiled against a frida-core devkit
//! when the `runtime` feature is enabled. Without the feature a pure-Rust
//! stub takes the shim's place: the crate still builds and links on any
//! machine, and every operation reports
//! [`GraftError::RuntimeUnavailable`].
//!
//! # Example
//!
//! ```no_run
//! use graft_core::{GraftSession, Launch, Payload, Stdio};
//! use graft_driver_frida::GraftFridaDriver;
//!
//! # fn main() -> Result<(), graft_core::GraftError> {
//! let session = GraftSession::new(GraftFridaDriver::new()?);
//! let payload = Payload::from_path("./agent.so")?;
//!
//! let grafted = session.launch(Launch::new("/usr/bin/true").stdio(Stdio::Null), &payload)?;
//! println!("injected into {}", grafted.target());
//! # Ok(())
//! # }
//! ```

mod driver;
mod error;
mod ffi;
mod marshal;

use graft_core::{GraftDriver, GraftError, InjectionId, Launch, Payload, Target};

pub use self::error::Error;

use self::driver::FridaDriver;

/// Injection driver for the frida-core runtime.
pub struct GraftFridaDriver {
    inner: FridaDriver,
}

impl std::fmt::Debug for GraftFridaDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("GraftFridaDriver(..)")
    }
}

impl GraftFridaDriver {
    /// Creates a new frida driver.
    ///
    /// Initializes the runtime and resolves the local device and injector.
    /// With the stub linked in place of the shim this fails with
    /// [`GraftError::RuntimeUnavailable`].
    pub fn new() -> Result<Self, GraftError> {
        Ok(Self {
            inner: FridaDriver::new()?,
        })
    }
}

impl GraftDriver for GraftFridaDriver {
    fn spawn_suspended(&self, launch: &Launch) -> Result<Target, GraftError> {
        Ok(self.inner.spawn_suspended(launch)?)
    }

    fn resume(&self, target: Target) -> Result<(), GraftError> {
        Ok(self.inner.resume(target)?)
    }

    fn inject(&self, target: Target, payload: &Payload) -> Result<InjectionId, GraftError> {
        Ok(self.inner.inject(target, payload)?)
    }

    fn launch(
        &self,
        launch: &Launch,
        payload: &Payload,
    ) -> Result<(Target, InjectionId), GraftError> {
        Ok(self.inner.launch(launch, payload)?)
    }

    fn demonitor(&self, id: InjectionId) -> Result<(), GraftError> {
        Ok(self.inner.demonitor(id)?)
    }
}
