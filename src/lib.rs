//! Process injection through an external instrumentation runtime.
//!
//! `graft` spawns programs in a suspended state, injects shared libraries
//! into new or already-running processes and resumes them, exposing the
//! frida-core runtime behind a small, safe API. The injected library's
//! entrypoint receives a caller-supplied data string.
//!
//! # Quickstart
//!
//! Launch a program with an agent injected before any of its own code
//! runs:
//!
//! ```no_run
//! use graft::{Launch, Payload, Stdio};
//!
//! # fn main() -> Result<(), graft::GraftError> {
//! let payload = Payload::from_path("./agent.so")?.with_data("hello")?;
//!
//! let grafted = graft::launch(Launch::new("/usr/bin/true").stdio(Stdio::Null), &payload)?;
//! println!("pid {}", grafted.target().pid());
//! # Ok(())
//! # }
//! ```
//!
//! Attach to a running process instead:
//!
//! ```no_run
//! use graft::{Payload, Target};
//!
//! # fn main() -> Result<(), graft::GraftError> {
//! let target = Target::from_pid(1234)?;
//! let payload = Payload::from_crate("./my-agent")?;
//!
//! let grafted = graft::inject(target, &payload)?;
//! grafted.demonitor()?;
//! # Ok(())
//! # }
//! ```
//!
//! The convenience functions share one process-global session over the
//! default driver. Hold a [`GraftSession`] over a specific driver instead
//! when more control is needed.
//!
//! # Features
//!
//! * `driver-frida` (default) enables the frida driver and the global
//!   session.
//! * `frida-runtime` additionally compiles and links the native shim
//!   against a frida-core devkit. Without it the driver is a stub and
//!   every operation reports [`GraftError::RuntimeUnavailable`].

pub use graft_core::{
    DEFAULT_ENTRYPOINT, GraftDriver, GraftError, GraftSession, Grafted, InjectionId, Launch,
    Payload, PayloadSource, Stdio, SuspendedLaunch, Target,
};

/// Injection driver implementations.
pub mod driver {
    #[cfg(feature = "driver-frida")]
    pub use graft_driver_frida as frida;
}

#[cfg(feature = "driver-frida")]
use std::sync::OnceLock;

#[cfg(feature = "driver-frida")]
static SESSION: OnceLock<Result<GraftSession, String>> = OnceLock::new();

/// Returns the process-global session over the default frida driver.
///
/// The driver is initialized on first use. A failed initialization is
/// cached, and every later call reports the same
/// [`GraftError::RuntimeUnavailable`] message.
#[cfg(feature = "driver-frida")]
pub fn session() -> Result<GraftSession, GraftError> {
    let cached = SESSION.get_or_init(|| {
        match graft_driver_frida::GraftFridaDriver::new() {
            Ok(driver) => Ok(GraftSession::new(driver)),
            Err(err) => {
                let message = err.to_string();
                tracing::debug!(%message, "global frida driver initialization failed");
                Err(message)
            }
        }
    });

    match cached {
        Ok(session) => Ok(session.clone()),
        Err(message) => Err(GraftError::RuntimeUnavailable(message.clone())),
    }
}

/// Spawns a program suspended, injects the payload and resumes it, using
/// the global session.
#[cfg(feature = "driver-frida")]
pub fn launch(launch: impl Into<Launch>, payload: &Payload) -> Result<Grafted, GraftError> {
    session()?.launch(launch, payload)
}

/// Injects a payload into a running process using the global session.
#[cfg(feature = "driver-frida")]
pub fn inject(target: Target, payload: &Payload) -> Result<Grafted, GraftError> {
    session()?.inject(target, payload)
}

/// Spawns a program in a suspended state using the global session.
#[cfg(feature = "driver-frida")]
pub fn spawn_suspended(launch: impl Into<Launch>) -> Result<SuspendedLaunch, GraftError> {
    session()?.spawn_suspended(launch)
}
