use std::sync::Arc;

use crate::{GraftDriver, GraftError, InjectionId, Launch, Payload, Target};

/// Session over an injection driver.
///
/// A session is a cheaply clonable handle; clones share the same driver.
/// All operations go through the driver trait, so a session works the same
/// over any backend.
#[derive(Clone)]
pub struct GraftSession {
    driver: Arc<dyn GraftDriver>,
}

impl std::fmt::Debug for GraftSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("GraftSession(..)")
    }
}

impl GraftSession {
    /// Creates a session over the given driver.
    pub fn new(driver: impl GraftDriver + 'static) -> Self {
        Self {
            driver: Arc::new(driver),
        }
    }

    /// Spawns a program in a suspended state.
    ///
    /// The returned handle must be resumed (with or without an injection)
    /// for the program to run.
    pub fn spawn_suspended(&self, launch: impl Into<Launch>) -> Result<SuspendedLaunch, GraftError> {
        let launch = launch.into();
        let target = self.driver.spawn_suspended(&launch)?;

        Ok(SuspendedLaunch {
            session: self.clone(),
            target,
        })
    }

    /// Injects a payload into an already-running process.
    pub fn inject(&self, target: Target, payload: &Payload) -> Result<Grafted, GraftError> {
        let id = self.driver.inject(target, payload)?;

        Ok(Grafted {
            session: self.clone(),
            target,
            id,
        })
    }

    /// Spawns a program suspended, injects the payload and resumes it.
    ///
    /// The payload's entrypoint runs before any user code of the program.
    pub fn launch(
        &self,
        launch: impl Into<Launch>,
        payload: &Payload,
    ) -> Result<Grafted, GraftError> {
        let launch = launch.into();
        let (target, id) = self.driver.launch(&launch, payload)?;

        Ok(Grafted {
            session: self.clone(),
            target,
            id,
        })
    }
}

/// A program spawned in a suspended state, before any user code has run.
#[derive(Debug)]
pub struct SuspendedLaunch {
    session: GraftSession,
    target: Target,
}

impl SuspendedLaunch {
    /// Returns the target process handle.
    pub fn target(&self) -> Target {
        self.target
    }

    /// Injects a payload and resumes the program.
    ///
    /// When the resume fails the injection is demonitored best effort
    /// before the resume error is returned.
    pub fn inject(self, payload: &Payload) -> Result<Grafted, GraftError> {
        let grafted = self.session.inject(self.target, payload)?;

        if let Err(err) = self.session.driver.resume(self.target) {
            if let Err(demonitor_err) = self.session.driver.demonitor(grafted.id) {
                tracing::error!(
                    ?demonitor_err,
                    pid = self.target.pid(),
                    "failed to demonitor after resume failure"
                );
            }
            return Err(err);
        }

        Ok(grafted)
    }

    /// Resumes the program without injecting anything.
    pub fn resume(self) -> Result<Target, GraftError> {
        self.session.driver.resume(self.target)?;
        Ok(self.target)
    }
}

/// A payload injected into a live process.
///
/// The handle does not tear anything down on drop; the injected library
/// stays loaded until the process exits or unloads it.
#[derive(Debug)]
pub struct Grafted {
    session: GraftSession,
    target: Target,
    id: InjectionId,
}

impl Grafted {
    /// Returns the target process handle.
    pub fn target(&self) -> Target {
        self.target
    }

    /// Returns the identifier the runtime assigned to this injection.
    pub fn injection_id(&self) -> InjectionId {
        self.id
    }

    /// Stops monitoring the injection, leaving the library loaded.
    pub fn demonitor(self) -> Result<(), GraftError> {
        self.session.driver.demonitor(self.id)
    }
}
