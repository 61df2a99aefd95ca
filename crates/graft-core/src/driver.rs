use crate::{GraftError, Launch, Payload, Target};

/// Identifier assigned by the runtime to a monitored injection.
///
/// The value `0` is reserved as the "nothing to monitor" sentinel and is
/// never assigned to a live injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InjectionId(pub u32);

impl std::fmt::Display for InjectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A trait for implementing an injection driver.
///
/// A driver owns a connection to an instrumentation runtime and performs
/// the actual spawn, inject, resume and demonitor work. Drivers are shared
/// behind [`GraftSession`](crate::GraftSession) and must be safe to call
/// from multiple threads.
pub trait GraftDriver: Send + Sync {
    /// Spawns a program in a suspended state.
    ///
    /// No user code runs in the child until it is resumed.
    fn spawn_suspended(&self, launch: &Launch) -> Result<Target, GraftError>;

    /// Resumes a process that was spawned suspended.
    fn resume(&self, target: Target) -> Result<(), GraftError>;

    /// Injects a payload into a running process.
    fn inject(&self, target: Target, payload: &Payload) -> Result<InjectionId, GraftError>;

    /// Spawns a program suspended, injects the payload and resumes it as
    /// one logical operation.
    fn launch(&self, launch: &Launch, payload: &Payload)
        -> Result<(Target, InjectionId), GraftError>;

    /// Stops monitoring an injection.
    ///
    /// The injected library stays loaded. Passing the sentinel id `0`
    /// returns `Ok` without reaching the runtime.
    fn demonitor(&self, id: InjectionId) -> Result<(), GraftError>;
}
