//! Core types for the graft injection toolkit.
//!
//! This crate defines the model that crosses the injection boundary
//! ([`Target`], [`Payload`], [`Launch`]), the [`GraftDriver`] seam that
//! injection backends implement, and the [`GraftSession`] handle layer that
//! callers hold. The actual spawn, inject and resume machinery lives in
//! driver crates.

mod driver;
mod error;
mod launch;
mod payload;
mod session;
mod target;

pub use self::{
    driver::{GraftDriver, InjectionId},
    error::GraftError,
    launch::{Launch, Stdio},
    payload::{DEFAULT_ENTRYPOINT, Payload, PayloadSource},
    session::{GraftSession, Grafted, SuspendedLaunch},
    target::Target,
};
