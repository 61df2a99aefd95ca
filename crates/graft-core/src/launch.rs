use std::{
    ffi::OsStr,
    ops::{Deref, DerefMut},
    process::Command,
};

/// Standard I/O disposition for a spawned program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stdio {
    /// Inherit the parent's standard streams.
    Inherit,
    /// Discard all output. The runtime has no null disposition, so this is
    /// realized as pipes whose output is never read.
    Null,
    /// Create pipes for the standard streams.
    Piped,
}

impl Default for Stdio {
    fn default() -> Self {
        Self::Inherit
    }
}

/// Description of a program to spawn, wrapping [`std::process::Command`].
///
/// The program, arguments, environment and working directory configured on
/// the command are forwarded to the runtime; other `Command` settings are
/// not. Environment variables set on the command become the spawned
/// program's environment, and when none are set the runtime spawns with
/// its default environment.
#[derive(Debug)]
pub struct Launch {
    command: Command,
    stdio: Stdio,
}

impl Launch {
    /// Creates a launch description for the given program.
    pub fn new(program: impl AsRef<OsStr>) -> Self {
        Self {
            command: Command::new(program),
            stdio: Stdio::default(),
        }
    }

    /// Sets the standard I/O disposition.
    pub fn stdio(mut self, stdio: Stdio) -> Self {
        let configure = match stdio {
            Stdio::Inherit => std::process::Stdio::inherit,
            Stdio::Null => std::process::Stdio::null,
            Stdio::Piped => std::process::Stdio::piped,
        };
        self.command.stdin(configure());
        self.command.stdout(configure());
        self.command.stderr(configure());
        self.stdio = stdio;
        self
    }

    /// Returns the standard I/O disposition.
    pub fn stdio_value(&self) -> Stdio {
        self.stdio
    }

    /// Returns the wrapped command.
    pub fn command(&self) -> &Command {
        &self.command
    }

    /// Consumes the launch description and returns the wrapped command,
    /// for spawning the program directly without the runtime.
    pub fn into_command(self) -> Command {
        self.command
    }
}

impl Deref for Launch {
    type Target = Command;

    fn deref(&self) -> &Self::Target {
        &self.command
    }
}

impl DerefMut for Launch {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.command
    }
}

impl From<Command> for Launch {
    fn from(command: Command) -> Self {
        Self {
            command,
            stdio: Stdio::default(),
        }
    }
}

impl From<&str> for Launch {
    fn from(program: &str) -> Self {
        Self::new(program)
    }
}

impl From<&OsStr> for Launch {
    fn from(program: &OsStr) -> Self {
        Self::new(program)
    }
}

impl From<Launch> for Command {
    fn from(launch: Launch) -> Self {
        launch.into_command()
    }
}
