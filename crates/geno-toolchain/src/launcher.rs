//! Process launching capability.

use crate::command::CommandLine;
use std::io;
use std::process::{Child, Command, Stdio};

/// A launched process that can be waited on.
pub trait ProcessHandle: Send {
    /// Block until the process exits and return its exit code.
    fn wait(&mut self) -> io::Result<i32>;
}

/// Starts processes for command lines.
///
/// [`SystemLauncher`] spawns real child processes; tests substitute their own launcher.
pub trait ProcessLauncher: Send + Sync {
    /// Start `command`. An error means the process never ran.
    fn launch(&self, command: &CommandLine) -> io::Result<Box<dyn ProcessHandle>>;
}

/// Launches child processes with inherited stdout/stderr and no stdin.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLauncher;

struct ChildHandle(Child);

impl ProcessHandle for ChildHandle {
    fn wait(&mut self) -> io::Result<i32> {
        let status = self.0.wait()?;
        // Killed by a signal: no exit code on unix.
        Ok(status.code().unwrap_or(-1))
    }
}

impl ProcessLauncher for SystemLauncher {
    fn launch(&self, command: &CommandLine) -> io::Result<Box<dyn ProcessHandle>> {
        let child = Command::new(command.program())
            .args(command.os_args())
            .stdin(Stdio::null())
            .spawn()?;
        Ok(Box::new(ChildHandle(child)))
    }
}
