//! Program plus arguments.

use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};

/// A program and its arguments, kept unquoted.
///
/// The [`Display`](fmt::Display) form is the shell-style rendering used in logs: arguments
/// containing whitespace are wrapped in double quotes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandLine {
    /// A command line running `program` without arguments.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append a path argument, optionally behind a flag prefix such as `/I` or `/OUT:`.
    pub fn path_arg(self, prefix: &str, path: &Path) -> Self {
        self.arg(format!("{prefix}{}", path.display()))
    }

    /// The program to execute.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// The arguments, in order.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Arguments as OS strings, for `std::process::Command::args`.
    pub fn os_args(&self) -> impl Iterator<Item = &OsStr> {
        self.args.iter().map(OsStr::new)
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, part: &str) -> fmt::Result {
    if part.contains(char::is_whitespace) {
        write!(f, "\"{part}\"")
    } else {
        f.write_str(part)
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_quoted(f, &self.program.display().to_string())?;
        for arg in &self.args {
            f.write_str(" ")?;
            write_quoted(f, arg)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_quotes_whitespace() {
        let cmd = CommandLine::new("/usr/bin/clang++")
            .arg("-c")
            .path_arg("", Path::new("/tmp/my file.cpp"));
        assert_eq!(cmd.to_string(), "/usr/bin/clang++ -c \"/tmp/my file.cpp\"");
        assert_eq!(cmd.args().len(), 2);
    }
}
