#![warn(missing_docs)]
//! `geno-toolchain` - compiler invocation for the Geno editor.
//!
//! The crate turns a source path into a [`CommandLine`] for a concrete [`CompilerFlavor`],
//! launches it through a [`ProcessLauncher`] on a background thread and announces the exit
//! code to every subscriber as a [`CompilationDone`] event.
//!
//! ```rust,no_run
//! use geno_toolchain::{Compiler, CompilerFlavor};
//!
//! let mut compiler = Compiler::new(CompilerFlavor::clang("/opt/llvm"));
//! compiler.subscribe(|done| println!("{} exited with {}", done.path.display(), done.exit_code));
//! compiler.compile("main.cpp")?;
//! compiler.wait_for_jobs();
//! # Ok::<(), geno_toolchain::CompileError>(())
//! ```

mod command;
mod compiler;
mod flavor;
mod launcher;

pub use command::CommandLine;
pub use compiler::{CompilationCallback, CompilationDone, CompileError, Compiler};
pub use flavor::{CompilerFlavor, MsvcPaths};
pub use launcher::{ProcessHandle, ProcessLauncher, SystemLauncher};
