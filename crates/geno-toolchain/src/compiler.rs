//! Background compile jobs.

use crate::flavor::CompilerFlavor;
use crate::launcher::{ProcessLauncher, SystemLauncher};
use parking_lot::Mutex;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

/// Published when a compile job's process exits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationDone {
    /// The compiled source file.
    pub path: PathBuf,
    /// Exit code of the compiler process.
    pub exit_code: i32,
}

/// Subscriber callback for [`CompilationDone`] events. Called on the job's thread.
pub type CompilationCallback = Box<dyn FnMut(&CompilationDone) + Send>;

/// Compile errors reported to the caller of [`Compiler::compile`].
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    /// The input file does not exist. No job was started.
    #[error("failed to compile {}: file does not exist", .0.display())]
    MissingInput(PathBuf),
    /// The job thread could not be created.
    #[error("failed to start compile job: {0}")]
    Spawn(#[source] io::Error),
    /// A toolchain install could not be located.
    #[error("toolchain not found: {0}")]
    ToolchainNotFound(String),
}

type Subscribers = Arc<Mutex<Vec<CompilationCallback>>>;

/// Runs compile jobs for one [`CompilerFlavor`].
///
/// Every [`compile`](Self::compile) call starts an independent job. Jobs are not
/// cancellable; completion is observed through [`subscribe`](Self::subscribe), and
/// delivery order across concurrent jobs is unspecified.
pub struct Compiler {
    flavor: CompilerFlavor,
    launcher: Arc<dyn ProcessLauncher>,
    subscribers: Subscribers,
    jobs: Vec<JoinHandle<()>>,
}

impl std::fmt::Debug for Compiler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compiler")
            .field("flavor", &self.flavor)
            .field("subscriber_count", &self.subscribers.lock().len())
            .field("job_count", &self.jobs.len())
            .finish()
    }
}

impl Compiler {
    /// A compiler launching real child processes.
    pub fn new(flavor: CompilerFlavor) -> Self {
        Self::with_launcher(flavor, Arc::new(SystemLauncher))
    }

    /// A compiler launching processes through `launcher`.
    pub fn with_launcher(flavor: CompilerFlavor, launcher: Arc<dyn ProcessLauncher>) -> Self {
        Self {
            flavor,
            launcher,
            subscribers: Arc::new(Mutex::new(Vec::new())),
            jobs: Vec::new(),
        }
    }

    /// The compiler family in use.
    pub fn flavor(&self) -> &CompilerFlavor {
        &self.flavor
    }

    /// Register a callback for every future [`CompilationDone`].
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&CompilationDone) + Send + 'static,
    {
        self.subscribers.lock().push(Box::new(callback));
    }

    /// Number of jobs that have not been joined yet.
    pub fn pending_jobs(&self) -> usize {
        self.jobs.iter().filter(|job| !job.is_finished()).count()
    }

    /// Start compiling `path` in the background.
    ///
    /// A missing input fails immediately without starting a job. If the compiler process
    /// cannot be launched the job logs the failure and publishes nothing.
    pub fn compile(&mut self, path: impl AsRef<Path>) -> Result<(), CompileError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(CompileError::MissingInput(path.to_path_buf()));
        }

        self.jobs.retain(|job| !job.is_finished());

        let command = self.flavor.compile_command(path);
        let launcher = Arc::clone(&self.launcher);
        let subscribers = Arc::clone(&self.subscribers);
        let path = path.to_path_buf();
        let job = thread::Builder::new()
            .name("geno-compile".to_string())
            .spawn(move || {
                debug!(command = %command, "launching compiler");
                let exit_code = match launcher.launch(&command).and_then(|mut p| p.wait()) {
                    Ok(code) => code,
                    Err(err) => {
                        warn!(path = %path.display(), error = %err, "compiler did not run");
                        return;
                    }
                };
                debug!(path = %path.display(), exit_code, "compilation finished");
                let done = CompilationDone { path, exit_code };
                for callback in subscribers.lock().iter_mut() {
                    callback(&done);
                }
            })
            .map_err(CompileError::Spawn)?;
        self.jobs.push(job);
        Ok(())
    }

    /// Block until every started job has finished and published.
    pub fn wait_for_jobs(&mut self) {
        for job in self.jobs.drain(..) {
            if job.join().is_err() {
                warn!("compile job panicked");
            }
        }
    }
}
