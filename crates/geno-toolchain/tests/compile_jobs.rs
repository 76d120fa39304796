use geno_toolchain::{
    CommandLine, CompilationDone, CompileError, Compiler, CompilerFlavor, ProcessHandle,
    ProcessLauncher,
};
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use std::io;
use std::path::Path;
use std::sync::Arc;

struct Exited(i32);

impl ProcessHandle for Exited {
    fn wait(&mut self) -> io::Result<i32> {
        Ok(self.0)
    }
}

/// Records every launched command line and "exits" with a fixed code.
#[derive(Default)]
struct FakeLauncher {
    exit_code: i32,
    fail: bool,
    launched: Mutex<Vec<CommandLine>>,
}

impl ProcessLauncher for FakeLauncher {
    fn launch(&self, command: &CommandLine) -> io::Result<Box<dyn ProcessHandle>> {
        self.launched.lock().push(command.clone());
        if self.fail {
            return Err(io::Error::new(io::ErrorKind::NotFound, "no compiler"));
        }
        Ok(Box::new(Exited(self.exit_code)))
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn collect(compiler: &mut Compiler) -> Arc<Mutex<Vec<CompilationDone>>> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    compiler.subscribe(move |done| sink.lock().push(done.clone()));
    events
}

#[test]
fn test_missing_input_is_reported_without_a_job() {
    init_tracing();
    let launcher = Arc::new(FakeLauncher::default());
    let mut compiler = Compiler::with_launcher(CompilerFlavor::clang("llvm"), launcher.clone());
    let events = collect(&mut compiler);

    let err = compiler.compile("/definitely/not/here.cpp").unwrap_err();
    assert!(matches!(err, CompileError::MissingInput(_)));
    compiler.wait_for_jobs();
    assert!(launcher.launched.lock().is_empty());
    assert!(events.lock().is_empty());
}

#[test]
fn test_completion_is_published_to_every_subscriber() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("main.cpp");
    std::fs::write(&source, "int main() { return 0; }\n").unwrap();

    let launcher = Arc::new(FakeLauncher {
        exit_code: 3,
        ..FakeLauncher::default()
    });
    let mut compiler = Compiler::with_launcher(CompilerFlavor::clang("llvm"), launcher.clone());
    let first = collect(&mut compiler);
    let second = collect(&mut compiler);

    compiler.compile(&source).unwrap();
    compiler.compile(&source).unwrap();
    compiler.wait_for_jobs();
    assert_eq!(compiler.pending_jobs(), 0);

    let expected = CompilationDone {
        path: source.clone(),
        exit_code: 3,
    };
    assert_eq!(*first.lock(), vec![expected.clone(), expected.clone()]);
    assert_eq!(*second.lock(), vec![expected.clone(), expected]);

    let launched = launcher.launched.lock();
    assert_eq!(launched.len(), 2);
    assert_eq!(launched[0].args()[1], source.display().to_string());
    assert!(launched[0].program().ends_with(Path::new("bin").join("clang++")));
}

#[test]
fn test_launch_failure_publishes_nothing() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("a.cpp");
    std::fs::write(&source, "").unwrap();

    let launcher = Arc::new(FakeLauncher {
        fail: true,
        ..FakeLauncher::default()
    });
    let mut compiler = Compiler::with_launcher(CompilerFlavor::clang("llvm"), launcher.clone());
    let events = collect(&mut compiler);

    compiler.compile(&source).unwrap();
    compiler.wait_for_jobs();
    assert_eq!(launcher.launched.lock().len(), 1);
    assert!(events.lock().is_empty());
}
