//! Command lines for the supported compilers.

use crate::command::CommandLine;
use crate::compiler::CompileError;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

#[cfg(target_pointer_width = "64")]
const MSVC_HOST: &str = "Hostx64";
#[cfg(not(target_pointer_width = "64"))]
const MSVC_HOST: &str = "Hostx86";

/// Install locations an MSVC command line needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MsvcPaths {
    /// `VC/Tools/MSVC/<version>` of a Visual Studio install.
    pub msvc_dir: PathBuf,
    /// `Windows Kits/10/Include/<sdk version>`.
    pub sdk_include_dir: PathBuf,
    /// `Windows Kits/10/Lib/<sdk version>`.
    pub sdk_lib_dir: PathBuf,
}

impl MsvcPaths {
    /// Locate the newest Visual Studio (through `vswhere.exe`) and the newest Windows 10 SDK
    /// that has x64 libraries.
    pub fn discover() -> Result<Self, CompileError> {
        let program_files = env::var_os("ProgramFiles(x86)")
            .map(PathBuf::from)
            .ok_or_else(|| CompileError::ToolchainNotFound("ProgramFiles(x86) is not set".into()))?;

        let vswhere = program_files
            .join("Microsoft Visual Studio")
            .join("Installer")
            .join("vswhere.exe");
        let output = Command::new(&vswhere)
            .args(["-latest", "-property", "installationPath"])
            .output()
            .map_err(|e| CompileError::ToolchainNotFound(format!("{}: {e}", vswhere.display())))?;
        if !output.status.success() {
            return Err(CompileError::ToolchainNotFound(
                "vswhere found no Visual Studio installation".into(),
            ));
        }
        let install = PathBuf::from(String::from_utf8_lossy(&output.stdout).trim());
        let msvc_dir = newest_versioned_dir(&install.join("VC").join("Tools").join("MSVC"), |_| true)
            .ok_or_else(|| CompileError::ToolchainNotFound("no MSVC tools installed".into()))?;

        let kits = program_files.join("Windows Kits").join("10");
        let sdk_version = newest_versioned_dir(&kits.join("Lib"), |dir| {
            dir.join("um").join("x64").join("kernel32.lib").exists()
        })
        .and_then(|dir| dir.file_name().map(PathBuf::from))
        .ok_or_else(|| CompileError::ToolchainNotFound("no Windows 10 SDK found".into()))?;

        Ok(Self {
            msvc_dir,
            sdk_include_dir: kits.join("Include").join(&sdk_version),
            sdk_lib_dir: kits.join("Lib").join(&sdk_version),
        })
    }

    fn tool(&self, name: &str) -> PathBuf {
        self.msvc_dir
            .join("bin")
            .join(MSVC_HOST)
            .join("x64")
            .join(name)
    }
}

/// Numeric components of a dotted version such as `14.38.33130`.
fn parse_version(name: &str) -> Option<Vec<u64>> {
    name.split('.').map(|part| part.parse().ok()).collect()
}

/// The subdirectory of `dir` with the highest dotted-version name that passes `accept`.
/// Entries whose names are not versions are ignored.
fn newest_versioned_dir(dir: &Path, accept: impl Fn(&Path) -> bool) -> Option<PathBuf> {
    fs::read_dir(dir)
        .ok()?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_dir() && accept(path))
        .filter_map(|path| {
            let version = parse_version(path.file_name()?.to_str()?)?;
            Some((version, path))
        })
        .max_by(|a, b| a.0.cmp(&b.0))
        .map(|(_, path)| path)
}

/// A compiler family and where it is installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompilerFlavor {
    /// LLVM clang; `root` contains `bin/clang++`.
    Clang {
        /// LLVM install root.
        root: PathBuf,
    },
    /// Microsoft `cl.exe` / `link.exe`.
    Msvc(MsvcPaths),
}

impl CompilerFlavor {
    /// A clang installed under `root`.
    pub fn clang(root: impl Into<PathBuf>) -> Self {
        Self::Clang { root: root.into() }
    }

    /// Where clang writes the executable for `input`: the input path with an `exe`
    /// extension on Windows and without an extension elsewhere.
    pub fn clang_output_for(input: &Path) -> PathBuf {
        input.with_extension(if cfg!(windows) { "exe" } else { "" })
    }

    /// The command line compiling `input`.
    pub fn compile_command(&self, input: &Path) -> CommandLine {
        match self {
            Self::Clang { root } => CommandLine::new(root.join("bin").join("clang++"))
                .arg("-c")
                .path_arg("", input)
                .arg("-o")
                .path_arg("", &Self::clang_output_for(input)),
            Self::Msvc(paths) => CommandLine::new(paths.tool("cl.exe"))
                .arg("/c")
                .arg("/nologo")
                .arg("/EHsc")
                .path_arg("/I", &paths.msvc_dir.join("include"))
                .path_arg("/I", &paths.sdk_include_dir.join("ucrt"))
                .path_arg("", input),
        }
    }

    /// The command line linking `inputs` into a console application at `output`.
    ///
    /// Only MSVC has a separate link step; clang compiles straight to an executable.
    pub fn link_command(&self, inputs: &[PathBuf], output: &Path) -> Option<CommandLine> {
        let Self::Msvc(paths) = self else {
            return None;
        };
        let mut cmd = CommandLine::new(paths.tool("link.exe"))
            .arg("/NOLOGO")
            .arg("/MACHINE:x64")
            .path_arg("/LIBPATH:", &paths.msvc_dir.join("lib").join("x64"))
            .path_arg("/LIBPATH:", &paths.sdk_lib_dir.join("um").join("x64"))
            .path_arg("/LIBPATH:", &paths.sdk_lib_dir.join("ucrt").join("x64"))
            .arg("/SUBSYSTEM:CONSOLE");
        for input in inputs {
            cmd = cmd.path_arg("", input);
        }
        Some(cmd.path_arg("/OUT:", output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn msvc() -> CompilerFlavor {
        CompilerFlavor::Msvc(MsvcPaths {
            msvc_dir: PathBuf::from("vc"),
            sdk_include_dir: PathBuf::from("inc"),
            sdk_lib_dir: PathBuf::from("lib"),
        })
    }

    #[test]
    fn test_clang_command() {
        let cmd = CompilerFlavor::clang("llvm").compile_command(Path::new("src/main.cpp"));
        assert_eq!(cmd.program(), Path::new("llvm").join("bin").join("clang++"));
        let output = CompilerFlavor::clang_output_for(Path::new("src/main.cpp"));
        assert_eq!(
            cmd.args(),
            &[
                "-c".to_string(),
                "src/main.cpp".to_string(),
                "-o".to_string(),
                output.display().to_string(),
            ]
        );
        assert_eq!(output.extension().is_some(), cfg!(windows));
    }

    #[test]
    fn test_msvc_compile_command() {
        let cmd = msvc().compile_command(Path::new("a.cpp"));
        assert!(cmd.program().ends_with("cl.exe"));
        assert_eq!(&cmd.args()[..3], &["/c", "/nologo", "/EHsc"]);
        assert!(cmd.args()[3].starts_with("/I"));
        assert!(cmd.args()[4].starts_with("/I"));
        assert_eq!(cmd.args()[5], "a.cpp");
    }

    #[test]
    fn test_newest_versioned_dir_compares_numerically() {
        let root = tempfile::tempdir().unwrap();
        for name in ["14.9.1", "14.38.33130", "14.100.0", "latest"] {
            fs::create_dir(root.path().join(name)).unwrap();
        }
        fs::write(root.path().join("99.0"), "").unwrap();

        let newest = newest_versioned_dir(root.path(), |_| true).unwrap();
        assert_eq!(newest, root.path().join("14.100.0"));

        let filtered = newest_versioned_dir(root.path(), |dir| !dir.ends_with("14.100.0")).unwrap();
        assert_eq!(filtered, root.path().join("14.38.33130"));

        assert_eq!(parse_version("10.0.22621.0"), Some(vec![10, 0, 22621, 0]));
        assert_eq!(parse_version("v1.2"), None);
    }

    #[test]
    fn test_msvc_link_command() {
        let cmd = msvc()
            .link_command(&[PathBuf::from("a.obj"), PathBuf::from("b.obj")], Path::new("app.exe"))
            .unwrap();
        assert!(cmd.program().ends_with("link.exe"));
        let args = cmd.args();
        assert_eq!(&args[..2], &["/NOLOGO", "/MACHINE:x64"]);
        assert_eq!(args.iter().filter(|a| a.starts_with("/LIBPATH:")).count(), 3);
        assert_eq!(&args[5..], &["/SUBSYSTEM:CONSOLE", "a.obj", "b.obj", "/OUT:app.exe"]);
        assert!(CompilerFlavor::clang("x").link_command(&[], Path::new("o")).is_none());
    }
}
