// src/recipe/kitchen/build_system.rs

//! The native build system the Kitchen drives
//!
//! The recipe engine never compiles anything itself. Every step that touches
//! the library's sources goes through [`BuildSystem`]; [`CMake`] is the
//! default implementation and shells out to `cmake` and `git`.

use crate::error::BuildError;
use crate::recipe::layout::Layout;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

/// Captured output of one external step
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepOutput {
    /// Exit code, `None` if the process was killed by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl StepOutput {
    pub fn success() -> Self {
        Self {
            code: Some(0),
            ..Self::default()
        }
    }

    pub fn failure(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.code == Some(0)
    }
}

/// What the configure step needs to know
#[derive(Debug, Clone)]
pub struct ConfigureRequest<'a> {
    pub layout: &'a Layout,
    pub toolchain_file: &'a Path,
    pub generator: Option<&'a str>,
    pub definitions: Vec<(String, String)>,
}

/// Trait for the external native build system
///
/// Implementations return `Ok` with the exit status for any step that ran,
/// including failing ones; `Err` means the step could not be started.
pub trait BuildSystem: Send + Sync {
    /// Clone the library sources into `dest`
    fn fetch_source(
        &self,
        url: &str,
        checkout: Option<&str>,
        dest: &Path,
    ) -> Result<StepOutput, BuildError>;

    /// Generate the native build tree
    fn configure(&self, request: &ConfigureRequest<'_>) -> Result<StepOutput, BuildError>;

    /// Compile the configured tree
    fn build(&self, layout: &Layout, jobs: u32) -> Result<StepOutput, BuildError>;

    /// Run an executable produced by the build
    fn run(&self, executable: &Path, workdir: &Path) -> Result<StepOutput, BuildError>;

    /// Install the built artifacts into the layout's install root
    fn install(&self, layout: &Layout) -> Result<StepOutput, BuildError>;
}

/// CMake driven through its command-line interface
#[derive(Debug, Clone)]
pub struct CMake {
    program: PathBuf,
    git: PathBuf,
}

impl CMake {
    /// Use explicit `cmake` and `git` executables
    pub fn new(program: impl Into<PathBuf>, git: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            git: git.into(),
        }
    }

    /// Find `cmake` (and `git`, if present) on `PATH`
    pub fn detect() -> Result<Self, BuildError> {
        let program = which::which("cmake").map_err(|e| BuildError {
            step: "detect".to_string(),
            code: None,
            detail: format!("cmake not found on PATH: {}", e),
        })?;
        let git = which::which("git").unwrap_or_else(|_| PathBuf::from("git"));
        debug!("Using cmake at {}", program.display());
        Ok(Self { program, git })
    }

    fn cmake(&self) -> Command {
        Command::new(&self.program)
    }
}

/// Run a command to completion and capture its output
fn run_step(step: &str, mut command: Command) -> Result<StepOutput, BuildError> {
    debug!("Command: {:?}", command);

    let output = command.output().map_err(|e| BuildError {
        step: step.to_string(),
        code: None,
        detail: format!("Failed to run {} step: {}", step, e),
    })?;

    Ok(StepOutput {
        code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

impl BuildSystem for CMake {
    fn fetch_source(
        &self,
        url: &str,
        checkout: Option<&str>,
        dest: &Path,
    ) -> Result<StepOutput, BuildError> {
        info!("Cloning {} into {}", url, dest.display());

        std::fs::create_dir_all(dest).map_err(|e| BuildError {
            step: "source".to_string(),
            code: None,
            detail: format!("Failed to create {}: {}", dest.display(), e),
        })?;

        // The generators folder already exists under `dest`, so clone in place.
        // No named remote is added, so a half-finished attempt never blocks the
        // next one.
        let git = |args: &[&str]| {
            let mut cmd = Command::new(&self.git);
            cmd.arg("-C").arg(dest).args(args);
            cmd
        };
        let mut fetch = vec!["fetch", "--quiet", url];
        fetch.extend(checkout);
        let steps = [
            git(&["init", "--quiet"]),
            git(&fetch),
            git(&["checkout", "--quiet", "FETCH_HEAD"]),
        ];

        let mut output = StepOutput::success();
        for cmd in steps {
            output = run_step("source", cmd)?;
            if !output.succeeded() {
                break;
            }
        }
        Ok(output)
    }

    fn configure(&self, request: &ConfigureRequest<'_>) -> Result<StepOutput, BuildError> {
        let layout = request.layout;
        let mut cmd = self.cmake();
        cmd.arg("-S")
            .arg(&layout.source)
            .arg("-B")
            .arg(&layout.build)
            .arg(format!(
                "-DCMAKE_TOOLCHAIN_FILE={}",
                request.toolchain_file.display()
            ));

        if let Some(generator) = request.generator {
            cmd.arg("-G").arg(generator);
        }
        for (key, value) in &request.definitions {
            cmd.arg(format!("-D{}={}", key, value));
        }

        run_step("configure", cmd)
    }

    fn build(&self, layout: &Layout, jobs: u32) -> Result<StepOutput, BuildError> {
        let mut cmd = self.cmake();
        cmd.arg("--build").arg(&layout.build);
        if layout.multi_config {
            cmd.arg("--config").arg(layout.build_type.as_str());
        }
        cmd.arg("--parallel").arg(jobs.to_string());

        run_step("build", cmd)
    }

    fn run(&self, executable: &Path, workdir: &Path) -> Result<StepOutput, BuildError> {
        let mut cmd = Command::new(executable);
        cmd.current_dir(workdir);
        run_step("test", cmd)
    }

    fn install(&self, layout: &Layout) -> Result<StepOutput, BuildError> {
        let mut cmd = self.cmake();
        cmd.arg("--install")
            .arg(&layout.build)
            .arg("--prefix")
            .arg(&layout.install);
        if layout.multi_config {
            cmd.arg("--config").arg(layout.build_type.as_str());
        }

        run_step("install", cmd)
    }
}
