// src/recipe/kitchen/cook.rs

//! Cook: the build orchestration for a single configuration
//!
//! ```text
//! Configured -> Building -> TestGateOpen   -> Built
//!                        -> TestGateClosed -> Built
//!            (any failure)                 -> Failed
//! ```

use super::build_system::{BuildSystem, ConfigureRequest, StepOutput};
use super::config::BuildConfiguration;
use crate::error::{BuildError, Error, Result, TestFailureError};
use crate::recipe::layout::Layout;
use crate::recipe::toolchain::ToolchainArtifacts;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Orchestrator states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildState {
    Configured,
    Building,
    TestGateOpen,
    TestGateClosed,
    Built,
    Failed,
}

impl BuildState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, BuildState::Built | BuildState::Failed)
    }
}

/// Test gate input: the executable to run, unless tests are skipped
#[derive(Debug, Clone, Copy)]
pub struct TestGate<'a> {
    /// Name of the test executable, if the recipe declares one
    pub executable: Option<&'a str>,
    /// `tools.build:skip_test`
    pub skip: bool,
}

impl TestGate<'_> {
    pub fn is_open(&self) -> bool {
        !self.skip && self.executable.is_some()
    }
}

/// Proof that a build finished; packaging requires one
#[derive(Debug)]
pub struct Built {
    pub(crate) layout: Layout,
    pub(crate) test_executable: Option<PathBuf>,
}

impl Built {
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Test executable that ran, `None` when the gate was closed
    pub fn test_executable(&self) -> Option<&Path> {
        self.test_executable.as_deref()
    }
}

/// A single cook operation
pub struct Cook<'a> {
    build_system: &'a dyn BuildSystem,
    config: &'a BuildConfiguration,
    layout: &'a Layout,
    toolchain: &'a ToolchainArtifacts,
    generator: Option<&'a str>,
    definitions: Vec<(String, String)>,
    state: BuildState,
    transitions: Vec<BuildState>,
    /// Build log accumulator
    pub(super) log: String,
}

impl<'a> Cook<'a> {
    /// Start in `Configured`
    ///
    /// Taking the generated toolchain is what makes this reachable only after
    /// validation and generation succeeded.
    pub fn new(
        build_system: &'a dyn BuildSystem,
        config: &'a BuildConfiguration,
        layout: &'a Layout,
        toolchain: &'a ToolchainArtifacts,
    ) -> Self {
        Self {
            build_system,
            config,
            layout,
            toolchain,
            generator: None,
            definitions: Vec::new(),
            state: BuildState::Configured,
            transitions: vec![BuildState::Configured],
            log: String::new(),
        }
    }

    /// CMake generator and extra cache definitions for the configure step
    pub fn with_configure_args(
        mut self,
        generator: Option<&'a str>,
        definitions: Vec<(String, String)>,
    ) -> Self {
        self.generator = generator;
        self.definitions = definitions;
        self
    }

    pub fn state(&self) -> BuildState {
        self.state
    }

    /// Every state visited so far, starting with `Configured`
    pub fn transitions(&self) -> &[BuildState] {
        &self.transitions
    }

    pub fn log(&self) -> &str {
        &self.log
    }

    fn transition(&mut self, next: BuildState) {
        self.state = next;
        self.transitions.push(next);
    }

    fn fail(&mut self, err: impl Into<Error>) -> Error {
        self.transition(BuildState::Failed);
        err.into()
    }

    /// Run configure, build and (when the gate is open) the tests
    pub fn run(&mut self, gate: TestGate<'_>, jobs: u32) -> Result<Built> {
        if self.state != BuildState::Configured {
            return Err(Error::Build(BuildError {
                step: "build".to_string(),
                code: None,
                detail: format!("cannot start a build from state {:?}", self.state),
            }));
        }

        self.transition(BuildState::Building);
        info!("Building {}", self.config.reference());

        let request = ConfigureRequest {
            layout: self.layout,
            toolchain_file: &self.toolchain.toolchain_file,
            generator: self.generator,
            definitions: self.definitions.clone(),
        };
        let result = self.build_system.configure(&request);
        self.check_step("configure", result)?;

        let result = self.build_system.build(self.layout, jobs);
        self.check_step("build", result)?;

        let test_executable = if gate.is_open() {
            self.transition(BuildState::TestGateOpen);
            let name = gate.executable.unwrap_or_default();
            Some(self.run_tests(name)?)
        } else {
            self.transition(BuildState::TestGateClosed);
            info!("Skipping tests");
            None
        };

        self.transition(BuildState::Built);
        Ok(Built {
            layout: self.layout.clone(),
            test_executable,
        })
    }

    fn run_tests(&mut self, name: &str) -> Result<PathBuf> {
        let executable = self.layout.executable(name);
        info!("Running tests: {}", executable.display());

        let output = match self.build_system.run(&executable, &self.layout.build) {
            Ok(output) => output,
            Err(e) => {
                warn!("Could not start test executable: {}", e);
                return Err(self.fail(TestFailureError {
                    executable: executable.display().to_string(),
                    code: None,
                }));
            }
        };
        self.log_output("test", &output);

        if !output.succeeded() {
            return Err(self.fail(TestFailureError {
                executable: executable.display().to_string(),
                code: output.code,
            }));
        }

        Ok(executable)
    }

    fn check_step(
        &mut self,
        step: &str,
        result: std::result::Result<StepOutput, BuildError>,
    ) -> Result<()> {
        let output = result.map_err(|e| self.fail(e))?;
        self.log_output(step, &output);

        if !output.succeeded() {
            return Err(self.fail(BuildError {
                step: step.to_string(),
                code: output.code,
                detail: output.stderr.trim().to_string(),
            }));
        }
        Ok(())
    }

    fn log_line(&mut self, line: &str) {
        self.log.push_str(line);
        self.log.push('\n');
    }

    /// Log step output (stdout/stderr) with a phase header
    fn log_output(&mut self, step: &str, output: &StepOutput) {
        self.log_line(&format!("=== {} ===", step));
        if !output.stdout.is_empty() {
            self.log.push_str(&output.stdout);
            self.log.push('\n');
        }
        if !output.stderr.is_empty() {
            self.log.push_str(&output.stderr);
            self.log.push('\n');
        }
    }
}
