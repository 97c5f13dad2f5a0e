// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use skillet::recipe::kitchen::{
    BuildSystem, ConfigureRequest, DependencyLocation, DependencyProvider, StepOutput,
};
use skillet::recipe::{parse_recipe, Layout, Recipe, Requirement};
use skillet::{BuildError, Kitchen, KitchenConfig, Profile, ResolutionError};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// The libaura recipe shipped in `recipes/`
pub fn libaura_recipe() -> Recipe {
    parse_recipe(include_str!("../../recipes/libaura.toml")).unwrap()
}

/// Profile for the given OS with option overrides (`shared=True`) and conf
/// knobs (`tools.build:skip_test=True`)
pub fn profile(os: &str, extra: &[&str]) -> Profile {
    let mut profile = Profile::default();
    profile.set_setting(&format!("os={}", os)).unwrap();
    for arg in extra {
        if arg.contains(':') {
            profile.set_conf(arg).unwrap();
        } else {
            profile.set_option(arg).unwrap();
        }
    }
    profile
}

/// Build system that records every call and never spawns a process
///
/// `install` drops empty artifacts for every published library into
/// `<install>/lib` unless `skip_artifacts` is set.
#[derive(Default)]
pub struct MockBuild {
    pub fail_build: bool,
    pub fail_tests: bool,
    pub skip_artifacts: bool,
    pub calls: Mutex<Vec<String>>,
}

impl MockBuild {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

impl BuildSystem for MockBuild {
    fn fetch_source(
        &self,
        url: &str,
        _checkout: Option<&str>,
        dest: &Path,
    ) -> Result<StepOutput, BuildError> {
        self.record(format!("source {}", url));
        fs::create_dir_all(dest).unwrap();
        fs::write(dest.join("CMakeLists.txt"), "project(libaura)\n").unwrap();
        Ok(StepOutput::success())
    }

    fn configure(&self, request: &ConfigureRequest<'_>) -> Result<StepOutput, BuildError> {
        assert!(request.toolchain_file.is_file());
        self.record("configure".to_string());
        Ok(StepOutput::success())
    }

    fn build(&self, _layout: &Layout, _jobs: u32) -> Result<StepOutput, BuildError> {
        self.record("build".to_string());
        if self.fail_build {
            Ok(StepOutput::failure(2, "error: 'format' is not a member of 'std'"))
        } else {
            Ok(StepOutput::success())
        }
    }

    fn run(&self, executable: &Path, _workdir: &Path) -> Result<StepOutput, BuildError> {
        self.record(format!("run {}", executable.display()));
        if self.fail_tests {
            Ok(StepOutput::failure(1, "[  FAILED  ] 1 test"))
        } else {
            Ok(StepOutput::success())
        }
    }

    fn install(&self, layout: &Layout) -> Result<StepOutput, BuildError> {
        self.record("install".to_string());
        if !self.skip_artifacts {
            let lib = layout.install.join("lib");
            fs::create_dir_all(&lib).unwrap();
            for name in ["libaura.a", "libaura.lib"] {
                fs::write(lib.join(name), b"").unwrap();
            }
        }
        Ok(StepOutput::success())
    }
}

/// Provider that hands out cache paths and counts lookups
#[derive(Default)]
pub struct CountingProvider {
    pub root: PathBuf,
    pub lookups: AtomicUsize,
}

impl CountingProvider {
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl DependencyProvider for CountingProvider {
    fn locate(&self, requirement: &Requirement) -> Result<DependencyLocation, ResolutionError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(DependencyLocation::under(
            requirement,
            self.root.join(&requirement.name).join(&requirement.version),
        ))
    }
}

/// A kitchen rooted in a fresh temp dir, wired to the mocks
///
/// Returns the TempDir too - keep it alive to prevent cleanup.
pub fn mock_kitchen(
    build: MockBuild,
) -> (TempDir, Kitchen, Arc<MockBuild>, Arc<CountingProvider>) {
    let temp_dir = tempfile::tempdir().unwrap();
    let build = Arc::new(build);
    let provider = Arc::new(CountingProvider {
        root: temp_dir.path().join("deps"),
        ..Default::default()
    });

    let config = KitchenConfig {
        root: temp_dir.path().join("src"),
        dependency_cache: temp_dir.path().join("deps"),
        jobs: 2,
        fetch_sources: true,
    };
    let kitchen = Kitchen::new(config, build.clone(), provider.clone());

    (temp_dir, kitchen, build, provider)
}
