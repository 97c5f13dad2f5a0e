// src/recipe/kitchen/config.rs

//! Configuration and result types for the Kitchen

use super::cook::BuildState;
use crate::recipe::format::{Recipe, Requirement, RequirementKind};
use crate::recipe::layout::Layout;
use crate::recipe::options::Options;
use crate::recipe::package::PackageInfo;
use crate::settings::{CppStd, Settings};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::PathBuf;

/// Lifecycle phases, in the order the Kitchen runs them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Validate,
    Requirements,
    ConfigOptions,
    Configure,
    Layout,
    Generate,
    Source,
    Build,
    Package,
    PackageInfo,
}

impl Phase {
    /// Every phase in execution order
    pub const ORDER: [Phase; 10] = [
        Phase::Validate,
        Phase::Requirements,
        Phase::ConfigOptions,
        Phase::Configure,
        Phase::Layout,
        Phase::Generate,
        Phase::Source,
        Phase::Build,
        Phase::Package,
        Phase::PackageInfo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Validate => "validate",
            Phase::Requirements => "requirements",
            Phase::ConfigOptions => "config_options",
            Phase::Configure => "configure",
            Phase::Layout => "layout",
            Phase::Generate => "generate",
            Phase::Source => "source",
            Phase::Build => "build",
            Phase::Package => "package",
            Phase::PackageInfo => "package_info",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Configuration for the Kitchen
#[derive(Debug, Clone)]
pub struct KitchenConfig {
    /// Workspace root: sources live here, build and package folders go under it
    pub root: PathBuf,
    /// Directory where the dependency provider keeps packages
    pub dependency_cache: PathBuf,
    /// Number of parallel build jobs
    pub jobs: u32,
    /// Clone the recipe's source when the workspace has none
    pub fetch_sources: bool,
}

impl Default for KitchenConfig {
    fn default() -> Self {
        let jobs = std::thread::available_parallelism()
            .map(|p| p.get() as u32)
            .unwrap_or(4);

        let dependency_cache = dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("skillet")
            .join("deps");

        Self {
            root: PathBuf::from("."),
            dependency_cache,
            jobs,
            fetch_sources: true,
        }
    }
}

impl KitchenConfig {
    /// Default configuration rooted at the given workspace
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }
}

/// Resolved snapshot that drives toolchain generation and the build
///
/// Created once the settings are validated, the requirements resolved and the
/// options mutated. There are no setters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildConfiguration {
    name: String,
    version: String,
    settings: Settings,
    options: Options,
    requirements: Vec<Requirement>,
    cppstd: Option<CppStd>,
    package_id: String,
}

impl BuildConfiguration {
    pub fn new(
        recipe: &Recipe,
        settings: Settings,
        options: Options,
        requirements: Vec<Requirement>,
    ) -> Self {
        let cppstd = settings.compiler.cppstd.or_else(|| {
            recipe
                .settings
                .min_cppstd
                .as_deref()
                .and_then(|s| s.parse().ok())
        });
        let package_id = compute_package_id(recipe, &settings, &options, &requirements);

        Self {
            name: recipe.package.name.clone(),
            version: recipe.package.version.clone(),
            settings,
            options,
            requirements,
            cppstd,
            package_id,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn reference(&self) -> String {
        format!("{}/{}", self.name, self.version)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// All resolved requirements, test-only ones included
    pub fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }

    /// Requirements propagated to consumers
    pub fn runtime_requirements(&self) -> impl Iterator<Item = &Requirement> {
        self.requirements
            .iter()
            .filter(|r| r.kind == RequirementKind::Runtime)
    }

    /// Language standard to build with: explicit setting, else recipe minimum
    pub fn cppstd(&self) -> Option<CppStd> {
        self.cppstd
    }

    /// Deterministic identifier of this binary configuration
    pub fn package_id(&self) -> &str {
        &self.package_id
    }
}

/// Hash of everything that makes one binary differ from another
///
/// Test-only requirements do not change the produced library and are left
/// out.
fn compute_package_id(
    recipe: &Recipe,
    settings: &Settings,
    options: &Options,
    requirements: &[Requirement],
) -> String {
    #[derive(Serialize)]
    struct IdInput<'a> {
        reference: String,
        settings: &'a Settings,
        options: &'a Options,
        requires: Vec<String>,
    }

    let input = IdInput {
        reference: recipe.reference(),
        settings,
        options,
        requires: requirements
            .iter()
            .filter(|r| r.kind == RequirementKind::Runtime)
            .map(|r| r.to_string())
            .collect(),
    };

    // Serializing plain data structs to JSON cannot fail
    let bytes = serde_json::to_vec(&input).unwrap_or_default();
    hex::encode(Sha256::digest(&bytes))
}

/// Result of cooking a recipe
#[derive(Debug)]
pub struct CookResult {
    /// Published package contract
    pub package_info: PackageInfo,
    /// Snapshot the build ran with
    pub configuration: BuildConfiguration,
    pub layout: Layout,
    /// Orchestrator state transitions, `Configured` through `Built`
    pub transitions: Vec<BuildState>,
    /// Test executable that ran, if the test gate was open
    pub test_executable: Option<PathBuf>,
    /// Generated toolchain descriptor
    pub toolchain_file: PathBuf,
    /// Build log
    pub log: String,
    /// Recipe warnings
    pub warnings: Vec<String>,
}
