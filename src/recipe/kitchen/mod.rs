// src/recipe/kitchen/mod.rs

//! Kitchen: the lifecycle driver for cooking recipes
//!
//! The Kitchen runs a recipe's phases in a fixed order, each one taking the
//! previous phase's output:
//!
//! 1. **validate**: reject unsupported platform/standard combinations and
//!    invalid option overrides
//! 2. **requirements**: resolve the ordered requirement set
//! 3. **config_options** / **configure**: mutate options
//! 4. **layout**: plan source/build/install folders
//! 5. **generate**: locate dependencies, write toolchain descriptors
//! 6. **source**: clone sources if the workspace has none
//! 7. **build**: configure, build and (gate permitting) test
//! 8. **package** / **package_info**: install and publish
//!
//! Any failure is fatal and stops the lifecycle where it happened. Nothing is
//! retried and no phase is re-entered.

mod build_system;
mod config;
mod cook;
mod provider;

pub use build_system::{BuildSystem, CMake, ConfigureRequest, StepOutput};
pub use config::{BuildConfiguration, CookResult, KitchenConfig, Phase};
pub use cook::{BuildState, Built, Cook, TestGate};
pub use provider::{DependencyLocation, DependencyProvider, LocalCacheProvider};

use crate::error::{BuildError, Error, Result};
use crate::recipe::format::Recipe;
use crate::recipe::layout::{self, Layout};
use crate::recipe::options::{self, Options};
use crate::recipe::{package, resolve, toolchain, validate};
use crate::settings::Profile;
use std::sync::Arc;
use tracing::{debug, info};

/// Output of the planning phases (validate through layout)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPlan {
    pub configuration: BuildConfiguration,
    pub layout: Layout,
}

/// The Kitchen: where recipes are cooked
pub struct Kitchen {
    pub(crate) config: KitchenConfig,
    build_system: Arc<dyn BuildSystem>,
    provider: Arc<dyn DependencyProvider>,
}

impl Kitchen {
    /// Create a Kitchen with explicit collaborators
    pub fn new(
        config: KitchenConfig,
        build_system: Arc<dyn BuildSystem>,
        provider: Arc<dyn DependencyProvider>,
    ) -> Self {
        Self {
            config,
            build_system,
            provider,
        }
    }

    /// Create a Kitchen using CMake from `PATH` and the local dependency cache
    pub fn with_defaults(config: KitchenConfig) -> Result<Self> {
        let build_system = CMake::detect()?;
        let provider = LocalCacheProvider::new(config.dependency_cache.clone());
        Ok(Self::new(config, Arc::new(build_system), Arc::new(provider)))
    }

    pub fn config(&self) -> &KitchenConfig {
        &self.config
    }

    /// Run the planning phases without touching the filesystem
    pub fn plan(&self, recipe: &Recipe, profile: &Profile) -> Result<BuildPlan> {
        self.plan_traced(recipe, profile, &mut Vec::new())
    }

    /// Like [`plan`](Self::plan), recording each completed phase
    pub fn plan_traced(
        &self,
        recipe: &Recipe,
        profile: &Profile,
        trace: &mut Vec<Phase>,
    ) -> Result<BuildPlan> {
        let settings = profile.settings()?;

        validate::validate(recipe, &settings)?;
        // Overrides are checked here so a bad option never reaches resolution
        let initial = Options::from_recipe(recipe, &profile.options)?;
        trace.push(Phase::Validate);

        let requirements = resolve::resolve(recipe, &settings)?;
        debug!(
            "Requirements: {}",
            requirements
                .iter()
                .map(|r| r.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
        trace.push(Phase::Requirements);

        let configured = options::config_options(recipe, &initial, &settings);
        trace.push(Phase::ConfigOptions);

        let final_options = options::configure(&configured.options);
        trace.push(Phase::Configure);

        let settings = configured.settings;
        let layout = layout::plan(&self.config.root, &settings);
        trace.push(Phase::Layout);

        let configuration =
            BuildConfiguration::new(recipe, settings, final_options, requirements);
        info!(
            "Planned {} ({}) with options [{}]",
            configuration.reference(),
            configuration.settings(),
            configuration.options()
        );

        Ok(BuildPlan {
            configuration,
            layout,
        })
    }

    /// Cook a recipe: run every phase and return the published package info
    pub fn cook(&self, recipe: &Recipe, profile: &Profile) -> Result<CookResult> {
        self.cook_traced(recipe, profile, &mut Vec::new())
    }

    /// Like [`cook`](Self::cook), recording each completed phase
    ///
    /// On failure the trace holds exactly the phases that finished before it.
    pub fn cook_traced(
        &self,
        recipe: &Recipe,
        profile: &Profile,
        trace: &mut Vec<Phase>,
    ) -> Result<CookResult> {
        info!("Cooking {}", recipe.reference());
        let warnings = crate::recipe::validate_recipe(recipe)?;

        let BuildPlan {
            configuration,
            layout,
        } = self.plan_traced(recipe, profile, trace)?;

        let artifacts = toolchain::generate(&configuration, &layout, self.provider.as_ref())?;
        trace.push(Phase::Generate);

        self.source(recipe, &layout)?;
        trace.push(Phase::Source);

        let gate = TestGate {
            executable: recipe.build.test_executable.as_deref(),
            skip: profile.skip_tests(),
        };
        let definitions = recipe
            .build
            .definitions
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        let mut cook = Cook::new(
            self.build_system.as_ref(),
            &configuration,
            &layout,
            &artifacts,
        )
        .with_configure_args(recipe.build.generator.as_deref(), definitions);
        let built = cook.run(gate, self.config.jobs)?;
        let transitions = cook.transitions().to_vec();
        let log = cook.log;
        trace.push(Phase::Build);

        let package_info =
            package::package(recipe, &configuration, &built, self.build_system.as_ref())?;
        trace.push(Phase::Package);

        package::publish(&package_info, &layout.install)?;
        trace.push(Phase::PackageInfo);

        info!(
            "Cooked {} into {}",
            configuration.reference(),
            layout.install.display()
        );

        Ok(CookResult {
            package_info,
            transitions,
            test_executable: built.test_executable().map(|p| p.to_path_buf()),
            toolchain_file: artifacts.toolchain_file,
            log,
            warnings,
            configuration,
            layout,
        })
    }

    /// Clone the recipe's sources unless the workspace already has them
    fn source(&self, recipe: &Recipe, layout: &Layout) -> Result<()> {
        let Some(source) = &recipe.source else {
            return Ok(());
        };

        if !self.config.fetch_sources || layout.source.join("CMakeLists.txt").exists() {
            debug!("Sources present in {}", layout.source.display());
            return Ok(());
        }

        let output = self.build_system.fetch_source(
            &source.git,
            source.checkout.as_deref(),
            &layout.source,
        )?;

        if !output.succeeded() {
            return Err(Error::Build(BuildError {
                step: "source".to_string(),
                code: output.code,
                detail: output.stderr.trim().to_string(),
            }));
        }
        Ok(())
    }
}
