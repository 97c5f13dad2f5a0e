// src/commands/cook.rs

//! Create command - cook a package from a recipe

use super::load_profile;
use crate::cli::ProfileArgs;
use anyhow::{Context, Result};
use skillet::recipe::{parse_recipe_file, Kitchen, KitchenConfig};
use std::path::{Path, PathBuf};
use tracing::info;

/// Cook a package from a recipe
///
/// # Arguments
/// * `recipe_path` - Path to the recipe file
/// * `profile_args` - Profile file and overrides
/// * `root` - Workspace root holding the sources
/// * `deps` - Dependency cache directory (None = user cache dir)
/// * `jobs` - Number of parallel build jobs (None = auto)
/// * `no_source` - Never clone the recipe's source repository
pub fn cmd_create(
    recipe_path: &str,
    profile_args: &ProfileArgs,
    root: &str,
    deps: Option<&str>,
    jobs: Option<u32>,
    no_source: bool,
) -> Result<()> {
    let recipe_path = Path::new(recipe_path);

    println!("Reading recipe: {}", recipe_path.display());
    let recipe = parse_recipe_file(recipe_path)
        .with_context(|| format!("Failed to parse recipe: {}", recipe_path.display()))?;
    println!("Recipe: {} version {}", recipe.package.name, recipe.package.version);

    let profile = load_profile(profile_args)?;

    let mut config = KitchenConfig::for_root(root);
    if let Some(dir) = deps {
        config.dependency_cache = PathBuf::from(dir);
    }
    if let Some(j) = jobs {
        config.jobs = j;
    }
    config.fetch_sources = !no_source;

    let kitchen = Kitchen::with_defaults(config.clone())
        .with_context(|| "Failed to set up the build system")?;

    println!("Cooking with {} parallel jobs...", config.jobs);
    if profile.skip_tests() {
        println!("  - Tests skipped (tools.build:skip_test)");
    }

    let result = kitchen
        .cook(&recipe, &profile)
        .with_context(|| format!("Failed to cook {}", recipe.package.name))?;

    let info = &result.package_info;
    println!("\n[COMPLETE] Cooked: {}/{}", info.name, info.version);
    println!("  Package id: {}", info.package_id);
    println!("  Libraries:  {}", info.libraries.join(", "));
    println!("  Install:    {}", result.layout.install.display());
    if let Some(test) = &result.test_executable {
        println!("  Tested:     {}", test.display());
    }

    if !result.warnings.is_empty() {
        println!("\nRecipe warnings:");
        for warning in &result.warnings {
            println!("  - {}", warning);
        }
    }

    info!(
        "Successfully cooked {} to {}",
        recipe.package.name,
        result.layout.install.display()
    );

    Ok(())
}
