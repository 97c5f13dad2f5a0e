// src/commands/inspect.rs

//! Inspection commands - check a recipe and show what a cook would do
//!
//! None of these touch the filesystem beyond reading the recipe and profile.

use super::load_profile;
use crate::cli::ProfileArgs;
use anyhow::{Context, Result};
use skillet::recipe::kitchen::{CMake, LocalCacheProvider};
use skillet::recipe::resolve::resolve;
use skillet::recipe::validate::validate;
use skillet::recipe::{parse_recipe_file, validate_recipe, Kitchen, KitchenConfig, Recipe};
use std::path::Path;
use std::sync::Arc;

fn load_recipe(recipe_path: &str) -> Result<Recipe> {
    let path = Path::new(recipe_path);
    parse_recipe_file(path).with_context(|| format!("Failed to parse recipe: {}", path.display()))
}

/// Validate a recipe, then the profile's settings against it
pub fn cmd_validate(recipe_path: &str, profile_args: &ProfileArgs) -> Result<()> {
    let recipe = load_recipe(recipe_path)?;
    println!("Recipe: {} version {}", recipe.package.name, recipe.package.version);

    let warnings = validate_recipe(&recipe).with_context(|| "Recipe validation failed")?;
    for warning in &warnings {
        println!("Warning: {}", warning);
    }

    let profile = load_profile(profile_args)?;
    let settings = profile.settings().with_context(|| "Invalid profile settings")?;
    validate(&recipe, &settings)
        .with_context(|| format!("{} cannot be built for {}", recipe.reference(), settings))?;

    println!("Settings: {}", settings);
    if warnings.is_empty() {
        println!("[OK] No issues found");
    } else {
        println!("[OK] {} warning(s)", warnings.len());
    }
    Ok(())
}

/// Print the resolved requirement set, in resolution order
pub fn cmd_requirements(recipe_path: &str, profile_args: &ProfileArgs) -> Result<()> {
    let recipe = load_recipe(recipe_path)?;
    let profile = load_profile(profile_args)?;
    let settings = profile.settings().with_context(|| "Invalid profile settings")?;

    let requirements = resolve(&recipe, &settings)
        .with_context(|| format!("Failed to resolve requirements of {}", recipe.reference()))?;

    println!("Requirements of {} for {}:", recipe.reference(), settings.os);
    for requirement in &requirements {
        println!("  {:<24} ({})", requirement.to_string(), requirement.kind.as_str());
    }
    Ok(())
}

/// Print the planned layout, final options and package id
pub fn cmd_layout(recipe_path: &str, profile_args: &ProfileArgs, root: &str) -> Result<()> {
    let recipe = load_recipe(recipe_path)?;
    let profile = load_profile(profile_args)?;

    // Planning never runs the build system, so it need not be on PATH
    let config = KitchenConfig::for_root(root);
    let provider = LocalCacheProvider::new(config.dependency_cache.clone());
    let kitchen = Kitchen::new(
        config,
        Arc::new(CMake::new("cmake", "git")),
        Arc::new(provider),
    );
    let plan = kitchen
        .plan(&recipe, &profile)
        .with_context(|| format!("Failed to plan {}", recipe.reference()))?;

    let config = &plan.configuration;
    let layout = &plan.layout;
    println!("{} ({})", config.reference(), config.settings());
    println!("  Package id:  {}", config.package_id());
    println!("  Options:     {}", config.options());
    if let Some(std) = config.cppstd() {
        println!("  C++ std:     {}", std);
    }
    println!("  Source:      {}", layout.source.display());
    println!("  Build:       {}", layout.build.display());
    println!("  Generators:  {}", layout.generators.display());
    println!("  Install:     {}", layout.install.display());
    println!("  Multi-config: {}", layout.multi_config);
    Ok(())
}
