// src/lib.rs

//! Skillet: a build-recipe engine for native C++ libraries
//!
//! A recipe describes one library: the platforms and language standard it
//! needs, its build options, and its third-party requirements. Skillet takes a
//! recipe and a profile (the target environment) through a fixed lifecycle:
//!
//! - Validate the settings against the recipe's platform and standard constraints
//! - Resolve the requirement set, platform-conditional groups included
//! - Mutate the options for the platform and the shared/static choice
//! - Plan the source/build/install layout and write toolchain descriptors
//! - Configure, build and (unless skipped) test with the native build system
//! - Install the artifacts and publish package info for consumers
//!
//! Every failure is fatal and names the phase it came from.

pub mod recipe;
pub mod settings;
mod error;

pub use error::{
    BuildError, ConfigurationError, Error, PackagingError, ResolutionError, Result,
    TestFailureError,
};
pub use recipe::{
    parse_recipe, parse_recipe_file, BuildConfiguration, CookResult, Kitchen, KitchenConfig,
    PackageInfo, Phase, Recipe,
};
pub use settings::{Os, Profile, Settings};
