// src/recipe/mod.rs

//! Recipe system for building native libraries from source
//!
//! A recipe declares a library's settings axes, options and third-party
//! requirements, plus what the built package publishes to consumers.
//!
//! # Culinary Terminology
//!
//! - **Recipe**: What to build and how (like a recipe card)
//! - **Profile**: The environment a recipe is cooked for (settings, options, conf)
//! - **Kitchen**: Runs the lifecycle phases in order
//! - **Cook**: Configure, build and test one configuration
//!
//! # Example Recipe
//!
//! ```toml
//! [package]
//! name = "libaura"
//! version = "2024.1.0"
//!
//! [settings]
//! supported_os = ["Windows", "Linux"]
//! min_cppstd = "20"
//!
//! [options]
//! shared = { values = [true, false], default = false }
//! fPIC = { values = [true, false], default = true }
//!
//! [[requires]]
//! name = "boost"
//! version = "1.83.0"
//!
//! [[conditional]]
//! os = "Linux"
//! requires = [{ name = "glib", version = "2.78.1" }]
//!
//! [build]
//! test_executable = "libaura_test"
//!
//! [package_info]
//! libs = ["libaura"]
//! ```

mod format;
pub mod kitchen;
pub mod layout;
pub mod options;
pub mod package;
pub mod parser;
pub mod resolve;
pub mod toolchain;
pub mod validate;

pub use format::{
    BuildSection, ConditionalGroup, OptionDecl, OptionValue, PackageInfoSection, PackageSection,
    PackageType, Recipe, Requirement, RequirementKind, SettingsSection, SourceSection,
};
pub use kitchen::{BuildConfiguration, BuildPlan, CookResult, Kitchen, KitchenConfig, Phase};
pub use layout::Layout;
pub use options::Options;
pub use package::PackageInfo;
pub use parser::{parse_recipe, parse_recipe_file, validate_recipe};
