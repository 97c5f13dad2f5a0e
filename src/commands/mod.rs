// src/commands/mod.rs
//! Command handlers for the skillet CLI

mod cook;
mod inspect;

pub use cook::cmd_create;
pub use inspect::{cmd_layout, cmd_requirements, cmd_validate};

use crate::cli::ProfileArgs;
use anyhow::{Context, Result};
use skillet::{Os, Profile};
use std::path::Path;
use tracing::debug;

/// Build a profile from the profile file and command-line overrides
///
/// Overrides are applied after the file, so `-s`, `-o` and `-c` win. A
/// profile that names no operating system targets the host.
pub(crate) fn load_profile(args: &ProfileArgs) -> Result<Profile> {
    let mut profile = match &args.profile {
        Some(path) => Profile::from_file(Path::new(path))
            .with_context(|| format!("Failed to load profile: {}", path))?,
        None => Profile::default(),
    };

    for arg in &args.settings {
        profile
            .set_setting(arg)
            .with_context(|| format!("Invalid setting override: {}", arg))?;
    }
    for arg in &args.options {
        profile
            .set_option(arg)
            .with_context(|| format!("Invalid option override: {}", arg))?;
    }
    for arg in &args.conf {
        profile
            .set_conf(arg)
            .with_context(|| format!("Invalid conf override: {}", arg))?;
    }

    if !profile.settings.contains_key("os") {
        debug!("No os in profile, targeting host {}", Os::host());
        profile.settings.insert("os".to_string(), Os::host().to_string());
    }

    Ok(profile)
}
