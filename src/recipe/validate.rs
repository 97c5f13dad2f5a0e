// src/recipe/validate.rs

//! Configuration validation: the first lifecycle phase
//!
//! Rejects platform and compiler combinations the recipe cannot build for.
//! Runs before requirement resolution and option mutation; a failure here
//! ends the invocation with nothing else executed.

use crate::error::ConfigurationError;
use crate::recipe::format::Recipe;
use crate::settings::{CppStd, Os, Settings};
use tracing::debug;

/// Check the settings against the recipe's platform and standard constraints
pub fn validate(recipe: &Recipe, settings: &Settings) -> Result<(), ConfigurationError> {
    check_platform(recipe, settings)?;

    if let Some(min) = &recipe.settings.min_cppstd {
        let required: CppStd = min.parse()?;
        check_min_cppstd(settings, required)?;
    }

    if let Some(generator) = &recipe.build.generator {
        check_generator(generator, settings.os)?;
    }

    debug!("Settings accepted for {}: {}", recipe.reference(), settings);
    Ok(())
}

fn check_platform(recipe: &Recipe, settings: &Settings) -> Result<(), ConfigurationError> {
    let supported = &recipe.settings.supported_os;
    if supported.is_empty() || supported.contains(&settings.os) {
        return Ok(());
    }

    Err(ConfigurationError::UnsupportedPlatform {
        os: settings.os.to_string(),
        message: recipe.unsupported_os_message(),
    })
}

/// Whether a CMake generator keeps every build type in one build folder
pub fn is_multi_config_generator(generator: &str) -> bool {
    generator.starts_with("Visual Studio")
        || generator == "Ninja Multi-Config"
        || generator == "Xcode"
}

/// The layout is multi-config on Windows only, so the generator has to agree
fn check_generator(generator: &str, os: Os) -> Result<(), ConfigurationError> {
    let windows = os == Os::Windows;
    if is_multi_config_generator(generator) == windows {
        return Ok(());
    }

    let expected = if windows { "multi" } else { "single" };
    Err(ConfigurationError::InvalidSetting {
        name: "build.generator".to_string(),
        reason: format!(
            "{} needs a {}-configuration generator, got '{}'",
            os, expected, generator
        ),
    })
}

/// Ensure the compiler builds with at least the given standard
///
/// An explicit `compiler.cppstd` is compared directly. Without one, the
/// compiler version must be able to provide the standard at all.
pub fn check_min_cppstd(settings: &Settings, required: CppStd) -> Result<(), ConfigurationError> {
    let compiler = &settings.compiler;

    let current = match compiler.cppstd {
        Some(explicit) => explicit,
        None => compiler.max_cppstd().ok_or_else(|| ConfigurationError::InvalidSetting {
            name: "compiler.version".to_string(),
            reason: format!(
                "cannot determine the C++ standards supported by {} {}",
                compiler.kind, compiler.version
            ),
        })?,
    };

    // gnu20 satisfies a minimum of 20
    if current.year() < required.year() {
        return Err(ConfigurationError::UnsupportedStandard {
            current: current.to_string(),
            required: required.to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::parse_recipe;
    use crate::settings::{Compiler, CompilerKind, Os};

    fn recipe() -> Recipe {
        parse_recipe(
            r#"
[package]
name = "libaura"
version = "2024.1.0"

[settings]
supported_os = ["Windows", "Linux"]
min_cppstd = "20"
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_supported_platforms_pass() {
        let recipe = recipe();
        for os in [Os::Linux, Os::Windows] {
            let settings = Settings::for_os(os).with_cppstd(CppStd::CXX20);
            assert!(validate(&recipe, &settings).is_ok());
        }
    }

    #[test]
    fn test_unsupported_platform() {
        let err = validate(&recipe(), &Settings::for_os(Os::Macos)).unwrap_err();
        assert_eq!(err.to_string(), "Only Windows and Linux are supported");
        assert!(matches!(err, ConfigurationError::UnsupportedPlatform { .. }));
    }

    #[test]
    fn test_platform_checked_before_standard() {
        let settings = Settings::for_os(Os::Macos).with_cppstd(CppStd::CXX11);
        assert!(matches!(
            validate(&recipe(), &settings),
            Err(ConfigurationError::UnsupportedPlatform { .. })
        ));
    }

    #[test]
    fn test_explicit_cppstd_too_low() {
        let settings = Settings::for_os(Os::Linux).with_cppstd(CppStd::CXX17);
        let err = validate(&recipe(), &settings).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::UnsupportedStandard {
                current: "17".to_string(),
                required: "20".to_string(),
            }
        );
    }

    #[test]
    fn test_old_compiler_without_cppstd() {
        let settings = Settings::for_os(Os::Linux)
            .with_compiler(Compiler::new(CompilerKind::Gcc, "7"));
        assert!(matches!(
            validate(&recipe(), &settings),
            Err(ConfigurationError::UnsupportedStandard { .. })
        ));
    }

    #[test]
    fn test_default_compiler_satisfies_standard() {
        assert!(validate(&recipe(), &Settings::for_os(Os::Linux)).is_ok());
    }

    #[test]
    fn test_generator_must_match_layout() {
        let mut recipe = recipe();
        let windows = Settings::for_os(Os::Windows).with_cppstd(CppStd::CXX20);
        let linux = Settings::for_os(Os::Linux).with_cppstd(CppStd::CXX20);

        recipe.build.generator = Some("Ninja".to_string());
        assert!(validate(&recipe, &linux).is_ok());
        match validate(&recipe, &windows) {
            Err(ConfigurationError::InvalidSetting { name, .. }) => {
                assert_eq!(name, "build.generator")
            }
            other => panic!("expected a generator error, got {:?}", other),
        }

        recipe.build.generator = Some("Visual Studio 17 2022".to_string());
        assert!(validate(&recipe, &windows).is_ok());
        assert!(validate(&recipe, &linux).is_err());

        recipe.build.generator = Some("Ninja Multi-Config".to_string());
        assert!(validate(&recipe, &linux).is_err());
    }

    #[test]
    fn test_gnu_standard_counts() {
        let settings = Settings::for_os(Os::Linux).with_cppstd("gnu20".parse().unwrap());
        assert!(validate(&recipe(), &settings).is_ok());
    }
}
