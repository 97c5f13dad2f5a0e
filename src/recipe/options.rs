// src/recipe/options.rs

//! Option mutation during the configure phases
//!
//! Options are immutable values: every rule returns a new [`Options`] rather
//! than writing through a shared reference. Two rules run, in order:
//!
//! 1. `config_options`: on Windows the position-independent-code option is
//!    removed; on every other platform the recipe's libc variant is pinned
//!    into the settings snapshot.
//! 2. `configure`: when `shared` is enabled the position-independent-code
//!    option is removed.
//!
//! Removing an option that is already absent is a no-op.

use crate::error::ConfigurationError;
use crate::recipe::format::{OptionValue, Recipe};
use crate::settings::{Os, Settings};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// Position-independent-code option name
pub const FPIC: &str = "fPIC";

/// Shared-library option name
pub const SHARED: &str = "shared";

/// An immutable set of option values
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Options {
    values: BTreeMap<String, OptionValue>,
}

impl Options {
    /// Build the initial option set: recipe defaults with user overrides applied
    ///
    /// Every override must name a declared option and use one of its allowed
    /// values.
    pub fn from_recipe(
        recipe: &Recipe,
        overrides: &BTreeMap<String, OptionValue>,
    ) -> Result<Self, ConfigurationError> {
        let mut values = recipe.default_options();

        for (name, value) in overrides {
            let decl = recipe
                .options
                .get(name)
                .ok_or_else(|| ConfigurationError::InvalidOption {
                    name: name.clone(),
                    reason: format!("not declared by {}", recipe.reference()),
                })?;

            if !decl.allows(value) {
                let allowed: Vec<String> = decl.values.iter().map(|v| v.to_string()).collect();
                return Err(ConfigurationError::InvalidOption {
                    name: name.clone(),
                    reason: format!("'{}' is not one of [{}]", value, allowed.join(", ")),
                });
            }

            values.insert(name.clone(), value.clone());
        }

        Ok(Self { values })
    }

    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Whether the option is present and truthy
    pub fn is_enabled(&self, name: &str) -> bool {
        self.values.get(name).is_some_and(OptionValue::is_truthy)
    }

    /// A copy of this set without the named option
    pub fn without(&self, name: &str) -> Self {
        let mut values = self.values.clone();
        values.remove(name);
        Self { values }
    }

    /// A copy of this set with the named option set
    pub fn with(&self, name: &str, value: OptionValue) -> Self {
        let mut values = self.values.clone();
        values.insert(name.to_string(), value);
        Self { values }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &OptionValue)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(String, OptionValue)> for Options {
    fn from_iter<I: IntoIterator<Item = (String, OptionValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .values
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        write!(f, "{}", parts.join(" "))
    }
}

/// Options and settings after the platform-scoped rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configured {
    pub options: Options,
    pub settings: Settings,
}

/// Platform-scoped rule: drop fPIC on Windows, pin libc elsewhere
pub fn config_options(recipe: &Recipe, options: &Options, settings: &Settings) -> Configured {
    if settings.os == Os::Windows {
        debug!("Removing {} option on Windows", FPIC);
        return Configured {
            options: options.without(FPIC),
            settings: settings.clone(),
        };
    }

    let mut settings = settings.clone();
    if let Some(libc) = &recipe.settings.libc {
        debug!("Pinning libc variant {} for {}", libc, settings.os);
        settings.libc = Some(libc.clone());
    }

    Configured {
        options: options.clone(),
        settings,
    }
}

/// Option-scoped rule: shared libraries imply position-independent code
pub fn configure(options: &Options) -> Options {
    if options.is_enabled(SHARED) {
        debug!("Removing {} option for shared build", FPIC);
        return options.without(FPIC);
    }
    options.clone()
}

/// Apply both rules in order
pub fn adjust(recipe: &Recipe, options: &Options, settings: &Settings) -> Configured {
    let configured = config_options(recipe, options, settings);
    Configured {
        options: configure(&configured.options),
        settings: configured.settings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::parse_recipe;
    use crate::settings::Libc;

    fn recipe() -> Recipe {
        parse_recipe(
            r#"
[package]
name = "libaura"
version = "2024.1.0"

[settings]
libc = { name = "glibc", version = "2.35" }

[options]
shared = { values = [true, false], default = false }
fPIC = { values = [true, false], default = true }
"#,
        )
        .unwrap()
    }

    fn overrides(pairs: &[(&str, OptionValue)]) -> BTreeMap<String, OptionValue> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let options = Options::from_recipe(&recipe(), &BTreeMap::new()).unwrap();
        assert!(!options.is_enabled(SHARED));
        assert!(options.is_enabled(FPIC));
        assert_eq!(options.len(), 2);
    }

    #[test]
    fn test_unknown_override_rejected() {
        let err = Options::from_recipe(
            &recipe(),
            &overrides(&[("with_ssl", OptionValue::Bool(true))]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidOption { .. }));
    }

    #[test]
    fn test_override_outside_domain_rejected() {
        let err = Options::from_recipe(
            &recipe(),
            &overrides(&[(SHARED, OptionValue::Str("sometimes".to_string()))]),
        )
        .unwrap_err();
        assert!(err.to_string().contains("sometimes"));
    }

    #[test]
    fn test_windows_removes_fpic() {
        let recipe = recipe();
        let options = Options::from_recipe(&recipe, &BTreeMap::new()).unwrap();
        let configured = adjust(&recipe, &options, &Settings::for_os(Os::Windows));
        assert!(!configured.options.contains(FPIC));
        assert!(configured.settings.libc.is_none());
    }

    #[test]
    fn test_linux_pins_libc_and_keeps_fpic() {
        let recipe = recipe();
        let options = Options::from_recipe(&recipe, &BTreeMap::new()).unwrap();
        let configured = adjust(&recipe, &options, &Settings::for_os(Os::Linux));
        assert!(configured.options.contains(FPIC));
        assert_eq!(
            configured.settings.libc,
            Some(Libc {
                name: "glibc".to_string(),
                version: "2.35".to_string(),
            })
        );
    }

    #[test]
    fn test_shared_removes_fpic_regardless_of_value() {
        let recipe = recipe();
        for fpic in [true, false] {
            for os in [Os::Linux, Os::Windows] {
                let options = Options::from_recipe(
                    &recipe,
                    &overrides(&[
                        (SHARED, OptionValue::Bool(true)),
                        (FPIC, OptionValue::Bool(fpic)),
                    ]),
                )
                .unwrap();
                let configured = adjust(&recipe, &options, &Settings::for_os(os));
                assert!(!configured.options.contains(FPIC));
                assert!(configured.options.is_enabled(SHARED));
            }
        }
    }

    #[test]
    fn test_removing_absent_option_is_noop() {
        let options: Options = [(SHARED.to_string(), OptionValue::Bool(true))]
            .into_iter()
            .collect();
        assert_eq!(configure(&options), options);
    }

    #[test]
    fn test_mutation_returns_new_value() {
        let recipe = recipe();
        let options = Options::from_recipe(&recipe, &BTreeMap::new()).unwrap();
        let _ = adjust(&recipe, &options, &Settings::for_os(Os::Windows));
        assert!(options.contains(FPIC));
    }
}
