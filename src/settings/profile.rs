// src/settings/profile.rs

//! Profile files: the environment inputs for one invocation
//!
//! ```toml
//! [settings]
//! os = "Linux"
//! arch = "x86_64"
//! build_type = "Release"
//! compiler = "gcc"
//! "compiler.version" = "13"
//! "compiler.cppstd" = "20"
//!
//! [options]
//! shared = true
//!
//! [conf]
//! "tools.build:skip_test" = true
//! ```

use super::{Os, Settings};
use crate::error::{ConfigurationError, Error, Result};
use crate::recipe::OptionValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Configuration knob that closes the test gate
pub const SKIP_TEST_CONF: &str = "tools.build:skip_test";

/// Settings, option overrides and configuration knobs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub settings: BTreeMap<String, String>,

    #[serde(default)]
    pub options: BTreeMap<String, OptionValue>,

    #[serde(default)]
    pub conf: BTreeMap<String, OptionValue>,
}

impl Profile {
    /// Parse a profile from a TOML string
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::ParseError(format!("Invalid profile: {}", e)))
    }

    /// Parse a profile from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::IoError(format!("Failed to read profile file: {}", e)))?;

        Self::parse(&content)
    }

    /// Split a `key=value` argument
    fn split_assignment(arg: &str) -> Result<(&str, &str)> {
        arg.split_once('=')
            .map(|(k, v)| (k.trim(), v.trim()))
            .filter(|(k, _)| !k.is_empty())
            .ok_or_else(|| Error::ParseError(format!("Expected key=value, got '{}'", arg)))
    }

    /// Override a setting from a `key=value` argument
    pub fn set_setting(&mut self, arg: &str) -> Result<()> {
        let (key, value) = Self::split_assignment(arg)?;
        self.settings.insert(key.to_string(), value.to_string());
        Ok(())
    }

    /// Override an option from a `key=value` argument
    pub fn set_option(&mut self, arg: &str) -> Result<()> {
        let (key, value) = Self::split_assignment(arg)?;
        self.options
            .insert(key.to_string(), OptionValue::from_arg(value));
        Ok(())
    }

    /// Override a configuration knob from a `key=value` argument
    pub fn set_conf(&mut self, arg: &str) -> Result<()> {
        let (key, value) = Self::split_assignment(arg)?;
        self.conf.insert(key.to_string(), OptionValue::from_arg(value));
        Ok(())
    }

    /// Build the settings snapshot
    ///
    /// Starts from the defaults for the profile's operating system, then
    /// applies every entry in key order so that `compiler` is applied before
    /// `compiler.version`. The operating system must be given.
    pub fn settings(&self) -> std::result::Result<Settings, ConfigurationError> {
        let os: Os = self
            .settings
            .get("os")
            .ok_or_else(|| ConfigurationError::InvalidSetting {
                name: "os".to_string(),
                reason: "the profile does not name an operating system".to_string(),
            })?
            .parse()?;
        let mut settings = Settings::for_os(os);

        for (key, value) in &self.settings {
            if key != "os" {
                settings.set(key, value)?;
            }
        }

        Ok(settings)
    }

    /// Whether the test gate is closed
    pub fn skip_tests(&self) -> bool {
        self.conf
            .get(SKIP_TEST_CONF)
            .map(OptionValue::is_truthy)
            .unwrap_or(false)
    }
}
