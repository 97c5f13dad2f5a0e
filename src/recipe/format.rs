// src/recipe/format.rs

//! Recipe file format definitions
//!
//! Recipes are TOML files that declare a native library's settings axes,
//! options, third-party requirements (some of them platform-conditional) and
//! what the built package publishes to its consumers.

use crate::settings::{Libc, Os, Settings};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A complete build recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    /// Package metadata
    pub package: PackageSection,

    /// Settings axes and platform constraints
    #[serde(default)]
    pub settings: SettingsSection,

    /// Declared options with their allowed values and defaults
    #[serde(default)]
    pub options: BTreeMap<String, OptionDecl>,

    /// Where the library's sources come from (optional)
    #[serde(default)]
    pub source: Option<SourceSection>,

    /// Unconditional requirements, in declaration order
    #[serde(default)]
    pub requires: Vec<Requirement>,

    /// Platform-conditional requirement groups, in declaration order
    #[serde(default)]
    pub conditional: Vec<ConditionalGroup>,

    /// Build and test configuration
    #[serde(default)]
    pub build: BuildSection,

    /// What the package publishes to consumers
    #[serde(default)]
    pub package_info: PackageInfoSection,
}

impl Recipe {
    /// `name/version` reference used in logs and package ids
    pub fn reference(&self) -> String {
        format!("{}/{}", self.package.name, self.package.version)
    }

    /// Default values of every declared option
    pub fn default_options(&self) -> BTreeMap<String, OptionValue> {
        self.options
            .iter()
            .map(|(name, decl)| (name.clone(), decl.default.clone()))
            .collect()
    }

    /// Message used when the operating system is not supported
    pub fn unsupported_os_message(&self) -> String {
        if let Some(message) = &self.settings.supported_os_message {
            return message.clone();
        }

        let names: Vec<&str> = self.settings.supported_os.iter().map(Os::as_str).collect();
        match names.as_slice() {
            [] => "No operating systems are supported".to_string(),
            [only] => format!("Only {} is supported", only),
            [rest @ .., last] => format!("Only {} and {} are supported", rest.join(", "), last),
        }
    }
}

/// Package metadata section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageSection {
    /// Package name
    pub name: String,

    /// Package version
    pub version: String,

    #[serde(default)]
    pub package_type: PackageType,

    /// License identifier
    #[serde(default)]
    pub license: Option<String>,

    #[serde(default)]
    pub author: Option<String>,

    /// Upstream URL
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub topics: Vec<String>,
}

/// Kind of artifact the recipe produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PackageType {
    #[default]
    Library,
    StaticLibrary,
    SharedLibrary,
    HeaderLibrary,
    Application,
}

fn default_axes() -> Vec<String> {
    ["os", "compiler", "build_type", "arch"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Settings axes and platform constraints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsSection {
    /// Setting axes the binary varies over
    #[serde(default = "default_axes")]
    pub axes: Vec<String>,

    /// Operating systems the recipe can build for (empty = any)
    #[serde(default)]
    pub supported_os: Vec<Os>,

    /// Custom message for an unsupported operating system
    #[serde(default)]
    pub supported_os_message: Option<String>,

    /// Minimum C++ standard, e.g. `"20"`
    #[serde(default)]
    pub min_cppstd: Option<String>,

    /// C library variant pinned on non-Windows targets
    #[serde(default)]
    pub libc: Option<Libc>,
}

impl Default for SettingsSection {
    fn default() -> Self {
        Self {
            axes: default_axes(),
            supported_os: Vec::new(),
            supported_os_message: None,
            min_cppstd: None,
            libc: None,
        }
    }
}

/// Value of an option or configuration knob
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Str(String),
}

impl OptionValue {
    /// Interpret a command-line value; `True`/`False` in any case are booleans
    pub fn from_arg(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "true" => OptionValue::Bool(true),
            "false" => OptionValue::Bool(false),
            _ => OptionValue::Str(value.to_string()),
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            OptionValue::Bool(b) => *b,
            OptionValue::Str(s) => matches!(s.to_ascii_lowercase().as_str(), "1" | "yes" | "on"),
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Bool(true) => write!(f, "True"),
            OptionValue::Bool(false) => write!(f, "False"),
            OptionValue::Str(s) => write!(f, "{}", s),
        }
    }
}

/// A declared option: its domain and default
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionDecl {
    pub values: Vec<OptionValue>,
    pub default: OptionValue,
}

impl OptionDecl {
    pub fn allows(&self, value: &OptionValue) -> bool {
        self.values.contains(value)
    }
}

/// Git source location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSection {
    /// Repository URL
    pub git: String,

    /// Branch, tag or commit to check out
    #[serde(default)]
    pub checkout: Option<String>,
}

/// When a requirement is needed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequirementKind {
    /// Linked by the library and propagated to consumers
    #[default]
    Runtime,
    /// Only needed to build and run the test executable
    Test,
}

impl RequirementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequirementKind::Runtime => "runtime",
            RequirementKind::Test => "test",
        }
    }
}

/// A named, versioned third-party dependency
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Requirement {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub kind: RequirementKind,
}

impl Requirement {
    pub fn runtime(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            kind: RequirementKind::Runtime,
        }
    }

    pub fn test(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            kind: RequirementKind::Test,
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.version)
    }
}

/// Requirements that only apply on one operating system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionalGroup {
    /// Operating system the group applies to
    pub os: Os,

    #[serde(default)]
    pub requires: Vec<Requirement>,
}

impl ConditionalGroup {
    pub fn applies_to(&self, settings: &Settings) -> bool {
        self.os == settings.os
    }
}

/// Build and test configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildSection {
    /// Name of the test executable produced by the build (without extension)
    #[serde(default)]
    pub test_executable: Option<String>,

    /// CMake generator to request (e.g. "Ninja")
    ///
    /// Must be multi-configuration on Windows and single-configuration
    /// elsewhere, matching the planned layout.
    #[serde(default)]
    pub generator: Option<String>,

    /// Extra cache variables passed to the configure step
    #[serde(default)]
    pub definitions: BTreeMap<String, String>,
}

fn default_includedirs() -> Vec<String> {
    vec!["include".to_string()]
}

fn default_libdirs() -> Vec<String> {
    vec!["lib".to_string()]
}

fn default_bindirs() -> Vec<String> {
    vec!["bin".to_string()]
}

/// What the package publishes to consumers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageInfoSection {
    /// Library names consumers link against
    #[serde(default)]
    pub libs: Vec<String>,

    #[serde(default = "default_includedirs")]
    pub includedirs: Vec<String>,

    #[serde(default = "default_libdirs")]
    pub libdirs: Vec<String>,

    #[serde(default = "default_bindirs")]
    pub bindirs: Vec<String>,
}

impl Default for PackageInfoSection {
    fn default() -> Self {
        Self {
            libs: Vec::new(),
            includedirs: default_includedirs(),
            libdirs: default_libdirs(),
            bindirs: default_bindirs(),
        }
    }
}
