// src/error.rs

//! Error types for the recipe engine
//!
//! Every lifecycle failure is fatal. Each phase has its own error type so the
//! caller can match on the kind, and the top-level [`Error`] forwards the
//! inner message unchanged.

use thiserror::Error;

/// Rejected platform, compiler, standard or option combination
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// Operating system outside the recipe's supported set
    #[error("{message}")]
    UnsupportedPlatform { os: String, message: String },

    /// Compiler cannot provide the recipe's minimum language standard
    #[error("Current cppstd ({current}) is lower than the required C++ standard ({required})")]
    UnsupportedStandard { current: String, required: String },

    /// Option override that the recipe does not declare or does not allow
    #[error("Invalid option '{name}': {reason}")]
    InvalidOption { name: String, reason: String },

    /// Setting value that cannot be interpreted
    #[error("Invalid setting '{name}': {reason}")]
    InvalidSetting { name: String, reason: String },
}

/// Requirement set that cannot be resolved
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    /// Same dependency name declared by two applicable entries
    #[error("Requirement '{name}' is declared more than once ({first} and {second})")]
    Collision {
        name: String,
        first: String,
        second: String,
    },

    /// Requirement that cannot be located or is malformed
    #[error("Cannot resolve requirement '{name}': {reason}")]
    Unresolvable { name: String, reason: String },
}

/// The native build system reported a failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{step} step failed with exit code {code:?}: {detail}")]
pub struct BuildError {
    pub step: String,
    pub code: Option<i32>,
    pub detail: String,
}

/// The test executable reported a failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Test executable {executable} failed with exit code {code:?}")]
pub struct TestFailureError {
    pub executable: String,
    pub code: Option<i32>,
}

/// The install step did not produce what the recipe publishes
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PackagingError {
    /// A published library has no artifact in the install tree
    #[error("Missing artifact for library '{library}' under {searched}")]
    MissingArtifact { library: String, searched: String },

    /// Install step failed
    #[error("Install failed: {0}")]
    InstallFailed(String),

    /// Package info could not be written
    #[error("Failed to publish package info: {0}")]
    Publish(String),
}

/// Top-level error for the recipe engine
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    TestFailure(#[from] TestFailureError),

    #[error(transparent)]
    Packaging(#[from] PackagingError),

    /// Recipe or profile could not be parsed
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Filesystem error outside of a specific phase contract
    #[error("I/O error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err.to_string())
    }
}

/// Result type alias for the recipe engine
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error_surfaces_verbatim() {
        let err: Error = ConfigurationError::UnsupportedPlatform {
            os: "Macos".to_string(),
            message: "Only Windows and Linux are supported".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "Only Windows and Linux are supported");
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_build_error_display() {
        let err = BuildError {
            step: "build".to_string(),
            code: Some(2),
            detail: "make: *** [all] Error 2".to_string(),
        };
        assert!(err.to_string().starts_with("build step failed with exit code Some(2)"));
    }
}
