// src/recipe/kitchen/provider.rs

//! Locating resolved requirements on disk

use crate::error::ResolutionError;
use crate::recipe::format::Requirement;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Where a resolved dependency lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyLocation {
    pub requirement: Requirement,
    pub root: PathBuf,
    pub include_dir: PathBuf,
    pub lib_dir: PathBuf,
    pub bin_dir: PathBuf,
}

impl DependencyLocation {
    /// Standard `include`/`lib`/`bin` layout under a root
    pub fn under(requirement: &Requirement, root: PathBuf) -> Self {
        Self {
            requirement: requirement.clone(),
            include_dir: root.join("include"),
            lib_dir: root.join("lib"),
            bin_dir: root.join("bin"),
            root,
        }
    }
}

/// Trait for the package manager that fetches and stores dependencies
///
/// Resolution itself is pure; this is where the outside world comes in. The
/// Kitchen asks the provider for each resolved requirement while generating
/// the toolchain, so the descriptors point at real locations.
pub trait DependencyProvider: Send + Sync {
    /// Locate (fetching if needed) one requirement
    fn locate(&self, requirement: &Requirement) -> Result<DependencyLocation, ResolutionError>;
}

/// Dependencies stored as `<root>/<name>/<version>`
#[derive(Debug, Clone)]
pub struct LocalCacheProvider {
    root: PathBuf,
    /// Fail when the dependency directory does not exist
    require_present: bool,
}

impl LocalCacheProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            require_present: false,
        }
    }

    /// Only accept dependencies that are already in the cache
    pub fn strict(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            require_present: true,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl DependencyProvider for LocalCacheProvider {
    fn locate(&self, requirement: &Requirement) -> Result<DependencyLocation, ResolutionError> {
        let dir = self.root.join(&requirement.name).join(&requirement.version);

        if self.require_present && !dir.is_dir() {
            return Err(ResolutionError::Unresolvable {
                name: requirement.name.clone(),
                reason: format!("not found in dependency cache at {}", dir.display()),
            });
        }

        Ok(DependencyLocation::under(requirement, dir))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_cache_layout() {
        let provider = LocalCacheProvider::new("/cache");
        let location = provider
            .locate(&Requirement::runtime("boost", "1.83.0"))
            .unwrap();
        assert_eq!(location.root, PathBuf::from("/cache/boost/1.83.0"));
        assert_eq!(location.include_dir, PathBuf::from("/cache/boost/1.83.0/include"));
        assert_eq!(location.lib_dir, PathBuf::from("/cache/boost/1.83.0/lib"));
    }

    #[test]
    fn test_strict_cache_requires_directory() {
        let temp = tempfile::tempdir().unwrap();
        let provider = LocalCacheProvider::strict(temp.path());
        let req = Requirement::runtime("zlib", "1.3");

        assert!(matches!(
            provider.locate(&req),
            Err(ResolutionError::Unresolvable { .. })
        ));

        std::fs::create_dir_all(temp.path().join("zlib/1.3")).unwrap();
        assert!(provider.locate(&req).is_ok());
    }
}
