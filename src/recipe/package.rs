// src/recipe/package.rs

//! Packaging: install the build and publish what consumers link against

use crate::error::PackagingError;
use crate::recipe::format::Recipe;
use crate::recipe::kitchen::{BuildConfiguration, BuildSystem, Built};
use crate::settings::Os;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// File name of the published package info in the install root
pub const PACKAGE_INFO_FILE: &str = "package_info.json";

/// The contract published to consumers of the built package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageInfo {
    pub name: String,
    pub version: String,
    pub package_id: String,
    /// Libraries a consumer must link against
    pub libraries: Vec<String>,
    /// Runtime requirements consumers inherit (`name/version`)
    pub requires: Vec<String>,
    pub include_dirs: Vec<PathBuf>,
    pub lib_dirs: Vec<PathBuf>,
    pub bin_dirs: Vec<PathBuf>,
}

impl PackageInfo {
    /// Read a previously published package info
    pub fn load(install_root: &Path) -> std::io::Result<Self> {
        let content = fs::read_to_string(install_root.join(PACKAGE_INFO_FILE))?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}

/// File names a library may have been installed under
fn artifact_names(library: &str, os: Os) -> Vec<String> {
    let exts: &[&str] = match os {
        Os::Windows => &["lib", "dll"],
        Os::Macos => &["a", "dylib"],
        _ => &["a", "so"],
    };

    let mut stems = vec![library.to_string()];
    if os != Os::Windows && !library.starts_with("lib") {
        stems.insert(0, format!("lib{}", library));
    }

    stems
        .iter()
        .flat_map(|stem| exts.iter().map(move |ext| format!("{}.{}", stem, ext)))
        .collect()
}

/// Find the installed artifact for one library
fn find_artifact(library: &str, os: Os, dirs: &[PathBuf]) -> Option<PathBuf> {
    let names = artifact_names(library, os);
    dirs.iter()
        .flat_map(|dir| names.iter().map(move |name| dir.join(name)))
        .find(|path| path.is_file())
}

/// Install the build into the layout's install root and publish package info
///
/// Every library the recipe publishes must have an artifact in one of the
/// install tree's lib or bin directories; a missing one is fatal.
pub fn package(
    recipe: &Recipe,
    config: &BuildConfiguration,
    built: &Built,
    build_system: &dyn BuildSystem,
) -> Result<PackageInfo, PackagingError> {
    let layout = built.layout();

    let output = build_system
        .install(layout)
        .map_err(|e| PackagingError::InstallFailed(e.to_string()))?;
    if !output.succeeded() {
        return Err(PackagingError::InstallFailed(format!(
            "install exited with code {:?}: {}",
            output.code,
            output.stderr.trim()
        )));
    }

    let info_section = &recipe.package_info;
    let resolve_dirs = |dirs: &[String]| -> Vec<PathBuf> {
        dirs.iter().map(|d| layout.install.join(d)).collect()
    };
    let include_dirs = resolve_dirs(&info_section.includedirs);
    let lib_dirs = resolve_dirs(&info_section.libdirs);
    let bin_dirs = resolve_dirs(&info_section.bindirs);

    let search: Vec<PathBuf> = lib_dirs.iter().chain(bin_dirs.iter()).cloned().collect();
    let os = config.settings().os;
    for library in &info_section.libs {
        match find_artifact(library, os, &search) {
            Some(path) => info!("Packaged {}", path.display()),
            None => {
                let searched: Vec<String> =
                    search.iter().map(|d| d.display().to_string()).collect();
                return Err(PackagingError::MissingArtifact {
                    library: library.clone(),
                    searched: searched.join(", "),
                });
            }
        }
    }

    Ok(PackageInfo {
        name: config.name().to_string(),
        version: config.version().to_string(),
        package_id: config.package_id().to_string(),
        libraries: info_section.libs.clone(),
        requires: config.runtime_requirements().map(|r| r.to_string()).collect(),
        include_dirs,
        lib_dirs,
        bin_dirs,
    })
}

/// Write the package info into the install root
pub fn publish(info: &PackageInfo, install_root: &Path) -> Result<PathBuf, PackagingError> {
    fs::create_dir_all(install_root).map_err(|e| PackagingError::Publish(e.to_string()))?;
    let path = install_root.join(PACKAGE_INFO_FILE);
    let json = serde_json::to_string_pretty(info)
        .map_err(|e| PackagingError::Publish(e.to_string()))?;
    fs::write(&path, json).map_err(|e| PackagingError::Publish(e.to_string()))?;

    info!(
        "Published {}/{}: libs [{}]",
        info.name,
        info.version,
        info.libraries.join(", ")
    );
    Ok(path)
}
