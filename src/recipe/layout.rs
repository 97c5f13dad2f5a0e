// src/recipe/layout.rs

//! Directory layout for one build
//!
//! Multi-configuration generators (the Visual Studio generators used on
//! Windows) put each configuration's outputs in a `<BuildType>` subdirectory
//! of the build folder. Single-configuration generators write outputs
//! directly into the build folder and take the build type from the toolchain.

use crate::settings::{BuildType, Os, Settings};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Source, build, generators and install roots
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Layout {
    /// Library sources (contains the top-level CMakeLists.txt)
    pub source: PathBuf,
    /// CMake binary directory
    pub build: PathBuf,
    /// Where the toolchain and dependency descriptors are written
    pub generators: PathBuf,
    /// Install prefix for the packaged artifacts
    pub install: PathBuf,
    /// The build folder holds every configuration side by side
    pub multi_config: bool,
    /// Build type the layout was planned for
    pub build_type: BuildType,
}

/// Plan the layout for the given settings under `root`
///
/// Pure: identical inputs always give an identical layout.
pub fn plan(root: &Path, settings: &Settings) -> Layout {
    let multi_config = settings.os == Os::Windows;

    let build = root.join("build");
    let generators = build.join("generators");

    Layout {
        source: root.to_path_buf(),
        build,
        generators,
        install: root.join("package"),
        multi_config,
        build_type: settings.build_type,
    }
}

impl Layout {
    /// Directory holding built executables for this build type
    pub fn output_dir(&self) -> PathBuf {
        if self.multi_config {
            self.build.join(self.build_type.as_str())
        } else {
            self.build.clone()
        }
    }

    /// Path of an executable produced by the build
    pub fn executable(&self, name: &str) -> PathBuf {
        let file = if self.multi_config {
            format!("{}.exe", name)
        } else {
            name.to_string()
        };
        self.output_dir().join(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_config_layout() {
        let settings = Settings::for_os(Os::Linux).with_build_type(BuildType::Debug);
        let layout = plan(Path::new("/work"), &settings);
        assert_eq!(layout.source, PathBuf::from("/work"));
        assert_eq!(layout.build, PathBuf::from("/work/build"));
        assert_eq!(layout.generators, PathBuf::from("/work/build/generators"));
        assert_eq!(layout.output_dir(), PathBuf::from("/work/build"));
        assert_eq!(layout.install, PathBuf::from("/work/package"));
        assert!(!layout.multi_config);
    }

    #[test]
    fn test_multi_config_layout() {
        let settings = Settings::for_os(Os::Windows);
        let layout = plan(Path::new("/work"), &settings);
        assert_eq!(layout.build, PathBuf::from("/work/build"));
        assert_eq!(layout.generators, PathBuf::from("/work/build/generators"));
        assert!(layout.multi_config);
    }

    #[test]
    fn test_plan_is_idempotent() {
        let settings = Settings::for_os(Os::Linux);
        assert_eq!(
            plan(Path::new("/work"), &settings),
            plan(Path::new("/work"), &settings)
        );
    }

    #[test]
    fn test_executable_path_shape() {
        let windows = plan(Path::new("/work"), &Settings::for_os(Os::Windows));
        assert_eq!(
            windows.executable("libaura_test"),
            PathBuf::from("/work/build/Release/libaura_test.exe")
        );

        let linux = plan(Path::new("/work"), &Settings::for_os(Os::Linux));
        assert_eq!(
            linux.executable("libaura_test"),
            PathBuf::from("/work/build/libaura_test")
        );

        let debug = Settings::for_os(Os::Linux).with_build_type(BuildType::Debug);
        let linux_debug = plan(Path::new("/work"), &debug);
        assert!(!linux_debug
            .executable("libaura_test")
            .components()
            .any(|c| c.as_os_str() == "Debug"));
    }
}
