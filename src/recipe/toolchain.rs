// src/recipe/toolchain.rs

//! Toolchain generation
//!
//! Writes the files the native build system reads before configuring:
//! a CMake toolchain file carrying the language standard and option state,
//! and one `<name>-config.cmake` descriptor per resolved dependency.
//!
//! Every file is rewritten in full on each run, so generating twice with the
//! same inputs leaves identical files behind.

use crate::error::{Error, Result};
use crate::recipe::kitchen::{BuildConfiguration, DependencyLocation, DependencyProvider};
use crate::recipe::layout::Layout;
use crate::recipe::options::{FPIC, SHARED};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Name of the generated toolchain file
pub const TOOLCHAIN_FILE: &str = "skillet_toolchain.cmake";

/// Files written by [`generate`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainArtifacts {
    pub toolchain_file: PathBuf,
    pub dependency_files: Vec<PathBuf>,
    pub locations: Vec<DependencyLocation>,
}

/// Render a path the way CMake expects it (forward slashes)
fn cmake_path(path: &Path) -> String {
    path.display().to_string().replace('\\', "/")
}

fn on_off(value: bool) -> &'static str {
    if value { "ON" } else { "OFF" }
}

/// Locate every requirement and write the toolchain and dependency descriptors
pub fn generate(
    config: &BuildConfiguration,
    layout: &Layout,
    provider: &dyn DependencyProvider,
) -> Result<ToolchainArtifacts> {
    fs::create_dir_all(&layout.generators).map_err(|e| {
        Error::IoError(format!(
            "Failed to create generators folder {}: {}",
            layout.generators.display(),
            e
        ))
    })?;

    let mut locations = Vec::with_capacity(config.requirements().len());
    for requirement in config.requirements() {
        let location = provider.locate(requirement)?;
        debug!("{} -> {}", requirement, location.root.display());
        locations.push(location);
    }

    let mut dependency_files = Vec::with_capacity(locations.len());
    for location in &locations {
        let path = layout
            .generators
            .join(format!("{}-config.cmake", location.requirement.name));
        fs::write(&path, render_dependency(location))?;
        dependency_files.push(path);
    }

    let toolchain_file = layout.generators.join(TOOLCHAIN_FILE);
    fs::write(&toolchain_file, render_toolchain(config, layout, &locations))?;

    info!(
        "Generated {} and {} dependency descriptor(s) in {}",
        TOOLCHAIN_FILE,
        dependency_files.len(),
        layout.generators.display()
    );

    Ok(ToolchainArtifacts {
        toolchain_file,
        dependency_files,
        locations,
    })
}

/// Contents of the toolchain file
pub fn render_toolchain(
    config: &BuildConfiguration,
    layout: &Layout,
    locations: &[DependencyLocation],
) -> String {
    let mut out = String::new();
    let options = config.options();

    // Writing into a String cannot fail
    let _ = writeln!(
        out,
        "# Generated by skillet for {} (package id {})",
        config.reference(),
        config.package_id()
    );
    let _ = writeln!(out, "cmake_minimum_required(VERSION 3.15)");
    let _ = writeln!(out);

    if let Some(std) = config.cppstd() {
        let _ = writeln!(out, "set(CMAKE_CXX_STANDARD {})", std.cmake_value());
        let _ = writeln!(out, "set(CMAKE_CXX_STANDARD_REQUIRED ON)");
        let _ = writeln!(out, "set(CMAKE_CXX_EXTENSIONS {})", on_off(std.is_gnu()));
    }

    if !layout.multi_config {
        let _ = writeln!(
            out,
            "set(CMAKE_BUILD_TYPE \"{}\" CACHE STRING \"\" FORCE)",
            config.settings().build_type
        );
    }

    let _ = writeln!(
        out,
        "set(BUILD_SHARED_LIBS {} CACHE BOOL \"\" FORCE)",
        on_off(options.is_enabled(SHARED))
    );

    if options.contains(FPIC) {
        let _ = writeln!(
            out,
            "set(CMAKE_POSITION_INDEPENDENT_CODE {} CACHE BOOL \"\" FORCE)",
            on_off(options.is_enabled(FPIC))
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "set(CMAKE_FIND_PACKAGE_PREFER_CONFIG ON)");
    let _ = write!(
        out,
        "list(PREPEND CMAKE_PREFIX_PATH \"{}\"",
        cmake_path(&layout.generators)
    );
    for location in locations {
        let _ = write!(out, " \"{}\"", cmake_path(&location.root));
    }
    let _ = writeln!(out, ")");
    let _ = writeln!(
        out,
        "list(PREPEND CMAKE_MODULE_PATH \"{}\")",
        cmake_path(&layout.generators)
    );

    out
}

/// Contents of one dependency descriptor
pub fn render_dependency(location: &DependencyLocation) -> String {
    let req = &location.requirement;
    let name = &req.name;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "# Generated by skillet for {} ({})",
        req,
        req.kind.as_str()
    );
    let _ = writeln!(out, "set({}_FOUND TRUE)", name);
    let _ = writeln!(out, "set({}_VERSION \"{}\")", name, req.version);
    let _ = writeln!(out, "set({}_ROOT \"{}\")", name, cmake_path(&location.root));
    let _ = writeln!(
        out,
        "set({}_INCLUDE_DIRS \"{}\")",
        name,
        cmake_path(&location.include_dir)
    );
    let _ = writeln!(
        out,
        "set({}_LIB_DIRS \"{}\")",
        name,
        cmake_path(&location.lib_dir)
    );
    let _ = writeln!(
        out,
        "set({}_BIN_DIRS \"{}\")",
        name,
        cmake_path(&location.bin_dir)
    );

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::format::{OptionValue, Recipe, Requirement};
    use crate::recipe::kitchen::LocalCacheProvider;
    use crate::recipe::layout::plan;
    use crate::recipe::options::Options;
    use crate::recipe::parse_recipe;
    use crate::settings::{Os, Settings};

    fn recipe() -> Recipe {
        parse_recipe(
            r#"
[package]
name = "libaura"
version = "2024.1.0"

[settings]
min_cppstd = "20"
"#,
        )
        .unwrap()
    }

    fn config(os: Os, options: Options) -> BuildConfiguration {
        BuildConfiguration::new(
            &recipe(),
            Settings::for_os(os),
            options,
            vec![
                Requirement::runtime("boost", "1.83.0"),
                Requirement::test("gtest", "1.14.00"),
            ],
        )
    }

    fn static_options() -> Options {
        [
            (SHARED.to_string(), OptionValue::Bool(false)),
            (FPIC.to_string(), OptionValue::Bool(true)),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_render_toolchain_linux() {
        let layout = plan(Path::new("/work"), &Settings::for_os(Os::Linux));
        let config = config(Os::Linux, static_options());
        let provider = LocalCacheProvider::new("/cache");
        let locations: Vec<_> = config
            .requirements()
            .iter()
            .map(|r| provider.locate(r).unwrap())
            .collect();

        let text = render_toolchain(&config, &layout, &locations);
        assert!(text.contains("set(CMAKE_CXX_STANDARD 20)"));
        assert!(text.contains("set(CMAKE_CXX_EXTENSIONS OFF)"));
        assert!(text.contains("set(CMAKE_BUILD_TYPE \"Release\""));
        assert!(text.contains("set(BUILD_SHARED_LIBS OFF"));
        assert!(text.contains("set(CMAKE_POSITION_INDEPENDENT_CODE ON"));
        assert!(text.contains("\"/cache/boost/1.83.0\""));
        assert!(text.contains("\"/cache/gtest/1.14.00\""));
    }

    #[test]
    fn test_render_toolchain_without_fpic() {
        let layout = plan(Path::new("/work"), &Settings::for_os(Os::Windows));
        let options: Options = [(SHARED.to_string(), OptionValue::Bool(true))]
            .into_iter()
            .collect();
        let text = render_toolchain(&config(Os::Windows, options), &layout, &[]);
        assert!(!text.contains("CMAKE_POSITION_INDEPENDENT_CODE"));
        assert!(!text.contains("CMAKE_BUILD_TYPE"));
        assert!(text.contains("set(BUILD_SHARED_LIBS ON"));
    }

    #[test]
    fn test_render_dependency() {
        let location = DependencyLocation::under(
            &Requirement::runtime("jsoncpp", "1.9.5"),
            PathBuf::from("/cache/jsoncpp/1.9.5"),
        );
        let text = render_dependency(&location);
        assert!(text.contains("set(jsoncpp_VERSION \"1.9.5\")"));
        assert!(text.contains("set(jsoncpp_INCLUDE_DIRS \"/cache/jsoncpp/1.9.5/include\")"));
    }

    #[test]
    fn test_generate_overwrites() {
        let temp = tempfile::tempdir().unwrap();
        let layout = plan(temp.path(), &Settings::for_os(Os::Linux));
        let config = config(Os::Linux, static_options());
        let provider = LocalCacheProvider::new(temp.path().join("cache"));

        let first = generate(&config, &layout, &provider).unwrap();
        let before = fs::read_to_string(&first.toolchain_file).unwrap();

        let second = generate(&config, &layout, &provider).unwrap();
        let after = fs::read_to_string(&second.toolchain_file).unwrap();

        assert_eq!(first, second);
        assert_eq!(before, after);
        assert_eq!(second.dependency_files.len(), 2);
        assert!(layout.generators.join("boost-config.cmake").is_file());
    }

    #[test]
    fn test_generate_propagates_provider_error() {
        let temp = tempfile::tempdir().unwrap();
        let layout = plan(temp.path(), &Settings::for_os(Os::Linux));
        let provider = LocalCacheProvider::strict(temp.path().join("empty-cache"));

        let err = generate(&config(Os::Linux, static_options()), &layout, &provider).unwrap_err();
        assert!(matches!(err, Error::Resolution(_)));
    }
}
