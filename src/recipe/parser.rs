// src/recipe/parser.rs

//! Recipe file parsing

use crate::error::{Error, Result};
use crate::recipe::format::Recipe;
use crate::settings::CppStd;
use std::collections::HashSet;
use std::path::Path;

/// Parse a recipe from a TOML string
pub fn parse_recipe(content: &str) -> Result<Recipe> {
    toml::from_str(content).map_err(|e| Error::ParseError(format!("Invalid recipe: {}", e)))
}

/// Parse a recipe from a file
pub fn parse_recipe_file(path: &Path) -> Result<Recipe> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::IoError(format!("Failed to read recipe file: {}", e)))?;

    parse_recipe(&content)
}

/// Validate a recipe for completeness and correctness
///
/// Returns warnings for missing but optional metadata. Structural problems
/// (empty identity, option defaults outside their domain, unknown standard)
/// are errors.
pub fn validate_recipe(recipe: &Recipe) -> Result<Vec<String>> {
    let mut warnings = Vec::new();

    if recipe.package.name.is_empty() {
        return Err(Error::ParseError("Recipe package name cannot be empty".to_string()));
    }
    if recipe.package.version.is_empty() {
        return Err(Error::ParseError("Recipe package version cannot be empty".to_string()));
    }

    if let Some(min) = &recipe.settings.min_cppstd {
        min.parse::<CppStd>()
            .map_err(|e| Error::ParseError(format!("Invalid min_cppstd: {}", e)))?;
    }

    for (name, decl) in &recipe.options {
        if decl.values.is_empty() {
            return Err(Error::ParseError(format!(
                "Option '{}' declares no allowed values",
                name
            )));
        }
        if !decl.allows(&decl.default) {
            return Err(Error::ParseError(format!(
                "Default '{}' of option '{}' is not one of its allowed values",
                decl.default, name
            )));
        }
    }

    // Names must be unique within the unconditional list and within each group;
    // collisions across groups are the resolver's concern.
    let mut seen = HashSet::new();
    for req in &recipe.requires {
        if !seen.insert(req.name.as_str()) {
            return Err(Error::ParseError(format!(
                "Requirement '{}' is declared twice",
                req.name
            )));
        }
    }
    for group in &recipe.conditional {
        let mut seen = HashSet::new();
        for req in &group.requires {
            if !seen.insert(req.name.as_str()) {
                return Err(Error::ParseError(format!(
                    "Requirement '{}' is declared twice in the {} group",
                    req.name, group.os
                )));
            }
        }
        if group.requires.is_empty() {
            warnings.push(format!("Conditional group for {} has no requirements", group.os));
        }
    }

    if recipe.package.license.is_none() {
        warnings.push("Missing package license".to_string());
    }
    if recipe.package.description.is_none() {
        warnings.push("Missing package description".to_string());
    }
    if recipe.package_info.libs.is_empty() {
        warnings.push("No libraries published in [package_info]".to_string());
    }
    if recipe.build.test_executable.is_none() {
        warnings.push("No test executable declared; the test phase will be skipped".to_string());
    }

    Ok(warnings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_recipe() {
        let content = r#"
[package]
name = "test"
version = "1.0"

[[requires]]
name = "zlib"
version = "1.3"
"#;

        let recipe = parse_recipe(content).unwrap();
        assert_eq!(recipe.package.name, "test");
        assert_eq!(recipe.requires[0].name, "zlib");
    }

    #[test]
    fn test_parse_invalid_recipe() {
        let content = "this is not valid toml at all {}";
        assert!(parse_recipe(content).is_err());
    }

    #[test]
    fn test_validate_empty_name() {
        let content = r#"
[package]
name = ""
version = "1.0"
"#;

        let recipe = parse_recipe(content).unwrap();
        assert!(validate_recipe(&recipe).is_err());
    }

    #[test]
    fn test_validate_default_outside_domain() {
        let content = r#"
[package]
name = "test"
version = "1.0"

[options]
shared = { values = [true, false], default = "maybe" }
"#;

        let recipe = parse_recipe(content).unwrap();
        assert!(validate_recipe(&recipe).is_err());
    }

    #[test]
    fn test_validate_bad_cppstd() {
        let content = r#"
[package]
name = "test"
version = "1.0"

[settings]
min_cppstd = "19"
"#;

        let recipe = parse_recipe(content).unwrap();
        assert!(validate_recipe(&recipe).is_err());
    }

    #[test]
    fn test_validate_duplicate_requirement() {
        let content = r#"
[package]
name = "test"
version = "1.0"

[[requires]]
name = "zlib"
version = "1.3"

[[requires]]
name = "zlib"
version = "1.2"
"#;

        let recipe = parse_recipe(content).unwrap();
        assert!(validate_recipe(&recipe).is_err());
    }

    #[test]
    fn test_validate_warnings() {
        let content = r#"
[package]
name = "test"
version = "1.0"
"#;

        let recipe = parse_recipe(content).unwrap();
        let warnings = validate_recipe(&recipe).unwrap();
        assert!(warnings.iter().any(|w| w.contains("license")));
        assert!(warnings.iter().any(|w| w.contains("description")));
        assert!(warnings.iter().any(|w| w.contains("test executable")));
    }
}
