// src/recipe/resolve.rs

//! Requirement resolution
//!
//! Computes the ordered requirement sequence for one settings snapshot:
//! unconditional requirements first, in declaration order, then every
//! conditional group whose platform predicate matches, group by group.
//!
//! Resolution is a pure function of the declarations and the settings. It
//! never touches the filesystem or network; locating the resolved packages is
//! the job of a [`DependencyProvider`](crate::recipe::kitchen::DependencyProvider)
//! during toolchain generation.

use crate::error::ResolutionError;
use crate::recipe::format::{ConditionalGroup, Recipe, Requirement};
use crate::settings::Settings;
use std::collections::HashMap;
use tracing::debug;

/// Resolve a recipe's requirements for the given settings
pub fn resolve(recipe: &Recipe, settings: &Settings) -> Result<Vec<Requirement>, ResolutionError> {
    resolve_requirements(&recipe.requires, &recipe.conditional, settings)
}

/// Resolve unconditional requirements plus matching conditional groups
///
/// A name that appears twice among the applicable entries is an error; no
/// merge policy is applied.
pub fn resolve_requirements(
    unconditional: &[Requirement],
    groups: &[ConditionalGroup],
    settings: &Settings,
) -> Result<Vec<Requirement>, ResolutionError> {
    let applicable = std::iter::once(("requires".to_string(), unconditional)).chain(
        groups
            .iter()
            .filter(|group| group.applies_to(settings))
            .map(|group| (format!("{} group", group.os), group.requires.as_slice())),
    );

    let mut origins: HashMap<&str, String> = HashMap::new();
    let mut resolved = Vec::new();

    for (origin, requirements) in applicable {
        for req in requirements {
            check_requirement(req)?;

            if let Some(first) = origins.get(req.name.as_str()) {
                return Err(ResolutionError::Collision {
                    name: req.name.clone(),
                    first: first.clone(),
                    second: origin,
                });
            }

            origins.insert(req.name.as_str(), origin.clone());
            resolved.push(req.clone());
        }
    }

    debug!(
        "Resolved {} requirement(s) for os={}",
        resolved.len(),
        settings.os
    );
    Ok(resolved)
}

fn check_requirement(req: &Requirement) -> Result<(), ResolutionError> {
    if req.name.trim().is_empty() {
        return Err(ResolutionError::Unresolvable {
            name: req.name.clone(),
            reason: "empty requirement name".to_string(),
        });
    }
    if req.version.trim().is_empty() {
        return Err(ResolutionError::Unresolvable {
            name: req.name.clone(),
            reason: "empty version".to_string(),
        });
    }
    if req.name.contains('/') {
        return Err(ResolutionError::Unresolvable {
            name: req.name.clone(),
            reason: "name must not contain '/'".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Os;

    fn groups() -> Vec<ConditionalGroup> {
        vec![
            ConditionalGroup {
                os: Os::Linux,
                requires: vec![
                    Requirement::runtime("glib", "2.78.1"),
                    Requirement::runtime("libsecret", "0.20.5"),
                    Requirement::runtime("libuuid", "1.0.3"),
                ],
            },
            ConditionalGroup {
                os: Os::Windows,
                requires: vec![Requirement::runtime("wil", "1.0.231216.1")],
            },
        ]
    }

    fn unconditional() -> Vec<Requirement> {
        vec![
            Requirement::runtime("boost", "1.83.0"),
            Requirement::test("gtest", "1.14.00"),
            Requirement::runtime("jsoncpp", "1.9.5"),
        ]
    }

    fn names(reqs: &[Requirement]) -> Vec<&str> {
        reqs.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_linux_order() {
        let resolved =
            resolve_requirements(&unconditional(), &groups(), &Settings::for_os(Os::Linux))
                .unwrap();
        assert_eq!(
            names(&resolved),
            vec!["boost", "gtest", "jsoncpp", "glib", "libsecret", "libuuid"]
        );
    }

    #[test]
    fn test_windows_skips_linux_group() {
        let resolved =
            resolve_requirements(&unconditional(), &groups(), &Settings::for_os(Os::Windows))
                .unwrap();
        assert_eq!(names(&resolved), vec!["boost", "gtest", "jsoncpp", "wil"]);
    }

    #[test]
    fn test_resolution_is_pure() {
        let settings = Settings::for_os(Os::Linux);
        let first = resolve_requirements(&unconditional(), &groups(), &settings).unwrap();
        let second = resolve_requirements(&unconditional(), &groups(), &settings).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_collision_is_error() {
        let mut groups = groups();
        groups[0].requires.push(Requirement::runtime("boost", "1.84.0"));

        let err = resolve_requirements(&unconditional(), &groups, &Settings::for_os(Os::Linux))
            .unwrap_err();
        assert_eq!(
            err,
            ResolutionError::Collision {
                name: "boost".to_string(),
                first: "requires".to_string(),
                second: "Linux group".to_string(),
            }
        );
    }

    #[test]
    fn test_collision_in_inactive_group_ignored() {
        let mut groups = groups();
        groups[1].requires.push(Requirement::runtime("boost", "1.84.0"));

        assert!(
            resolve_requirements(&unconditional(), &groups, &Settings::for_os(Os::Linux)).is_ok()
        );
    }

    #[test]
    fn test_empty_version_unresolvable() {
        let reqs = vec![Requirement::runtime("zlib", "")];
        assert!(matches!(
            resolve_requirements(&reqs, &[], &Settings::for_os(Os::Linux)),
            Err(ResolutionError::Unresolvable { .. })
        ));
    }
}
