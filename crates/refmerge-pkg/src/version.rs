//! Package version strings (`6.0.8`, `1.0`, `2.0.8.1`).
//!
//! A package version is a sequence of non-negative integer components.
//! Unlike semver, any number of components is allowed and missing trailing
//! components compare as zero, so `1.0` and `1.0.0` denote the same version.
//! Rendering preserves the parsed width; it never trims trailing zeros.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur when parsing a version string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    #[error("empty version string")]
    Empty,

    #[error("invalid version component '{0}': expected a non-negative integer")]
    InvalidComponent(String),
}

/// A parsed package version.
#[derive(Debug, Clone, Eq)]
pub struct PackageVersion {
    components: Vec<u64>,
}

impl PackageVersion {
    /// The numeric components in order. Never empty.
    #[must_use]
    pub fn components(&self) -> &[u64] {
        &self.components
    }

    /// Components with trailing zeros dropped: the shortest spelling of this
    /// version.
    fn significant(&self) -> &[u64] {
        let len = self
            .components
            .iter()
            .rposition(|&c| c != 0)
            .map_or(0, |i| i + 1);
        &self.components[..len]
    }
}

impl FromStr for PackageVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(VersionError::Empty);
        }

        let components = s
            .split('.')
            .map(|token| {
                token
                    .parse::<u64>()
                    .map_err(|_| VersionError::InvalidComponent(token.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { components })
    }
}

impl fmt::Display for PackageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self
            .components
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(".");
        write!(f, "{rendered}")
    }
}

impl Ord for PackageVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let width = self.components.len().max(other.components.len());
        for i in 0..width {
            let left = self.components.get(i).copied().unwrap_or(0);
            let right = other.components.get(i).copied().unwrap_or(0);
            match left.cmp(&right) {
                Ordering::Equal => {}
                unequal => return unequal,
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for PackageVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for PackageVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Hash for PackageVersion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.significant().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn v(s: &str) -> PackageVersion {
        s.parse().unwrap()
    }

    #[test]
    fn parse_and_render() {
        assert_eq!(v("6.0.8").components(), &[6, 0, 8]);
        assert_eq!(v("6.0.8").to_string(), "6.0.8");
        assert_eq!(v("1").components(), &[1]);
        // Width is preserved; trailing zeros are not trimmed.
        assert_eq!(v("1.0.0").to_string(), "1.0.0");
    }

    #[test]
    fn display_reparses_to_the_same_version() {
        for text in ["6.0.8", "1.0", "2.0.8.1", "0.0"] {
            let version = v(text);
            assert_eq!(v(&version.to_string()), version);
        }
    }

    #[test]
    fn parse_errors() {
        assert_eq!("".parse::<PackageVersion>(), Err(VersionError::Empty));
        assert_eq!(
            "1.x".parse::<PackageVersion>(),
            Err(VersionError::InvalidComponent("x".to_string()))
        );
        assert_eq!(
            "1..2".parse::<PackageVersion>(),
            Err(VersionError::InvalidComponent(String::new()))
        );
        assert!("1.0-beta".parse::<PackageVersion>().is_err());
    }

    #[test]
    fn missing_trailing_components_compare_as_zero() {
        assert_eq!(v("1.0"), v("1.0.0"));
        assert_eq!(v("1"), v("1.0.0.0"));
        assert_ne!(v("1.0"), v("1.0.1"));
    }

    #[test]
    fn ordering_is_component_wise() {
        assert!(v("1.2") < v("1.10"));
        assert!(v("2.0") > v("1.9.9"));
        assert!(v("1.0.1") > v("1.0"));
        assert_eq!(v("1.0").cmp(&v("1.0.0")), Ordering::Equal);
    }

    #[test]
    fn hash_is_consistent_with_equality() {
        let mut versions = HashSet::new();
        versions.insert(v("1.0"));
        versions.insert(v("1.0.0"));
        versions.insert(v("1.0.0.0"));

        assert_eq!(versions.len(), 1);
        assert!(versions.contains(&v("1")));
    }
}
