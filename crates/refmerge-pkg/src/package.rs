//! Installed-package records and the packages manifest.
//!
//! The manifest (`packages.toml`) lists every package installed for a
//! project:
//!
//! ```toml
//! [[package]]
//! id = "Newtonsoft.Json"
//! version = "6.0.8"
//! target-framework = "net45"
//! ```
//!
//! Reading validates each entry; writing emits the canonical form, so a
//! canonical manifest round-trips byte-identically through read and write.

use crate::version::{PackageVersion, VersionError};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// The manifest filename.
pub const MANIFEST_FILE: &str = "packages.toml";

/// Errors that can occur when working with the packages manifest.
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("failed to read manifest file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse manifest: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize manifest: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid package id '{0}': {1}")]
    InvalidId(String, &'static str),

    #[error("invalid version '{version}' for package '{package}': {source}")]
    InvalidVersion {
        package: String,
        version: String,
        source: VersionError,
    },
}

/// An installed package: identifier plus version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    /// Package identifier; may itself contain dots (`Microsoft.Bcl.Build`).
    pub id: String,

    /// Installed version.
    pub version: PackageVersion,

    /// Target framework recorded by the manifest, if any. Packages recovered
    /// from install-folder names carry none.
    pub target_framework: Option<String>,
}

impl Package {
    /// Create a package with no target-framework metadata.
    #[must_use]
    pub fn new(id: impl Into<String>, version: PackageVersion) -> Self {
        Self {
            id: id.into(),
            version,
            target_framework: None,
        }
    }

    /// Attach target-framework metadata.
    #[must_use]
    pub fn with_target_framework(mut self, target_framework: impl Into<String>) -> Self {
        self.target_framework = Some(target_framework.into());
        self
    }

    /// Read all packages from a manifest file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or any entry is invalid.
    pub fn read(path: impl AsRef<Path>) -> Result<Vec<Self>, ManifestError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse packages from manifest TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid, an id is empty, or a version
    /// does not parse.
    pub fn parse(content: &str) -> Result<Vec<Self>, ManifestError> {
        let doc: ManifestDoc = toml::from_str(content)?;
        doc.packages.into_iter().map(PackageEntry::into_package).collect()
    }

    /// Write packages to a manifest writer in canonical form.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the underlying write fails.
    pub fn write(packages: &[Self], writer: &mut impl Write) -> Result<(), ManifestError> {
        writer.write_all(Self::to_toml_string(packages)?.as_bytes())?;
        Ok(())
    }

    /// Serialize packages to canonical manifest TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml_string(packages: &[Self]) -> Result<String, ManifestError> {
        let doc = ManifestDoc {
            packages: packages.iter().map(PackageEntry::from_package).collect(),
        };
        Ok(toml::to_string_pretty(&doc)?)
    }
}

/// On-disk manifest document.
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ManifestDoc {
    #[serde(default, rename = "package")]
    packages: Vec<PackageEntry>,
}

/// One manifest entry, before validation.
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct PackageEntry {
    id: String,
    version: String,

    #[serde(
        default,
        rename = "target-framework",
        skip_serializing_if = "Option::is_none"
    )]
    target_framework: Option<String>,
}

impl PackageEntry {
    fn into_package(self) -> Result<Package, ManifestError> {
        if self.id.is_empty() {
            return Err(ManifestError::InvalidId(self.id, "id cannot be empty"));
        }

        let version = self
            .version
            .parse()
            .map_err(|source| ManifestError::InvalidVersion {
                package: self.id.clone(),
                version: self.version.clone(),
                source,
            })?;

        Ok(Package {
            id: self.id,
            version,
            target_framework: self.target_framework,
        })
    }

    fn from_package(package: &Package) -> Self {
        Self {
            id: package.id.clone(),
            version: package.version.to_string(),
            target_framework: package.target_framework.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"[[package]]
id = "Microsoft.Bcl.Build"
version = "1.0.21"

[[package]]
id = "Newtonsoft.Json"
version = "6.0.8"
target-framework = "net45"

[[package]]
id = "log4net"
version = "2.0.8"
target-framework = "net45"
"#;

    #[test]
    fn parse_manifest_entries() {
        let packages = Package::parse(MANIFEST).unwrap();

        assert_eq!(packages.len(), 3);
        assert_eq!(packages[1].id, "Newtonsoft.Json");
        assert_eq!(packages[1].version, "6.0.8".parse().unwrap());
        assert_eq!(packages[1].target_framework.as_deref(), Some("net45"));
        assert_eq!(packages[0].target_framework, None);
    }

    #[test]
    fn parse_empty_manifest() {
        assert!(Package::parse("").unwrap().is_empty());
    }

    #[test]
    fn read_then_write_is_byte_identical() {
        let packages = Package::parse(MANIFEST).unwrap();

        let mut written = Vec::new();
        Package::write(&packages, &mut written).unwrap();
        let written = String::from_utf8(written).unwrap();

        let reread = Package::parse(&written).unwrap();
        assert_eq!(reread, packages);

        let rewritten = Package::to_toml_string(&reread).unwrap();
        assert_eq!(rewritten, written);
    }

    #[test]
    fn version_width_survives_the_round_trip() {
        let packages =
            Package::parse("[[package]]\nid = \"A\"\nversion = \"1.0\"\n").unwrap();
        let written = Package::to_toml_string(&packages).unwrap();
        assert!(written.contains("version = \"1.0\""));
    }

    #[test]
    fn empty_id_is_an_error() {
        let err = Package::parse("[[package]]\nid = \"\"\nversion = \"1.0\"\n").unwrap_err();
        assert!(matches!(err, ManifestError::InvalidId(..)));
    }

    #[test]
    fn unparseable_version_is_an_error() {
        let err =
            Package::parse("[[package]]\nid = \"A\"\nversion = \"1.0-beta\"\n").unwrap_err();
        assert!(matches!(err, ManifestError::InvalidVersion { .. }));
    }

    #[test]
    fn unknown_fields_are_an_error() {
        let err = Package::parse("[[package]]\nid = \"A\"\nversion = \"1.0\"\nflavor = \"x\"\n")
            .unwrap_err();
        assert!(matches!(err, ManifestError::Parse(..)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Package::read("/nonexistent/packages.toml").unwrap_err();
        assert!(matches!(err, ManifestError::Io(..)));
    }
}
