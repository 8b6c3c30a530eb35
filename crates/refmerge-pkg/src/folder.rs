//! Package install-folder names.
//!
//! Installed packages live in `<packages root>/<Id>.<Version>/`, so the
//! folder name carries the package identity — but the grammar is ambiguous:
//! the id may itself contain dots (`Microsoft.Bcl.Build.1.0.21`). The split
//! point is the first `.`-separated token that is entirely a non-negative
//! integer: id tokens are words by convention, version tokens are always
//! bare integers.

use crate::package::Package;
use crate::version::{PackageVersion, VersionError};
use thiserror::Error;

/// Errors that can occur when parsing an install-folder name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FolderNameError {
    /// The name does not follow the `<id>.<version>` convention: either no
    /// all-numeric token exists, or the version starts at the first token
    /// and leaves no id.
    #[error("unrecognized package folder name '{0}': expected '<id>.<version>'")]
    UnrecognizedFormat(String),

    #[error(transparent)]
    Version(#[from] VersionError),
}

/// Recover a package's identity from its install-folder name.
///
/// `Newtonsoft.Json.6.0.8` parses as id `Newtonsoft.Json`, version `6.0.8`.
/// An id with an embedded bare-numeric segment before the version would be
/// misparsed; such ids do not occur under the naming convention.
///
/// # Errors
///
/// Returns an error if no id/version split can be determined or the version
/// tail does not parse.
pub fn package_from_folder_name(folder_name: &str) -> Result<Package, FolderNameError> {
    let tokens: Vec<&str> = folder_name.split('.').collect();

    let version_start = tokens.iter().position(|token| token.parse::<u64>().is_ok());
    match version_start {
        // No version, or a version with no id in front of it.
        None | Some(0) => Err(FolderNameError::UnrecognizedFormat(folder_name.to_string())),
        Some(index) => {
            let id = tokens[..index].join(".");
            let version: PackageVersion = tokens[index..].join(".").parse()?;
            Ok(Package::new(id, version))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_with_dots() {
        let package = package_from_folder_name("Newtonsoft.Json.6.0.8").unwrap();
        assert_eq!(package.id, "Newtonsoft.Json");
        assert_eq!(package.version, "6.0.8".parse().unwrap());
        assert_eq!(package.target_framework, None);
    }

    #[test]
    fn single_token_id() {
        let package = package_from_folder_name("log4net.2.0.8").unwrap();
        assert_eq!(package.id, "log4net");
        assert_eq!(package.version, "2.0.8".parse().unwrap());
    }

    #[test]
    fn id_tokens_containing_digits_are_not_version_tokens() {
        // `net45`-style tokens contain digits but are not bare integers.
        let package = package_from_folder_name("Microsoft.Bcl.Build.1.0.21").unwrap();
        assert_eq!(package.id, "Microsoft.Bcl.Build");
        assert_eq!(package.version, "1.0.21".parse().unwrap());
    }

    #[test]
    fn four_component_version() {
        let package = package_from_folder_name("MyLib.Core.1.2.3.4").unwrap();
        assert_eq!(package.id, "MyLib.Core");
        assert_eq!(package.version.components(), &[1, 2, 3, 4]);
    }

    #[test]
    fn no_version_is_unrecognized() {
        assert_eq!(
            package_from_folder_name("Microsoft.Bcl.Build"),
            Err(FolderNameError::UnrecognizedFormat(
                "Microsoft.Bcl.Build".to_string()
            ))
        );
    }

    #[test]
    fn leading_version_token_is_unrecognized() {
        // A folder that starts with the version has no id to recover.
        assert_eq!(
            package_from_folder_name("6.0.8"),
            Err(FolderNameError::UnrecognizedFormat("6.0.8".to_string()))
        );
    }

    #[test]
    fn non_numeric_version_tail_is_an_error() {
        // The first bare integer starts the version; a later word token in
        // the tail fails version parsing.
        let err = package_from_folder_name("MyLib.1.0-beta").unwrap_err();
        assert!(matches!(err, FolderNameError::Version(_)));
    }
}
