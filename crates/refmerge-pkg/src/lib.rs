//! Package identity resolution for refmerge.
//!
//! This crate provides:
//! - Parsing and comparison of package versions
//! - The packages manifest (`packages.toml`) reader/writer
//! - Recovery of package identity from install-folder names
//! - The per-project installed-package index used to validate references

mod folder;
mod package;
mod project_packages;
mod version;

pub use folder::{package_from_folder_name, FolderNameError};
pub use package::{ManifestError, Package, MANIFEST_FILE};
pub use project_packages::{ProjectPackages, ProjectPackagesError};
pub use version::{PackageVersion, VersionError};
