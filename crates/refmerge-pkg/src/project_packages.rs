//! The installed-package index of a single project.
//!
//! Built once from the project's manifest and immutable afterwards. Answers
//! two questions about a declared reference: does its hint path point into
//! the package folder at all, and if so, is the package it points at
//! actually installed at the referenced version. The second check recovers
//! the referenced package from the hint path's install-folder segment.

use crate::folder::{package_from_folder_name, FolderNameError};
use crate::package::{ManifestError, Package, MANIFEST_FILE};
use refmerge_project::Reference;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur when building or querying the index.
#[derive(Error, Debug)]
pub enum ProjectPackagesError {
    #[error("failed to read packages manifest: {0}")]
    ManifestRead(#[from] ManifestError),

    #[error("manifest lists package '{0}' more than once")]
    DuplicatePackageId(String),

    #[error("malformed hint path '{hint_path}': {reason}")]
    MalformedHintPath {
        hint_path: String,
        reason: &'static str,
    },

    #[error(transparent)]
    FolderName(#[from] FolderNameError),
}

/// What packages are installed for a project, and where the package folder
/// is.
#[derive(Debug, Clone)]
pub struct ProjectPackages {
    packages_prefix: String,
    packages: BTreeMap<String, Package>,
}

impl ProjectPackages {
    /// Load the index from `<base_folder>/packages.toml`.
    ///
    /// `packages_prefix` is the path prefix under which hint paths of
    /// package references are expected to live (e.g. `..\packages\`).
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest is missing or malformed, or lists
    /// the same package id twice.
    pub fn load(
        base_folder: impl AsRef<Path>,
        packages_prefix: impl Into<String>,
    ) -> Result<Self, ProjectPackagesError> {
        let packages = Package::read(base_folder.as_ref().join(MANIFEST_FILE))?;
        Self::from_packages(packages, packages_prefix)
    }

    /// Build the index from already-read packages.
    ///
    /// # Errors
    ///
    /// Returns an error if the same package id occurs twice.
    pub fn from_packages(
        packages: impl IntoIterator<Item = Package>,
        packages_prefix: impl Into<String>,
    ) -> Result<Self, ProjectPackagesError> {
        let mut map = BTreeMap::new();
        for package in packages {
            let id = package.id.clone();
            if map.insert(id.clone(), package).is_some() {
                return Err(ProjectPackagesError::DuplicatePackageId(id));
            }
        }

        Ok(Self {
            packages_prefix: packages_prefix.into(),
            packages: map,
        })
    }

    /// True if the reference's hint path points into the package folder.
    #[must_use]
    pub fn is_package_reference(&self, reference: &Reference) -> bool {
        reference
            .hint_path()
            .is_some_and(|hint_path| hint_path.starts_with(&self.packages_prefix))
    }

    /// True if the package the reference's hint path points at is installed
    /// at exactly the referenced version.
    ///
    /// A reference without a hint path is never installed: package
    /// references always declare one. Callers are expected to check
    /// [`is_package_reference`](Self::is_package_reference) first; a present
    /// hint path outside the package folder is a caller bug.
    ///
    /// # Errors
    ///
    /// Returns an error if the hint path does not have the expected
    /// `<prefix><id>.<version>/...` layout.
    pub fn is_package_installed(
        &self,
        reference: &Reference,
    ) -> Result<bool, ProjectPackagesError> {
        if reference.hint_path().is_none() {
            return Ok(false);
        }

        debug_assert!(
            self.is_package_reference(reference),
            "is_package_installed called on a non-package reference"
        );

        let referenced = self.package_from_hint_path(reference)?;
        match self.packages.get(&referenced.id) {
            Some(installed) => Ok(installed.version == referenced.version),
            None => Ok(false),
        }
    }

    /// Recover the package a reference claims to use from the install-folder
    /// segment of its hint path.
    ///
    /// # Errors
    ///
    /// Returns an error if the reference has no hint path, the hint path
    /// does not start with the package-folder prefix or has no segments
    /// after it, or the install-folder name is unrecognized.
    pub fn package_from_hint_path(
        &self,
        reference: &Reference,
    ) -> Result<Package, ProjectPackagesError> {
        let hint_path =
            reference
                .hint_path()
                .ok_or(ProjectPackagesError::MalformedHintPath {
                    hint_path: String::new(),
                    reason: "reference has no hint path",
                })?;

        let remainder = hint_path.strip_prefix(&self.packages_prefix).ok_or_else(|| {
            ProjectPackagesError::MalformedHintPath {
                hint_path: hint_path.to_string(),
                reason: "expected the package-folder prefix",
            }
        })?;

        let folder_name = remainder
            .split(['/', '\\'])
            .find(|segment| !segment.is_empty())
            .ok_or_else(|| ProjectPackagesError::MalformedHintPath {
                hint_path: hint_path.to_string(),
                reason: "no install folder after the prefix",
            })?;

        Ok(package_from_folder_name(folder_name)?)
    }

    /// Look up an installed package by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Package> {
        self.packages.get(id)
    }

    /// Number of installed packages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Iterate over all installed packages.
    pub fn iter(&self) -> impl Iterator<Item = &Package> {
        self.packages.values()
    }

    /// The configured package-folder prefix.
    #[must_use]
    pub fn packages_prefix(&self) -> &str {
        &self.packages_prefix
    }
}

impl<'a> IntoIterator for &'a ProjectPackages {
    type Item = &'a Package;
    type IntoIter = std::collections::btree_map::Values<'a, String, Package>;

    fn into_iter(self) -> Self::IntoIter {
        self.packages.values()
    }
}
