//! Assembly references declared by the build description.
//!
//! A [`Reference`] is one declared dependency: an include string naming the
//! assembly, an optional hint path into the package folder, and a handful of
//! optional flags. References parsed from an existing element retain that
//! element and re-emit it verbatim as long as they are never reconstructed
//! with a different include or version, which keeps re-emission of an
//! untouched build description free of spurious diffs.

use crate::assembly::{AssemblyIdentity, AssemblyVersion};
use crate::element::Element;
use crate::item::ProjectItem;
use std::fmt;
use thiserror::Error;

/// Element name of reference items.
pub const REFERENCE_ACTION: &str = "Reference";

/// Errors that can occur when parsing a reference element.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReferenceError {
    #[error("reference element has no Include attribute")]
    MissingInclude,
}

/// How a reference came into being.
///
/// `Parsed` keeps the source element for verbatim re-emission; any
/// reconstruction that changes the include string or the assembly version
/// drops to `Synthesized`, so a stale serialized form can never be re-emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Provenance {
    Parsed(Element),
    Synthesized,
}

/// One declared assembly reference.
#[derive(Debug, Clone)]
pub struct Reference {
    include: String,
    identity: AssemblyIdentity,
    hint_path: Option<String>,
    specific_version: Option<bool>,
    private: Option<bool>,
    embed_interop_types: Option<bool>,
    name: Option<String>,
    aliases: Option<String>,
    fusion_name: Option<String>,
    required_target_framework: Option<String>,
    provenance: Provenance,
}

impl Reference {
    /// Parse a reference from its build-description element.
    ///
    /// The assembly identity is resolved best-effort: include strings with
    /// unresolved build variables still produce a usable reference. The
    /// element is retained so an untouched reference re-serializes verbatim.
    ///
    /// # Errors
    ///
    /// Returns an error if the element has no `Include` attribute.
    pub fn from_element(element: &Element) -> Result<Self, ReferenceError> {
        let include = element
            .attribute("Include")
            .ok_or(ReferenceError::MissingInclude)?
            .to_string();
        let identity = AssemblyIdentity::resolve(&include);

        Ok(Self {
            identity,
            hint_path: element.child_text("HintPath"),
            specific_version: element.child_bool("SpecificVersion"),
            private: element.child_bool("Private"),
            embed_interop_types: element.child_bool("EmbedInteropTypes"),
            name: element.child_text("Name"),
            aliases: element.child_text("Aliases"),
            fusion_name: element.child_text("FusionName"),
            required_target_framework: element.child_text("RequiredTargetFramework"),
            provenance: Provenance::Parsed(element.clone()),
            include,
        })
    }

    /// Construct a reference directly, for programmatically synthesized
    /// items.
    #[must_use]
    pub fn new(
        include: impl Into<String>,
        specific_version: Option<bool>,
        private: Option<bool>,
        hint_path: Option<String>,
    ) -> Self {
        let include = include.into();
        let identity = AssemblyIdentity::resolve(&include);

        Self {
            identity,
            hint_path,
            specific_version,
            private,
            embed_interop_types: None,
            name: None,
            aliases: None,
            fusion_name: None,
            required_target_framework: None,
            provenance: Provenance::Synthesized,
            include,
        }
    }

    /// The raw include string, exactly as declared.
    #[must_use]
    pub fn include(&self) -> &str {
        &self.include
    }

    /// The resolved (or best-effort) assembly identity.
    #[must_use]
    pub fn identity(&self) -> &AssemblyIdentity {
        &self.identity
    }

    /// The assembly version, when known.
    #[must_use]
    pub fn assembly_version(&self) -> Option<&AssemblyVersion> {
        self.identity.version()
    }

    /// The hint path, when the reference declares one.
    #[must_use]
    pub fn hint_path(&self) -> Option<&str> {
        self.hint_path.as_deref()
    }

    #[must_use]
    pub fn specific_version(&self) -> Option<bool> {
        self.specific_version
    }

    #[must_use]
    pub fn private(&self) -> Option<bool> {
        self.private
    }

    #[must_use]
    pub fn embed_interop_types(&self) -> Option<bool> {
        self.embed_interop_types
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[must_use]
    pub fn aliases(&self) -> Option<&str> {
        self.aliases.as_deref()
    }

    #[must_use]
    pub fn fusion_name(&self) -> Option<&str> {
        self.fusion_name.as_deref()
    }

    #[must_use]
    pub fn required_target_framework(&self) -> Option<&str> {
        self.required_target_framework.as_deref()
    }

    /// Copy this reference, optionally overriding the include string or the
    /// assembly version.
    ///
    /// Overriding either drops the retained source element, so the copy
    /// serializes from its current fields. An include override re-resolves
    /// the assembly identity before any version override is applied.
    #[must_use]
    pub fn clone_with(
        &self,
        include: Option<&str>,
        version: Option<AssemblyVersion>,
    ) -> Self {
        let mut copy = self.clone();
        if let Some(include) = include {
            copy.include = include.to_string();
            copy.identity = AssemblyIdentity::resolve(include);
            copy.provenance = Provenance::Synthesized;
        }
        if let Some(version) = version {
            copy.identity = copy.identity.with_version(version);
            copy.provenance = Provenance::Synthesized;
        }
        copy
    }

    /// Narrow reconciliation equality: two references denote the same
    /// declared dependency when hint path, specific-version flag and include
    /// string all match.
    ///
    /// Cosmetic fields (aliases, fusion name, ...) intentionally do not
    /// participate, so they cannot block matching. Full structural equality
    /// is the `PartialEq` impl.
    #[must_use]
    pub fn same_dependency(&self, other: &Self) -> bool {
        self.hint_path == other.hint_path
            && self.specific_version == other.specific_version
            && self.include == other.include
    }
}

/// Full structural equality over the declared fields. The retained source
/// element does not participate: a parsed reference and a synthesized one
/// with identical fields are equal.
impl PartialEq for Reference {
    fn eq(&self, other: &Self) -> bool {
        self.include == other.include
            && self.identity == other.identity
            && self.hint_path == other.hint_path
            && self.specific_version == other.specific_version
            && self.private == other.private
            && self.embed_interop_types == other.embed_interop_types
            && self.name == other.name
            && self.aliases == other.aliases
            && self.fusion_name == other.fusion_name
            && self.required_target_framework == other.required_target_framework
    }
}

impl Eq for Reference {}

impl ProjectItem for Reference {
    fn action(&self) -> &str {
        REFERENCE_ACTION
    }

    fn key(&self) -> String {
        self.identity.full_name()
    }

    fn to_element(&self, namespace: &str) -> Element {
        if let Provenance::Parsed(element) = &self.provenance {
            return element.clone();
        }

        let mut element = Element::new(REFERENCE_ACTION, namespace);
        element.set_attribute("Include", &self.include);
        if let Some(name) = &self.name {
            element.add_text_child("Name", name);
        }
        if let Some(fusion_name) = &self.fusion_name {
            element.add_text_child("FusionName", fusion_name);
        }
        if let Some(hint_path) = &self.hint_path {
            element.add_text_child("HintPath", hint_path);
        }
        if let Some(private) = self.private {
            element.add_text_child("Private", bool_text(private));
        }
        if let Some(embed) = self.embed_interop_types {
            element.add_text_child("EmbedInteropTypes", bool_text(embed));
        }
        if let Some(aliases) = &self.aliases {
            element.add_text_child("Aliases", aliases);
        }
        if let Some(specific) = self.specific_version {
            element.add_text_child("SpecificVersion", bool_text(specific));
        }
        if let Some(framework) = &self.required_target_framework {
            element.add_text_child("RequiredTargetFramework", framework);
        }
        element
    }
}

fn bool_text(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.include)?;
        if let Some(hint_path) = &self.hint_path {
            write!(f, "\nHintPath: {hint_path}")?;
        }
        if let Some(private) = self.private {
            write!(f, "\nPrivate: {private}")?;
        }
        if let Some(specific) = self.specific_version {
            write!(f, "\nSpecificVersion: {specific}")?;
        }
        if let Some(framework) = &self.required_target_framework {
            write!(f, "\nRequiredTargetFramework: {framework}")?;
        }
        Ok(())
    }
}
