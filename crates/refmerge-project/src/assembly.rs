//! Assembly reference identities.
//!
//! A reference's include string carries an assembly display name such as
//! `Newtonsoft.Json, Version=6.0.0.0, Culture=neutral,
//! PublicKeyToken=30ad4fe6b2a6aeed`. Parsing can fail — include strings
//! routinely contain unresolved build variables like `$(LibVersion)` — so
//! identity resolution degrades to a best-effort name instead of failing the
//! reference outright. [`AssemblyIdentity`] keeps the two outcomes
//! distinguishable for downstream matching logic.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur when parsing an assembly display name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssemblyNameError {
    #[error("empty assembly name")]
    EmptyName,

    #[error("unresolved build variable in '{0}'")]
    UnresolvedVariable(String),

    #[error("malformed name part '{0}': expected 'Key=Value'")]
    MalformedPart(String),

    #[error("unknown name part key '{0}'")]
    UnknownKey(String),

    #[error("invalid assembly version '{0}': expected 2-4 numeric components")]
    InvalidVersion(String),
}

/// An assembly version: 2–4 numeric dot-separated components (`6.0.0.0`).
///
/// Unlike package versions, assembly versions compare strictly on their
/// declared components.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssemblyVersion {
    components: Vec<u64>,
}

impl AssemblyVersion {
    /// The numeric components in order.
    #[must_use]
    pub fn components(&self) -> &[u64] {
        &self.components
    }
}

impl FromStr for AssemblyVersion {
    type Err = AssemblyNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let components = s
            .split('.')
            .map(|token| token.parse::<u64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| AssemblyNameError::InvalidVersion(s.to_string()))?;

        if !(2..=4).contains(&components.len()) {
            return Err(AssemblyNameError::InvalidVersion(s.to_string()));
        }

        Ok(Self { components })
    }
}

impl fmt::Display for AssemblyVersion {
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

/// A fully parsed assembly display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyName {
    /// Simple name (`Newtonsoft.Json`).
    pub name: String,

    /// Declared assembly version, if any.
    pub version: Option<AssemblyVersion>,

    /// Declared culture, if any (`neutral` for most library assemblies).
    pub culture: Option<String>,

    /// Declared public key token, if any.
    pub public_key_token: Option<String>,
}

impl AssemblyName {
    /// Parse an assembly display name.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty, contains an unresolved build
    /// variable, or has a malformed `Key=Value` part.
    pub fn parse(display_name: &str) -> Result<Self, AssemblyNameError> {
        if display_name.contains("$(") {
            return Err(AssemblyNameError::UnresolvedVariable(
                display_name.to_string(),
            ));
        }

        let mut parts = display_name.split(',');
        let name = parts.next().unwrap_or("").trim();
        if name.is_empty() {
            return Err(AssemblyNameError::EmptyName);
        }

        let mut version = None;
        let mut culture = None;
        let mut public_key_token = None;

        for part in parts {
            let part = part.trim();
            let (key, value) = part
                .split_once('=')
                .ok_or_else(|| AssemblyNameError::MalformedPart(part.to_string()))?;
            match key {
                "Version" => version = Some(value.parse()?),
                "Culture" => culture = Some(value.to_string()),
                "PublicKeyToken" => public_key_token = Some(value.to_string()),
                // Present in some generated references; carries no identity.
                "processorArchitecture" => {}
                _ => return Err(AssemblyNameError::UnknownKey(key.to_string())),
            }
        }

        Ok(Self {
            name: name.to_string(),
            version,
            culture,
            public_key_token,
        })
    }

    /// Canonical display-name rendering: name followed by the declared parts
    /// in conventional order.
    #[must_use]
    pub fn full_name(&self) -> String {
        let mut out = self.name.clone();
        if let Some(version) = &self.version {
            out.push_str(&format!(", Version={version}"));
        }
        if let Some(culture) = &self.culture {
            out.push_str(&format!(", Culture={culture}"));
        }
        if let Some(token) = &self.public_key_token {
            out.push_str(&format!(", PublicKeyToken={token}"));
        }
        out
    }
}

impl fmt::Display for AssemblyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_name())
    }
}

/// Resolution outcome for a reference's assembly identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssemblyIdentity {
    /// The include string parsed as a complete display name.
    Resolved(AssemblyName),

    /// Only a best-effort logical name could be recovered: the text before
    /// the first comma of the include string. A version may still be
    /// supplied programmatically.
    BestEffort {
        name: String,
        version: Option<AssemblyVersion>,
    },
}

impl AssemblyIdentity {
    /// Resolve an include string, degrading to a best-effort name on any
    /// parse failure.
    #[must_use]
    pub fn resolve(include: &str) -> Self {
        match AssemblyName::parse(include) {
            Ok(name) => Self::Resolved(name),
            Err(_) => Self::BestEffort {
                name: include
                    .split(',')
                    .find(|part| !part.is_empty())
                    .unwrap_or(include)
                    .to_string(),
                version: None,
            },
        }
    }

    /// The logical name used to match references across revisions.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Resolved(name) => &name.name,
            Self::BestEffort { name, .. } => name,
        }
    }

    /// The resolved full display name, or the best-effort name.
    #[must_use]
    pub fn full_name(&self) -> String {
        match self {
            Self::Resolved(name) => name.full_name(),
            Self::BestEffort { name, .. } => name.clone(),
        }
    }

    /// The assembly version, if one is known.
    #[must_use]
    pub fn version(&self) -> Option<&AssemblyVersion> {
        match self {
            Self::Resolved(name) => name.version.as_ref(),
            Self::BestEffort { version, .. } => version.as_ref(),
        }
    }

    /// Replace the assembly version, keeping the rest of the identity.
    #[must_use]
    pub fn with_version(&self, version: AssemblyVersion) -> Self {
        match self {
            Self::Resolved(name) => {
                let mut name = name.clone();
                name.version = Some(version);
                Self::Resolved(name)
            }
            Self::BestEffort { name, .. } => Self::BestEffort {
                name: name.clone(),
                version: Some(version),
            },
        }
    }

    /// True when the include string parsed completely.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_display_name() {
        let name = AssemblyName::parse(
            "Newtonsoft.Json, Version=6.0.0.0, Culture=neutral, PublicKeyToken=30ad4fe6b2a6aeed",
        )
        .unwrap();

        assert_eq!(name.name, "Newtonsoft.Json");
        assert_eq!(name.version.as_ref().unwrap().components(), &[6, 0, 0, 0]);
        assert_eq!(name.culture.as_deref(), Some("neutral"));
        assert_eq!(name.public_key_token.as_deref(), Some("30ad4fe6b2a6aeed"));
    }

    #[test]
    fn full_name_round_trips() {
        let text =
            "Newtonsoft.Json, Version=6.0.0.0, Culture=neutral, PublicKeyToken=30ad4fe6b2a6aeed";
        let name = AssemblyName::parse(text).unwrap();
        assert_eq!(name.full_name(), text);
    }

    #[test]
    fn parse_simple_name() {
        let name = AssemblyName::parse("System.Xml").unwrap();
        assert_eq!(name.name, "System.Xml");
        assert_eq!(name.version, None);
        assert_eq!(name.full_name(), "System.Xml");
    }

    #[test]
    fn unresolved_variable_is_an_error() {
        let err = AssemblyName::parse("MyLib, Version=$(LibVersion)").unwrap_err();
        assert!(matches!(err, AssemblyNameError::UnresolvedVariable(_)));
    }

    #[test]
    fn malformed_part_is_an_error() {
        let err = AssemblyName::parse("MyLib, Version").unwrap_err();
        assert!(matches!(err, AssemblyNameError::MalformedPart(_)));

        let err = AssemblyName::parse("MyLib, Frobnicate=yes").unwrap_err();
        assert!(matches!(err, AssemblyNameError::UnknownKey(_)));
    }

    #[test]
    fn assembly_version_bounds() {
        assert_eq!(
            "6.0.0.0".parse::<AssemblyVersion>().unwrap().components(),
            &[6, 0, 0, 0]
        );
        assert_eq!("1.2".parse::<AssemblyVersion>().unwrap().components(), &[1, 2]);
        assert!("6".parse::<AssemblyVersion>().is_err());
        assert!("1.2.3.4.5".parse::<AssemblyVersion>().is_err());
        assert!("1.x".parse::<AssemblyVersion>().is_err());
    }

    #[test]
    fn identity_resolves_or_degrades() {
        let resolved = AssemblyIdentity::resolve("log4net, Version=2.0.8.0");
        assert!(resolved.is_resolved());
        assert_eq!(resolved.name(), "log4net");
        assert_eq!(resolved.version().unwrap().components(), &[2, 0, 8, 0]);

        let degraded = AssemblyIdentity::resolve("$(MyLib), Version=$(LibVersion)");
        assert!(!degraded.is_resolved());
        assert_eq!(degraded.name(), "$(MyLib)");
        assert_eq!(degraded.version(), None);
        assert_eq!(degraded.full_name(), "$(MyLib)");
    }

    #[test]
    fn with_version_overrides_either_variant() {
        let resolved = AssemblyIdentity::resolve("log4net, Version=2.0.8.0")
            .with_version("2.0.9.0".parse().unwrap());
        assert_eq!(resolved.version().unwrap().components(), &[2, 0, 9, 0]);
        assert_eq!(resolved.full_name(), "log4net, Version=2.0.9.0");

        let degraded =
            AssemblyIdentity::resolve("$(MyLib)").with_version("1.0".parse().unwrap());
        assert_eq!(degraded.version().unwrap().components(), &[1, 0]);
    }
}
