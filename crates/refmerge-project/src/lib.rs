//! Build-description item model for refmerge.
//!
//! This crate provides:
//! - An owned element model for build-description items
//! - Assembly display-name parsing with best-effort degradation
//! - The `Reference` item: parsing, identity and equality contracts, and
//!   round-trip serialization

mod assembly;
mod element;
mod item;
mod reference;

pub use assembly::{AssemblyIdentity, AssemblyName, AssemblyNameError, AssemblyVersion};
pub use element::{Element, Node, MSBUILD_NAMESPACE};
pub use item::ProjectItem;
pub use reference::{Reference, ReferenceError, REFERENCE_ACTION};
