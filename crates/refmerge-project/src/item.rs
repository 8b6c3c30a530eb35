//! Build items.

use crate::Element;

/// A build-description item that can be matched across revisions and
/// re-emitted as an element.
pub trait ProjectItem {
    /// Element name of this item kind.
    fn action(&self) -> &str;

    /// Cross-revision matching key.
    ///
    /// For references this is the resolved logical assembly name, not the raw
    /// include string, so the same library still matches when its include
    /// string's version qualifier changed between revisions.
    fn key(&self) -> String;

    /// Serialize this item to an element in the given namespace.
    fn to_element(&self, namespace: &str) -> Element;
}
