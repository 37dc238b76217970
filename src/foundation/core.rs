use std::collections::BTreeSet;

/// Structural position of a layer in the source document (pre-order, 0-based).
///
/// Layers are addressed by position rather than label because labels are not guaranteed to be
/// unique.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct LayerId(pub usize);

/// 0-based position of a page in the final output.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct PageIndex(pub u32);

impl PageIndex {
    /// 1-based page number, as used by bookmarks and the assembled output.
    pub fn number(self) -> u32 {
        self.0 + 1
    }

    pub(crate) fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for PageIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Set of layers displayed while one page is rendered.
///
/// This is an immutable per-page value: renderers receive it as input instead of observing
/// visibility flags mutated in place on a shared document.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct VisibilitySet(BTreeSet<LayerId>);

impl VisibilitySet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `id` is displayed.
    pub fn contains(&self, id: LayerId) -> bool {
        self.0.contains(&id)
    }

    /// Number of displayed layers.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no layer is displayed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Displayed layers in structural order.
    pub fn iter(&self) -> impl Iterator<Item = LayerId> + '_ {
        self.0.iter().copied()
    }

    pub(crate) fn insert(&mut self, id: LayerId) {
        self.0.insert(id);
    }
}

impl FromIterator<LayerId> for VisibilitySet {
    fn from_iter<I: IntoIterator<Item = LayerId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
