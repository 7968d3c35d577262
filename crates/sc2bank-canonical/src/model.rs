use serde::{Deserialize, Serialize};

/// A `Key` element: a named, typed scalar inside a section.
///
/// Fields are declared name-first so the derived ordering sorts by name and
/// only falls back to the other fields to stay consistent with `Eq`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Key {
    /// The Key element's `name` attribute.
    pub name: String,
    /// Name of the single attribute on the nested `Value` element (`int`, `string`, `fixed`, ...).
    pub value_type: String,
    /// Text of that attribute.
    pub value: String,
}

impl Key {
    /// Builds a key from its three string fields.
    pub fn new(
        name: impl Into<String>,
        value_type: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            value_type: value_type.into(),
            value: value.into(),
        }
    }
}

/// A `Section` element and its keys in document order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Section {
    /// The Section element's `name` attribute.
    pub name: String,
    /// Keys in document order; names are not required to be unique.
    pub keys: Vec<Key>,
}

impl Section {
    /// Builds a section from a name and its keys.
    pub fn new(name: impl Into<String>, keys: Vec<Key>) -> Self {
        Self {
            name: name.into(),
            keys,
        }
    }
}

/// Parsed bank content: sections in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bank {
    /// Sections in document order.
    pub sections: Vec<Section>,
}

impl Bank {
    /// Wraps an ordered list of sections.
    pub fn new(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    /// Total number of keys across all sections.
    pub fn key_count(&self) -> usize {
        self.sections.iter().map(|s| s.keys.len()).sum()
    }
}

/// Anything that sorts by a `name` during canonicalization.
pub(crate) trait Named {
    fn name(&self) -> &str;
}

impl Named for Key {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for Section {
    fn name(&self) -> &str {
        &self.name
    }
}
