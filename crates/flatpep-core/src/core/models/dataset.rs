use super::bundle::StructureBundle;
use std::collections::BTreeMap;
use thiserror::Error;

/// Member name under which the visit order is persisted, without extension.
///
/// Sequence keys may not shadow this name, so the stored order can always be
/// told apart from structure data.
pub const ORDER_KEY: &str = "sequence_order";

/// Separator used to namespace container members per sequence.
pub const KEY_SEPARATOR: char = '/';

/// Error returned when a string cannot be used as a sequence key.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidKeyError {
    #[error("sequence key is empty")]
    Empty,
    #[error("sequence key '{0}' collides with the reserved sequence-order entry")]
    Reserved(String),
    #[error("sequence key '{key}' contains the reserved separator '{separator}'")]
    Separator { key: String, separator: char },
}

/// Checks that `key` can name a structure in a container.
///
/// A valid key is non-empty, is not the reserved [`ORDER_KEY`], and does not
/// contain the [`KEY_SEPARATOR`] used to namespace container members.
pub fn validate_sequence_key(key: &str) -> Result<(), InvalidKeyError> {
    if key.is_empty() {
        return Err(InvalidKeyError::Empty);
    }
    if key == ORDER_KEY {
        return Err(InvalidKeyError::Reserved(key.to_string()));
    }
    if key.contains(KEY_SEPARATOR) {
        return Err(InvalidKeyError::Separator {
            key: key.to_string(),
            separator: KEY_SEPARATOR,
        });
    }
    Ok(())
}

/// An in-memory dataset of peptide structures, keyed by sequence.
///
/// The dataset pairs a map from sequence key to [`StructureBundle`] with the
/// order in which sequences were visited during a build. The two are tracked
/// separately on purpose: revisiting a sequence replaces its bundle but is
/// still recorded again in the order, so the order list reflects the input
/// faithfully, duplicates included.
///
/// Keys are validated on insertion; see [`validate_sequence_key`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructureDataset {
    bundles: BTreeMap<String, StructureBundle>,
    sequence_order: Vec<String>,
}

impl StructureDataset {
    /// Creates an empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a bundle under `key`, replacing and returning any previous one.
    pub fn insert(
        &mut self,
        key: &str,
        bundle: StructureBundle,
    ) -> Result<Option<StructureBundle>, InvalidKeyError> {
        validate_sequence_key(key)?;
        Ok(self.bundles.insert(key.to_string(), bundle))
    }

    /// Appends `key` to the recorded visit order.
    ///
    /// This is independent of [`insert`](Self::insert): callers record every
    /// visit, including repeats of a key that is already stored.
    pub fn push_order(&mut self, key: &str) {
        self.sequence_order.push(key.to_string());
    }

    /// Looks up the bundle stored under `key`.
    pub fn get(&self, key: &str) -> Option<&StructureBundle> {
        self.bundles.get(key)
    }

    /// Returns `true` if a bundle is stored under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.bundles.contains_key(key)
    }

    /// Iterates over stored keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.bundles.keys().map(String::as_str)
    }

    /// Iterates over `(key, bundle)` pairs in sorted key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &StructureBundle)> {
        self.bundles.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The recorded visit order, duplicates included.
    pub fn sequence_order(&self) -> &[String] {
        &self.sequence_order
    }

    /// Number of distinct stored sequences.
    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    /// Returns `true` if no sequences are stored.
    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }

    /// Total number of atoms across all stored bundles.
    pub fn total_atoms(&self) -> usize {
        self.bundles.values().map(StructureBundle::len).sum()
    }
}
