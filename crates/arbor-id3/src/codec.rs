//! Label ⇄ index encoding for categorical domains.

use std::collections::HashMap;
use std::fmt;

use crate::error::Id3Error;

/// Encoded position of a label within its categorical domain.
///
/// Sixteen bits cover every categorical domain this crate is expected to see;
/// larger domains are rejected when the codec is built.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
    serde::Serialize, serde::Deserialize,
)]
pub struct ValueIndex(u16);

impl ValueIndex {
    /// Largest number of labels a single domain may hold.
    pub const MAX_DOMAIN_SIZE: usize = u16::MAX as usize + 1;

    /// Create a value index from a zero-based position.
    ///
    /// Returns `None` when `index` does not fit the encoding width.
    #[must_use]
    pub fn new(index: usize) -> Option<Self> {
        u16::try_from(index).ok().map(Self)
    }

    /// Return the zero-based position, usable as an array index.
    #[must_use]
    pub fn index(self) -> usize {
        usize::from(self.0)
    }
}

impl From<u16> for ValueIndex {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

impl fmt::Display for ValueIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ordered categorical domain with constant-time lookup in both directions.
///
/// The order of `labels` passed to [`ValueCodec::new`] fixes the encoding:
/// the label at position `i` encodes to `ValueIndex(i)`.
#[derive(Debug, Clone)]
pub struct ValueCodec {
    domain: String,
    labels: Vec<String>,
    lookup: HashMap<String, ValueIndex>,
}

impl ValueCodec {
    /// Build a codec for the named domain.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`Id3Error::DuplicateValue`] | A label appears twice |
    /// | [`Id3Error::DomainTooLarge`] | More than [`ValueIndex::MAX_DOMAIN_SIZE`] labels |
    pub fn new(domain: impl Into<String>, labels: Vec<String>) -> Result<Self, Id3Error> {
        let domain = domain.into();
        if labels.len() > ValueIndex::MAX_DOMAIN_SIZE {
            return Err(Id3Error::DomainTooLarge {
                domain,
                size: labels.len(),
                max: ValueIndex::MAX_DOMAIN_SIZE,
            });
        }

        let mut lookup = HashMap::with_capacity(labels.len());
        for (position, label) in labels.iter().enumerate() {
            // Bounded by the size check above.
            let index = ValueIndex(position as u16);
            if lookup.insert(label.clone(), index).is_some() {
                return Err(Id3Error::DuplicateValue {
                    domain,
                    label: label.clone(),
                });
            }
        }

        Ok(Self { domain, labels, lookup })
    }

    /// Encode a label.
    ///
    /// # Errors
    ///
    /// Returns [`Id3Error::OutOfRange`] if the label is not part of the domain.
    pub fn encode(&self, label: &str) -> Result<ValueIndex, Id3Error> {
        self.lookup
            .get(label)
            .copied()
            .ok_or_else(|| Id3Error::OutOfRange {
                domain: self.domain.clone(),
                label: label.to_string(),
            })
    }

    /// Decode an index back to its label, or `None` if it lies outside the domain.
    #[must_use]
    pub fn decode(&self, index: ValueIndex) -> Option<&str> {
        self.labels.get(index.index()).map(String::as_str)
    }

    /// Return `true` if `index` addresses a label of this domain.
    #[must_use]
    pub fn contains(&self, index: ValueIndex) -> bool {
        index.index() < self.labels.len()
    }

    /// Name of the domain.
    #[must_use]
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Labels in encoding order.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Iterate `(index, label)` pairs in encoding order.
    pub fn iter(&self) -> impl Iterator<Item = (ValueIndex, &str)> {
        self.labels
            .iter()
            .enumerate()
            .map(|(i, label)| (ValueIndex(i as u16), label.as_str()))
    }

    /// Number of labels in the domain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Return `true` if the domain has no labels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
