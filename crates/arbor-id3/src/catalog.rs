//! Static description of the attribute space and the class labels.

use std::fmt;

use crate::codec::{ValueCodec, ValueIndex};
use crate::error::Id3Error;

/// Zero-based position of an attribute within its [`Catalog`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
    serde::Serialize, serde::Deserialize,
)]
pub struct AttributeIndex(usize);

impl AttributeIndex {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Return the zero-based attribute position.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for AttributeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named categorical attribute and its ordered set of possible values.
#[derive(Debug, Clone)]
pub struct Attribute {
    values: ValueCodec,
}

impl Attribute {
    /// Create an attribute from its name and possible values.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`Id3Error::ConfigurationError`] | `possible_values` is empty |
    /// | [`Id3Error::DuplicateValue`] | A value is declared twice |
    /// | [`Id3Error::DomainTooLarge`] | Too many values to encode |
    pub fn new(name: impl Into<String>, possible_values: Vec<String>) -> Result<Self, Id3Error> {
        let name = name.into();
        if possible_values.is_empty() {
            return Err(Id3Error::ConfigurationError {
                reason: format!("attribute \"{name}\" has no possible values"),
            });
        }
        Ok(Self {
            values: ValueCodec::new(name, possible_values)?,
        })
    }

    /// Attribute name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.values.domain()
    }

    /// Codec over the attribute's possible values.
    #[must_use]
    pub fn values(&self) -> &ValueCodec {
        &self.values
    }

    /// Number of possible values.
    #[must_use]
    pub fn n_values(&self) -> usize {
        self.values.len()
    }
}

/// Ordered attributes plus the ordered class labels.
///
/// An attribute's position in the catalog is its identity everywhere else
/// in the crate ([`AttributeIndex`]); class label order fixes both the
/// encoding and the leaf tie-break order.
#[derive(Debug, Clone)]
pub struct Catalog {
    attributes: Vec<Attribute>,
    classes: ValueCodec,
}

impl Catalog {
    /// Domain name used for the class label codec.
    pub const CLASS_DOMAIN: &'static str = "class";

    /// Build a catalog from attributes and class labels.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`Id3Error::ConfigurationError`] | Zero class labels |
    /// | [`Id3Error::DuplicateValue`] | A class label is declared twice |
    /// | [`Id3Error::DomainTooLarge`] | Too many class labels to encode |
    pub fn new(attributes: Vec<Attribute>, class_labels: Vec<String>) -> Result<Self, Id3Error> {
        if class_labels.is_empty() {
            return Err(Id3Error::ConfigurationError {
                reason: "catalog declares no class labels".to_string(),
            });
        }
        let classes = ValueCodec::new(Self::CLASS_DOMAIN, class_labels)?;
        Ok(Self { attributes, classes })
    }

    /// Attributes in catalog order.
    #[must_use]
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Look up an attribute by index.
    #[must_use]
    pub fn attribute(&self, index: AttributeIndex) -> Option<&Attribute> {
        self.attributes.get(index.index())
    }

    /// Iterate attribute indices in natural order.
    pub fn attribute_indices(&self) -> impl Iterator<Item = AttributeIndex> + '_ {
        (0..self.attributes.len()).map(AttributeIndex::new)
    }

    /// Find an attribute by name.
    #[must_use]
    pub fn attribute_by_name(&self, name: &str) -> Option<AttributeIndex> {
        self.attributes
            .iter()
            .position(|a| a.name() == name)
            .map(AttributeIndex::new)
    }

    /// Codec over the class labels.
    #[must_use]
    pub fn classes(&self) -> &ValueCodec {
        &self.classes
    }

    /// Number of attributes.
    #[must_use]
    pub fn n_attributes(&self) -> usize {
        self.attributes.len()
    }

    /// Number of class labels.
    #[must_use]
    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    /// Width of an encoded instance row: one column per attribute plus the class.
    #[must_use]
    pub fn row_width(&self) -> usize {
        self.attributes.len() + 1
    }

    /// Encode a row of raw labels (attribute values followed by the class label).
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`Id3Error::InstanceWidthMismatch`] | `labels.len() != row_width()` |
    /// | [`Id3Error::OutOfRange`] | A label is not in its column's domain |
    pub fn encode_row(&self, labels: &[&str], instance_index: usize) -> Result<Vec<ValueIndex>, Id3Error> {
        if labels.len() != self.row_width() {
            return Err(Id3Error::InstanceWidthMismatch {
                expected: self.row_width(),
                got: labels.len(),
                instance_index,
            });
        }
        let (values, class) = labels.split_at(self.attributes.len());
        let mut row = self.encode_query(values)?;
        row.push(self.classes.encode(class[0])?);
        Ok(row)
    }

    /// Encode attribute labels of an unlabelled instance.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`Id3Error::QueryWidthMismatch`] | `labels.len() != n_attributes()` |
    /// | [`Id3Error::OutOfRange`] | A label is not in its attribute's domain |
    pub fn encode_query(&self, labels: &[&str]) -> Result<Vec<ValueIndex>, Id3Error> {
        if labels.len() != self.attributes.len() {
            return Err(Id3Error::QueryWidthMismatch {
                expected: self.attributes.len(),
                got: labels.len(),
            });
        }
        self.attributes
            .iter()
            .zip(labels)
            .map(|(attribute, label)| attribute.values().encode(label))
            .collect()
    }

    /// Decode a class index to its label.
    #[must_use]
    pub fn class_label(&self, class: ValueIndex) -> Option<&str> {
        self.classes.decode(class)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    pub(crate) fn car_like_catalog() -> Catalog {
        let attributes = vec![
            Attribute::new("buying", strings(&["high", "low"])).unwrap(),
            Attribute::new("safety", strings(&["low", "med", "high"])).unwrap(),
        ];
        Catalog::new(attributes, strings(&["unacc", "acc"])).unwrap()
    }

    #[test]
    fn attribute_without_values_is_configuration_error() {
        let err = Attribute::new("empty", vec![]).unwrap_err();
        assert!(matches!(err, Id3Error::ConfigurationError { .. }));
    }

    #[test]
    fn catalog_without_classes_is_configuration_error() {
        let err = Catalog::new(vec![], vec![]).unwrap_err();
        assert!(matches!(err, Id3Error::ConfigurationError { .. }));
    }

    #[test]
    fn encode_row_places_class_last() {
        let catalog = car_like_catalog();
        let row = catalog.encode_row(&["low", "high", "acc"], 0).unwrap();
        let indices: Vec<usize> = row.iter().map(|v| v.index()).collect();
        assert_eq!(indices, vec![1, 2, 1]);
    }

    #[test]
    fn encode_row_width_mismatch() {
        let catalog = car_like_catalog();
        let err = catalog.encode_row(&["low", "acc"], 4).unwrap_err();
        assert_eq!(
            err,
            Id3Error::InstanceWidthMismatch { expected: 3, got: 2, instance_index: 4 }
        );
    }

    #[test]
    fn encode_row_unknown_class() {
        let catalog = car_like_catalog();
        let err = catalog.encode_row(&["low", "high", "vgood"], 0).unwrap_err();
        assert!(matches!(err, Id3Error::OutOfRange { ref domain, .. } if domain == "class"));
    }

    #[test]
    fn encode_query_rejects_wrong_width() {
        let catalog = car_like_catalog();
        let err = catalog.encode_query(&["low"]).unwrap_err();
        assert!(matches!(err, Id3Error::QueryWidthMismatch { expected: 2, got: 1 }));
    }

    #[test]
    fn attribute_lookup_by_name() {
        let catalog = car_like_catalog();
        let idx = catalog.attribute_by_name("safety").unwrap();
        assert_eq!(idx.index(), 1);
        assert_eq!(catalog.attribute(idx).unwrap().n_values(), 3);
        assert!(catalog.attribute_by_name("doors").is_none());
    }

    #[test]
    fn sizes() {
        let catalog = car_like_catalog();
        assert_eq!(catalog.n_attributes(), 2);
        assert_eq!(catalog.n_classes(), 2);
        assert_eq!(catalog.row_width(), 3);
        assert_eq!(catalog.class_label(ValueIndex::from(1)), Some("acc"));
    }
}
