//! Encoded instance matrix shared by every node during training.

use crate::catalog::{AttributeIndex, Catalog};
use crate::codec::ValueIndex;
use crate::error::Id3Error;

/// Row-major matrix of encoded instances.
///
/// Each row holds one value per attribute followed by the class label.
/// Rows are addressed by their zero-based index; tree nodes store these
/// indices instead of copies of the rows.
///
/// The domain sizes of the catalog the rows were validated against are kept
/// alongside, so a trainer can reject a dataset encoded for another catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    values: Vec<ValueIndex>,
    n_attributes: usize,
    n_instances: usize,
    domain_sizes: Vec<usize>,
    n_classes: usize,
}

impl Dataset {
    /// Build a dataset from encoded rows, validating them against `catalog`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`Id3Error::InstanceWidthMismatch`] | A row is not `n_attributes + 1` wide |
    /// | [`Id3Error::ValueOutOfRange`] | A value lies outside its column's domain |
    pub fn new(catalog: &Catalog, rows: Vec<Vec<ValueIndex>>) -> Result<Self, Id3Error> {
        let width = catalog.row_width();
        let mut values = Vec::with_capacity(rows.len() * width);

        for (instance_index, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(Id3Error::InstanceWidthMismatch {
                    expected: width,
                    got: row.len(),
                    instance_index,
                });
            }
            let (attribute_values, class) = row.split_at(catalog.n_attributes());
            for (attribute, &value) in catalog.attributes().iter().zip(attribute_values) {
                if !attribute.values().contains(value) {
                    return Err(Id3Error::ValueOutOfRange {
                        instance_index,
                        domain: attribute.name().to_string(),
                        value: value.index(),
                        domain_size: attribute.n_values(),
                    });
                }
            }
            if !catalog.classes().contains(class[0]) {
                return Err(Id3Error::ValueOutOfRange {
                    instance_index,
                    domain: Catalog::CLASS_DOMAIN.to_string(),
                    value: class[0].index(),
                    domain_size: catalog.n_classes(),
                });
            }
            values.extend_from_slice(row);
        }

        Ok(Self {
            values,
            n_attributes: catalog.n_attributes(),
            n_instances: rows.len(),
            domain_sizes: catalog.attributes().iter().map(|a| a.n_values()).collect(),
            n_classes: catalog.n_classes(),
        })
    }

    /// Number of instances (rows).
    #[must_use]
    pub fn n_instances(&self) -> usize {
        self.n_instances
    }

    /// Number of attribute columns (excluding the class column).
    #[must_use]
    pub fn n_attributes(&self) -> usize {
        self.n_attributes
    }

    /// Number of values of every attribute in the validating catalog, in column order.
    #[must_use]
    pub fn domain_sizes(&self) -> &[usize] {
        &self.domain_sizes
    }

    /// Number of class labels in the validating catalog.
    #[must_use]
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Return `true` if the dataset has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.n_instances == 0
    }

    /// Full encoded row, class label last.
    ///
    /// # Panics
    ///
    /// Panics if `instance` is out of bounds.
    #[must_use]
    pub fn row(&self, instance: usize) -> &[ValueIndex] {
        let width = self.n_attributes + 1;
        &self.values[instance * width..(instance + 1) * width]
    }

    /// Attribute values of a row, without the class label.
    ///
    /// # Panics
    ///
    /// Panics if `instance` is out of bounds.
    #[must_use]
    pub fn attribute_values(&self, instance: usize) -> &[ValueIndex] {
        &self.row(instance)[..self.n_attributes]
    }

    /// Encoded value of `attribute` for `instance`.
    ///
    /// # Panics
    ///
    /// Panics if `instance` or `attribute` is out of bounds.
    #[must_use]
    pub fn value(&self, instance: usize, attribute: AttributeIndex) -> ValueIndex {
        self.values[instance * (self.n_attributes + 1) + attribute.index()]
    }

    /// Encoded class label of `instance`.
    ///
    /// # Panics
    ///
    /// Panics if `instance` is out of bounds.
    #[must_use]
    pub fn class_of(&self, instance: usize) -> ValueIndex {
        self.values[instance * (self.n_attributes + 1) + self.n_attributes]
    }

    /// Class labels of every row, in row order.
    #[must_use]
    pub fn class_labels(&self) -> Vec<ValueIndex> {
        (0..self.n_instances).map(|i| self.class_of(i)).collect()
    }

    /// Copy the selected rows, in the given order, into a new dataset.
    ///
    /// # Panics
    ///
    /// Panics if any index is out of bounds.
    #[must_use]
    pub fn select(&self, instances: &[usize]) -> Self {
        let mut values = Vec::with_capacity(instances.len() * (self.n_attributes + 1));
        for &i in instances {
            values.extend_from_slice(self.row(i));
        }
        Self {
            values,
            n_attributes: self.n_attributes,
            n_instances: instances.len(),
            domain_sizes: self.domain_sizes.clone(),
            n_classes: self.n_classes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::car_like_catalog;

    fn v(i: u16) -> ValueIndex {
        ValueIndex::from(i)
    }

    fn sample() -> Dataset {
        let catalog = car_like_catalog();
        Dataset::new(
            &catalog,
            vec![vec![v(0), v(2), v(1)], vec![v(1), v(0), v(0)], vec![v(1), v(1), v(0)]],
        )
        .unwrap()
    }

    #[test]
    fn accessors_address_row_major_layout() {
        let ds = sample();
        assert_eq!(ds.n_instances(), 3);
        assert_eq!(ds.n_attributes(), 2);
        assert_eq!(ds.row(1), &[v(1), v(0), v(0)]);
        assert_eq!(ds.attribute_values(0), &[v(0), v(2)]);
        assert_eq!(ds.value(2, AttributeIndex::new(1)), v(1));
        assert_eq!(ds.class_of(0), v(1));
        assert_eq!(ds.class_labels(), vec![v(1), v(0), v(0)]);
    }

    #[test]
    fn select_copies_rows_in_order() {
        let ds = sample();
        let subset = ds.select(&[2, 0]);
        assert_eq!(subset.n_instances(), 2);
        assert_eq!(subset.row(0), ds.row(2));
        assert_eq!(subset.row(1), ds.row(0));
        assert_eq!(subset.domain_sizes(), ds.domain_sizes());
    }

    #[test]
    fn records_validating_domain_sizes() {
        let ds = sample();
        assert_eq!(ds.domain_sizes(), &[2, 3]);
        assert_eq!(ds.n_classes(), 2);
    }

    #[test]
    #[should_panic]
    fn class_of_out_of_bounds_panics() {
        sample().class_of(3);
    }

    #[test]
    fn width_mismatch_rejected() {
        let catalog = car_like_catalog();
        let err = Dataset::new(&catalog, vec![vec![v(0), v(0)]]).unwrap_err();
        assert!(matches!(err, Id3Error::InstanceWidthMismatch { expected: 3, got: 2, instance_index: 0 }));
    }

    #[test]
    fn attribute_value_outside_domain_rejected() {
        let catalog = car_like_catalog();
        let err = Dataset::new(&catalog, vec![vec![v(0), v(3), v(0)]]).unwrap_err();
        assert!(matches!(err, Id3Error::ValueOutOfRange { ref domain, value: 3, .. } if domain == "safety"));
    }

    #[test]
    fn class_outside_domain_rejected() {
        let catalog = car_like_catalog();
        let err = Dataset::new(&catalog, vec![vec![v(0), v(0), v(5)]]).unwrap_err();
        assert!(matches!(err, Id3Error::ValueOutOfRange { ref domain, .. } if domain == "class"));
    }

    #[test]
    fn empty_rows_give_empty_dataset() {
        let catalog = car_like_catalog();
        let ds = Dataset::new(&catalog, vec![]).unwrap();
        assert!(ds.is_empty());
    }
}
