//! Stratified train/test splitting.

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use tracing::{info, instrument};

use crate::dataset::Dataset;
use crate::error::Id3Error;

/// Hold-out split configuration.
///
/// Construct via [`HoldoutSplit::new`], then chain `with_seed` if desired.
#[derive(Debug, Clone, Copy)]
pub struct HoldoutSplit {
    test_fraction: f64,
    seed: u64,
}

/// Train and test partitions of a dataset.
#[derive(Debug, Clone)]
pub struct Holdout {
    /// Rows used for training.
    pub train: Dataset,
    /// Rows held out for evaluation.
    pub test: Dataset,
    /// Original row indices of `train`, in order.
    pub train_indices: Vec<usize>,
    /// Original row indices of `test`, in order.
    pub test_indices: Vec<usize>,
}

impl HoldoutSplit {
    /// Create a split that holds out `test_fraction` of every class.
    ///
    /// # Errors
    ///
    /// Returns [`Id3Error::InvalidTestFraction`] unless `0.0 < test_fraction < 1.0`.
    pub fn new(test_fraction: f64) -> Result<Self, Id3Error> {
        if !(test_fraction > 0.0 && test_fraction < 1.0) {
            return Err(Id3Error::InvalidTestFraction {
                fraction: test_fraction,
            });
        }
        Ok(Self {
            test_fraction,
            seed: 42,
        })
    }

    /// Set the random seed for shuffling.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Return the test fraction.
    #[must_use]
    pub fn test_fraction(&self) -> f64 {
        self.test_fraction
    }

    /// Return the random seed.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Split `dataset` into train and test partitions.
    ///
    /// Rows are grouped by class and shuffled within each class; each class
    /// sends `round(n_class * test_fraction)` rows to the test set, keeping
    /// at least one row of every class in the training set.
    ///
    /// # Errors
    ///
    /// Returns [`Id3Error::EmptyTrainingSet`] if `dataset` has no rows.
    #[instrument(skip_all, fields(n_instances = dataset.n_instances(), test_fraction = self.test_fraction))]
    pub fn split(&self, dataset: &Dataset) -> Result<Holdout, Id3Error> {
        if dataset.is_empty() {
            return Err(Id3Error::EmptyTrainingSet);
        }

        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);

        let n_classes = dataset
            .class_labels()
            .iter()
            .map(|c| c.index() + 1)
            .max()
            .unwrap_or(0);
        let mut class_indices: Vec<Vec<usize>> = vec![Vec::new(); n_classes];
        for i in 0..dataset.n_instances() {
            class_indices[dataset.class_of(i).index()].push(i);
        }

        let mut train_indices = Vec::new();
        let mut test_indices = Vec::new();
        for indices in &mut class_indices {
            if indices.is_empty() {
                continue;
            }
            indices.shuffle(&mut rng);
            let n_test = ((indices.len() as f64 * self.test_fraction).round() as usize)
                .min(indices.len() - 1);
            test_indices.extend_from_slice(&indices[..n_test]);
            train_indices.extend_from_slice(&indices[n_test..]);
        }
        train_indices.sort_unstable();
        test_indices.sort_unstable();

        info!(
            n_train = train_indices.len(),
            n_test = test_indices.len(),
            "hold-out split"
        );

        Ok(Holdout {
            train: dataset.select(&train_indices),
            test: dataset.select(&test_indices),
            train_indices,
            test_indices,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::strings;
    use crate::catalog::{Attribute, Catalog};
    use crate::codec::ValueIndex;

    fn dataset(n_per_class: usize) -> Dataset {
        let catalog = Catalog::new(
            vec![Attribute::new("a", strings(&["x", "y"])).unwrap()],
            strings(&["p", "q", "r"]),
        )
        .unwrap();
        let rows = (0..3 * n_per_class)
            .map(|i| vec![ValueIndex::from((i % 2) as u16), ValueIndex::from((i % 3) as u16)])
            .collect();
        Dataset::new(&catalog, rows).unwrap()
    }

    #[test]
    fn rejects_invalid_fraction() {
        for fraction in [0.0, 1.0, -0.5, 1.5, f64::NAN] {
            assert!(matches!(
                HoldoutSplit::new(fraction),
                Err(Id3Error::InvalidTestFraction { .. })
            ));
        }
    }

    #[test]
    fn partitions_cover_every_row_once() {
        let ds = dataset(10);
        let holdout = HoldoutSplit::new(0.3).unwrap().split(&ds).unwrap();
        let mut all: Vec<usize> = holdout
            .train_indices
            .iter()
            .chain(&holdout.test_indices)
            .copied()
            .collect();
        all.sort_unstable();
        assert_eq!(all, (0..30).collect::<Vec<_>>());
        assert_eq!(holdout.test.n_instances(), 9);
        assert_eq!(holdout.train.n_instances(), 21);
    }

    #[test]
    fn split_is_stratified() {
        let ds = dataset(10);
        let holdout = HoldoutSplit::new(0.2).unwrap().split(&ds).unwrap();
        let mut per_class = [0usize; 3];
        for c in holdout.test.class_labels() {
            per_class[c.index()] += 1;
        }
        assert_eq!(per_class, [2, 2, 2]);
    }

    #[test]
    fn rows_are_copied_from_original() {
        let ds = dataset(4);
        let holdout = HoldoutSplit::new(0.5).unwrap().split(&ds).unwrap();
        for (pos, &original) in holdout.test_indices.iter().enumerate() {
            assert_eq!(holdout.test.row(pos), ds.row(original));
        }
    }

    #[test]
    fn same_seed_same_split() {
        let ds = dataset(10);
        let a = HoldoutSplit::new(0.3).unwrap().with_seed(7).split(&ds).unwrap();
        let b = HoldoutSplit::new(0.3).unwrap().with_seed(7).split(&ds).unwrap();
        assert_eq!(a.test_indices, b.test_indices);
    }

    #[test]
    fn keeps_one_training_row_per_class() {
        let ds = dataset(1);
        let holdout = HoldoutSplit::new(0.9).unwrap().split(&ds).unwrap();
        assert_eq!(holdout.train.n_instances(), 3);
        assert!(holdout.test.is_empty());
    }
}
