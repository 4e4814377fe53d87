//! Confusion counts of a classifier against labelled instances.

use std::fmt;

use tracing::{info, instrument};

use crate::catalog::Catalog;
use crate::classifier::Classifier;
use crate::codec::ValueIndex;
use crate::dataset::Dataset;
use crate::error::Id3Error;

/// Per-class counts from which precision, recall and F1 are derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassCounts {
    /// The class label.
    pub class: ValueIndex,
    /// Instances of this class predicted as this class.
    pub true_positives: usize,
    /// Instances predicted as this class.
    pub predicted: usize,
    /// Instances whose true label is this class.
    pub actual: usize,
}

/// Confusion matrix with an extra column for unclassifiable instances.
///
/// Entry `matrix[actual][predicted]` counts instances with true label
/// `actual` that were classified as `predicted`; `unclassified[actual]`
/// counts those the tree could not classify.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    matrix: Vec<Vec<usize>>,
    unclassified: Vec<usize>,
    n_classes: usize,
}

impl Evaluation {
    /// Tally true labels against predictions.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`Id3Error::EmptyEvaluationSet`] | Zero labels provided |
    /// | [`Id3Error::PredictionCountMismatch`] | `actual` and `predicted` differ in length |
    /// | [`Id3Error::ValueOutOfRange`] | A label is `>= n_classes` |
    pub fn from_predictions(
        actual: &[ValueIndex],
        predicted: &[Option<ValueIndex>],
        n_classes: usize,
    ) -> Result<Self, Id3Error> {
        if actual.is_empty() {
            return Err(Id3Error::EmptyEvaluationSet);
        }
        if actual.len() != predicted.len() {
            return Err(Id3Error::PredictionCountMismatch {
                actual: actual.len(),
                predicted: predicted.len(),
            });
        }

        let out_of_range = |instance_index: usize, value: ValueIndex| Id3Error::ValueOutOfRange {
            instance_index,
            domain: Catalog::CLASS_DOMAIN.to_string(),
            value: value.index(),
            domain_size: n_classes,
        };

        let mut matrix = vec![vec![0usize; n_classes]; n_classes];
        let mut unclassified = vec![0usize; n_classes];
        for (i, (&t, &p)) in actual.iter().zip(predicted).enumerate() {
            if t.index() >= n_classes {
                return Err(out_of_range(i, t));
            }
            match p {
                Some(p) if p.index() >= n_classes => return Err(out_of_range(i, p)),
                Some(p) => matrix[t.index()][p.index()] += 1,
                None => unclassified[t.index()] += 1,
            }
        }

        Ok(Self {
            matrix,
            unclassified,
            n_classes,
        })
    }

    /// Classify every row of `dataset` and tally the results.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`Id3Error::EmptyEvaluationSet`] | `dataset` has no rows |
    /// | [`Id3Error::QueryWidthMismatch`] | `dataset` has a different attribute count |
    #[instrument(skip_all, fields(n_instances = dataset.n_instances()))]
    pub fn evaluate(classifier: &Classifier, dataset: &Dataset) -> Result<Self, Id3Error> {
        let predicted = classifier.classify_batch(dataset)?;
        let evaluation =
            Self::from_predictions(&dataset.class_labels(), &predicted, classifier.n_classes())?;
        info!(
            accuracy = evaluation.accuracy(),
            n_unclassified = evaluation.n_unclassified(),
            "evaluation complete"
        );
        Ok(evaluation)
    }

    /// True positives, predicted and actual counts for every class.
    #[must_use]
    pub fn class_counts(&self) -> Vec<ClassCounts> {
        (0..self.n_classes)
            .map(|c| ClassCounts {
                // Class domains are bounded by the codec width.
                class: ValueIndex::from(c as u16),
                true_positives: self.matrix[c][c],
                predicted: (0..self.n_classes).map(|t| self.matrix[t][c]).sum(),
                actual: self.matrix[c].iter().sum::<usize>() + self.unclassified[c],
            })
            .collect()
    }

    /// Number of evaluated instances, unclassifiable ones included.
    #[must_use]
    pub fn n_instances(&self) -> usize {
        self.matrix.iter().flatten().sum::<usize>() + self.n_unclassified()
    }

    /// Number of correctly classified instances.
    #[must_use]
    pub fn n_correct(&self) -> usize {
        (0..self.n_classes).map(|c| self.matrix[c][c]).sum()
    }

    /// Number of instances the tree could not classify.
    #[must_use]
    pub fn n_unclassified(&self) -> usize {
        self.unclassified.iter().sum()
    }

    /// Proportion of correct predictions; unclassifiable instances count as wrong.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        let total = self.n_instances();
        if total == 0 {
            0.0
        } else {
            self.n_correct() as f64 / total as f64
        }
    }

    /// Confusion matrix rows, indexed `[actual][predicted]`.
    #[must_use]
    pub fn as_rows(&self) -> &[Vec<usize>] {
        &self.matrix
    }

    /// Unclassifiable instance counts per actual class.
    #[must_use]
    pub fn unclassified_by_class(&self) -> &[usize] {
        &self.unclassified
    }

    /// Number of classes.
    #[must_use]
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>8}", "")?;
        for j in 0..self.n_classes {
            write!(f, " pred_{j:>3}")?;
        }
        writeln!(f, " {:>8}", "unknown")?;

        for (i, row) in self.matrix.iter().enumerate() {
            write!(f, "true_{i:>3}")?;
            for val in row {
                write!(f, " {val:>8}")?;
            }
            writeln!(f, " {:>8}", self.unclassified[i])?;
        }

        Ok(())
    }
}
