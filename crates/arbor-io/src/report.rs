//! Precision, recall and F1 report derived from an [`Evaluation`].

use std::fmt;

use arbor_id3::{Catalog, Evaluation, Id3Error};
use serde::Serialize;

/// Scores for a single class.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassStatistics {
    /// Class label.
    pub label: String,
    /// `tp / predicted`, or 0 when the class was never predicted.
    pub precision: f64,
    /// `tp / support`, or 0 when the class never occurs.
    pub recall: f64,
    /// Harmonic mean of precision and recall, or 0 when both are 0.
    pub f1: f64,
    /// Number of instances whose true label is this class.
    pub support: usize,
    /// Instances of this class predicted as this class.
    pub true_positives: usize,
    /// Instances predicted as this class.
    pub predicted: usize,
}

/// Precision, recall and F1 averaged over classes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AveragedStatistics {
    /// Averaged precision.
    pub precision: f64,
    /// Averaged recall.
    pub recall: f64,
    /// Averaged F1.
    pub f1: f64,
}

/// Per-class and averaged classification statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticsReport {
    /// Scores in catalog class order.
    pub classes: Vec<ClassStatistics>,
    /// Unweighted mean over all classes.
    pub macro_average: AveragedStatistics,
    /// Mean weighted by class support.
    pub weighted_average: AveragedStatistics,
    /// Correct predictions over all instances; unclassifiable ones count as wrong.
    pub accuracy: f64,
    /// Number of evaluated instances.
    pub n_instances: usize,
    /// Instances that reached no leaf.
    pub n_unclassified: usize,
}

impl StatisticsReport {
    /// Compute the report, resolving class labels through `catalog`.
    ///
    /// # Errors
    ///
    /// Returns [`Id3Error::CatalogMismatch`] if `catalog` has a different
    /// number of classes than `evaluation`.
    pub fn from_evaluation(evaluation: &Evaluation, catalog: &Catalog) -> Result<Self, Id3Error> {
        if evaluation.n_classes() != catalog.n_classes() {
            return Err(Id3Error::CatalogMismatch {
                reason: format!(
                    "evaluation has {} classes, catalog has {}",
                    evaluation.n_classes(),
                    catalog.n_classes()
                ),
            });
        }

        let classes: Vec<ClassStatistics> = evaluation
            .class_counts()
            .into_iter()
            .zip(catalog.classes().labels())
            .map(|(counts, label)| {
                let precision = ratio(counts.true_positives, counts.predicted);
                let recall = ratio(counts.true_positives, counts.actual);
                ClassStatistics {
                    label: label.clone(),
                    precision,
                    recall,
                    f1: f1(precision, recall),
                    support: counts.actual,
                    true_positives: counts.true_positives,
                    predicted: counts.predicted,
                }
            })
            .collect();

        let n_instances = evaluation.n_instances();
        let macro_average = average(&classes, |_| 1.0 / classes.len() as f64);
        let weighted_average = average(&classes, |c| ratio(c.support, n_instances));

        Ok(Self {
            classes,
            macro_average,
            weighted_average,
            accuracy: evaluation.accuracy(),
            n_instances,
            n_unclassified: evaluation.n_unclassified(),
        })
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn f1(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}

fn average<W>(classes: &[ClassStatistics], weight: W) -> AveragedStatistics
where
    W: Fn(&ClassStatistics) -> f64,
{
    classes.iter().fold(
        AveragedStatistics {
            precision: 0.0,
            recall: 0.0,
            f1: 0.0,
        },
        |acc, c| {
            let w = weight(c);
            AveragedStatistics {
                precision: acc.precision + w * c.precision,
                recall: acc.recall + w * c.recall,
                f1: acc.f1 + w * c.f1,
            }
        },
    )
}

impl fmt::Display for StatisticsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .classes
            .iter()
            .map(|c| c.label.len())
            .chain(std::iter::once("weighted avg".len()))
            .max()
            .unwrap_or(0);

        writeln!(
            f,
            "{:<width$} {:>9} {:>9} {:>9} {:>9}",
            "", "precision", "recall", "f1", "support"
        )?;
        for c in &self.classes {
            writeln!(
                f,
                "{:<width$} {:>9.4} {:>9.4} {:>9.4} {:>9}",
                c.label, c.precision, c.recall, c.f1, c.support
            )?;
        }
        writeln!(f)?;
        for (name, avg) in [
            ("macro avg", &self.macro_average),
            ("weighted avg", &self.weighted_average),
        ] {
            writeln!(
                f,
                "{:<width$} {:>9.4} {:>9.4} {:>9.4} {:>9}",
                name, avg.precision, avg.recall, avg.f1, self.n_instances
            )?;
        }
        writeln!(f, "{:<width$} {:>9.4}", "accuracy", self.accuracy)?;
        write!(f, "{:<width$} {:>9}", "unclassified", self.n_unclassified)
    }
}
