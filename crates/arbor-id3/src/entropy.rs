//! Class-distribution entropy and information gain.

use std::fmt;

use crate::dataset::Dataset;

/// Entropy of a class distribution, normalised to the number of class labels.
///
/// Zero for a pure node; at most 1.0 for a uniform distribution over every
/// class label in the catalog.
#[derive(
    Debug, Clone, Copy, PartialEq, PartialOrd,
    serde::Serialize, serde::Deserialize,
)]
pub struct Entropy(f64);

impl Entropy {
    /// Entropy of a pure node.
    pub const ZERO: Self = Self(0.0);

    /// Return the raw entropy value.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Entropy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}", self.0)
    }
}

/// Count instances per class label.
///
/// The result has one slot per class label in the catalog, including
/// classes absent from `instances`.
pub(crate) fn class_counts(dataset: &Dataset, instances: &[usize], n_classes: usize) -> Vec<usize> {
    let mut counts = vec![0usize; n_classes];
    for &i in instances {
        counts[dataset.class_of(i).index()] += 1;
    }
    counts
}

/// Compute `-Σ p_i · log_k(p_i)` where `k = class_counts.len()`.
///
/// Classes with zero count contribute nothing. With fewer than two class
/// labels, or zero instances, the entropy is zero.
#[must_use]
pub fn entropy(class_counts: &[usize]) -> Entropy {
    let n_classes = class_counts.len();
    let n: usize = class_counts.iter().sum();
    if n == 0 || n_classes < 2 {
        return Entropy::ZERO;
    }
    let n = n as f64;
    let base = (n_classes as f64).ln();
    let value = -class_counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / n;
            p * p.ln() / base
        })
        .sum::<f64>();
    // A pure node evaluates to -0.0.
    Entropy(value.max(0.0))
}

/// Information gain of a partition:
/// `parent - Σ child_entropy · child_size / parent_size`.
#[must_use]
pub fn information_gain(
    parent: Entropy,
    parent_size: usize,
    children: impl IntoIterator<Item = (Entropy, usize)>,
) -> f64 {
    let total = parent_size as f64;
    children
        .into_iter()
        .fold(parent.value(), |gain, (child, size)| {
            gain - child.value() * size as f64 / total
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pure_distribution_is_zero() {
        assert_eq!(entropy(&[5, 0, 0]).value(), 0.0);
        assert_eq!(entropy(&[0, 7]).value(), 0.0);
    }

    #[test]
    fn balanced_binary_is_one() {
        assert!((entropy(&[3, 3]).value() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn uniform_over_all_classes_is_one() {
        assert!((entropy(&[2, 2, 2, 2]).value() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn base_is_number_of_catalog_classes() {
        // Two present classes out of four declared: log base 4, so 0.5 not 1.0.
        assert!((entropy(&[4, 4, 0, 0]).value() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn known_skewed_value() {
        // p = (0.25, 0.75), base 2
        let expected = -(0.25f64 * 0.25f64.log2() + 0.75 * 0.75f64.log2());
        assert!((entropy(&[1, 3]).value() - expected).abs() < 1e-12);
    }

    #[test]
    fn single_class_catalog_is_zero() {
        assert_eq!(entropy(&[9]).value(), 0.0);
    }

    #[test]
    fn empty_counts_are_zero() {
        assert_eq!(entropy(&[0, 0]).value(), 0.0);
    }

    #[test]
    fn perfect_split_gains_parent_entropy() {
        let parent = entropy(&[2, 2]);
        let gain = information_gain(parent, 4, [(entropy(&[2, 0]), 2), (entropy(&[0, 2]), 2)]);
        assert!((gain - 1.0).abs() < 1e-12);
    }

    #[test]
    fn uninformative_split_gains_nothing() {
        let parent = entropy(&[2, 2]);
        let gain = information_gain(parent, 4, [(entropy(&[1, 1]), 2), (entropy(&[1, 1]), 2)]);
        assert!(gain.abs() < 1e-12);
    }

    #[test]
    fn display_six_decimals() {
        assert_eq!(format!("{}", entropy(&[1, 1])), "1.000000");
    }
}
