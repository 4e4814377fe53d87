use std::collections::VecDeque;

use tracing::{debug, instrument};

use crate::catalog::{AttributeIndex, Catalog};
use crate::classifier::Classifier;
use crate::codec::ValueIndex;
use crate::dataset::Dataset;
use crate::entropy::{self, Entropy};
use crate::error::Id3Error;
use crate::node::{Branch, Node, NodeIndex, NodeKind, majority_class};

/// ID3 tree induction over a fixed attribute catalog.
///
/// Nodes are expanded breadth-first from a FIFO worklist. At every node the
/// eligible attribute with the highest information gain is chosen; the first
/// attribute (in catalog order) reaching the maximum wins ties. A node
/// becomes a leaf when its instances share one class or when every
/// attribute has already been used on its path from the root.
#[derive(Debug, Clone, Copy)]
pub struct Id3Trainer<'a> {
    catalog: &'a Catalog,
}

impl<'a> Id3Trainer<'a> {
    /// Create a trainer for datasets encoded against `catalog`.
    #[must_use]
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Return the catalog this trainer was built for.
    #[must_use]
    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    /// Build a decision tree from `dataset`.
    ///
    /// # Errors
    ///
    /// | Variant | When |
    /// |---|---|
    /// | [`Id3Error::EmptyTrainingSet`] | `dataset` has no rows |
    /// | [`Id3Error::ConfigurationError`] | An attribute has no possible values |
    /// | [`Id3Error::InstanceWidthMismatch`] | `dataset` was encoded for a different attribute count |
    /// | [`Id3Error::CatalogMismatch`] | `dataset` was encoded for different attribute or class domains |
    #[instrument(skip_all, fields(n_instances = dataset.n_instances(), n_attributes = self.catalog.n_attributes()))]
    pub fn fit(&self, dataset: &Dataset) -> Result<Classifier, Id3Error> {
        self.validate(dataset)?;

        let n_classes = self.catalog.n_classes();
        let root_ids: Vec<usize> = (0..dataset.n_instances()).collect();
        let mut arena = vec![new_node(dataset, root_ids, n_classes, None, 0)];
        let mut worklist = VecDeque::from([NodeIndex::ROOT]);

        while let Some(node_idx) = worklist.pop_front() {
            let eligible = self.eligible_attributes(&arena, node_idx);
            let node = &arena[node_idx.index()];
            let n_present = node.class_counts.iter().filter(|&&c| c > 0).count();

            // Every node starts life as a majority-class leaf.
            if n_present <= 1 || eligible.is_empty() {
                debug!(
                    node = %node_idx,
                    class = %node.majority_class(),
                    n_instances = node.n_instances(),
                    "leaf"
                );
                continue;
            }

            let Some(best) = self.best_partition(dataset, node, &eligible) else {
                continue;
            };

            debug!(
                node = %node_idx,
                attribute = %best.attribute,
                gain = best.gain,
                n_children = best.buckets.len(),
                "split"
            );

            let depth = node.depth + 1;
            let mut branches = Vec::with_capacity(best.buckets.len());
            for (value, ids) in best.buckets {
                let child_idx = NodeIndex::new(arena.len());
                arena.push(new_node(dataset, ids, n_classes, Some(node_idx), depth));
                branches.push(Branch { value, child: child_idx });
                worklist.push_back(child_idx);
            }

            arena[node_idx.index()].kind = NodeKind::Split {
                attribute: best.attribute,
                branches,
                information_gain: best.gain,
            };
        }

        debug!(n_nodes = arena.len(), "decision tree built");

        Ok(Classifier::new(arena, self.catalog.n_attributes(), n_classes))
    }

    fn validate(&self, dataset: &Dataset) -> Result<(), Id3Error> {
        if dataset.is_empty() {
            return Err(Id3Error::EmptyTrainingSet);
        }
        if let Some(attribute) = self.catalog.attributes().iter().find(|a| a.n_values() == 0) {
            return Err(Id3Error::ConfigurationError {
                reason: format!("attribute \"{}\" has no possible values", attribute.name()),
            });
        }
        if dataset.n_attributes() != self.catalog.n_attributes() {
            return Err(Id3Error::InstanceWidthMismatch {
                expected: self.catalog.row_width(),
                got: dataset.n_attributes() + 1,
                instance_index: 0,
            });
        }
        let domains = self.catalog.attributes().iter().zip(dataset.domain_sizes());
        for (attribute, &dataset_size) in domains {
            if attribute.n_values() != dataset_size {
                return Err(Id3Error::CatalogMismatch {
                    reason: format!(
                        "attribute \"{}\" has {} values, dataset was encoded for {}",
                        attribute.name(),
                        attribute.n_values(),
                        dataset_size
                    ),
                });
            }
        }
        if dataset.n_classes() != self.catalog.n_classes() {
            return Err(Id3Error::CatalogMismatch {
                reason: format!(
                    "catalog has {} classes, dataset was encoded for {}",
                    self.catalog.n_classes(),
                    dataset.n_classes()
                ),
            });
        }
        Ok(())
    }

    /// Attributes not used by any ancestor of `node_idx`, in catalog order.
    fn eligible_attributes(&self, arena: &[Node], node_idx: NodeIndex) -> Vec<AttributeIndex> {
        let mut used = vec![false; self.catalog.n_attributes()];
        let mut cursor = arena[node_idx.index()].parent;
        while let Some(ancestor) = cursor {
            let ancestor = &arena[ancestor.index()];
            if let Some(attribute) = ancestor.split_attribute() {
                used[attribute.index()] = true;
            }
            cursor = ancestor.parent;
        }
        self.catalog
            .attribute_indices()
            .filter(|a| !used[a.index()])
            .collect()
    }

    /// Partition `node` by every eligible attribute and keep the one with the highest gain.
    fn best_partition(
        &self,
        dataset: &Dataset,
        node: &Node,
        eligible: &[AttributeIndex],
    ) -> Option<Partition> {
        let n_classes = self.catalog.n_classes();
        let mut best: Option<Partition> = None;
        let mut best_gain = f64::NEG_INFINITY;

        for &attribute in eligible {
            let n_values = self
                .catalog
                .attribute(attribute)
                .map_or(0, |a| a.n_values());
            let mut buckets: Vec<Vec<usize>> = vec![Vec::new(); n_values];
            for &i in &node.instance_ids {
                buckets[dataset.value(i, attribute).index()].push(i);
            }

            let buckets: Vec<(ValueIndex, Vec<usize>)> = buckets
                .into_iter()
                .enumerate()
                .filter(|(_, ids)| !ids.is_empty())
                .map(|(value, ids)| (ValueIndex::from(value as u16), ids))
                .collect();

            let children = buckets.iter().map(|(_, ids)| {
                let counts = entropy::class_counts(dataset, ids, n_classes);
                (entropy::entropy(&counts), ids.len())
            });
            let gain = entropy::information_gain(node.entropy, node.n_instances(), children);

            if gain > best_gain {
                best_gain = gain;
                best = Some(Partition { attribute, gain, buckets });
            }
        }

        best
    }
}

/// Train an ID3 decision tree. Shorthand for `Id3Trainer::new(catalog).fit(dataset)`.
///
/// # Errors
///
/// See [`Id3Trainer::fit`].
pub fn train(catalog: &Catalog, dataset: &Dataset) -> Result<Classifier, Id3Error> {
    Id3Trainer::new(catalog).fit(dataset)
}

/// Candidate split of a node: non-empty value buckets of one attribute.
struct Partition {
    attribute: AttributeIndex,
    gain: f64,
    buckets: Vec<(ValueIndex, Vec<usize>)>,
}

fn new_node(
    dataset: &Dataset,
    instance_ids: Vec<usize>,
    n_classes: usize,
    parent: Option<NodeIndex>,
    depth: usize,
) -> Node {
    let class_counts = entropy::class_counts(dataset, &instance_ids, n_classes);
    let entropy: Entropy = entropy::entropy(&class_counts);
    let class = majority_class(&class_counts);
    Node {
        instance_ids,
        class_counts,
        entropy,
        parent,
        depth,
        kind: NodeKind::Leaf { class },
    }
}
