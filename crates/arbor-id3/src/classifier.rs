//! Trained ID3 tree and classification queries.

use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::codec::ValueIndex;
use crate::dataset::Dataset;
use crate::error::Id3Error;
use crate::node::{Node, NodeIndex};

/// A trained decision tree.
///
/// Owns the node arena exclusively; the root lives at [`NodeIndex::ROOT`].
/// Nothing is mutated after training, so a classifier can be shared across
/// threads and queried concurrently.
#[derive(Debug, Clone, PartialEq)]
pub struct Classifier {
    nodes: Vec<Node>,
    n_attributes: usize,
    n_classes: usize,
}

impl Classifier {
    pub(crate) fn new(nodes: Vec<Node>, n_attributes: usize, n_classes: usize) -> Self {
        debug_assert!(!nodes.is_empty(), "a trained tree has at least a root");
        Self {
            nodes,
            n_attributes,
            n_classes,
        }
    }

    /// Classify one instance given its attribute values (no class column).
    ///
    /// Returns `Ok(None)` when the instance carries a value that no training
    /// instance routed through the same decision node had.
    ///
    /// # Errors
    ///
    /// Returns [`Id3Error::QueryWidthMismatch`] when `instance.len()` differs
    /// from the number of attributes the tree was trained on.
    pub fn classify(&self, instance: &[ValueIndex]) -> Result<Option<ValueIndex>, Id3Error> {
        if instance.len() != self.n_attributes {
            return Err(Id3Error::QueryWidthMismatch {
                expected: self.n_attributes,
                got: instance.len(),
            });
        }
        Ok(self.traverse(instance).and_then(|leaf| self.nodes[leaf.index()].class()))
    }

    /// Classify every row of `dataset` in parallel, preserving row order.
    ///
    /// # Errors
    ///
    /// Returns [`Id3Error::QueryWidthMismatch`] when the dataset was encoded
    /// for a different number of attributes.
    pub fn classify_batch(&self, dataset: &Dataset) -> Result<Vec<Option<ValueIndex>>, Id3Error> {
        if dataset.n_attributes() != self.n_attributes {
            return Err(Id3Error::QueryWidthMismatch {
                expected: self.n_attributes,
                got: dataset.n_attributes(),
            });
        }
        Ok((0..dataset.n_instances())
            .into_par_iter()
            .map(|i| {
                self.traverse(dataset.attribute_values(i))
                    .and_then(|leaf| self.nodes[leaf.index()].class())
            })
            .collect())
    }

    /// Walk from the root to the leaf selected by `instance`.
    fn traverse(&self, instance: &[ValueIndex]) -> Option<NodeIndex> {
        let mut idx = NodeIndex::ROOT;
        loop {
            let node = &self.nodes[idx.index()];
            match node.split_attribute() {
                None => return Some(idx),
                Some(attribute) => idx = node.child_for(instance[attribute.index()])?,
            }
        }
    }

    /// The root node.
    #[must_use]
    pub fn root(&self) -> &Node {
        &self.nodes[NodeIndex::ROOT.index()]
    }

    /// Look up a node by arena index.
    ///
    /// # Panics
    ///
    /// Panics if `index` does not belong to this tree.
    #[must_use]
    pub fn node(&self, index: NodeIndex) -> &Node {
        &self.nodes[index.index()]
    }

    /// All nodes in breadth-first creation order.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Arena indices of every leaf.
    pub fn leaves(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.is_leaf())
            .map(|(i, _)| NodeIndex::new(i))
    }

    /// Nodes from the root down to `index`, inclusive.
    #[must_use]
    pub fn path_to(&self, index: NodeIndex) -> Vec<NodeIndex> {
        let mut path = vec![index];
        let mut cursor = self.nodes[index.index()].parent();
        while let Some(parent) = cursor {
            path.push(parent);
            cursor = self.nodes[parent.index()].parent();
        }
        path.reverse();
        path
    }

    /// Total number of nodes.
    #[must_use]
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of leaves.
    #[must_use]
    pub fn n_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Depth of the deepest leaf; a lone root leaf has depth 0.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.nodes.iter().map(Node::depth).max().unwrap_or(0)
    }

    /// Number of attributes the tree was trained on.
    #[must_use]
    pub fn n_attributes(&self) -> usize {
        self.n_attributes
    }

    /// Number of class labels in the training catalog.
    #[must_use]
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }
}
