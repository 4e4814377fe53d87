use std::fmt;

use crate::catalog::AttributeIndex;
use crate::codec::ValueIndex;
use crate::entropy::Entropy;

/// Index into the node arena of a trained tree.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
    serde::Serialize, serde::Deserialize,
)]
pub struct NodeIndex(usize);

impl NodeIndex {
    /// Arena position of the root node.
    pub const ROOT: Self = Self(0);

    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Return the zero-based arena index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One outgoing edge of a split node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Branch {
    /// Attribute value routed along this edge.
    pub value: ValueIndex,
    /// Child reached for that value.
    pub child: NodeIndex,
}

/// Decision held by a node: a leaf classification or a split.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Terminal node predicting a single class.
    Leaf {
        /// Predicted class label.
        class: ValueIndex,
    },
    /// Interior node partitioning its instances by one attribute.
    Split {
        /// Attribute whose value selects the branch.
        attribute: AttributeIndex,
        /// One branch per attribute value observed among this node's instances,
        /// ascending by value.
        branches: Vec<Branch>,
        /// Information gain achieved by the split.
        information_gain: f64,
    },
}

/// A node in the tree arena.
///
/// `parent` is a plain arena index and never owns anything; it exists for
/// ancestor lookups only. Instance ids index rows of the training
/// [`Dataset`](crate::Dataset).
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub(crate) instance_ids: Vec<usize>,
    pub(crate) class_counts: Vec<usize>,
    pub(crate) entropy: Entropy,
    pub(crate) parent: Option<NodeIndex>,
    pub(crate) depth: usize,
    pub(crate) kind: NodeKind,
}

impl Node {
    /// Training rows that reached this node.
    #[must_use]
    pub fn instance_ids(&self) -> &[usize] {
        &self.instance_ids
    }

    /// Number of training rows that reached this node.
    #[must_use]
    pub fn n_instances(&self) -> usize {
        self.instance_ids.len()
    }

    /// Instance count per class label, indexed by class.
    #[must_use]
    pub fn class_counts(&self) -> &[usize] {
        &self.class_counts
    }

    /// Entropy of this node's class distribution.
    #[must_use]
    pub fn entropy(&self) -> Entropy {
        self.entropy
    }

    /// Parent node, `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<NodeIndex> {
        self.parent
    }

    /// Distance from the root (the root has depth 0).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The node's decision.
    #[must_use]
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Return `true` if this node is a leaf.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { .. })
    }

    /// Predicted class for a leaf, `None` for a split.
    #[must_use]
    pub fn class(&self) -> Option<ValueIndex> {
        match self.kind {
            NodeKind::Leaf { class } => Some(class),
            NodeKind::Split { .. } => None,
        }
    }

    /// Split attribute, `None` for a leaf.
    #[must_use]
    pub fn split_attribute(&self) -> Option<AttributeIndex> {
        match self.kind {
            NodeKind::Split { attribute, .. } => Some(attribute),
            NodeKind::Leaf { .. } => None,
        }
    }

    /// Outgoing branches; empty for a leaf.
    #[must_use]
    pub fn branches(&self) -> &[Branch] {
        match &self.kind {
            NodeKind::Split { branches, .. } => branches,
            NodeKind::Leaf { .. } => &[],
        }
    }

    /// Information gain of the split, `None` for a leaf.
    #[must_use]
    pub fn information_gain(&self) -> Option<f64> {
        match self.kind {
            NodeKind::Split { information_gain, .. } => Some(information_gain),
            NodeKind::Leaf { .. } => None,
        }
    }

    /// Child reached for `value`, or `None` if that value was never observed here.
    #[must_use]
    pub fn child_for(&self, value: ValueIndex) -> Option<NodeIndex> {
        self.branches()
            .binary_search_by_key(&value, |b| b.value)
            .ok()
            .map(|pos| self.branches()[pos].child)
    }

    /// Class with the highest count; ties go to the lowest class index.
    #[must_use]
    pub fn majority_class(&self) -> ValueIndex {
        majority_class(&self.class_counts)
    }
}

/// First class index reaching the maximum count.
pub(crate) fn majority_class(class_counts: &[usize]) -> ValueIndex {
    let mut best = 0usize;
    for (class, &count) in class_counts.iter().enumerate() {
        if count > class_counts[best] {
            best = class;
        }
    }
    // Class domains are bounded by the codec width.
    ValueIndex::from(best as u16)
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            NodeKind::Leaf { class } => write!(
                f,
                "{{class: {class}, instances: {}, depth: {}, entropy: {}}}",
                self.n_instances(),
                self.depth,
                self.entropy
            ),
            NodeKind::Split { attribute, branches, .. } => write!(
                f,
                "{{attribute: {attribute}, branches: {}, instances: {}, depth: {}, entropy: {}}}",
                branches.len(),
                self.n_instances(),
                self.depth,
                self.entropy
            ),
        }
    }
}
