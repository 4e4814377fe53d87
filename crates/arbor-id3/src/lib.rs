//! ID3 decision tree induction over categorical attributes.
//!
//! Builds a multiway decision tree by greedy, entropy-based attribute
//! selection, classifies unseen instances against it, and tallies the
//! per-class counts needed for precision/recall/F1 reporting.

mod catalog;
mod classifier;
mod codec;
mod dataset;
mod entropy;
mod error;
mod evaluation;
mod export;
mod holdout;
mod node;
mod trainer;

pub use catalog::{Attribute, AttributeIndex, Catalog};
pub use classifier::Classifier;
pub use codec::{ValueCodec, ValueIndex};
pub use dataset::Dataset;
pub use entropy::{Entropy, entropy, information_gain};
pub use error::Id3Error;
pub use evaluation::{ClassCounts, Evaluation};
pub use export::{BranchDocument, ClassCount, NodeSummary, TreeDocument};
pub use holdout::{Holdout, HoldoutSplit};
pub use node::{Branch, Node, NodeIndex, NodeKind};
pub use trainer::{Id3Trainer, train};
