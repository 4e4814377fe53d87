//! Label-resolved document view of a trained tree.
//!
//! [`TreeDocument`] mirrors the tree with every index replaced by its label
//! from the catalog, ready for a JSON writer or the indented text dump.

use std::fmt;

use serde::Serialize;

use crate::catalog::Catalog;
use crate::classifier::Classifier;
use crate::codec::{ValueCodec, ValueIndex};
use crate::error::Id3Error;
use crate::node::{NodeIndex, NodeKind};

/// Instance count for one class label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassCount {
    /// Class label.
    pub class: String,
    /// Number of training instances with that label.
    pub count: usize,
}

/// Diagnostics shared by split and leaf documents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeSummary {
    /// Entropy of the node's class distribution.
    pub entropy: f64,
    /// Number of training instances that reached the node.
    pub n_instances: usize,
    /// Class histogram in catalog order, every class included.
    pub class_counts: Vec<ClassCount>,
}

/// One labelled edge of a split document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BranchDocument {
    /// Attribute value routed along this edge.
    pub value: String,
    /// Subtree reached for that value.
    pub node: TreeDocument,
}

/// Recursive, label-resolved view of a tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TreeDocument {
    /// Interior node.
    Split {
        /// Name of the split attribute.
        attribute: String,
        /// Information gain of the split.
        information_gain: f64,
        /// Node diagnostics.
        #[serde(flatten)]
        summary: NodeSummary,
        /// Branches in attribute value order.
        branches: Vec<BranchDocument>,
    },
    /// Terminal node.
    Leaf {
        /// Predicted class label.
        class: String,
        /// Node diagnostics.
        #[serde(flatten)]
        summary: NodeSummary,
    },
}

impl TreeDocument {
    /// Build the document for `classifier`, resolving labels through `catalog`.
    ///
    /// # Errors
    ///
    /// Returns [`Id3Error::CatalogMismatch`] when the catalog's attribute or
    /// class count differs from the one the classifier was trained with.
    pub fn build(classifier: &Classifier, catalog: &Catalog) -> Result<Self, Id3Error> {
        if classifier.n_attributes() != catalog.n_attributes() {
            return Err(Id3Error::CatalogMismatch {
                reason: format!(
                    "classifier has {} attributes, catalog has {}",
                    classifier.n_attributes(),
                    catalog.n_attributes()
                ),
            });
        }
        if classifier.n_classes() != catalog.n_classes() {
            return Err(Id3Error::CatalogMismatch {
                reason: format!(
                    "classifier has {} classes, catalog has {}",
                    classifier.n_classes(),
                    catalog.n_classes()
                ),
            });
        }
        Ok(build_node(classifier, catalog, NodeIndex::ROOT))
    }

    /// Diagnostics of this node.
    #[must_use]
    pub fn summary(&self) -> &NodeSummary {
        match self {
            TreeDocument::Split { summary, .. } | TreeDocument::Leaf { summary, .. } => summary,
        }
    }

    /// Render the tree as indented text, one line per branch.
    ///
    /// ```text
    /// safety = low: unacc (576)
    /// safety = med
    /// |   persons = 2: unacc (192)
    /// ```
    #[must_use]
    pub fn render_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TreeDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeDocument::Leaf { class, summary } => {
                writeln!(f, ": {class} ({})", summary.n_instances)
            }
            TreeDocument::Split { .. } => render_branches(self, 0, f),
        }
    }
}

fn render_branches(
    document: &TreeDocument,
    level: usize,
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    let TreeDocument::Split { attribute, branches, .. } = document else {
        return Ok(());
    };
    let indent = "|   ".repeat(level);
    for branch in branches {
        match &branch.node {
            TreeDocument::Leaf { class, summary } => writeln!(
                f,
                "{indent}{attribute} = {}: {class} ({})",
                branch.value, summary.n_instances
            )?,
            split @ TreeDocument::Split { .. } => {
                writeln!(f, "{indent}{attribute} = {}", branch.value)?;
                render_branches(split, level + 1, f)?;
            }
        }
    }
    Ok(())
}

fn build_node(classifier: &Classifier, catalog: &Catalog, index: NodeIndex) -> TreeDocument {
    let node = classifier.node(index);
    let summary = NodeSummary {
        entropy: node.entropy().value(),
        n_instances: node.n_instances(),
        class_counts: catalog
            .classes()
            .iter()
            .map(|(class, label)| ClassCount {
                class: label.to_string(),
                count: node.class_counts()[class.index()],
            })
            .collect(),
    };

    match node.kind() {
        NodeKind::Leaf { class } => TreeDocument::Leaf {
            class: label_of(catalog.classes(), *class),
            summary,
        },
        NodeKind::Split {
            attribute,
            branches,
            information_gain,
        } => {
            let (name, values) = match catalog.attribute(*attribute) {
                Some(a) => (a.name().to_string(), Some(a.values())),
                None => (attribute.to_string(), None),
            };
            TreeDocument::Split {
                attribute: name,
                information_gain: *information_gain,
                summary,
                branches: branches
                    .iter()
                    .map(|b| BranchDocument {
                        value: values.map_or_else(|| b.value.to_string(), |v| label_of(v, b.value)),
                        node: build_node(classifier, catalog, b.child),
                    })
                    .collect(),
            }
        }
    }
}

fn label_of(codec: &ValueCodec, index: ValueIndex) -> String {
    codec
        .decode(index)
        .map_or_else(|| index.to_string(), str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::strings;
    use crate::catalog::Attribute;
    use crate::dataset::Dataset;
    use crate::trainer::train;

    fn v(i: u16) -> ValueIndex {
        ValueIndex::from(i)
    }

    fn trained() -> (Catalog, Classifier) {
        let catalog = Catalog::new(
            vec![
                Attribute::new("safety", strings(&["low", "med", "high"])).unwrap(),
                Attribute::new("persons", strings(&["2", "4"])).unwrap(),
            ],
            strings(&["unacc", "acc"]),
        )
        .unwrap();
        let rows = vec![
            vec![v(0), v(0), v(0)],
            vec![v(0), v(1), v(0)],
            vec![v(1), v(0), v(0)],
            vec![v(1), v(1), v(1)],
            vec![v(2), v(1), v(1)],
        ];
        let dataset = Dataset::new(&catalog, rows).unwrap();
        let tree = train(&catalog, &dataset).unwrap();
        (catalog, tree)
    }

    #[test]
    fn document_resolves_labels() {
        let (catalog, tree) = trained();
        let doc = TreeDocument::build(&tree, &catalog).unwrap();
        let TreeDocument::Split { attribute, branches, summary, .. } = &doc else {
            panic!("root should split");
        };
        assert_eq!(attribute, "safety");
        assert_eq!(summary.n_instances, 5);
        assert_eq!(summary.class_counts[0], ClassCount { class: "unacc".into(), count: 3 });
        let values: Vec<&str> = branches.iter().map(|b| b.value.as_str()).collect();
        assert_eq!(values, vec!["low", "med", "high"]);
        assert!(matches!(&branches[0].node, TreeDocument::Leaf { class, .. } if class == "unacc"));
    }

    #[test]
    fn json_shape() {
        let (catalog, tree) = trained();
        let doc = TreeDocument::build(&tree, &catalog).unwrap();
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["type"], "split");
        assert_eq!(json["attribute"], "safety");
        assert_eq!(json["n_instances"], 5);
        assert_eq!(json["branches"][0]["value"], "low");
        assert_eq!(json["branches"][0]["node"]["type"], "leaf");
        assert_eq!(json["branches"][0]["node"]["class"], "unacc");
        assert_eq!(json["class_counts"][1]["class"], "acc");
    }

    #[test]
    fn text_dump_indents_nested_splits() {
        let (catalog, tree) = trained();
        let text = TreeDocument::build(&tree, &catalog).unwrap().render_text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "safety = low: unacc (2)");
        assert_eq!(lines[1], "safety = med");
        assert_eq!(lines[2], "|   persons = 2: unacc (1)");
        assert_eq!(lines[3], "|   persons = 4: acc (1)");
        assert_eq!(lines[4], "safety = high: acc (1)");
    }

    #[test]
    fn display_matches_text_dump() {
        let (catalog, tree) = trained();
        let doc = TreeDocument::build(&tree, &catalog).unwrap();
        let displayed = format!("{doc}");
        assert_eq!(displayed, doc.render_text());
        assert_eq!(displayed.lines().count(), 5);
        assert!(displayed.ends_with("safety = high: acc (1)\n"));
    }

    #[test]
    fn root_leaf_dump() {
        let catalog = Catalog::new(vec![], strings(&["only"])).unwrap();
        let dataset = Dataset::new(&catalog, vec![vec![v(0)]]).unwrap();
        let tree = train(&catalog, &dataset).unwrap();
        let doc = TreeDocument::build(&tree, &catalog).unwrap();
        assert_eq!(doc.render_text(), ": only (1)\n");
    }

    #[test]
    fn mismatched_catalog_rejected() {
        let (_, tree) = trained();
        let other = Catalog::new(vec![], strings(&["unacc", "acc"])).unwrap();
        let err = TreeDocument::build(&tree, &other).unwrap_err();
        assert!(matches!(err, Id3Error::CatalogMismatch { .. }));
    }
}
