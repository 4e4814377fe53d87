//! JSON and text writers for trees, reports and predictions.

use std::fs;
use std::path::{Path, PathBuf};

use arbor_id3::{Catalog, Classifier, Evaluation, TreeDocument, ValueIndex};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::IoError;
use crate::domain::{ExperimentName, QueryRow};
use crate::report::StatisticsReport;

/// Writes training and evaluation results for one experiment.
///
/// Creates the output directory on construction if it does not exist.
/// Output files are named `{experiment}_tree.json`, `{experiment}_tree.txt`,
/// `{experiment}_report.json` and `{experiment}_predict.json`.
pub struct ResultWriter {
    output_dir: PathBuf,
    experiment: ExperimentName,
}

impl ResultWriter {
    /// Create a new writer targeting the given directory and experiment name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::OutputDirCreate`] if the directory cannot be created.
    #[instrument(skip_all, fields(dir = %output_dir.display(), experiment = %experiment))]
    pub fn new(output_dir: &Path, experiment: ExperimentName) -> Result<Self, IoError> {
        fs::create_dir_all(output_dir).map_err(|e| IoError::OutputDirCreate {
            path: output_dir.to_path_buf(),
            source: e,
        })?;
        debug!("output directory ready");
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            experiment,
        })
    }

    /// Write the label-resolved tree to `{experiment}_tree.json`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Serialize`] or [`IoError::WriteFile`].
    #[instrument(skip_all)]
    pub fn write_tree(
        &self,
        classifier: &Classifier,
        document: &TreeDocument,
    ) -> Result<PathBuf, IoError> {
        let path = self.artifact_path("tree.json");
        let artifact = TreeArtifact {
            experiment: self.experiment.as_str(),
            n_nodes: classifier.n_nodes(),
            n_leaves: classifier.n_leaves(),
            depth: classifier.depth(),
            tree: document,
        };
        write_json(&path, &artifact)?;
        info!(path = %path.display(), "tree written");
        Ok(path)
    }

    /// Write the indented text dump of the tree to `{experiment}_tree.txt`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::WriteFile`] if the file cannot be written.
    #[instrument(skip_all)]
    pub fn write_tree_text(&self, document: &TreeDocument) -> Result<PathBuf, IoError> {
        let path = self.artifact_path("tree.txt");
        write_file(&path, &document.render_text())?;
        info!(path = %path.display(), "tree text written");
        Ok(path)
    }

    /// Write the statistics report and confusion counts to `{experiment}_report.json`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Serialize`] or [`IoError::WriteFile`].
    #[instrument(skip_all)]
    pub fn write_report(
        &self,
        report: &StatisticsReport,
        evaluation: &Evaluation,
    ) -> Result<PathBuf, IoError> {
        let path = self.artifact_path("report.json");
        let artifact = ReportArtifact {
            experiment: self.experiment.as_str(),
            report,
            confusion_matrix: evaluation.as_rows(),
            unclassified_by_class: evaluation.unclassified_by_class(),
        };
        write_json(&path, &artifact)?;
        info!(path = %path.display(), "report written");
        Ok(path)
    }

    /// Write per-row predictions to `{experiment}_predict.json`.
    ///
    /// `predicted[i]` is the prediction for `queries[i]`; `None` means the
    /// row reached no leaf and is written as `null`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Serialize`] or [`IoError::WriteFile`].
    #[instrument(skip_all, fields(n_queries = queries.len()))]
    pub fn write_predictions(
        &self,
        catalog: &Catalog,
        queries: &[QueryRow],
        predicted: &[Option<ValueIndex>],
    ) -> Result<PathBuf, IoError> {
        let path = self.artifact_path("predict.json");

        let predictions: Vec<PredictionEntry> = queries
            .iter()
            .zip(predicted)
            .map(|(query, &prediction)| PredictionEntry {
                row_index: query.row_index,
                predicted: prediction.and_then(|c| catalog.class_label(c)),
                actual: query.class.and_then(|c| catalog.class_label(c)),
            })
            .collect();

        let n_labelled = queries.iter().filter(|q| q.class.is_some()).count();
        let n_correct = queries
            .iter()
            .zip(predicted)
            .filter(|(q, p)| q.class.is_some() && q.class == **p)
            .count();

        let artifact = PredictArtifact {
            experiment: self.experiment.as_str(),
            n_queries: predictions.len(),
            n_unclassified: predicted.iter().filter(|p| p.is_none()).count(),
            n_labelled,
            n_correct,
            predictions,
        };
        write_json(&path, &artifact)?;
        info!(path = %path.display(), "predictions written");
        Ok(path)
    }

    fn artifact_path(&self, suffix: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}_{suffix}", self.experiment.as_str()))
    }
}

fn write_json<T: Serialize>(path: &Path, artifact: &T) -> Result<(), IoError> {
    let json = serde_json::to_string_pretty(artifact).map_err(|e| IoError::Serialize {
        path: path.to_path_buf(),
        source: e,
    })?;
    write_file(path, &json)
}

fn write_file(path: &Path, contents: &str) -> Result<(), IoError> {
    fs::write(path, contents).map_err(|e| IoError::WriteFile {
        path: path.to_path_buf(),
        source: e,
    })
}

// --- Shadow structs for JSON serialization ---

#[derive(Serialize)]
struct TreeArtifact<'a> {
    experiment: &'a str,
    n_nodes: usize,
    n_leaves: usize,
    depth: usize,
    tree: &'a TreeDocument,
}

#[derive(Serialize)]
struct ReportArtifact<'a> {
    experiment: &'a str,
    #[serde(flatten)]
    report: &'a StatisticsReport,
    confusion_matrix: &'a [Vec<usize>],
    unclassified_by_class: &'a [usize],
}

#[derive(Serialize)]
struct PredictArtifact<'a> {
    experiment: &'a str,
    n_queries: usize,
    n_unclassified: usize,
    n_labelled: usize,
    n_correct: usize,
    predictions: Vec<PredictionEntry<'a>>,
}

#[derive(Serialize)]
struct PredictionEntry<'a> {
    row_index: usize,
    predicted: Option<&'a str>,
    actual: Option<&'a str>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_id3::{Attribute, Dataset, train};
    use tempfile::TempDir;

    fn weather() -> (Catalog, Dataset) {
        let strings = |v: &[&str]| v.iter().map(|s| s.to_string()).collect();
        let catalog = Catalog::new(
            vec![
                Attribute::new("outlook", strings(&["sunny", "rain"])).unwrap(),
                Attribute::new("windy", strings(&["no", "yes"])).unwrap(),
            ],
            strings(&["play", "stay"]),
        )
        .unwrap();
        let raw = [
            ["sunny", "no", "play"],
            ["sunny", "yes", "play"],
            ["rain", "no", "play"],
            ["rain", "yes", "stay"],
            ["rain", "yes", "stay"],
        ];
        let rows = raw
            .iter()
            .enumerate()
            .map(|(i, r)| catalog.encode_row(r, i).unwrap())
            .collect();
        let dataset = Dataset::new(&catalog, rows).unwrap();
        (catalog, dataset)
    }

    fn read_json(path: &Path) -> serde_json::Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn creates_output_dir() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        ResultWriter::new(&nested, ExperimentName::new("run".into()).unwrap()).unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn write_tree_json_and_text() {
        let dir = TempDir::new().unwrap();
        let writer = ResultWriter::new(dir.path(), ExperimentName::new("weather".into()).unwrap()).unwrap();
        let (catalog, dataset) = weather();
        let tree = train(&catalog, &dataset).unwrap();
        let document = TreeDocument::build(&tree, &catalog).unwrap();

        let json_path = writer.write_tree(&tree, &document).unwrap();
        assert_eq!(json_path, dir.path().join("weather_tree.json"));
        let content = read_json(&json_path);
        assert_eq!(content["experiment"], "weather");
        assert_eq!(content["n_nodes"], tree.n_nodes());
        assert_eq!(content["tree"]["type"], "split");
        assert_eq!(content["tree"]["attribute"], "outlook");
        assert_eq!(content["tree"]["n_instances"], 5);

        let text_path = writer.write_tree_text(&document).unwrap();
        let text = fs::read_to_string(text_path).unwrap();
        assert!(text.starts_with("outlook = sunny: play (2)\n"));
        assert!(text.contains("|   windy = yes: stay (2)"));
    }

    #[test]
    fn write_report_json() {
        let dir = TempDir::new().unwrap();
        let writer = ResultWriter::new(dir.path(), ExperimentName::new("eval".into()).unwrap()).unwrap();
        let (catalog, dataset) = weather();
        let tree = train(&catalog, &dataset).unwrap();
        let evaluation = Evaluation::evaluate(&tree, &dataset).unwrap();
        let report = StatisticsReport::from_evaluation(&evaluation, &catalog).unwrap();

        let content = read_json(&writer.write_report(&report, &evaluation).unwrap());
        assert_eq!(content["experiment"], "eval");
        assert_eq!(content["accuracy"], 1.0);
        assert_eq!(content["classes"].as_array().unwrap().len(), 2);
        assert_eq!(content["confusion_matrix"][0][0], 3);
        assert_eq!(content["unclassified_by_class"][1], 0);
    }

    #[test]
    fn write_predictions_json() {
        let dir = TempDir::new().unwrap();
        let writer = ResultWriter::new(dir.path(), ExperimentName::new("q".into()).unwrap()).unwrap();
        let (catalog, _) = weather();
        let queries = vec![
            QueryRow {
                row_index: 0,
                values: vec![ValueIndex::from(0), ValueIndex::from(0)],
                class: Some(ValueIndex::from(0)),
            },
            QueryRow {
                row_index: 2,
                values: vec![ValueIndex::from(1), ValueIndex::from(1)],
                class: None,
            },
        ];
        let predicted = [Some(ValueIndex::from(0)), None];

        let content = read_json(&writer.write_predictions(&catalog, &queries, &predicted).unwrap());
        assert_eq!(content["n_queries"], 2);
        assert_eq!(content["n_unclassified"], 1);
        assert_eq!(content["n_labelled"], 1);
        assert_eq!(content["n_correct"], 1);
        assert_eq!(content["predictions"][0]["predicted"], "play");
        assert_eq!(content["predictions"][0]["actual"], "play");
        assert_eq!(content["predictions"][1]["row_index"], 2);
        assert!(content["predictions"][1]["predicted"].is_null());
    }
}
