//! I/O error types for arbor-io.

use std::path::PathBuf;

use arbor_id3::Id3Error;

/// Errors from reading catalogs and instances and from writing results.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when the input file does not exist or is unreadable.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when reading a line of a names file fails mid-way.
    #[error("read error in {path} at line {line_number}")]
    ReadLine {
        /// Path to the names file.
        path: PathBuf,
        /// One-based line number.
        line_number: usize,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when a names file has no `| class values` section with labels.
    #[error("no class values declared in {path}")]
    MissingClassValues {
        /// Path to the names file.
        path: PathBuf,
    },

    /// Returned when a names file has no `| attributes` section with declarations.
    #[error("no attributes declared in {path}")]
    MissingAttributes {
        /// Path to the names file.
        path: PathBuf,
    },

    /// Returned when the declared attributes or classes do not form a valid catalog.
    #[error("invalid catalog in {path}")]
    InvalidCatalog {
        /// Path to the names file.
        path: PathBuf,
        /// Underlying catalog error.
        source: Id3Error,
    },

    /// Returned when the CSV parser encounters a malformed record.
    #[error("CSV parse error in {path} at byte offset {offset}")]
    CsvParse {
        /// Path to the data file.
        path: PathBuf,
        /// Byte offset where the error occurred.
        offset: u64,
        /// Underlying CSV error.
        source: csv::Error,
    },

    /// Returned when a cell holds a label that is not declared for its column.
    #[error("unknown value \"{raw}\" in {path}: row {row_index}, column {column}")]
    UnknownValue {
        /// Path to the data file.
        path: PathBuf,
        /// Zero-based row index.
        row_index: usize,
        /// Zero-based column index.
        column: usize,
        /// The raw cell text.
        raw: String,
        /// Underlying codec error.
        source: Id3Error,
    },

    /// Returned when encoded rows are rejected by the dataset.
    #[error("invalid dataset in {path}")]
    InvalidDataset {
        /// Path to the data file.
        path: PathBuf,
        /// Underlying dataset error.
        source: Id3Error,
    },

    /// Returned when a data file yields zero usable rows.
    #[error("empty dataset (no usable rows) in {path}")]
    EmptyDataset {
        /// Path to the data file.
        path: PathBuf,
    },

    /// Returned when the experiment name contains characters outside `[a-zA-Z0-9_-]`.
    #[error("invalid experiment name \"{name}\": must match [a-zA-Z0-9_-]+")]
    InvalidExperimentName {
        /// The invalid name.
        name: String,
    },

    /// Returned when the output directory cannot be created.
    #[error("cannot create output directory {path}")]
    OutputDirCreate {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when an artifact cannot be serialized to JSON.
    #[error("cannot serialize {path}")]
    Serialize {
        /// Path of the artifact being produced.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// Returned when a result file cannot be written.
    #[error("cannot write file {path}")]
    WriteFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}
