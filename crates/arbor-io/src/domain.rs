//! Domain types for arbor-io.

use arbor_id3::ValueIndex;

use crate::IoError;

/// A validated experiment name for output file naming.
///
/// Must match `[a-zA-Z0-9_-]+`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperimentName(String);

impl ExperimentName {
    /// Parse and validate an experiment name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidExperimentName`] if the name is empty or
    /// contains characters outside `[a-zA-Z0-9_-]`.
    pub fn new(name: String) -> Result<Self, IoError> {
        if name.is_empty()
            || !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(IoError::InvalidExperimentName { name });
        }
        Ok(Self(name))
    }

    /// Return the experiment name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ExperimentName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One encoded row of a query file.
///
/// Produced by [`InstanceReader::read_queries`](crate::InstanceReader::read_queries).
/// `class` is present when the row carried a trailing class label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRow {
    /// Zero-based position of the record in the file.
    pub row_index: usize,
    /// Encoded attribute values in catalog order.
    pub values: Vec<ValueIndex>,
    /// Encoded class label, if the row was labelled.
    pub class: Option<ValueIndex>,
}
