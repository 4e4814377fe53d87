//! Reader for C4.5-style names files.

use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use arbor_id3::{Attribute, Catalog};
use tracing::{debug, info, instrument};

use crate::IoError;

/// Header line opening the class label section.
const CLASS_VALUES_HEADER: &str = "| class values";
/// Header line opening the attribute section.
const ATTRIBUTES_HEADER: &str = "| attributes";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Other,
    ClassValues,
    Attributes,
}

/// Reads an attribute catalog from a names file.
///
/// Expected format (the layout of the UCI `car.c45-names` file):
///
/// ```text
/// | class values
///
/// unacc, acc, good, vgood
///
/// | attributes
///
/// buying:   vhigh, high, med, low.
/// safety:   low, med, high.
/// ```
///
/// Every line starting with `|` closes the current section; only the two
/// headers above open one. Inside the class section the last non-empty
/// line wins. Inside the attribute section each `name: v1, ..., vn.` line
/// declares an attribute; lines without `:` or without the final `.` are
/// ignored.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::ReadLine`] | A line cannot be read |
/// | [`IoError::MissingClassValues`] | No class labels declared |
/// | [`IoError::MissingAttributes`] | No attributes declared |
/// | [`IoError::InvalidCatalog`] | Empty or duplicate values, duplicate classes |
pub struct CatalogReader {
    path: PathBuf,
}

impl CatalogReader {
    /// Create a new reader for the given names file.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Read and validate the names file, returning a [`Catalog`].
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<Catalog, IoError> {
        let file = std::fs::File::open(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;

        let mut section = Section::Other;
        let mut class_values: Vec<String> = Vec::new();
        let mut attributes: Vec<Attribute> = Vec::new();

        for (line_index, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| IoError::ReadLine {
                path: self.path.clone(),
                line_number: line_index + 1,
                source: e,
            })?;

            if line.starts_with('|') {
                section = if line.starts_with(CLASS_VALUES_HEADER) {
                    Section::ClassValues
                } else if line.starts_with(ATTRIBUTES_HEADER) {
                    Section::Attributes
                } else {
                    Section::Other
                };
                continue;
            }

            match section {
                Section::ClassValues => {
                    let values = split_values(&line);
                    if !values.is_empty() {
                        class_values = values;
                    }
                }
                Section::Attributes => {
                    if let Some((name, values)) = parse_attribute(&line) {
                        debug!(name, n_values = values.len(), "attribute declared");
                        let attribute =
                            Attribute::new(name, values).map_err(|e| IoError::InvalidCatalog {
                                path: self.path.clone(),
                                source: e,
                            })?;
                        attributes.push(attribute);
                    }
                }
                Section::Other => {}
            }
        }

        if class_values.is_empty() {
            return Err(IoError::MissingClassValues {
                path: self.path.clone(),
            });
        }
        if attributes.is_empty() {
            return Err(IoError::MissingAttributes {
                path: self.path.clone(),
            });
        }

        let catalog = Catalog::new(attributes, class_values).map_err(|e| IoError::InvalidCatalog {
            path: self.path.clone(),
            source: e,
        })?;

        info!(
            n_attributes = catalog.n_attributes(),
            n_classes = catalog.n_classes(),
            "catalog loaded"
        );

        Ok(catalog)
    }
}

/// Parse `name: v1, v2, ..., vn.` into its name and values.
fn parse_attribute(line: &str) -> Option<(String, Vec<String>)> {
    let (name, rest) = line.split_once(':')?;
    let values = rest.trim_end().strip_suffix('.')?;
    Some((name.trim().to_string(), split_values(values)))
}

/// Split a comma-separated list, trimming entries and dropping empty ones.
fn split_values(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
