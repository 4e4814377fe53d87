//! CSV instance reader that encodes labelled and unlabelled rows.

use std::path::{Path, PathBuf};

use arbor_id3::{Catalog, Dataset, ValueIndex};
use tracing::{debug, info, instrument, warn};

use crate::IoError;
use crate::domain::QueryRow;

/// Reads categorical instances from a headerless CSV file.
///
/// Expected CSV format (the layout of the UCI `car.data` file):
/// - No header row
/// - `value1,value2,...,valueN,class` with columns in catalog order
/// - Cells are trimmed; blank lines are skipped
/// - Trailing empty cells are dropped, so `a,b,class,` reads as `a,b,class`
///
/// Rows whose width differs from what the catalog expects are skipped with
/// a warning rather than aborting the read.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::CsvParse`] | Malformed CSV record |
/// | [`IoError::UnknownValue`] | Cell label not declared for its column |
/// | [`IoError::InvalidDataset`] | Encoded rows rejected by the dataset |
/// | [`IoError::EmptyDataset`] | Zero usable rows |
pub struct InstanceReader {
    path: PathBuf,
}

impl InstanceReader {
    /// Create a new reader for the given CSV file path.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Read labelled rows (attribute values followed by the class label).
    #[instrument(skip_all, fields(path = %self.path.display()))]
    pub fn read(&self, catalog: &Catalog) -> Result<Dataset, IoError> {
        let width = catalog.row_width();
        let mut rows = Vec::new();
        let mut n_skipped = 0usize;

        self.for_each_record(|row_index, record| {
            if record.len() != width {
                warn!(row_index, expected = width, got = record.len(), "skipping row of wrong width");
                n_skipped += 1;
                return Ok(());
            }
            rows.push(self.encode_cells(catalog, row_index, record)?);
            Ok(())
        })?;

        if rows.is_empty() {
            return Err(IoError::EmptyDataset {
                path: self.path.clone(),
            });
        }

        let dataset = Dataset::new(catalog, rows).map_err(|e| IoError::InvalidDataset {
            path: self.path.clone(),
            source: e,
        })?;

        info!(
            n_instances = dataset.n_instances(),
            n_attributes = dataset.n_attributes(),
            n_skipped,
            "instances loaded"
        );

        Ok(dataset)
    }

    /// Read query rows, each either unlabelled or followed by a class label.
    ///
    /// Rows of any other width are skipped with a warning.
    #[instrument(skip_all, fields(path = %self.path.display()))]
    pub fn read_queries(&self, catalog: &Catalog) -> Result<Vec<QueryRow>, IoError> {
        let n_attributes = catalog.n_attributes();
        let mut queries = Vec::new();

        self.for_each_record(|row_index, record| {
            if record.len() != n_attributes && record.len() != n_attributes + 1 {
                warn!(row_index, expected = n_attributes, got = record.len(), "skipping query of wrong width");
                return Ok(());
            }
            let mut values = self.encode_cells(catalog, row_index, record)?;
            let class = if values.len() > n_attributes {
                values.pop()
            } else {
                None
            };
            queries.push(QueryRow {
                row_index,
                values,
                class,
            });
            Ok(())
        })?;

        if queries.is_empty() {
            return Err(IoError::EmptyDataset {
                path: self.path.clone(),
            });
        }

        info!(n_queries = queries.len(), "queries loaded");
        Ok(queries)
    }

    /// Open the file and hand every record, with its index, to `visit`.
    fn for_each_record<F>(&self, mut visit: F) -> Result<(), IoError>
    where
        F: FnMut(usize, &[&str]) -> Result<(), IoError>,
    {
        let file = std::fs::File::open(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;

        // Width is checked per row by the callers, not by the parser.
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        for (row_index, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| IoError::CsvParse {
                path: self.path.clone(),
                offset: e.position().map_or(0, |p| p.byte()),
                source: e,
            })?;
            let mut cells: Vec<&str> = record.iter().collect();
            while cells.last() == Some(&"") {
                cells.pop();
            }
            visit(row_index, &cells)?;
        }
        debug!("records visited");
        Ok(())
    }

    /// Encode cells column by column; the column after the attributes is the class.
    fn encode_cells(
        &self,
        catalog: &Catalog,
        row_index: usize,
        cells: &[&str],
    ) -> Result<Vec<ValueIndex>, IoError> {
        let codecs = catalog
            .attributes()
            .iter()
            .map(|a| a.values())
            .chain(std::iter::once(catalog.classes()));

        cells
            .iter()
            .zip(codecs)
            .enumerate()
            .map(|(column, (raw, codec))| {
                codec.encode(raw).map_err(|e| IoError::UnknownValue {
                    path: self.path.clone(),
                    row_index,
                    column,
                    raw: (*raw).to_string(),
                    source: e,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_id3::Attribute;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    fn catalog() -> Catalog {
        let strings = |v: &[&str]| v.iter().map(|s| s.to_string()).collect();
        Catalog::new(
            vec![
                Attribute::new("buying", strings(&["high", "low"])).unwrap(),
                Attribute::new("safety", strings(&["low", "med", "high"])).unwrap(),
            ],
            strings(&["unacc", "acc"]),
        )
        .unwrap()
    }

    #[test]
    fn read_valid_rows() {
        let f = write_csv("high,low,unacc\nlow, high ,acc\nlow,med,acc\n");
        let ds = InstanceReader::new(f.path()).read(&catalog()).unwrap();
        assert_eq!(ds.n_instances(), 3);
        assert_eq!(ds.n_attributes(), 2);
        assert_eq!(
            ds.row(1),
            &[ValueIndex::from(1), ValueIndex::from(2), ValueIndex::from(1)]
        );
    }

    #[test]
    fn wrong_width_rows_skipped() {
        let f = write_csv("high,low,unacc\nhigh,low\nlow,med,acc,extra\nlow,med,acc\n");
        let ds = InstanceReader::new(f.path()).read(&catalog()).unwrap();
        assert_eq!(ds.n_instances(), 2);
    }

    #[test]
    fn blank_lines_ignored() {
        let f = write_csv("high,low,unacc\n\nlow,med,acc\n\n");
        let ds = InstanceReader::new(f.path()).read(&catalog()).unwrap();
        assert_eq!(ds.n_instances(), 2);
    }

    #[test]
    fn trailing_comma_rows_accepted() {
        let f = write_csv("high,low,unacc,
low,med,acc,,
low,med,acc
");
        let ds = InstanceReader::new(f.path()).read(&catalog()).unwrap();
        assert_eq!(ds.n_instances(), 3);
        assert_eq!(
            ds.row(0),
            &[ValueIndex::from(0), ValueIndex::from(0), ValueIndex::from(0)]
        );
    }

    #[test]
    fn unknown_attribute_value_error() {
        let f = write_csv("high,low,unacc\nmedium,low,acc\n");
        let err = InstanceReader::new(f.path()).read(&catalog()).unwrap_err();
        match err {
            IoError::UnknownValue {
                row_index,
                column,
                raw,
                ..
            } => {
                assert_eq!(row_index, 1);
                assert_eq!(column, 0);
                assert_eq!(raw, "medium");
            }
            other => panic!("expected UnknownValue, got {other:?}"),
        }
    }

    #[test]
    fn unknown_class_label_error() {
        let f = write_csv("high,low,vgood\n");
        let err = InstanceReader::new(f.path()).read(&catalog()).unwrap_err();
        assert!(matches!(err, IoError::UnknownValue { column: 2, .. }));
    }

    #[test]
    fn empty_file_error() {
        let f = write_csv("");
        let err = InstanceReader::new(f.path()).read(&catalog()).unwrap_err();
        assert!(matches!(err, IoError::EmptyDataset { .. }));
    }

    #[test]
    fn only_malformed_rows_is_empty() {
        let f = write_csv("high\nlow,low\n");
        let err = InstanceReader::new(f.path()).read(&catalog()).unwrap_err();
        assert!(matches!(err, IoError::EmptyDataset { .. }));
    }

    #[test]
    fn nonexistent_file_error() {
        let err = InstanceReader::new(Path::new("/nonexistent/arbor.data"))
            .read(&catalog())
            .unwrap_err();
        assert!(matches!(err, IoError::FileNotFound { .. }));
    }

    #[test]
    fn queries_with_and_without_class() {
        let f = write_csv("high,low\nlow,med,acc\nhigh\n");
        let queries = InstanceReader::new(f.path()).read_queries(&catalog()).unwrap();
        assert_eq!(queries.len(), 2);
        assert_eq!(queries[0].row_index, 0);
        assert_eq!(queries[0].values, vec![ValueIndex::from(0), ValueIndex::from(0)]);
        assert_eq!(queries[0].class, None);
        assert_eq!(queries[1].row_index, 1);
        assert_eq!(queries[1].class, Some(ValueIndex::from(1)));
    }
}
