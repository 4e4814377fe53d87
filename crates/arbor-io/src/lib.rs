//! File I/O, validation, reporting and serialization for the arbor pipeline.

mod catalog_reader;
mod domain;
mod error;
mod instance_reader;
mod report;
mod writer;

pub use catalog_reader::CatalogReader;
pub use domain::{ExperimentName, QueryRow};
pub use error::IoError;
pub use instance_reader::InstanceReader;
pub use report::{AveragedStatistics, ClassStatistics, StatisticsReport};
pub use writer::ResultWriter;
