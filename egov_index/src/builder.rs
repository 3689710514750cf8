use log::debug;
use std::collections::HashSet;

pub use crate::config::*;

/// A builder for assembling a dataset record by record.
///
/// The readers of the command line use it, and it is the simplest way to
/// build a dataset in tests.
///
/// ```
/// pub use egov_index::builder::DatasetBuilder;
/// # use egov_index::DatasetErrors;
///
/// let mut builder = DatasetBuilder::new("UN eGov index");
/// builder.add_record("Denmark", 2020, 0.9758)?;
/// builder.add_record("Korea", 2020, 0.9560)?;
///
/// let dataset = builder.build();
/// assert_eq!(dataset.latest_year(), Some(2020));
///
/// # Ok::<(), DatasetErrors>(())
/// ```
pub struct DatasetBuilder {
    pub(crate) _label: String,
    pub(crate) _records: Vec<IndexRecord>,
    pub(crate) _seen: HashSet<(String, i32)>,
}

impl DatasetBuilder {
    pub fn new(label: &str) -> DatasetBuilder {
        DatasetBuilder {
            _label: label.to_string(),
            _records: Vec::new(),
            _seen: HashSet::new(),
        }
    }

    /// Adds the score of a country for a year.
    pub fn add_record(
        &mut self,
        country: &str,
        year: i32,
        index_value: f64,
    ) -> Result<(), DatasetErrors> {
        self.add_record_2(&IndexRecord::new(country, year, index_value))
    }

    /// Adds a record. Non-finite values and repeated (country, year) pairs are rejected.
    pub fn add_record_2(&mut self, record: &IndexRecord) -> Result<(), DatasetErrors> {
        if !record.index_value.is_finite() {
            return Err(DatasetErrors::NonFiniteValue {
                country: record.country.clone(),
                year: record.year,
            });
        }
        if !self._seen.insert((record.country.clone(), record.year)) {
            return Err(DatasetErrors::DuplicateRecord {
                country: record.country.clone(),
                year: record.year,
            });
        }
        self._records.push(record.clone());
        Ok(())
    }

    pub fn len(&self) -> usize {
        self._records.len()
    }

    pub fn is_empty(&self) -> bool {
        self._records.is_empty()
    }

    pub fn build(self) -> IndexDataset {
        debug!(
            "DatasetBuilder::build: {}: {} records",
            self._label,
            self._records.len()
        );
        IndexDataset {
            label: self._label,
            records: self._records,
        }
    }
}
