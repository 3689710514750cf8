// ********* Input data structures ***********

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::Display;

/// One observation of a benchmark index: the score of a country for a given year.
#[derive(PartialEq, Debug, Clone)]
pub struct IndexRecord {
    pub country: String,
    pub year: i32,
    pub index_value: f64,
}

impl IndexRecord {
    pub fn new(country: &str, year: i32, index_value: f64) -> IndexRecord {
        IndexRecord {
            country: country.to_string(),
            year,
            index_value,
        }
    }
}

// ******** Output data structures *********

/// A line of the ranked table for one year.
#[derive(PartialEq, Debug, Clone)]
pub struct RankedRow {
    /// 1-based. Tied values share the lowest rank of their group.
    pub rank: u32,
    pub country: String,
    pub index_value: f64,
    /// Rendered as `NN.N%`.
    pub percentile: String,
}

/// The values handed to a choropleth renderer, keyed by country name.
pub type MapData = BTreeMap<String, f64>;

/// Errors raised while assembling a dataset.
#[derive(PartialEq, Debug, Clone)]
pub enum DatasetErrors {
    /// NaN or infinite values cannot be ranked.
    NonFiniteValue { country: String, year: i32 },
    /// The same country appears twice for the same year.
    DuplicateRecord { country: String, year: i32 },
}

impl Error for DatasetErrors {}

impl Display for DatasetErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetErrors::NonFiniteValue { country, year } => {
                write!(f, "non-finite index value for {} in {}", country, year)
            }
            DatasetErrors::DuplicateRecord { country, year } => {
                write!(f, "duplicate record for {} in {}", country, year)
            }
        }
    }
}

// ********* Configuration **********

/// How the percentile column is computed.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum PercentileMethod {
    /// Fraction of the countries with a value lower than or equal to this one.
    AtOrBelow,
    /// Average-rank convention: ties get the mean of the ascending positions
    /// they occupy, divided by the number of countries.
    Average,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RankingRules {
    pub percentile_method: PercentileMethod,
}

impl RankingRules {
    pub const DEFAULT_RULES: RankingRules = RankingRules {
        percentile_method: PercentileMethod::AtOrBelow,
    };
}

impl Default for RankingRules {
    fn default() -> Self {
        RankingRules::DEFAULT_RULES
    }
}

// ********* Dataset **********

/// An immutable collection of index records, loaded once and shared by reference.
///
/// Use [`crate::builder::DatasetBuilder`] to construct one: it guarantees that
/// every value is finite and that a country appears at most once per year.
#[derive(PartialEq, Debug, Clone)]
pub struct IndexDataset {
    pub(crate) label: String,
    pub(crate) records: Vec<IndexRecord>,
}

impl IndexDataset {
    /// The name of the index column (for example `UN eGov index`).
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn records(&self) -> &[IndexRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All the distinct years, in increasing order.
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.records.iter().map(|r| r.year).collect();
        years.sort_unstable();
        years.dedup();
        years
    }

    pub fn earliest_year(&self) -> Option<i32> {
        self.records.iter().map(|r| r.year).min()
    }

    pub fn latest_year(&self) -> Option<i32> {
        self.records.iter().map(|r| r.year).max()
    }

    pub fn has_year(&self, year: i32) -> bool {
        self.records.iter().any(|r| r.year == year)
    }
}
