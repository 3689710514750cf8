use std::path::Path;

use crate::dash::*;

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

/// The positions of the columns read in a dataset.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct ColumnIndexes {
    pub country: usize,
    pub year: usize,
    pub value: usize,
}

impl ColumnIndexes {
    /// The number of cells a row needs for all the columns to be present.
    pub fn min_len(&self) -> usize {
        self.country.max(self.year).max(self.value) + 1
    }
}

pub fn find_columns(header: &[String], panel: &PanelSource, path: &str) -> DashResult<ColumnIndexes> {
    let find = |name: &String| -> DashResult<usize> {
        header
            .iter()
            .position(|h| h.trim() == name.as_str())
            .context(MissingColumnSnafu {
                path,
                column: name.clone(),
            })
    };
    let res = ColumnIndexes {
        country: find(&panel.country_column)?,
        year: find(&panel.year_column)?,
        value: find(&panel.value_column)?,
    };
    debug!("find_columns: {:?}: {:?}", path, res);
    Ok(res)
}

/// Adds one row of a dataset to the builder.
///
/// The cells are given as text. An empty value means that the index was not
/// published for this country and year: the row is skipped.
pub fn add_row(
    builder: &mut DatasetBuilder,
    cells: (&str, &str, &str),
    path: &str,
    lineno: usize,
) -> DashResult<bool> {
    let (country, year_s, value_s) = cells;
    let country = country.trim();
    ensure!(
        !country.is_empty(),
        WrongCellSnafu {
            path,
            lineno,
            column: "country",
            content: country,
        }
    );
    let year = parse_year(year_s).context(WrongCellSnafu {
        path,
        lineno,
        column: "year",
        content: year_s,
    })?;
    let value = match parse_value(value_s) {
        Some(Some(v)) => v,
        Some(None) => {
            warn!(
                "{}: line {}: no value for {} in {}, skipping",
                simplify_file_name(path),
                lineno,
                country,
                year
            );
            return Ok(false);
        }
        None => {
            return WrongCellSnafu {
                path,
                lineno,
                column: "value",
                content: value_s,
            }
            .fail()
        }
    };
    builder
        .add_record(country, year, value)
        .context(InvalidRecordSnafu { path, lineno })?;
    Ok(true)
}

// Years exported by spreadsheets may come out as floats (2020.0).
fn parse_year(s: &str) -> Option<i32> {
    let s = s.trim();
    if let Ok(y) = s.parse::<i32>() {
        return Some(y);
    }
    match s.parse::<f64>() {
        Ok(f) if f.fract() == 0.0 && f.abs() < i32::MAX as f64 => Some(f as i32),
        _ => None,
    }
}

// None: not a number. Some(None): missing value.
fn parse_value(s: &str) -> Option<Option<f64>> {
    let s = s.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("nan") {
        return Some(None);
    }
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(Some(v)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panel() -> PanelSource {
        DashConfig::egov_defaults().panels[0].clone()
    }

    #[test]
    fn finds_columns_by_name() {
        let header: Vec<String> = ["Code", "Year", "English name", "UN eGov index"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let cols = find_columns(&header, &panel(), "un.csv").unwrap();
        assert_eq!(
            cols,
            ColumnIndexes {
                country: 2,
                year: 1,
                value: 3
            }
        );
        assert_eq!(cols.min_len(), 4);
    }

    #[test]
    fn missing_column() {
        let header = vec!["English name".to_string(), "Year".to_string()];
        let err = find_columns(&header, &panel(), "un.csv").unwrap_err();
        assert!(matches!(err, DashError::MissingColumn { ref column, .. } if column == "UN eGov index"));
    }

    #[test]
    fn reads_years_and_values() {
        assert_eq!(parse_year("2020"), Some(2020));
        assert_eq!(parse_year(" 2018.0 "), Some(2018));
        assert_eq!(parse_year("2018.5"), None);
        assert_eq!(parse_year("last year"), None);
        assert_eq!(parse_value("0.9758"), Some(Some(0.9758)));
        assert_eq!(parse_value(""), Some(None));
        assert_eq!(parse_value("NaN"), Some(None));
        assert_eq!(parse_value("n/a"), None);
    }

    #[test]
    fn add_row_skips_missing_values() {
        let mut builder = DatasetBuilder::new("UN eGov index");
        assert!(add_row(&mut builder, ("Denmark", "2020", "0.97"), "un.csv", 2).unwrap());
        assert!(!add_row(&mut builder, ("Tuvalu", "2020", ""), "un.csv", 3).unwrap());
        assert!(add_row(&mut builder, ("", "2020", "0.5"), "un.csv", 4).is_err());
        assert!(matches!(
            add_row(&mut builder, ("Denmark", "2020", "0.5"), "un.csv", 5),
            Err(DashError::InvalidRecord { lineno: 5, .. })
        ));
        assert_eq!(builder.len(), 1);
    }

    #[test]
    fn simplified_names() {
        assert_eq!(simplify_file_name("data/eGov-t5.csv"), "eGov-t5.csv");
        assert_eq!(simplify_file_name("eur-t3.csv"), "eur-t3.csv");
    }
}
