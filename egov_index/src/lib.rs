/*!
Ranking, percentile and choropleth data for country-level benchmark indices.

The two entry points are pure functions of a slice of records and a year:

- [`compute_ranking`] builds the ranked table (competition ranking, percentile)
- [`compute_map_data`] builds the `country -> value` mapping for a choropleth

[`panel::on_year_selected`] combines both into the update of a dashboard panel.

```
use egov_index::*;

let records = vec![
    IndexRecord::new("A", 2020, 0.9),
    IndexRecord::new("B", 2020, 0.9),
    IndexRecord::new("C", 2020, 0.5),
];
let table = compute_ranking(&records, 2020);
assert_eq!(table[2].rank, 3);
assert_eq!(table[2].percentile, "33.3%");
```
*/

mod config;
use log::debug;

use std::cmp::Ordering;

pub use crate::config::*;

pub mod builder;
pub mod manual;
pub mod panel;

/// Computes the ranked table of a year with the default rules.
///
/// The rows are sorted by decreasing index value. A year without records
/// gives an empty table.
pub fn compute_ranking(records: &[IndexRecord], year: i32) -> Vec<RankedRow> {
    compute_ranking_with_rules(records, year, &RankingRules::DEFAULT_RULES)
}

/// Computes the ranked table of a year.
///
/// Arguments:
/// * `records` the records of all the years. Values are expected to be finite.
/// * `year` the selected year
/// * `rules` how the percentile column is computed
pub fn compute_ranking_with_rules(
    records: &[IndexRecord],
    year: i32,
    rules: &RankingRules,
) -> Vec<RankedRow> {
    let mut selected: Vec<&IndexRecord> = filter_year(records, year).collect();
    debug!(
        "compute_ranking: year: {:?} selected: {:?} rules: {:?}",
        year,
        selected.len(),
        rules
    );
    // Stable: ties keep their input order.
    selected.sort_by(|a, b| descending(a.index_value, b.index_value));

    let total = selected.len();
    let mut res: Vec<RankedRow> = Vec::with_capacity(total);
    let mut group_start = 0;
    while group_start < total {
        let value = selected[group_start].index_value;
        let group_len = selected[group_start..]
            .iter()
            .take_while(|r| r.index_value == value)
            .count()
            .max(1);

        // Everything before the group is strictly greater.
        let count_greater = group_start;
        let rank = (count_greater + 1) as u32;
        let pct = percentile(total, count_greater, group_len, rules.percentile_method);
        let pct_label = format_percentile(pct);

        for r in selected[group_start..group_start + group_len].iter() {
            res.push(RankedRow {
                rank,
                country: r.country.clone(),
                index_value: r.index_value,
                percentile: pct_label.clone(),
            });
        }
        group_start += group_len;
    }
    res
}

/// The values of a year, keyed by country. Values are copied untouched.
pub fn compute_map_data(records: &[IndexRecord], year: i32) -> MapData {
    let res: MapData = filter_year(records, year)
        .map(|r| (r.country.clone(), r.index_value))
        .collect();
    debug!("compute_map_data: year: {:?} countries: {:?}", year, res.len());
    res
}

fn filter_year(records: &[IndexRecord], year: i32) -> impl Iterator<Item = &IndexRecord> {
    records.iter().filter(move |r| r.year == year)
}

fn descending(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}

// Percentile in [0, 100], not rounded yet.
fn percentile(
    total: usize,
    count_greater: usize,
    count_equal: usize,
    method: PercentileMethod,
) -> f64 {
    let n = total as f64;
    let at_or_below = (total - count_greater) as f64;
    match method {
        PercentileMethod::AtOrBelow => at_or_below / n * 100.0,
        PercentileMethod::Average => {
            let below = at_or_below - count_equal as f64;
            (below + (count_equal as f64 + 1.0) / 2.0) / n * 100.0
        }
    }
}

// One decimal, ties to even (6.25 reads 6.2).
fn format_percentile(pct: f64) -> String {
    format!("{:.1}%", round_half_even(pct * 10.0) / 10.0)
}

fn round_half_even(x: f64) -> f64 {
    if (x - x.trunc()).abs() == 0.5 {
        2.0 * (x / 2.0).round()
    } else {
        x.round()
    }
}
