//! The year selection of a dashboard panel.
//!
//! A panel shows one index: a year slider, a choropleth map and the table of
//! the best countries. Selecting a year recomputes both the table and the map
//! from the dataset; nothing is cached between two selections.

use log::{debug, info};

use crate::config::*;
use crate::{compute_map_data, compute_ranking_with_rules};

/// The number of countries shown in a panel table by default.
pub const DEFAULT_TOP_N: usize = 15;

/// The slider over the years available in a dataset.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct YearSlider {
    pub min: i32,
    pub max: i32,
    /// The initially selected year (the latest one).
    pub value: i32,
    /// One mark per available year, in increasing order.
    pub marks: Vec<(i32, String)>,
}

/// Everything a panel redraws after a year selection.
#[derive(PartialEq, Debug, Clone)]
pub struct PanelUpdate {
    pub year: i32,
    pub title: String,
    /// The best `top_n` rows of the ranked table.
    pub table: Vec<RankedRow>,
    pub map: MapData,
}

/// Builds the slider of a dataset, or `None` when the dataset is empty.
pub fn year_slider(dataset: &IndexDataset) -> Option<YearSlider> {
    let years = dataset.years();
    let (min, max) = match (years.first(), years.last()) {
        (Some(min), Some(max)) => (*min, *max),
        _ => return None,
    };
    let marks = years
        .iter()
        .map(|y| {
            let label = if *y == min {
                format!("Year {}", y)
            } else {
                y.to_string()
            };
            (*y, label)
        })
        .collect();
    Some(YearSlider {
        min,
        max,
        value: max,
        marks,
    })
}

/// Handles the selection of a year with the default ranking rules.
pub fn on_year_selected(dataset: &IndexDataset, year: i32, top_n: usize) -> PanelUpdate {
    on_year_selected_with_rules(dataset, year, top_n, &RankingRules::DEFAULT_RULES)
}

pub fn on_year_selected_with_rules(
    dataset: &IndexDataset,
    year: i32,
    top_n: usize,
    rules: &RankingRules,
) -> PanelUpdate {
    let mut table = compute_ranking_with_rules(dataset.records(), year, rules);
    let ranked = table.len();
    table.truncate(top_n);
    let map = compute_map_data(dataset.records(), year);
    info!(
        "{}: year {}: {} countries ranked, {} shown",
        dataset.label(),
        year,
        ranked,
        table.len()
    );
    debug!("on_year_selected: table: {:?}", table);
    PanelUpdate {
        year,
        title: format!("TOP {} countries in {}", top_n, year),
        table,
        map,
    }
}

/// The state of a panel before any interaction: the latest year is selected.
pub fn initial_panel(dataset: &IndexDataset, top_n: usize) -> Option<PanelUpdate> {
    dataset
        .latest_year()
        .map(|year| on_year_selected(dataset, year, top_n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::DatasetBuilder;

    fn dataset() -> IndexDataset {
        let mut builder = DatasetBuilder::new("UN eGov index");
        for (idx, year) in [2016, 2018, 2020].iter().enumerate() {
            for c in 0..20 {
                let value = 0.5 + (c as f64) / 100.0 + (idx as f64) / 1000.0;
                builder
                    .add_record(&format!("Country {:02}", c), *year, value)
                    .unwrap();
            }
        }
        builder.build()
    }

    #[test]
    fn slider_marks_label_the_first_year() {
        let slider = year_slider(&dataset()).unwrap();
        assert_eq!(slider.min, 2016);
        assert_eq!(slider.max, 2020);
        assert_eq!(slider.value, 2020);
        assert_eq!(
            slider.marks,
            vec![
                (2016, "Year 2016".to_string()),
                (2018, "2018".to_string()),
                (2020, "2020".to_string())
            ]
        );
    }

    #[test]
    fn slider_of_empty_dataset() {
        assert_eq!(year_slider(&DatasetBuilder::new("x").build()), None);
        assert_eq!(initial_panel(&DatasetBuilder::new("x").build(), 15), None);
    }

    #[test]
    fn selection_truncates_table_but_not_map() {
        let update = on_year_selected(&dataset(), 2018, DEFAULT_TOP_N);
        assert_eq!(update.year, 2018);
        assert_eq!(update.title, "TOP 15 countries in 2018");
        assert_eq!(update.table.len(), 15);
        assert_eq!(update.table[0].country, "Country 19");
        assert_eq!(update.table[0].rank, 1);
        assert_eq!(update.table[14].rank, 15);
        assert_eq!(update.map.len(), 20);
    }

    #[test]
    fn selection_of_unknown_year_is_empty() {
        let update = on_year_selected(&dataset(), 2003, 15);
        assert_eq!(update.title, "TOP 15 countries in 2003");
        assert!(update.table.is_empty());
        assert!(update.map.is_empty());
    }

    #[test]
    fn initial_panel_uses_latest_year() {
        let data = dataset();
        let update = initial_panel(&data, 5).unwrap();
        assert_eq!(update, on_year_selected(&data, 2020, 5));
        assert_eq!(update.table.len(), 5);
    }
}
