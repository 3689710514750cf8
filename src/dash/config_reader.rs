use std::collections::HashSet;

use crate::dash::*;

use serde::{Deserialize, Serialize};

pub use egov_index::panel::DEFAULT_TOP_N;

pub const DEFAULT_DATA_DIRECTORY: &str = "data";

/// Where and how to read the dataset of one panel.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct PanelSource {
    pub id: String,
    pub title: String,
    #[serde(rename = "provider")]
    _provider: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "countryColumn")]
    pub country_column: String,
    #[serde(rename = "yearColumn")]
    pub year_column: String,
    #[serde(rename = "valueColumn")]
    pub value_column: String,
    #[serde(rename = "valueLabel")]
    _value_label: Option<String>,
    #[serde(rename = "mapScope")]
    _map_scope: Option<String>,
    #[serde(rename = "percentileMethod")]
    _percentile_method: Option<String>,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
    #[serde(rename = "topN")]
    pub top_n: Option<usize>,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Provider {
    Csv,
    Xlsx,
}

/// The geography drawn by the choropleth of a panel.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum MapScope {
    World,
    Europe,
}

impl MapScope {
    /// The name of the scope in a Plotly `geo` layout.
    pub fn as_plotly(&self) -> &'static str {
        match self {
            MapScope::World => "world",
            MapScope::Europe => "europe",
        }
    }
}

impl PanelSource {
    pub fn new_csv(
        id: &str,
        title: &str,
        file_path: &str,
        value_column: &str,
        value_label: &str,
        map_scope: MapScope,
    ) -> PanelSource {
        PanelSource {
            id: id.to_string(),
            title: title.to_string(),
            _provider: "csv".to_string(),
            file_path: file_path.to_string(),
            country_column: "English name".to_string(),
            year_column: "Year".to_string(),
            value_column: value_column.to_string(),
            _value_label: Some(value_label.to_string()),
            _map_scope: Some(map_scope.as_plotly().to_string()),
            _percentile_method: None,
            excel_worksheet_name: None,
            top_n: None,
        }
    }

    pub fn provider(&self) -> DashResult<Provider> {
        match self._provider.as_str() {
            "csv" => Ok(Provider::Csv),
            "xlsx" | "excel" => Ok(Provider::Xlsx),
            _ => ConfigValueSnafu {
                option: "provider",
                value: self._provider.clone(),
            }
            .fail(),
        }
    }

    /// The header of the value column in the tables. Defaults to the column name.
    pub fn value_label(&self) -> String {
        self._value_label
            .clone()
            .unwrap_or_else(|| self.value_column.clone())
    }

    pub fn map_scope(&self) -> DashResult<MapScope> {
        match self._map_scope.as_deref() {
            None | Some("world") => Ok(MapScope::World),
            Some("europe") => Ok(MapScope::Europe),
            Some(x) => ConfigValueSnafu {
                option: "mapScope",
                value: x,
            }
            .fail(),
        }
    }

    pub fn ranking_rules(&self) -> DashResult<RankingRules> {
        let percentile_method = match self._percentile_method.as_deref() {
            None | Some("atOrBelow") => PercentileMethod::AtOrBelow,
            Some("average") => PercentileMethod::Average,
            Some(x) => {
                return ConfigValueSnafu {
                    option: "percentileMethod",
                    value: x,
                }
                .fail()
            }
        };
        Ok(RankingRules { percentile_method })
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct DashConfig {
    #[serde(rename = "dataDirectory")]
    pub data_directory: Option<String>,
    #[serde(rename = "topN")]
    pub top_n: Option<usize>,
    pub panels: Vec<PanelSource>,
}

impl DashConfig {
    /// The UN and EU panels of the eGovernment dashboard.
    pub fn egov_defaults() -> DashConfig {
        DashConfig {
            data_directory: Some(DEFAULT_DATA_DIRECTORY.to_string()),
            top_n: Some(DEFAULT_TOP_N),
            panels: vec![
                PanelSource::new_csv(
                    "un",
                    "UN eGovernment index",
                    "eGov-t5.csv",
                    "UN eGov index",
                    "UN index value",
                    MapScope::World,
                ),
                PanelSource::new_csv(
                    "eu",
                    "EU eGovernment index",
                    "eur-t3.csv",
                    "EU eGov index",
                    "EU index value",
                    MapScope::Europe,
                ),
            ],
        }
    }

    pub fn top_n_for(&self, panel: &PanelSource) -> usize {
        panel.top_n.or(self.top_n).unwrap_or(DEFAULT_TOP_N)
    }

    /// Checks every option that is stored as a string, so that a bad
    /// configuration fails before any dataset is read.
    pub fn validate(&self) -> DashResult<()> {
        ensure!(!self.panels.is_empty(), NoPanelSnafu {});
        let mut ids: HashSet<&str> = HashSet::new();
        for p in self.panels.iter() {
            p.provider()?;
            p.map_scope()?;
            p.ranking_rules()?;
            ensure!(
                ids.insert(p.id.as_str()),
                ConfigValueSnafu {
                    option: "id",
                    value: p.id.clone()
                }
            );
        }
        Ok(())
    }
}

pub fn read_config(path: &str) -> DashResult<DashConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: DashConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    debug!("read_config: {:?}", config);
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_un_and_eu_panels() {
        let config = DashConfig::egov_defaults();
        config.validate().unwrap();
        let un = &config.panels[0];
        assert_eq!(un.file_path, "eGov-t5.csv");
        assert_eq!(un.value_column, "UN eGov index");
        assert_eq!(un.value_label(), "UN index value");
        assert_eq!(un.map_scope().unwrap(), MapScope::World);
        assert_eq!(un.provider().unwrap(), Provider::Csv);
        let eu = &config.panels[1];
        assert_eq!(eu.file_path, "eur-t3.csv");
        assert_eq!(eu.map_scope().unwrap(), MapScope::Europe);
        assert_eq!(config.top_n_for(eu), 15);
    }

    #[test]
    fn parses_minimal_panel() {
        let js = r#"{
            "panels": [{
                "id": "eu",
                "title": "EU eGovernment index",
                "provider": "xlsx",
                "filePath": "eur.xlsx",
                "countryColumn": "Country",
                "yearColumn": "Year",
                "valueColumn": "Score",
                "percentileMethod": "average",
                "topN": 10
            }]
        }"#;
        let config: DashConfig = serde_json::from_str(js).unwrap();
        config.validate().unwrap();
        let p = &config.panels[0];
        assert_eq!(p.provider().unwrap(), Provider::Xlsx);
        assert_eq!(p.value_label(), "Score");
        assert_eq!(p.map_scope().unwrap(), MapScope::World);
        assert_eq!(
            p.ranking_rules().unwrap().percentile_method,
            PercentileMethod::Average
        );
        assert_eq!(config.data_directory, None);
        assert_eq!(config.top_n_for(p), 10);
    }

    #[test]
    fn rejects_unknown_options() {
        let mut config = DashConfig::egov_defaults();
        config.panels[0]._map_scope = Some("asia".to_string());
        assert!(matches!(
            config.validate(),
            Err(DashError::ConfigValue { .. })
        ));

        let mut config = DashConfig::egov_defaults();
        config.panels[1]._provider = "parquet".to_string();
        assert!(config.validate().is_err());

        let mut config = DashConfig::egov_defaults();
        config.panels[1].id = "un".to_string();
        assert!(config.validate().is_err());

        let mut config = DashConfig::egov_defaults();
        config.panels.clear();
        assert!(matches!(config.validate(), Err(DashError::NoPanel { .. })));
    }

    #[test]
    fn missing_config_file() {
        assert!(matches!(
            read_config("/nonexistent/egovdash.json"),
            Err(DashError::OpeningJson { .. })
        ));
    }
}
