use log::{debug, info, warn};

pub use egov_index::builder::DatasetBuilder;
pub use egov_index::panel::{on_year_selected_with_rules, year_slider, PanelUpdate, YearSlider};
pub use egov_index::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::dash::config_reader::*;

pub mod config_reader;
mod download;
mod figure;
mod io_common;
mod io_csv;
mod io_xlsx;

#[derive(Debug, Snafu)]
pub enum DashError {
    #[snafu(display("Error opening CSV file {path}: {source}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading line {lineno} of {path}: {source}"))]
    CsvLineParse {
        source: csv::Error,
        path: String,
        lineno: usize,
    },
    #[snafu(display("Error opening Excel file {path}: {source}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("Worksheet {name:?} not found in {path}"))]
    MissingWorksheet { path: String, name: String },
    #[snafu(display(
        "Expected exactly one worksheet in {path}, found {count} (set excelWorksheetName)"
    ))]
    AmbiguousWorksheet { path: String, count: usize },
    #[snafu(display("No header row in {path}"))]
    EmptyFile { path: String },
    #[snafu(display("Column {column:?} not found in {path}"))]
    MissingColumn { path: String, column: String },
    #[snafu(display("Line {lineno} of {path} is too short"))]
    LineTooShort { path: String, lineno: usize },
    #[snafu(display("Line {lineno} of {path}: cannot read the {column} from {content:?}"))]
    WrongCell {
        path: String,
        lineno: usize,
        column: String,
        content: String,
    },
    #[snafu(display("Line {lineno} of {path}: {source}"))]
    InvalidRecord {
        source: DatasetErrors,
        path: String,
        lineno: usize,
    },
    #[snafu(display("Error opening JSON file {path}: {source}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON file {path}: {source}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error serializing JSON: {source}"))]
    SerializingJson { source: serde_json::Error },
    #[snafu(display("Error writing {path}: {source}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Invalid value for {option}: {value:?}"))]
    ConfigValue { option: String, value: String },
    #[snafu(display("The configuration does not describe any panel"))]
    NoPanel {},
    #[snafu(display("{name:?} is not a file of the data directory"))]
    DownloadName { name: String },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type DashResult<T> = Result<T, DashError>;

/// A panel with its dataset, as loaded at startup.
#[derive(Debug, Clone)]
pub struct LoadedPanel {
    pub source: PanelSource,
    pub dataset: IndexDataset,
    pub rules: RankingRules,
    pub scope: MapScope,
    pub top_n: usize,
}

/// The state of a panel after the year selection.
#[derive(Debug, Clone)]
pub struct PanelOutput {
    pub slider: Option<YearSlider>,
    pub update: Option<PanelUpdate>,
}

fn read_dataset(data_dir: &Path, panel: &PanelSource) -> DashResult<IndexDataset> {
    let p: PathBuf = data_dir.join(&panel.file_path);
    let path = p.as_path().display().to_string();
    info!("Attempting to read dataset file {:?}", path);
    match panel.provider()? {
        Provider::Csv => io_csv::read_csv_dataset(&path, panel),
        Provider::Xlsx => io_xlsx::read_xlsx_dataset(&path, panel),
    }
}

/// Reads the datasets of all the panels. Any failure is fatal: a panel
/// without its data cannot show anything.
pub fn load_panels(config: &DashConfig, data_dir: &Path) -> DashResult<Vec<LoadedPanel>> {
    let mut res: Vec<LoadedPanel> = Vec::new();
    for source in config.panels.iter() {
        let dataset = read_dataset(data_dir, source)?;
        if dataset.is_empty() {
            warn!("Panel {}: the dataset {:?} is empty", source.id, source.file_path);
        }
        res.push(LoadedPanel {
            source: source.clone(),
            dataset,
            rules: source.ranking_rules()?,
            scope: source.map_scope()?,
            top_n: config.top_n_for(source),
        });
    }
    Ok(res)
}

/// Parses a year selection of the form `<panel id>=<year>`.
pub fn parse_year_selection(s: &str) -> DashResult<(String, i32)> {
    let (id, year_s) = s.split_once('=').context(ConfigValueSnafu {
        option: "year",
        value: s,
    })?;
    let year = year_s.trim().parse::<i32>().ok().context(ConfigValueSnafu {
        option: "year",
        value: s,
    })?;
    Ok((id.trim().to_string(), year))
}

/// Runs the year selection on a panel. Without a selection, the latest year is shown.
pub fn select_year(panel: &LoadedPanel, year: Option<i32>) -> PanelOutput {
    let slider = year_slider(&panel.dataset);
    let year = year.or(slider.as_ref().map(|s| s.value));
    let update = year.map(|y| {
        if !panel.dataset.has_year(y) {
            warn!(
                "Panel {}: no data for {}, available years: {:?}",
                panel.source.id,
                y,
                panel.dataset.years()
            );
        }
        on_year_selected_with_rules(&panel.dataset, y, panel.top_n, &panel.rules)
    });
    PanelOutput { slider, update }
}

fn ranked_rows_to_json(rows: &[RankedRow], value_label: &str) -> Vec<JSValue> {
    rows.iter()
        .map(|r| {
            let mut row: JSMap<String, JSValue> = JSMap::new();
            row.insert("Rank".to_string(), json!(r.rank));
            row.insert("Country".to_string(), json!(r.country));
            row.insert(value_label.to_string(), json!(r.index_value));
            row.insert("Percentile".to_string(), json!(r.percentile));
            JSValue::Object(row)
        })
        .collect()
}

fn slider_to_json(slider: &YearSlider) -> JSValue {
    let mut marks: JSMap<String, JSValue> = JSMap::new();
    for (year, label) in slider.marks.iter() {
        marks.insert(year.to_string(), json!(label));
    }
    json!({"min": slider.min, "max": slider.max, "value": slider.value, "marks": marks})
}

fn panel_to_json(panel: &LoadedPanel, output: &PanelOutput) -> JSValue {
    let value_label = panel.source.value_label();
    let (year, table_title, table, map) = match &output.update {
        Some(u) => (
            json!(u.year),
            json!(u.title),
            json!(ranked_rows_to_json(&u.table, &value_label)),
            json!(u.map),
        ),
        None => (JSValue::Null, JSValue::Null, json!([]), json!({})),
    };
    json!({
        "id": panel.source.id,
        "title": panel.source.title,
        "valueLabel": value_label,
        "slider": output.slider.as_ref().map(slider_to_json),
        "year": year,
        "tableTitle": table_title,
        "table": table,
        "map": map,
        "download": {
            "href": download::file_download_link(&panel.source.file_path),
            "mimeType": download::mime_type(&panel.source.file_path),
        },
    })
}

pub fn build_summary_js(panels: &[(LoadedPanel, PanelOutput)]) -> JSValue {
    let l: Vec<JSValue> = panels
        .iter()
        .map(|(panel, output)| panel_to_json(panel, output))
        .collect();
    json!({ "panels": l })
}

fn check_reference(reference_path: &str, pretty_js_summary: &str) -> DashResult<()> {
    let contents =
        fs::read_to_string(reference_path).context(OpeningJsonSnafu { path: reference_path })?;
    let reference: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {
        path: reference_path,
    })?;
    let pretty_js_reference =
        serde_json::to_string_pretty(&reference).context(SerializingJsonSnafu {})?;
    if pretty_js_reference != pretty_js_summary {
        warn!("Found differences with the reference summary");
        print_diff(pretty_js_reference.as_str(), pretty_js_summary, "\n");
        whatever!("Difference detected between the dashboard summary and the reference summary")
    }
    info!("The summary matches the reference {:?}", reference_path);
    Ok(())
}

fn load_config(args: &Args) -> DashResult<(DashConfig, PathBuf)> {
    let (config, config_root) = match &args.config {
        Some(config_path) => {
            let config = read_config(config_path)?;
            let root = Path::new(config_path)
                .parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_default();
            (config, root)
        }
        None => (DashConfig::egov_defaults(), PathBuf::new()),
    };
    // The command line wins over the file. A directory from the file is
    // relative to the file.
    let data_dir = match (&args.data_dir, &config.data_directory) {
        (Some(d), _) => PathBuf::from(d),
        (None, Some(d)) => config_root.join(d),
        (None, None) => config_root.join(DEFAULT_DATA_DIRECTORY),
    };
    Ok((config, data_dir))
}

pub fn run_dashboard(args: &Args) -> DashResult<()> {
    let (mut config, data_dir) = load_config(args)?;
    if let Some(top_n) = args.top {
        config.top_n = Some(top_n);
        for p in config.panels.iter_mut() {
            p.top_n = None;
        }
    }
    info!("config: {:?} data directory: {:?}", config, data_dir);

    if let Some(name) = &args.download {
        let dest = PathBuf::from(args.download_to.clone().unwrap_or_else(|| {
            io_common::simplify_file_name(name)
        }));
        let n = download::download(&data_dir, name, &dest)?;
        info!("Copied {} bytes to {:?}", n, dest);
        return Ok(());
    }

    let mut selections: Vec<(String, i32)> = Vec::new();
    for s in args.year.iter() {
        let sel = parse_year_selection(s)?;
        ensure!(
            config.panels.iter().any(|p| p.id == sel.0),
            ConfigValueSnafu {
                option: "year",
                value: s.clone()
            }
        );
        selections.push(sel);
    }

    let panels = load_panels(&config, &data_dir)?;

    let mut outputs: Vec<(LoadedPanel, PanelOutput)> = Vec::new();
    for panel in panels {
        let year = selections
            .iter()
            .rev()
            .find(|(id, _)| *id == panel.source.id)
            .map(|(_, y)| *y);
        let output = select_year(&panel, year);
        if let (Some(dir), Some(update)) = (&args.figures, &output.update) {
            figure::write_figure(Path::new(dir), &panel.source, panel.scope, update)?;
        }
        outputs.push((panel, output));
    }

    let summary_js = build_summary_js(&outputs);
    let pretty_js_summary =
        serde_json::to_string_pretty(&summary_js).context(SerializingJsonSnafu {})?;

    match args.out.as_deref() {
        None | Some("stdout") => {
            println!("{}", pretty_js_summary);
        }
        Some(out_path) => {
            fs::write(out_path, &pretty_js_summary).context(WritingOutputSnafu { path: out_path })?;
            info!("Wrote summary to {:?}", out_path);
        }
    }

    if let Some(reference_path) = &args.reference {
        check_reference(reference_path, &pretty_js_summary)?;
    }

    debug!("run_dashboard: done");
    Ok(())
}
