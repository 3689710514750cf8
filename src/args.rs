use clap::Parser;

/// This program computes the rankings and maps of the UN and EU eGovernment indices.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON description of the dashboard panels. Without it, the UN
    /// and EU panels are shown. See the manual of egov_index for the format.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (directory) The directory containing the datasets. Overrides the dataDirectory option of
    /// the configuration (default: data).
    #[clap(short, long, value_parser)]
    pub data_dir: Option<String>,

    /// (PANEL=YEAR, repeatable) The year selected for a panel, for example `--year un=2018`.
    /// The latest year of the dataset is selected by default.
    #[clap(short, long, value_parser)]
    pub year: Vec<String>,

    /// (default 15) The number of countries shown in each table.
    #[clap(short, long, value_parser)]
    pub top: Option<usize>,

    /// (file path, 'stdout' or empty) Where the summary of the dashboard is written in JSON format.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (directory, optional) If specified, a Plotly choropleth figure is written in this directory
    /// for every panel.
    #[clap(short, long, value_parser)]
    pub figures: Option<String>,

    /// (file path) A reference summary in JSON format. If provided, the program checks that the
    /// computed summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file name) Copies the raw dataset file of this name from the data directory instead of
    /// computing the dashboard.
    #[clap(long, value_parser)]
    pub download: Option<String>,

    /// (file path) The destination of --download. Defaults to the name of the file in the
    /// current directory.
    #[clap(long, value_parser)]
    pub download_to: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
