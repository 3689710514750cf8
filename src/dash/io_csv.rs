// Primitives for reading CSV files.

use crate::dash::{
    io_common::{add_row, find_columns},
    *,
};

pub fn read_csv_dataset(path: &str, panel: &PanelSource) -> DashResult<IndexDataset> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;
    let header: Vec<String> = rdr
        .headers()
        .context(CsvLineParseSnafu { path, lineno: 1usize })?
        .iter()
        .map(|s| s.to_string())
        .collect();
    debug!("read_csv_dataset: {:?}: header: {:?}", path, header);
    let cols = find_columns(&header, panel, path)?;

    let mut builder = DatasetBuilder::new(&panel.value_column);
    let mut skipped = 0;
    for (idx, line_r) in rdr.records().enumerate() {
        // The header is line 1.
        let lineno = idx + 2;
        let line = line_r.context(CsvLineParseSnafu { path, lineno })?;
        ensure!(
            line.len() >= cols.min_len(),
            LineTooShortSnafu { path, lineno }
        );
        let cells = (
            line.get(cols.country).unwrap_or_default(),
            line.get(cols.year).unwrap_or_default(),
            line.get(cols.value).unwrap_or_default(),
        );
        if !add_row(&mut builder, cells, path, lineno)? {
            skipped += 1;
        }
    }
    info!(
        "Read {} records from {:?} ({} rows without value)",
        builder.len(),
        path,
        skipped
    );
    Ok(builder.build())
}
