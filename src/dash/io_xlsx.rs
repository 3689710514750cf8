use calamine::{open_workbook, DataType, Reader, Xlsx};

use crate::dash::{
    io_common::{add_row, find_columns},
    *,
};

pub fn read_xlsx_dataset(path: &str, panel: &PanelSource) -> DashResult<IndexDataset> {
    let wrange = get_range(path, panel)?;

    let mut rows = wrange.rows();
    let header: Vec<String> = rows
        .next()
        .context(EmptyFileSnafu { path })?
        .iter()
        .map(cell_text)
        .collect::<Option<Vec<String>>>()
        .context(WrongCellSnafu {
            path,
            lineno: 1usize,
            column: "header",
            content: "",
        })?;
    debug!("read_xlsx_dataset: {:?}: header: {:?}", path, header);
    let cols = find_columns(&header, panel, path)?;

    let mut builder = DatasetBuilder::new(&panel.value_column);
    let mut skipped = 0;
    for (idx, row) in rows.enumerate() {
        let lineno = idx + 2;
        ensure!(
            row.len() >= cols.min_len(),
            LineTooShortSnafu { path, lineno }
        );
        let text = |col: usize, column: &str| -> DashResult<String> {
            cell_text(&row[col]).context(WrongCellSnafu {
                path,
                lineno,
                column,
                content: format!("{:?}", row[col]),
            })
        };
        let country = text(cols.country, "country")?;
        let year = text(cols.year, "year")?;
        let value = text(cols.value, "value")?;
        if !add_row(&mut builder, (&country, &year, &value), path, lineno)? {
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

fn get_range(path: &str, panel: &PanelSource) -> DashResult<calamine::Range<DataType>> {
    debug!(
        "get_range: path: {:?} worksheet: {:?}",
        path, &panel.excel_worksheet_name
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    // A worksheet name was provided, use it.
    if let Some(worksheet_name) = panel.excel_worksheet_name.as_deref() {
        workbook
            .worksheet_range(worksheet_name)
            .context(MissingWorksheetSnafu {
                path,
                name: worksheet_name,
            })?
            .context(OpeningExcelSnafu { path })
    } else {
        let mut all_worksheets = workbook.worksheets();
        ensure!(
            all_worksheets.len() == 1,
            AmbiguousWorksheetSnafu {
                path,
                count: all_worksheets.len()
            }
        );
        let (worksheet_name, wrange) = all_worksheets.remove(0);
        debug!("get_range: path: {:?} worksheet: {:?}", path, worksheet_name);
        Ok(wrange)
    }
}

// The text of a cell, as it would appear in a CSV export.
fn cell_text(cell: &DataType) -> Option<String> {
    match cell {
        DataType::String(s) => Some(s.clone()),
        DataType::Float(f) => Some(f.to_string()),
        DataType::Int(i) => Some(i.to_string()),
        DataType::Empty => Some(String::new()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;
    use std::path::Path;

    #[test]
    fn cell_texts() {
        assert_eq!(cell_text(&DataType::Float(2020.0)), Some("2020".to_string()));
        assert_eq!(cell_text(&DataType::Float(0.25)), Some("0.25".to_string()));
        assert_eq!(cell_text(&DataType::Int(2018)), Some("2018".to_string()));
        assert_eq!(
            cell_text(&DataType::String("Estonia".to_string())),
            Some("Estonia".to_string())
        );
        assert_eq!(cell_text(&DataType::Empty), Some("".to_string()));
        assert_eq!(cell_text(&DataType::Bool(true)), None);
    }

    type Row<'a> = (&'a str, f64, Option<f64>);

    // One worksheet per entry, with a leading column that is not read.
    fn write_workbook(path: &Path, sheets: &[(&str, &[Row<'_>])]) {
        let mut workbook = Workbook::new();
        for (name, rows) in sheets.iter() {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(*name).unwrap();
            for (col, h) in ["Code", "English name", "Year", "UN eGov index"]
                .iter()
                .enumerate()
            {
                worksheet.write_string(0, col as u16, *h).unwrap();
            }
            for (idx, (country, year, value)) in rows.iter().enumerate() {
                let r = (idx + 1) as u32;
                worksheet.write_string(r, 0, "-").unwrap();
                worksheet.write_string(r, 1, *country).unwrap();
                worksheet.write_number(r, 2, *year).unwrap();
                if let Some(v) = value {
                    worksheet.write_number(r, 3, *v).unwrap();
                }
            }
        }
        workbook.save(path).unwrap();
    }

    const UN_ROWS: &[Row<'static>] = &[
        ("Denmark", 2020.0, Some(0.9758)),
        ("Tuvalu", 2020.0, None),
        ("Denmark", 2018.0, Some(0.915)),
    ];

    fn un_panel() -> PanelSource {
        DashConfig::egov_defaults().panels[0].clone()
    }

    #[test]
    fn reads_single_worksheet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("un.xlsx");
        write_workbook(&path, &[("UN", UN_ROWS)]);

        let dataset = read_xlsx_dataset(&path.display().to_string(), &un_panel()).unwrap();
        assert_eq!(dataset.label(), "UN eGov index");
        // Tuvalu has no value.
        assert_eq!(dataset.len(), 2);
        assert_eq!(
            dataset.records()[0],
            IndexRecord::new("Denmark", 2020, 0.9758)
        );
        assert_eq!(dataset.years(), vec![2018, 2020]);
    }

    #[test]
    fn named_worksheet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("both.xlsx");
        let other: &[Row<'_>] = &[("Estonia", 2019.0, Some(0.5))];
        write_workbook(&path, &[("UN", UN_ROWS), ("Other", other)]);
        let path = path.display().to_string();

        let mut panel = un_panel();
        panel.excel_worksheet_name = Some("Other".to_string());
        let dataset = read_xlsx_dataset(&path, &panel).unwrap();
        assert_eq!(dataset.records(), &[IndexRecord::new("Estonia", 2019, 0.5)]);

        panel.excel_worksheet_name = Some("Missing".to_string());
        assert!(matches!(
            read_xlsx_dataset(&path, &panel),
            Err(DashError::MissingWorksheet { .. })
        ));
    }

    #[test]
    fn several_worksheets_need_a_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("both.xlsx");
        write_workbook(&path, &[("UN", UN_ROWS), ("Copy", UN_ROWS)]);
        let err = read_xlsx_dataset(&path.display().to_string(), &un_panel()).unwrap_err();
        assert!(matches!(err, DashError::AmbiguousWorksheet { count: 2, .. }));
    }

    #[test]
    fn missing_workbook() {
        let panel = DashConfig::egov_defaults().panels[1].clone();
        let err = read_xlsx_dataset("/nonexistent/eur-t3.xlsx", &panel).unwrap_err();
        assert!(matches!(err, DashError::OpeningExcel { .. }));
    }
}
