// Choropleth figures, in the JSON format understood by Plotly.
//
// Drawing is left to Plotly: the figure lists the countries of the selected
// year and their values, countries without data are simply absent.

use std::path::{Path, PathBuf};

use crate::dash::*;

pub const COLOR_SCALE: &str = "Viridis";

pub fn choropleth_figure(panel: &PanelSource, scope: MapScope, update: &PanelUpdate) -> JSValue {
    let locations: Vec<&String> = update.map.keys().collect();
    let z: Vec<f64> = update.map.values().cloned().collect();
    json!({
        "data": [{
            "type": "choropleth",
            "locations": locations,
            "z": z,
            "locationmode": "country names",
            "colorscale": COLOR_SCALE,
            "colorbar": {"title": panel.value_label()},
        }],
        "layout": {
            "title": format!("{} ({})", panel.title, update.year),
            "geo": {"scope": scope.as_plotly()},
        }
    })
}

/// Writes the figure of a panel as `<panel id>-<year>.json` in the directory.
pub fn write_figure(
    dir: &Path,
    panel: &PanelSource,
    scope: MapScope,
    update: &PanelUpdate,
) -> DashResult<PathBuf> {
    fs::create_dir_all(dir).context(WritingOutputSnafu {
        path: dir.display().to_string(),
    })?;
    let path = dir.join(format!("{}-{}.json", panel.id, update.year));
    let js = choropleth_figure(panel, scope, update);
    let contents = serde_json::to_string_pretty(&js).context(SerializingJsonSnafu {})?;
    fs::write(&path, contents).context(WritingOutputSnafu {
        path: path.display().to_string(),
    })?;
    info!("Wrote figure {:?}", path);
    Ok(path)
}
