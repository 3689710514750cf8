// Downloads of the raw dataset files. The files are served as they are.

use std::path::{Component, Path, PathBuf};

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::dash::*;

pub const DOWNLOAD_PREFIX: &str = "/data/";

// Everything except the unreserved characters and the path separator.
const LINK_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~')
    .remove(b'/');

/// The link under which a dataset file is offered for download.
pub fn file_download_link(filename: &str) -> String {
    format!(
        "{}{}",
        DOWNLOAD_PREFIX,
        utf8_percent_encode(filename, LINK_ENCODE_SET)
    )
}

/// The media type a dataset file is served with, from its extension.
pub fn mime_type(filename: &str) -> &'static str {
    match Path::new(filename).extension().and_then(|e| e.to_str()) {
        Some(e) if e.eq_ignore_ascii_case("xlsx") => {
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        }
        _ => "text/csv",
    }
}

/// Finds a file of the data directory by name.
///
/// Only plain relative names are accepted: nothing outside of the data
/// directory can be downloaded.
pub fn resolve_download(data_dir: &Path, name: &str) -> DashResult<PathBuf> {
    let rel = Path::new(name);
    let is_plain = !name.is_empty() && rel.components().all(|c| matches!(c, Component::Normal(_)));
    ensure!(is_plain, DownloadNameSnafu { name });
    let path = data_dir.join(rel);
    ensure!(path.is_file(), DownloadNameSnafu { name });
    Ok(path)
}

/// Copies a dataset file to the destination, returning the number of bytes copied.
pub fn download(data_dir: &Path, name: &str, dest: &Path) -> DashResult<u64> {
    let src = resolve_download(data_dir, name)?;
    info!(
        "Downloading {:?} ({}) to {:?}",
        src,
        mime_type(name),
        dest
    );
    fs::copy(&src, dest).context(WritingOutputSnafu {
        path: dest.display().to_string(),
    })
}
