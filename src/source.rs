// Bulk sources for the uploader: the built-in sample list and record files
// (csv or json) found in the configured data directory.

use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::ClientError;
use crate::parser::{self, ParsedRows};
use crate::types::Record;

const SOURCE_EXTENSIONS: [&str; 2] = ["csv", "json"];

/// Fixed sample catalogue used to fill an empty server.
pub fn sample_records() -> Vec<Record> {
    [
        ("Max", "The Dark Side of the Moon", "Pink Floyd", 1973),
        ("Anna", "Abbey Road", "The Beatles", 1969),
        ("Peter", "Rumours", "Fleetwood Mac", 1977),
        ("Lisa", "Hotel California", "Eagles", 1976),
        ("Tom", "Led Zeppelin IV", "Led Zeppelin", 1971),
        ("Sarah", "Thriller", "Michael Jackson", 1982),
        ("Chris", "Back in Black", "AC/DC", 1980),
        ("Emma", "The Wall", "Pink Floyd", 1979),
        ("Mike", "Nevermind", "Nirvana", 1991),
        ("Julia", "OK Computer", "Radiohead", 1997),
        ("Alex", "Appetite for Destruction", "Guns N' Roses", 1987),
        ("Nina", "Purple Rain", "Prince", 1984),
        ("Ben", "Born to Run", "Bruce Springsteen", 1975),
        ("Sophie", "Aja", "Steely Dan", 1977),
        ("David", "Pet Sounds", "The Beach Boys", 1966),
    ]
    .into_iter()
    .map(|(owner, title, artist, year)| Record::new(owner, title, artist, year))
    .collect()
}

fn is_source_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| SOURCE_EXTENSIONS.iter().any(|s| e.eq_ignore_ascii_case(s)))
            .unwrap_or(false)
}

/// List usable record files in `dir`, sorted by file name.
///
/// Fails with [`ClientError::SourceNotFound`] when the directory is
/// missing or holds no csv/json files, so no batch is ever started.
pub fn discover(dir: &Path) -> Result<Vec<PathBuf>, ClientError> {
    if !dir.is_dir() {
        return Err(ClientError::SourceNotFound(format!(
            "data directory '{}' does not exist",
            dir.display()
        )));
    }

    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| is_source_file(path))
        .collect();

    if files.is_empty() {
        return Err(ClientError::SourceNotFound(format!(
            "no csv or json files in '{}'",
            dir.display()
        )));
    }

    files.sort();
    tracing::debug!(dir = %dir.display(), count = files.len(), "discovered bulk sources");
    Ok(files)
}

/// Load records from a csv or json file. Json files hold an array of
/// record objects and never produce row warnings.
pub fn load_file(path: &Path) -> Result<ParsedRows, ClientError> {
    let text = fs::read_to_string(path)?;

    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let parsed = if is_json {
        let records: Vec<Record> = serde_json::from_str(&text)?;
        ParsedRows {
            records,
            warnings: Vec::new(),
        }
    } else {
        parser::parse_str(&text)
    };

    tracing::info!(
        file = %path.display(),
        records = parsed.records.len(),
        skipped = parsed.warnings.len(),
        "loaded bulk source"
    );
    Ok(parsed)
}
