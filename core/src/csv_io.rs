//! Delimited-text load and save for [`RowSet`]s

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::errors::{KeywordError, Result};
use crate::row_set::{DEFAULT_CATEGORY_COLUMN, RowSet};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Options shared by load and save
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvOptions {
    pub delimiter: u8,
    /// Header of the category column
    pub category_column: String,
    /// Prefix outputs with a UTF-8 BOM
    pub write_bom: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            category_column: DEFAULT_CATEGORY_COLUMN.to_string(),
            write_bom: true,
        }
    }
}

/// Read a row set from any reader. `name` identifies the source in errors.
pub fn read_row_set<R: Read>(reader: R, name: &str, options: &CsvOptions) -> Result<RowSet> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| KeywordError::load_with_source(format!("{name}: cannot read header row"), e))?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    let mut set = RowSet::new(name, headers, options.category_column.clone())?;

    for record in reader.records() {
        let record = record
            .map_err(|e| KeywordError::load_with_source(format!("{name}: malformed row"), e))?;
        let line = record.position().map_or(0, csv::Position::line);
        set.push_fields(record.iter().map(ToString::to_string).collect(), line)?;
    }

    Ok(set)
}

/// Load a row set from a file
pub fn load_row_set(path: &Path, options: &CsvOptions) -> Result<RowSet> {
    let file = File::open(path).map_err(|e| {
        KeywordError::load_with_source(format!("cannot open {}", path.display()), e)
    })?;
    let name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
    let set = read_row_set(io::BufReader::new(file), &name, options)?;

    tracing::info!(
        path = %path.display(),
        rows = set.len(),
        columns = set.headers().len(),
        "loaded keyword file"
    );
    Ok(set)
}

/// Write a row set, including the category column, to any writer
pub fn write_row_set<W: Write>(
    mut writer: W,
    set: &RowSet,
    options: &CsvOptions,
) -> io::Result<()> {
    if options.write_bom {
        writer.write_all(UTF8_BOM)?;
    }
    let mut out = csv::WriterBuilder::new()
        .delimiter(options.delimiter)
        .from_writer(writer);

    out.write_record(set.output_headers())?;
    for row in set.rows() {
        out.write_record(set.output_fields(row))?;
    }
    out.flush()
}

/// Save a row set to `path`. The file is staged next to the destination
/// and renamed into place, so a failed save leaves no partial output. A
/// replaced file keeps its permissions; a new one gets the mode a plain
/// create would give it.
pub fn save_row_set(path: &Path, set: &RowSet, options: &CsvOptions) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let save_err = |e: io::Error| {
        KeywordError::save_with_source(format!("cannot write {}", path.display()), e)
    };

    std::fs::create_dir_all(dir).map_err(save_err)?;
    let mut staged = staging_file(dir).map_err(save_err)?;
    write_row_set(&mut staged, set, options).map_err(save_err)?;
    if let Ok(existing) = std::fs::metadata(path) {
        staged
            .as_file()
            .set_permissions(existing.permissions())
            .map_err(save_err)?;
    }
    staged.persist(path).map_err(|e| save_err(e.error))?;

    tracing::info!(path = %path.display(), rows = set.len(), "saved classified file");
    Ok(())
}

/// Temp file in `dir` created with the default file mode (0666 less umask)
/// instead of the owner-only mode `tempfile` uses
fn staging_file(dir: &Path) -> io::Result<NamedTempFile> {
    let mut builder = tempfile::Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    builder.prefix(".kwtriage").tempfile_in(dir)
}
