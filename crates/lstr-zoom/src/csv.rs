//! CSV output for report tables.

use std::path::Path;

use crate::error::ZoomError;
use crate::table::{ReportRow, ReportTable};

/// Quote a field if it contains a comma, quote or line break.
#[must_use]
pub fn escape_csv(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn push_line<I, S>(csv: &mut String, fields: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let line = fields
        .into_iter()
        .map(|f| escape_csv(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",");
    csv.push_str(&line);
    csv.push('\n');
}

/// Header row, one line per retained row, then the totals row.
#[must_use]
pub fn render_csv<R: ReportRow>(table: &ReportTable<R>) -> String {
    let mut csv = String::new();
    push_line(&mut csv, R::COLUMNS);
    for row in &table.rows {
        push_line(&mut csv, R::COLUMNS.iter().map(|c| row.text(c)));
    }
    push_line(&mut csv, table.totals_row());
    csv
}

/// Writes `table` to `path`, creating parent directories.
///
/// # Errors
///
/// Returns [`ZoomError::Io`] if the directory or file cannot be written.
pub async fn write_csv<R: ReportRow>(path: &Path, table: &ReportTable<R>) -> Result<(), ZoomError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| ZoomError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
    }
    tokio::fs::write(path, render_csv(table))
        .await
        .map_err(|source| ZoomError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    tracing::info!(path = %path.display(), rows = table.rows.len(), "finished creating Zoom stats file");
    Ok(())
}
