// Primitives for reading CSV exports.

use crate::round::*;

/// Reads all the rows of a CSV file, header included.
pub fn read_csv_rows(path: &str) -> RoundResult<Vec<Vec<String>>> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;
    let mut rows: Vec<Vec<String>> = Vec::new();
    for (idx, line_r) in rdr.into_records().enumerate() {
        let lineno = idx + 1;
        let line = line_r.context(CsvLineParseSnafu { path, lineno })?;
        rows.push(line.iter().map(|s| s.to_string()).collect());
    }
    debug!("read_csv_rows: {}: {} rows", path, rows.len());
    Ok(rows)
}

pub fn read_csv_responses(path: &str, cfs: &ResponseSource) -> RoundResult<Vec<SubmittedAnswer>> {
    let rows = read_csv_rows(path)?;
    grid_to_answers(path, &rows, cfs)
}
