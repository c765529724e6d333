// Primitives for reading Excel exports.

use calamine::{open_workbook, DataType, Range, Reader, Xlsx};

use crate::round::*;

fn get_range(path: &str, cfs: &ResponseSource) -> RoundResult<Range<DataType>> {
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;
    let wrange = match &cfs.excel_worksheet_name {
        Some(name) => workbook
            .worksheet_range(name)
            .context(MissingWorksheetSnafu { path, name })?,
        None => workbook
            .worksheet_range_at(0)
            .context(EmptySheetSnafu { path })?,
    };
    wrange.context(OpeningExcelSnafu { path })
}

fn read_cell(path: &str, lineno: usize, cell: &DataType) -> RoundResult<String> {
    match cell {
        DataType::String(s) => Ok(s.clone()),
        DataType::Empty => Ok("".to_string()),
        DataType::Int(i) => Ok(i.to_string()),
        DataType::Float(f) if f.fract() == 0.0 => Ok(format!("{}", *f as i64)),
        DataType::Float(f) => Ok(f.to_string()),
        DataType::DateTime(f) => Ok(f.to_string()),
        DataType::Bool(b) => Ok(b.to_string()),
        _ => ExcelWrongCellTypeSnafu {
            path,
            lineno,
            content: format!("{:?}", cell),
        }
        .fail(),
    }
}

/// Reads all the rows of a worksheet, header included.
pub fn read_xlsx_rows(path: &str, cfs: &ResponseSource) -> RoundResult<Vec<Vec<String>>> {
    let wrange = get_range(path, cfs)?;
    let mut rows: Vec<Vec<String>> = Vec::new();
    for (idx, row) in wrange.rows().enumerate() {
        let lineno = idx + 1;
        let mut cells: Vec<String> = Vec::new();
        for cell in row.iter() {
            cells.push(read_cell(path, lineno, cell)?);
        }
        rows.push(cells);
    }
    debug!("read_xlsx_rows: {}: {} rows", path, rows.len());
    Ok(rows)
}

pub fn read_xlsx_responses(path: &str, cfs: &ResponseSource) -> RoundResult<Vec<SubmittedAnswer>> {
    let rows = read_xlsx_rows(path, cfs)?;
    grid_to_answers(path, &rows, cfs)
}
