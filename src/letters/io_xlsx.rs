// Letters input from an Excel workbook, as exported by survey tools.

use calamine::{open_workbook, DataType, Reader, Xlsx};
use log::debug;
use snafu::prelude::*;

use letter_assembly::RawRow;

use crate::letters::*;

/// Reads the letter rows from the first worksheet. The first row must hold
/// the column names; the required columns are the same as for CSV input.
pub fn read_letter_rows(path: &str) -> LettersResult<Vec<RawRow>> {
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;
    let range = workbook
        .worksheet_range_at(0)
        .context(EmptyExcelSnafu { path })?
        .context(OpeningExcelSnafu { path })?;

    let mut rows_iter = range.rows();
    let header = rows_iter.next().context(EmptyExcelSnafu { path })?;
    debug!("read_letter_rows: header: {:?}", header);
    let indices = column_indices(header, path)?;

    let mut rows: Vec<RawRow> = Vec::new();
    for row in rows_iter {
        rows.push(RawRow {
            electorate: cell_text(row, indices[0]),
            mp: cell_text(row, indices[1]),
            date: cell_text(row, indices[2]),
            body: cell_text(row, indices[3]),
        });
    }
    Ok(rows)
}

fn column_indices(header: &[DataType], path: &str) -> LettersResult<Vec<usize>> {
    let names: Vec<String> = header.iter().map(|cell| cell_string(cell)).collect();
    let mut indices: Vec<usize> = Vec::with_capacity(LETTER_COLUMNS.len());
    let mut missing: Vec<String> = Vec::new();
    for name in LETTER_COLUMNS {
        match names.iter().position(|h| h.trim() == name) {
            Some(idx) => indices.push(idx),
            None => missing.push(name.to_string()),
        }
    }
    if !missing.is_empty() {
        return MissingColumnsSnafu {
            path,
            columns: missing,
        }
        .fail();
    }
    Ok(indices)
}

fn cell_text(row: &[DataType], idx: usize) -> String {
    match row.get(idx) {
        Some(cell) => cell_string(cell).trim().to_string(),
        None => String::new(),
    }
}

fn cell_string(cell: &DataType) -> String {
    match cell {
        DataType::String(s) => s.clone(),
        DataType::Int(i) => i.to_string(),
        DataType::Float(f) => f.to_string(),
        DataType::Bool(b) => b.to_string(),
        DataType::Empty => String::new(),
        // Error cells and raw datetime serials carry nothing the date
        // normalizer downstream could use.
        _ => String::new(),
    }
}
