// Primitives for reading the CSV inputs.

use std::io::Read;

use csv::StringRecord;
use log::debug;
use snafu::prelude::*;

use letter_assembly::{MpDirectory, MpEntry, RawRow};

use crate::letters::*;

/// Reads the MP lookup table. Rows without a surname are skipped; the rest
/// become directory entries.
pub fn read_mp_table(path: &str, default_honorific: &str) -> LettersResult<MpDirectory> {
    let reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .context(OpeningCsvSnafu { path })?;
    read_mp_records(reader, path, default_honorific)
}

fn read_mp_records<R: Read>(
    mut reader: csv::Reader<R>,
    path: &str,
    default_honorific: &str,
) -> LettersResult<MpDirectory> {
    let headers = reader.headers().context(OpeningCsvSnafu { path })?.clone();
    let indices = column_indices(&headers, &MP_COLUMNS, path)?;
    let mut directory = MpDirectory::new(default_honorific);
    for (lineno, row) in reader.records().enumerate() {
        let row = row.context(CsvRowSnafu { path })?;
        let entry = MpEntry {
            honorific: field(&row, indices[0]),
            first_name: field(&row, indices[1]),
            surname: field(&row, indices[2]),
        };
        if entry.surname.is_empty() {
            debug!("read_mp_records: skipping line {} with no surname", lineno + 2);
            continue;
        }
        directory.insert(entry);
    }
    Ok(directory)
}

/// Reads the letters file. Missing cells become empty strings and are dealt
/// with downstream, row by row; only I/O and header problems are fatal here.
pub fn read_letter_rows(path: &str) -> LettersResult<Vec<RawRow>> {
    let reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .context(OpeningCsvSnafu { path })?;
    read_letter_records(reader, path)
}

fn read_letter_records<R: Read>(
    mut reader: csv::Reader<R>,
    path: &str,
) -> LettersResult<Vec<RawRow>> {
    let headers = reader.headers().context(OpeningCsvSnafu { path })?.clone();
    let indices = column_indices(&headers, &LETTER_COLUMNS, path)?;
    let mut rows: Vec<RawRow> = Vec::new();
    for row in reader.records() {
        let row = row.context(CsvRowSnafu { path })?;
        rows.push(RawRow {
            electorate: field(&row, indices[0]),
            mp: field(&row, indices[1]),
            date: field(&row, indices[2]),
            body: field(&row, indices[3]),
        });
    }
    Ok(rows)
}

fn field(row: &StringRecord, idx: usize) -> String {
    row.get(idx).unwrap_or("").trim().to_string()
}

/// Resolves each required column name to its position in the header row.
/// All the missing names are reported together.
fn column_indices(
    headers: &StringRecord,
    required: &[&str],
    path: &str,
) -> LettersResult<Vec<usize>> {
    let mut indices: Vec<usize> = Vec::with_capacity(required.len());
    let mut missing: Vec<String> = Vec::new();
    for name in required {
        match headers.iter().position(|h| h.trim() == *name) {
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
