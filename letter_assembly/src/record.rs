//! Ingestion of raw tabular rows into canonical letter records.

use chrono::NaiveDate;
use log::debug;
use snafu::prelude::*;

use crate::dates::parse_date;
use crate::errors::{
    BadDateSnafu, MissingElectorateSnafu, MissingMpSnafu, RowError, UnknownMpSnafu,
};
use crate::salutation::MpDirectory;

/// One raw tabular row, as handed over by the input layer. All values are
/// plain text; empty strings stand for missing cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    pub electorate: String,
    pub mp: String,
    pub date: String,
    pub body: String,
}

/// One piece of correspondence after normalization. Immutable once built:
/// the grouper and the renderer only read it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LetterRecord {
    /// Grouping key, kept exactly as supplied (no normalization).
    pub electorate: String,
    /// The raw identifier the salutation was resolved from.
    pub mp_identifier: String,
    /// e.g. "Dear Ms Smith"
    pub salutation: String,
    /// e.g. "Jane Smith"
    pub display_name: String,
    pub date: NaiveDate,
    /// The letter text, with placeholder tokens still in place.
    pub body_template: String,
}

/// The result of one ingestion pass: the usable records plus one error per
/// rejected row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestOutcome {
    pub records: Vec<LetterRecord>,
    pub failures: Vec<RowError>,
}

/// Normalizes every row independently. A malformed row is recorded in
/// `failures` and never blocks the other rows.
pub fn ingest(rows: &[RawRow], directory: &MpDirectory) -> IngestOutcome {
    let mut records: Vec<LetterRecord> = Vec::new();
    let mut failures: Vec<RowError> = Vec::new();
    for (row, raw) in rows.iter().enumerate() {
        match ingest_row(row, raw, directory) {
            Ok(record) => records.push(record),
            Err(e) => {
                debug!("ingest: rejecting row {}: {}", row, e);
                failures.push(e);
            }
        }
    }
    IngestOutcome { records, failures }
}

fn ingest_row(row: usize, raw: &RawRow, directory: &MpDirectory) -> Result<LetterRecord, RowError> {
    ensure!(
        !raw.electorate.trim().is_empty(),
        MissingElectorateSnafu { row }
    );
    ensure!(!raw.mp.trim().is_empty(), MissingMpSnafu { row });
    let date = parse_date(&raw.date).context(BadDateSnafu { row })?;
    let resolved = directory.resolve(&raw.mp).context(UnknownMpSnafu { row })?;
    Ok(LetterRecord {
        electorate: raw.electorate.clone(),
        mp_identifier: raw.mp.clone(),
        salutation: resolved.salutation,
        display_name: resolved.display_name,
        date,
        body_template: raw.body.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::salutation::MpEntry;

    fn directory() -> MpDirectory {
        let mut d = MpDirectory::new("Mx");
        d.insert(MpEntry {
            honorific: "Ms".to_string(),
            first_name: "Jane".to_string(),
            surname: "Smith".to_string(),
        });
        d
    }

    fn row(electorate: &str, mp: &str, date: &str) -> RawRow {
        RawRow {
            electorate: electorate.to_string(),
            mp: mp.to_string(),
            date: date.to_string(),
            body: "{{salutation}},\nThank you.".to_string(),
        }
    }

    #[test]
    fn valid_row_becomes_one_record() {
        let out = ingest(&[row("East", "Smith", "Mar 01, 2023")], &directory());
        assert!(out.failures.is_empty());
        assert_eq!(out.records.len(), 1);
        let record = &out.records[0];
        assert_eq!(record.electorate, "East");
        assert_eq!(record.salutation, "Dear Ms Smith");
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2023, 3, 1).unwrap());
    }

    #[test]
    fn empty_required_fields_reject_the_row() {
        let out = ingest(
            &[row("", "Smith", "Mar 01, 2023"), row("East", "  ", "Mar 01, 2023")],
            &directory(),
        );
        assert!(out.records.is_empty());
        assert_eq!(out.failures.len(), 2);
        assert_eq!(out.failures[0].row(), 0);
        assert_eq!(out.failures[1].row(), 1);
    }

    #[test]
    fn bad_date_rejects_only_that_row() {
        let out = ingest(
            &[
                row("East", "Smith", "soon"),
                row("East", "Smith", "Mar 01, 2023"),
            ],
            &directory(),
        );
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.failures.len(), 1);
        assert_eq!(out.failures[0].row(), 0);
        assert!(out.failures[0].to_string().contains("soon"));
    }

    #[test]
    fn unknown_mp_rejects_the_row() {
        let out = ingest(&[row("East", "Nobody", "Mar 01, 2023")], &directory());
        assert!(out.records.is_empty());
        assert!(matches!(
            out.failures[0],
            RowError::UnknownMp { row: 0, .. }
        ));
    }

    #[test]
    fn empty_input_is_not_an_error() {
        let out = ingest(&[], &directory());
        assert!(out.records.is_empty());
        assert!(out.failures.is_empty());
    }
}
