//! Assembles tabular correspondence records (one row per letter sent to a
//! Member of Parliament) into formatted Word documents, bundled per
//! electorate.
//!
//! The pipeline is synchronous and purely in-memory:
//!
//! raw rows -> [`ingest`] -> [`group_records`] -> [`build`] -> [`Archive`]
//!
//! The MP lookup table ([`MpDirectory`]) and the [`DocumentTemplate`] are
//! collaborators owned by the caller; they are read-only during a run, so
//! every run over identical input produces identical archive bytes.
//!
//! Failures are collected, not raised: a malformed row or an unrenderable
//! record is recorded with its reason and skipped, and the pipeline always
//! produces the best achievable archive from the valid subset.
//!
//! ```
//! use letter_assembly::{convert, DocumentTemplate, MpDirectory, MpEntry, RawRow};
//!
//! let mut mps = MpDirectory::new("Mx");
//! mps.insert(MpEntry {
//!     honorific: "Ms".to_string(),
//!     first_name: "Jane".to_string(),
//!     surname: "Smith".to_string(),
//! });
//! let rows = vec![RawRow {
//!     electorate: "East".to_string(),
//!     mp: "Smith".to_string(),
//!     date: "Mar 01, 2023".to_string(),
//!     body: "{{salutation}}, thank you.".to_string(),
//! }];
//! let outcome = convert(&rows, &mps, &DocumentTemplate::default_letter());
//! assert!(outcome.rejected_rows.is_empty());
//! assert_eq!(outcome.archive.document_count(), 1);
//! ```

mod archive;
mod dates;
mod docx;
mod errors;
mod grouping;
mod record;
mod render;
mod salutation;

use log::info;

pub use crate::archive::{build, Archive, ArchiveOutcome, RenderedDocument};
pub use crate::dates::parse_date;
pub use crate::docx::write_docx;
pub use crate::errors::{
    DateParseError, PackagingError, RenderError, RowError, TemplateSubstitutionError,
    UnresolvedMpError,
};
pub use crate::grouping::{group_records, ElectorateGroup};
pub use crate::record::{ingest, IngestOutcome, LetterRecord, RawRow};
pub use crate::render::{render_paragraphs, DocumentTemplate, Paragraph, Token};
pub use crate::salutation::{MpDirectory, MpEntry, Salutation};

/// Everything one pipeline run produces: the archive plus the collected
/// per-row and per-record failures, for the caller to surface.
#[derive(Debug)]
pub struct ConversionOutcome {
    pub archive: Archive,
    pub rejected_rows: Vec<RowError>,
    pub render_errors: Vec<RenderError>,
}

/// The pipeline entry point: ingest, group, render and collect.
pub fn convert(
    rows: &[RawRow],
    directory: &MpDirectory,
    template: &DocumentTemplate,
) -> ConversionOutcome {
    info!(
        "convert: {} input rows, {} known MPs",
        rows.len(),
        directory.len()
    );
    let IngestOutcome { records, failures } = record::ingest(rows, directory);
    let groups = grouping::group_records(records);
    let ArchiveOutcome {
        archive,
        failures: render_errors,
    } = archive::build(&groups, template);
    info!(
        "convert: {} documents over {} electorates, {} rejected rows, {} render failures",
        archive.document_count(),
        archive.iter().count(),
        failures.len(),
        render_errors.len()
    );
    ConversionOutcome {
        archive,
        rejected_rows: failures,
        render_errors,
    }
}
