// ********* Error taxonomy ***********
//
// Every per-row and per-record failure is collected and reported, never
// raised to abort a run. Only the I/O layer (outside this crate) has fatal
// errors.

use snafu::prelude::*;

/// No recognized date format matched the input text.
#[derive(Debug, Snafu, Clone, PartialEq, Eq)]
#[snafu(display("no recognized date format matches {text:?}"))]
#[snafu(visibility(pub(crate)))]
pub struct DateParseError {
    pub(crate) text: String,
}

/// The MP identifier is not present in the lookup table.
#[derive(Debug, Snafu, Clone, PartialEq, Eq)]
#[snafu(display("unknown MP {identifier:?}"))]
#[snafu(visibility(pub(crate)))]
pub struct UnresolvedMpError {
    pub(crate) identifier: String,
}

/// A recognized placeholder token has no value for this record.
#[derive(Debug, Snafu, Clone, PartialEq, Eq)]
#[snafu(display("placeholder {token:?} has no value for this record"))]
#[snafu(visibility(pub(crate)))]
pub struct TemplateSubstitutionError {
    pub(crate) token: &'static str,
}

impl TemplateSubstitutionError {
    /// The name of the token that could not be filled.
    pub fn token(&self) -> &'static str {
        self.token
    }
}

/// Why one input row was rejected during ingestion. The row index is
/// zero-based over the input sequence.
#[derive(Debug, Snafu, Clone, PartialEq, Eq)]
#[snafu(visibility(pub(crate)))]
pub enum RowError {
    #[snafu(display("row {row}: electorate is empty"))]
    MissingElectorate { row: usize },
    #[snafu(display("row {row}: MP identifier is empty"))]
    MissingMp { row: usize },
    #[snafu(display("row {row}: {source}"))]
    BadDate { row: usize, source: DateParseError },
    #[snafu(display("row {row}: {source}"))]
    UnknownMp {
        row: usize,
        source: UnresolvedMpError,
    },
}

impl RowError {
    pub fn row(&self) -> usize {
        match self {
            RowError::MissingElectorate { row } => *row,
            RowError::MissingMp { row } => *row,
            RowError::BadDate { row, .. } => *row,
            RowError::UnknownMp { row, .. } => *row,
        }
    }
}

/// The ZIP container for a document or for the final archive could not be
/// written.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum PackagingError {
    #[snafu(display("could not start archive entry {name}"))]
    ZipEntry {
        name: String,
        source: zip::result::ZipError,
    },
    #[snafu(display("could not write archive bytes"))]
    ZipWrite { source: std::io::Error },
    #[snafu(display("could not finalize the archive"))]
    ZipFinish { source: zip::result::ZipError },
}

/// One record of one electorate group failed to render. The document is
/// skipped; the rest of the archive is unaffected.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum RenderError {
    #[snafu(display("{electorate} document {position}: {source}"))]
    Substitution {
        electorate: String,
        position: usize,
        source: TemplateSubstitutionError,
    },
    #[snafu(display("{electorate} document {position}: {source}"))]
    DocumentPackaging {
        electorate: String,
        position: usize,
        source: PackagingError,
    },
}
