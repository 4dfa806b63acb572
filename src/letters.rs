use std::collections::BTreeMap;
use std::fs;

use log::{info, warn};

use letter_assembly::{convert, ConversionOutcome, DocumentTemplate};
use serde::Serialize;
use snafu::{prelude::*, Snafu};
use text_diff::print_diff;

use crate::args::Args;

pub mod io_csv;
pub mod io_xlsx;

// The required input columns. Anything else in the files is ignored.
pub const MP_COLUMNS: [&str; 3] = ["Salutation", "First name", "Last name"];
pub const LETTER_COLUMNS: [&str; 4] = ["ELECTORATE", "MP", "Submission Date", "Your letter"];

#[derive(Debug, Snafu)]
pub enum LettersError {
    #[snafu(display("Error opening CSV file {path}"))]
    OpeningCsv { source: csv::Error, path: String },
    #[snafu(display("Error reading a row of {path}"))]
    CsvRow { source: csv::Error, path: String },
    #[snafu(display("{path} is missing the required columns {columns:?}"))]
    MissingColumns { path: String, columns: Vec<String> },
    #[snafu(display("Error opening Excel file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("No usable worksheet in {path}"))]
    EmptyExcel { path: String },
    #[snafu(display("The MP table {path} contains no usable entries"))]
    EmptyDirectory { path: String },
    #[snafu(display("Error reading template file {path}"))]
    ReadingTemplate {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error packaging the document archive"))]
    Packaging {
        source: letter_assembly::PackagingError,
    },
    #[snafu(display("Error writing {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error encoding the run summary"))]
    EncodingSummary { source: serde_json::Error },
    #[snafu(display("Error reading reference summary {path}"))]
    OpeningReference {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing reference summary {path}"))]
    ParsingReference {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("The run summary differs from the reference summary"))]
    ReferenceMismatch {},
}

pub type LettersResult<T> = Result<T, LettersError>;

/// What one run reports back, also usable as a regression reference.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    #[serde(rename = "documentCount")]
    document_count: usize,
    /// Electorate name to the ordered document file names under it.
    electorates: BTreeMap<String, Vec<String>>,
    #[serde(rename = "rejectedRows")]
    rejected_rows: Vec<String>,
    #[serde(rename = "renderErrors")]
    render_errors: Vec<String>,
}

pub fn run_conversion(args: &Args) -> LettersResult<()> {
    let directory = io_csv::read_mp_table(&args.mps, &args.default_honorific)?;
    ensure!(
        !directory.is_empty(),
        EmptyDirectorySnafu {
            path: args.mps.clone()
        }
    );
    info!("run_conversion: {} known MPs from {}", directory.len(), args.mps);

    let rows = if args.input.to_lowercase().ends_with(".xlsx") {
        io_xlsx::read_letter_rows(&args.input)?
    } else {
        io_csv::read_letter_rows(&args.input)?
    };
    info!("run_conversion: {} letter rows from {}", rows.len(), args.input);

    let template = match &args.template {
        Some(path) => {
            let text = fs::read_to_string(path)
                .context(ReadingTemplateSnafu { path: path.as_str() })?;
            DocumentTemplate::parse(&text)
        }
        None => DocumentTemplate::default_letter(),
    };

    let outcome = convert(&rows, &directory, &template);
    for failure in &outcome.rejected_rows {
        warn!("rejected row: {}", failure);
    }
    for failure in &outcome.render_errors {
        warn!("render failure: {}", failure);
    }

    let bytes = outcome.archive.to_zip_bytes().context(PackagingSnafu)?;
    fs::write(&args.out, &bytes).context(WritingOutputSnafu {
        path: args.out.clone(),
    })?;
    info!(
        "run_conversion: wrote {} documents to {}",
        outcome.archive.document_count(),
        args.out
    );

    let summary = build_summary(&outcome);
    let pretty_summary =
        serde_json::to_string_pretty(&summary).context(EncodingSummarySnafu)?;
    match args.summary.as_deref() {
        Some(path) if path != "stdout" => {
            fs::write(path, &pretty_summary).context(WritingOutputSnafu { path })?
        }
        _ => println!("{}", pretty_summary),
    }

    // The reference summary, if provided for comparison.
    if let Some(path) = args.reference.as_deref() {
        let contents = fs::read_to_string(path).context(OpeningReferenceSnafu { path })?;
        let reference: serde_json::Value =
            serde_json::from_str(&contents).context(ParsingReferenceSnafu { path })?;
        let pretty_reference =
            serde_json::to_string_pretty(&reference).context(EncodingSummarySnafu)?;
        if pretty_reference != pretty_summary {
            warn!("Found differences with the reference summary");
            print_diff(pretty_reference.as_str(), pretty_summary.as_str(), "\n");
            return ReferenceMismatchSnafu {}.fail();
        }
    }

    Ok(())
}

fn build_summary(outcome: &ConversionOutcome) -> RunSummary {
    let electorates: BTreeMap<String, Vec<String>> = outcome
        .archive
        .iter()
        .map(|(electorate, documents)| {
            (
                electorate.clone(),
                documents.iter().map(|d| d.file_name.clone()).collect(),
            )
        })
        .collect();
    RunSummary {
        document_count: outcome.archive.document_count(),
        electorates,
        rejected_rows: outcome
            .rejected_rows
            .iter()
            .map(|e| e.to_string())
            .collect(),
        render_errors: outcome
            .render_errors
            .iter()
            .map(|e| e.to_string())
            .collect(),
    }
}
