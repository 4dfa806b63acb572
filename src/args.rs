use clap::Parser;

/// Converts MP correspondence exports into per-electorate Word documents,
/// bundled into one ZIP archive.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path) CSV table of the known MPs, with the columns 'Salutation',
    /// 'First name' and 'Last name'. Extra columns are ignored.
    #[clap(short, long, value_parser)]
    pub mps: String,

    /// (file path) The letters to convert, one row per letter: a CSV file with
    /// the columns 'ELECTORATE', 'MP', 'Submission Date' and 'Your letter', or
    /// an Excel (.xlsx) file with the same columns in its first worksheet.
    /// Extra columns are ignored.
    #[clap(short, long, value_parser)]
    pub input: String,

    /// (file path or empty) A plain-text document template, one line per
    /// paragraph; wrap a line in ** to render it bold. Recognized placeholders
    /// are {{mp_name}}, {{salutation}}, {{date}} and {{body}}. When empty, the
    /// built-in letter layout is used.
    #[clap(short, long, value_parser)]
    pub template: Option<String>,

    /// (file path) Where the ZIP archive of generated documents is written.
    #[clap(short, long, value_parser, default_value = "electorate_letters.zip")]
    pub out: String,

    /// The honorific used when neither the letter row nor the MP table
    /// carries one.
    #[clap(long, value_parser, default_value = "Mx")]
    pub default_honorific: String,

    /// (file path or empty) If specified, the run summary is compared against
    /// this reference JSON file and the program fails on any difference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary of the run
    /// will be written in JSON format to the given location instead of the
    /// standard output.
    #[clap(short, long, value_parser)]
    pub summary: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
