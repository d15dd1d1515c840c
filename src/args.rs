use clap::Parser;

/// Summarizes the export of a satisfaction survey: counts and percentages per item,
/// comments and answers to the open questions.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path or empty) The survey export. Setting this option overrides the path that may be specified
    /// with the --config option.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (default csv, or xlsx for files ending in .xlsx) The type of the input.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (file path, optional) A JSON configuration file describing the layout of the export and the session.
    /// See the documentation of the survey_items crate for the format.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary will be written in JSON format to the given
    /// location.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference file containing a summary in JSON format. If provided, survey-digest will
    /// check that the computed summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (text or json, default text) The format of the report printed to the standard output.
    #[clap(long, value_parser)]
    pub format: Option<String>,

    /// (default: first worksheet) When using an Excel file, indicates the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// The number of the training session, for display.
    #[clap(long, value_parser)]
    pub session_number: Option<String>,

    /// The date of the training session, for display.
    #[clap(long, value_parser)]
    pub session_date: Option<String>,

    /// The name of the training session, for display.
    #[clap(long, value_parser)]
    pub session_label: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
