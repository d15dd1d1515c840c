use log::{debug, info, warn};

use snafu::{prelude::*, Snafu};
use survey_items::*;

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

pub mod config_reader;
pub mod io_common;
pub mod io_csv;
pub mod io_xlsx;
pub mod render;

use crate::args::Args;
use crate::digest::config_reader::*;
use crate::digest::io_common::{column_index_to_letters, simplify_file_name};

#[derive(Debug, Snafu)]
pub enum DigestError {
    #[snafu(display("Error opening file {path}"))]
    OpeningFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error opening Excel file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("The Excel file {path} has no worksheet or an empty worksheet"))]
    EmptyExcel { path: String },
    #[snafu(display("Cannot find the worksheet {name:?} in {path}"))]
    MissingWorksheet { name: String, path: String },
    #[snafu(display("Error reading JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Cannot understand the column {reference} (expected letters such as \"BO\" or a number starting at 1)"))]
    ParsingColumn { reference: String },
    #[snafu(display("Error writing the summary to {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("{source}"))]
    Survey { source: SurveyErrors },
    #[snafu(display("Difference detected between calculated summary and reference summary"))]
    ReferenceMismatch {},

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type DigestResult<T> = Result<T, DigestError>;

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum InputType {
    Csv,
    Xlsx,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Everything needed to produce one report, once the command line and the
/// configuration file have been merged.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ReportOptions {
    pub input_path: String,
    pub input_type: InputType,
    pub delimiter: u8,
    pub excel_worksheet_name: Option<String>,
    pub rules: ReportRules,
    pub session: SessionInfo,
    pub out: Option<String>,
    pub reference: Option<String>,
    pub format: OutputFormat,
}

fn parse_input_type(s: &str) -> DigestResult<InputType> {
    match s {
        "csv" => Ok(InputType::Csv),
        "xlsx" | "excel" => Ok(InputType::Xlsx),
        x => whatever!("Input type not implemented {:?}", x),
    }
}

fn parse_format(s: &str) -> DigestResult<OutputFormat> {
    match s {
        "text" => Ok(OutputFormat::Text),
        "json" => Ok(OutputFormat::Json),
        x => whatever!("Unknown output format {:?} (expected text or json)", x),
    }
}

/// Merges the command line with the configuration file. The command line wins.
pub fn resolve_options(args: &Args, config_path: Option<&str>) -> DigestResult<ReportOptions> {
    let config: DigestConfig = match config_path {
        Some(p) => read_config(p)?,
        None => DigestConfig::default(),
    };
    // Paths in the configuration file are relative to its directory.
    let root_p: PathBuf = match config_path {
        Some(p) => Path::new(p)
            .parent()
            .map(|d| d.to_path_buf())
            .unwrap_or_default(),
        None => PathBuf::new(),
    };
    let from_root = |p: &str| -> String { root_p.join(p).as_path().display().to_string() };

    let input_path: String = match (&args.input, &config.file_source.file_path) {
        (Some(p), _) => p.clone(),
        (None, Some(p)) => from_root(p),
        (None, None) => {
            whatever!("No input file: use --input or set fileSource.filePath in the configuration")
        }
    };

    let input_type = match (&args.input_type, &config.file_source.provider) {
        (Some(s), _) | (None, Some(s)) => parse_input_type(s.as_str())?,
        (None, None) if input_path.to_lowercase().ends_with(".xlsx") => InputType::Xlsx,
        (None, None) => InputType::Csv,
    };

    let format = match &args.format {
        Some(s) => parse_format(s.as_str())?,
        None => OutputFormat::Text,
    };

    let session_c = config.session();
    let session = SessionInfo {
        number: args.session_number.clone().or(session_c.number),
        date: args.session_date.clone().or(session_c.date),
        label: args.session_label.clone().or(session_c.label),
    };

    let out = match (&args.out, &config.output_settings.output_directory) {
        (Some(o), _) if o == "stdout" => Some(o.clone()),
        (Some(o), Some(dir)) if Path::new(o).is_relative() => {
            Some(root_p.join(dir).join(o).as_path().display().to_string())
        }
        (o, _) => o.clone(),
    };

    Ok(ReportOptions {
        input_path,
        input_type,
        delimiter: config
            .file_source
            .delimiter_byte()?
            .unwrap_or(DEFAULT_DELIMITER),
        excel_worksheet_name: args
            .excel_worksheet_name
            .clone()
            .or_else(|| config.file_source.excel_worksheet_name.clone()),
        rules: config.file_source.rules()?,
        session,
        out,
        reference: args.reference.clone(),
        format,
    })
}

fn distribution_to_json(d: &Distribution) -> JSValue {
    match d {
        Distribution::NoModalities => json!({ "status": "noModalities" }),
        Distribution::NoTotal => json!({ "status": "noTotal" }),
        Distribution::Counts { total, modalities } => {
            let l: Vec<JSValue> = modalities
                .iter()
                .map(|m| {
                    json!({
                        "label": m.label,
                        "count": m.count,
                        "percentage": m.percentage,
                        "color": m.color
                    })
                })
                .collect();
            json!({ "status": "counts", "total": total, "modalities": l })
        }
    }
}

pub fn build_summary_js(source: &str, session: &SessionInfo, report: &SurveyReport) -> JSValue {
    let items: Vec<JSValue> = report
        .items
        .iter()
        .map(|item| {
            json!({
                "label": item.label,
                "distribution": distribution_to_json(&item.distribution),
                "hasCommentColumns": item.has_comment_columns,
                "comments": item.comments
            })
        })
        .collect();
    let open_questions: Vec<JSValue> = report
        .open_questions
        .iter()
        .map(|q| {
            json!({
                "column": column_index_to_letters(q.column),
                "position": q.column,
                "label": q.label,
                "responses": q.responses
            })
        })
        .collect();
    json!({
        "source": source,
        "session": session,
        "rows": report.num_rows,
        "itemColumns": report.num_item_columns,
        "items": items,
        "openQuestions": open_questions,
        "warnings": report.warnings
    })
}

fn read_table(opts: &ReportOptions) -> DigestResult<RawTable> {
    info!(
        "Attempting to read survey file {:?} ({:?})",
        opts.input_path, opts.input_type
    );
    match opts.input_type {
        InputType::Csv => io_csv::read_csv_table(&opts.input_path, opts.delimiter),
        InputType::Xlsx => {
            io_xlsx::read_xlsx_table(&opts.input_path, opts.excel_worksheet_name.as_deref())
        }
    }
}

fn write_output(out: &str, contents: &str) -> DigestResult<()> {
    if out == "stdout" {
        println!("{}", contents);
        return Ok(());
    }
    if let Some(dir) = Path::new(out).parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir).context(WritingOutputSnafu { path: out })?;
        }
    }
    fs::write(out, contents).context(WritingOutputSnafu { path: out })?;
    info!("Summary written to {:?}", out);
    Ok(())
}

fn check_reference(reference_path: &str, pretty_js_stats: &str) -> DigestResult<()> {
    let summary_ref = read_summary(reference_path)?;
    debug!("check_reference: reference: {:?}", summary_ref);
    let pretty_js_summary_ref =
        serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
    if pretty_js_summary_ref != pretty_js_stats {
        warn!("Found differences with the reference summary");
        print_diff(pretty_js_summary_ref.as_str(), pretty_js_stats, "\n");
        return ReferenceMismatchSnafu {}.fail();
    }
    info!("The summary matches the reference {:?}", reference_path);
    Ok(())
}

/// Produces the report of one survey file.
pub fn run_report(opts: &ReportOptions) -> DigestResult<()> {
    debug!("run_report: options: {:?}", opts);
    let table = read_table(opts)?;
    let report = build_report(&table, &opts.rules).context(SurveySnafu {})?;

    let result_js = build_summary_js(
        simplify_file_name(&opts.input_path).as_str(),
        &opts.session,
        &report,
    );
    let pretty_js_stats = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;

    match opts.format {
        OutputFormat::Text => print!("{}", render::render_text(&opts.session, &report)),
        OutputFormat::Json if opts.out.as_deref() != Some("stdout") => {
            println!("{}", pretty_js_stats)
        }
        OutputFormat::Json => {}
    }

    if let Some(out) = &opts.out {
        write_output(out, &pretty_js_stats)?;
    }

    // The reference summary, if provided for comparison
    if let Some(reference_path) = &opts.reference {
        check_reference(reference_path, &pretty_js_stats)?;
    }
    Ok(())
}

pub fn run(args: &Args) -> DigestResult<()> {
    let opts = resolve_options(args, args.config.as_deref())?;
    run_report(&opts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn sample_report() -> SurveyReport {
        let mut builder = builder::Builder::from_names(&[
            "id",
            "tech",
            "Accueil.Très satisfait",
            "Accueil.Satisfait",
            "Accueil.Commentaire",
            "Supports.Commentaire",
        ])
        .unwrap();
        builder.add_row_simple(&["1", "", "1", "", "Bien", ""]).unwrap();
        builder.add_row_simple(&["2", "", "", "1", "", ""]).unwrap();
        builder.add_row_simple(&["", "", "1", "1", "", ""]).unwrap();
        build_report(&builder.build(), &ReportRules::default()).unwrap()
    }

    #[test]
    fn summary_shape() {
        let session = SessionInfo {
            number: Some("12".to_string()),
            date: None,
            label: Some("Accueil".to_string()),
        };
        let js = build_summary_js("export.csv", &session, &sample_report());
        assert_eq!(js["source"], json!("export.csv"));
        assert_eq!(js["session"]["number"], json!("12"));
        assert_eq!(js["rows"], json!(3));
        assert_eq!(js["items"][0]["label"], json!("Accueil"));
        assert_eq!(js["items"][0]["distribution"]["status"], json!("counts"));
        assert_eq!(js["items"][0]["distribution"]["total"], json!(2));
        assert_eq!(
            js["items"][0]["distribution"]["modalities"][0],
            json!({"label": "Très satisfait", "count": 1, "percentage": 50.0, "color": "#1b7837"})
        );
        assert_eq!(js["items"][0]["comments"], json!(["Bien"]));
        assert_eq!(js["items"][1]["distribution"]["status"], json!("noModalities"));
        assert_eq!(js["items"][1]["comments"], json!([]));
        assert_eq!(js["openQuestions"], json!([]));
        assert_eq!(js["warnings"].as_array().map(|a| a.len()), Some(3));
    }

    #[test]
    fn command_line_wins_over_defaults() {
        let args = Args::parse_from([
            "survey-digest",
            "-i",
            "export.XLSX",
            "--session-number",
            "7",
            "--format",
            "json",
        ]);
        let opts = resolve_options(&args, None).unwrap();
        assert_eq!(opts.input_path, "export.XLSX");
        assert_eq!(opts.input_type, InputType::Xlsx);
        assert_eq!(opts.format, OutputFormat::Json);
        assert_eq!(opts.delimiter, b';');
        assert_eq!(opts.rules, ReportRules::default());
        assert_eq!(opts.session.number.as_deref(), Some("7"));
    }

    #[test]
    fn missing_input_is_an_error() {
        let args = Args::parse_from(["survey-digest"]);
        assert!(resolve_options(&args, None).is_err());
        let args = Args::parse_from(["survey-digest", "-i", "x.csv", "--input-type", "pdf"]);
        assert!(resolve_options(&args, None).is_err());
    }

    #[test]
    fn config_paths_are_relative_to_the_config() {
        let dir = std::env::temp_dir().join(format!("survey-digest-test-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let config_p = dir.join("config.json");
        fs::write(
            &config_p,
            r#"{
                "outputSettings": {"sessionLabel": "Gestes et postures", "outputDirectory": "out"},
                "fileSource": {"filePath": "export.csv", "firstItemColumn": "D", "openQuestionColumns": ["E"]}
            }"#,
        )
        .unwrap();
        let config_s = config_p.display().to_string();
        let args = Args::parse_from(["survey-digest", "-c", config_s.as_str(), "-o", "summary.json"]);
        let opts = resolve_options(&args, args.config.as_deref()).unwrap();
        assert_eq!(opts.input_path, dir.join("export.csv").display().to_string());
        assert_eq!(
            opts.out,
            Some(dir.join("out").join("summary.json").display().to_string())
        );
        assert_eq!(opts.rules.item_window, ColumnWindow { start: 3, end: 52 });
        assert_eq!(opts.rules.open_question_positions, vec![4]);
        assert_eq!(opts.session.label.as_deref(), Some("Gestes et postures"));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn end_to_end_with_reference() {
        let dir = std::env::temp_dir().join(format!("survey-digest-e2e-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let input_p = dir.join("export.csv");
        fs::write(
            &input_p,
            "id;tech;Accueil.Satisfait;Accueil.Très satisfait;Accueil.Commentaire\n\
             1;a;;1;Bien\n\
             2;b;1;;\n\
             ;;1;1;\n",
        )
        .unwrap();
        let out_p = dir.join("summary.json");
        let opts = ReportOptions {
            input_path: input_p.display().to_string(),
            input_type: InputType::Csv,
            delimiter: b';',
            excel_worksheet_name: None,
            rules: ReportRules::default(),
            session: SessionInfo::default(),
            out: Some(out_p.display().to_string()),
            reference: None,
            format: OutputFormat::Json,
        };
        run_report(&opts).unwrap();
        let written = read_summary(out_p.to_str().unwrap()).unwrap();
        assert_eq!(written["items"][0]["distribution"]["total"], json!(2));

        // The summary that was just written is its own reference.
        let checked = ReportOptions {
            out: None,
            reference: Some(out_p.display().to_string()),
            ..opts.clone()
        };
        assert!(run_report(&checked).is_ok());

        // A different session gives a different summary.
        let changed = ReportOptions {
            session: SessionInfo {
                number: Some("2".to_string()),
                ..SessionInfo::default()
            },
            ..checked
        };
        assert!(matches!(
            run_report(&changed),
            Err(DigestError::ReferenceMismatch {})
        ));
        fs::remove_dir_all(&dir).unwrap();
    }
}
