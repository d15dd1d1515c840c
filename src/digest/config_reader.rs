use crate::digest::io_common::column_letters_to_index;
use crate::digest::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "sessionNumber")]
    pub session_number: Option<String>,
    #[serde(rename = "sessionDate")]
    pub session_date: Option<String>,
    #[serde(rename = "sessionLabel")]
    pub session_label: Option<String>,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
}

/// The session the survey was filled in for. Only used for display.
#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionInfo {
    pub number: Option<String>,
    pub date: Option<String>,
    pub label: Option<String>,
}

impl SessionInfo {
    pub fn is_empty(&self) -> bool {
        self.number.is_none() && self.date.is_none() && self.label.is_none()
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileSource {
    pub provider: Option<String>,
    #[serde(rename = "filePath")]
    pub file_path: Option<String>,
    #[serde(rename = "firstItemColumn")]
    _first_item_column: Option<JSValue>,
    #[serde(rename = "lastItemColumn")]
    _last_item_column: Option<JSValue>,
    #[serde(rename = "openQuestionColumns")]
    _open_question_columns: Option<Vec<JSValue>>,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
    pub delimiter: Option<String>,
}

impl FileSource {
    /// The item block, as a window of positions. Both configured columns are included.
    pub fn item_window(&self) -> DigestResult<ColumnWindow> {
        let start = match &self._first_item_column {
            Some(x) => read_js_column(x)?,
            None => ColumnWindow::DEFAULT.start,
        };
        let last = match &self._last_item_column {
            Some(x) => read_js_column(x)?,
            None => ColumnWindow::DEFAULT.end - 1,
        };
        if last < start {
            whatever!(
                "the item block ends (column {}) before it starts (column {})",
                last + 1,
                start + 1
            );
        }
        Ok(ColumnWindow {
            start,
            end: last + 1,
        })
    }

    pub fn open_question_positions(&self) -> DigestResult<Vec<usize>> {
        match &self._open_question_columns {
            Some(cols) => cols.iter().map(read_js_column).collect(),
            None => Ok(DEFAULT_OPEN_QUESTION_POSITIONS.to_vec()),
        }
    }

    pub fn delimiter_byte(&self) -> DigestResult<Option<u8>> {
        match self.delimiter.as_deref() {
            None => Ok(None),
            Some("\\t") | Some("tab") => Ok(Some(b'\t')),
            Some(s) if s.len() == 1 && s.is_ascii() => Ok(Some(s.as_bytes()[0])),
            Some(s) => whatever!("the delimiter must be a single character, got {:?}", s),
        }
    }

    pub fn rules(&self) -> DigestResult<ReportRules> {
        Ok(ReportRules {
            item_window: self.item_window()?,
            open_question_positions: self.open_question_positions()?,
        })
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct DigestConfig {
    #[serde(rename = "outputSettings", default)]
    pub output_settings: OutputSettings,
    #[serde(rename = "fileSource", default)]
    pub file_source: FileSource,
}

impl DigestConfig {
    pub fn session(&self) -> SessionInfo {
        SessionInfo {
            number: self.output_settings.session_number.clone(),
            date: self.output_settings.session_date.clone(),
            label: self.output_settings.session_label.clone(),
        }
    }
}

pub fn read_config(path: &str) -> DigestResult<DigestConfig> {
    let contents = fs::read_to_string(path).context(OpeningFileSnafu { path })?;
    let config: DigestConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    debug!("read_config: {:?}", config);
    Ok(config)
}

pub fn read_summary(path: &str) -> DigestResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningFileSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

/// Reads a column reference and returns its position (starting at 0).
///
/// Numbers start at 1 to respect the conventions of the spreadsheet world. Letters
/// follow the spreadsheet notation.
fn read_js_column(x: &JSValue) -> DigestResult<usize> {
    let res = match x {
        JSValue::Number(n) => n.as_u64().map(|x| x as usize).and_then(|x| x.checked_sub(1)),
        JSValue::String(s) if s.chars().all(|c| c.is_ascii_digit()) => s
            .parse::<usize>()
            .ok()
            .and_then(|x| x.checked_sub(1)),
        JSValue::String(s) => column_letters_to_index(s.trim()),
        _ => None,
    };
    res.context(ParsingColumnSnafu {
        reference: x.to_string(),
    })
}
