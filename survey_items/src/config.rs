// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// Separates the item label from the modality in a column name: `"<item>.<modality>"`.
pub const MODALITY_DELIMITER: char = '.';

/// A modality containing this marker (case-insensitive) denotes a free-text column.
pub const COMMENT_MARKER: &str = "commentaire";

/// The suffix carried by the free-text columns of the open questions.
pub const COMMENT_SUFFIX: &str = ".Commentaire";

/// The decoded content of an export.
///
/// The first line of the source is the header and gives the display name of each
/// column. All the other lines are kept in `rows`, in the original order. The last
/// row is expected to be a totals row produced by the survey tool.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct RawTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn num_columns(&self) -> usize {
        self.header.len()
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// The content of a cell, if the row is long enough to hold it.
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(|s| s.as_str())
    }

    pub fn column_name(&self, column: usize) -> Option<&str> {
        self.header.get(column).map(|s| s.as_str())
    }
}

/// A range of columns [start, end), by position in the table.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct ColumnWindow {
    pub start: usize,
    pub end: usize,
}

impl ColumnWindow {
    /// Columns C to AZ of the export. A and B hold the identity of the respondent.
    pub const DEFAULT: ColumnWindow = ColumnWindow { start: 2, end: 52 };

    /// Restricts the window to a table with the given number of columns.
    pub fn clip(&self, num_columns: usize) -> ColumnWindow {
        let end = self.end.min(num_columns);
        ColumnWindow {
            start: self.start.min(end),
            end,
        }
    }

    pub fn contains(&self, column: usize) -> bool {
        self.start <= column && column < self.end
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Positions (0-based) of the open questions: columns BO, BQ and BS.
pub const DEFAULT_OPEN_QUESTION_POSITIONS: [usize; 3] = [66, 68, 70];

/// Where to look for the data in a table.
///
/// The open question positions refer to the full table. They are independent of the
/// item window.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ReportRules {
    pub item_window: ColumnWindow,
    pub open_question_positions: Vec<usize>,
}

impl Default for ReportRules {
    fn default() -> Self {
        ReportRules {
            item_window: ColumnWindow::DEFAULT,
            open_question_positions: DEFAULT_OPEN_QUESTION_POSITIONS.to_vec(),
        }
    }
}

// ******** Output data structures *********

/// The number of answers for one modality of an item.
#[derive(PartialEq, Debug, Clone)]
pub struct ModalityCount {
    pub label: String,
    pub count: i64,
    /// count / total * 100, rounded to one decimal.
    pub percentage: f64,
    /// Hexadecimal color (`#rrggbb`) used to draw this modality.
    pub color: String,
}

#[derive(PartialEq, Debug, Clone)]
pub enum Distribution {
    /// The item only has free-text columns.
    NoModalities,
    /// The item has modality columns but the totals row does not give any answer
    /// (zero total, or no totals row at all).
    NoTotal,
    Counts {
        total: i64,
        modalities: Vec<ModalityCount>,
    },
}

/// Summary of one survey item.
#[derive(PartialEq, Debug, Clone)]
pub struct ItemReport {
    pub label: String,
    pub distribution: Distribution,
    pub has_comment_columns: bool,
    pub comments: Vec<String>,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct OpenQuestionReport {
    /// The position of the column in the table.
    pub column: usize,
    pub label: String,
    pub responses: Vec<String>,
}

#[derive(PartialEq, Debug, Clone)]
pub struct SurveyReport {
    /// Items in the order of their first column.
    pub items: Vec<ItemReport>,
    pub open_questions: Vec<OpenQuestionReport>,
    /// Number of rows in the table, totals row included.
    pub num_rows: usize,
    /// Number of columns analysed in the item block.
    pub num_item_columns: usize,
    /// Suspicious layout detected while reading the table. They never stop the report.
    pub warnings: Vec<String>,
}

/// Errors that prevent a report from being produced.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum SurveyErrors {
    /// Nothing to read, not even a header.
    EmptyInput,
    /// The table does not go further than the identity columns.
    TooFewColumns { found: usize },
    /// The delimited text could not be read.
    UnreadableCsv { line: Option<u64>, message: String },
    /// A row has more cells than the header.
    RowTooWide {
        row: usize,
        found: usize,
        expected: usize,
    },
}

impl Error for SurveyErrors {}

impl Display for SurveyErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SurveyErrors::EmptyInput => write!(f, "the file is empty"),
            SurveyErrors::TooFewColumns { found } => write!(
                f,
                "the file does not seem to contain more than 2 columns (A and B), found {}",
                found
            ),
            SurveyErrors::UnreadableCsv {
                line: Some(line),
                message,
            } => write!(f, "could not read line {}: {}", line, message),
            SurveyErrors::UnreadableCsv {
                line: None,
                message,
            } => write!(f, "could not read the file: {}", message),
            SurveyErrors::RowTooWide {
                row,
                found,
                expected,
            } => write!(
                f,
                "row {} has {} cells but the header only has {}",
                row, found, expected
            ),
        }
    }
}

// ********* Palettes **********

/// The four-level satisfaction scale, in display order, with the color of each level.
pub const SATISFACTION_SCALE: [(&str, &str); 4] = [
    ("Très satisfait", "#1b7837"),
    ("Satisfait", "#5aae61"),
    ("Peu satisfait", "#80cdc1"),
    ("Pas du tout satisfait", "#f46d43"),
];

/// Categorical colors for the modalities outside of the satisfaction scale.
pub const CATEGORY_PALETTE: [&str; 10] = [
    "#4c78a8", "#f58518", "#e45756", "#72b7b2", "#54a24b", "#eeca3b", "#b279a2", "#ff9da6",
    "#9d755d", "#bab0ac",
];
