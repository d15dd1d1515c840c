pub use crate::config::*;

/// A builder for assembling a table row by row.
///
/// It is the entry point for the inputs that are not delimited text (spreadsheets,
/// databases) and for tests.
///
/// ```
/// pub use survey_items::builder::Builder;
/// # use survey_items::SurveyErrors;
///
/// let mut builder = Builder::from_names(&["id", "tech", "Accueil.Satisfait"])?;
/// builder.add_row_simple(&["1", "x", "1"])?;
/// // Short rows are completed with empty cells.
/// builder.add_row_simple(&["2"])?;
///
/// let table = builder.build();
/// assert_eq!(table.cell(1, 2), Some(""));
/// # Ok::<(), SurveyErrors>(())
/// ```
pub struct Builder {
    pub(crate) _header: Vec<String>,
    pub(crate) _rows: Vec<Vec<String>>,
}

impl Builder {
    pub fn new(header: &[String]) -> Result<Builder, SurveyErrors> {
        if header.is_empty() {
            return Err(SurveyErrors::EmptyInput);
        }
        Ok(Builder {
            _header: header.to_vec(),
            _rows: Vec::new(),
        })
    }

    pub fn from_names(header: &[&str]) -> Result<Builder, SurveyErrors> {
        let names: Vec<String> = header.iter().map(|s| s.to_string()).collect();
        Builder::new(&names)
    }

    /// Adds a row to the table.
    ///
    /// Rows shorter than the header are padded with empty cells. Longer rows are
    /// rejected.
    pub fn add_row(&mut self, cells: &[String]) -> Result<(), SurveyErrors> {
        let expected = self._header.len();
        if cells.len() > expected {
            return Err(SurveyErrors::RowTooWide {
                row: self._rows.len() + 1,
                found: cells.len(),
                expected,
            });
        }
        let mut row = cells.to_vec();
        row.resize(expected, String::new());
        self._rows.push(row);
        Ok(())
    }

    pub fn add_row_simple(&mut self, cells: &[&str]) -> Result<(), SurveyErrors> {
        let row: Vec<String> = cells.iter().map(|s| s.to_string()).collect();
        self.add_row(&row)
    }

    pub fn num_rows(&self) -> usize {
        self._rows.len()
    }

    pub fn build(self) -> RawTable {
        RawTable {
            header: self._header,
            rows: self._rows,
        }
    }
}
