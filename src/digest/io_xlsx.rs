use calamine::{open_workbook, DataType, Reader, Xlsx};

use crate::digest::*;

/// Reads an export saved as an Excel workbook.
///
/// The cells are turned into text so that the rest of the processing is the same as
/// for the delimited exports.
pub fn read_xlsx_table(path: &str, worksheet_name: Option<&str>) -> DigestResult<RawTable> {
    debug!(
        "read_xlsx_table: path: {:?} worksheet: {:?}",
        path, worksheet_name
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    let wrange = match worksheet_name {
        Some(name) => workbook
            .worksheet_range(name)
            .context(MissingWorksheetSnafu { name, path })?
            .context(OpeningExcelSnafu { path })?,
        None => workbook
            .worksheet_range_at(0)
            .context(EmptyExcelSnafu { path })?
            .context(OpeningExcelSnafu { path })?,
    };

    // The range starts at the first cell that is not empty. Empty leading columns
    // must be restored so that the positions match the spreadsheet.
    let leading = wrange.start().map(|(_, col)| col as usize).unwrap_or(0);
    debug!("read_xlsx_table: {} leading empty columns", leading);

    let mut rows = wrange.rows();
    let header = rows.next().context(EmptyExcelSnafu { path })?;
    let mut builder =
        builder::Builder::new(&row_to_strings(header, leading)).context(SurveySnafu {})?;
    for row in rows {
        builder
            .add_row(&row_to_strings(row, leading))
            .context(SurveySnafu {})?;
    }
    info!(
        "Read {} rows from Excel file {:?}",
        builder.num_rows(),
        simplify_file_name(path)
    );
    Ok(builder.build())
}

fn row_to_strings(row: &[DataType], leading: usize) -> Vec<String> {
    let mut res: Vec<String> = vec![String::new(); leading];
    res.extend(row.iter().map(cell_to_string));
    res
}

fn cell_to_string(cell: &DataType) -> String {
    match cell {
        DataType::String(s) => s.clone(),
        DataType::Int(i) => i.to_string(),
        // Counts are often stored as floats.
        DataType::Float(f) if f.is_finite() && f.fract() == 0.0 => format!("{}", *f as i64),
        DataType::Float(f) => f.to_string(),
        DataType::Bool(b) => b.to_string(),
        DataType::Empty => String::new(),
        other => {
            debug!("cell_to_string: unexpected cell {:?}", other);
            format!("{:?}", other)
        }
    }
}
