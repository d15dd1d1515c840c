//! Turns the bytes of an export into a [`RawTable`].

use std::borrow::Cow;

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use log::{debug, info};

use crate::config::*;

/// The exports are separated with semicolons.
pub const DEFAULT_DELIMITER: u8 = b';';

/// Decodes and parses a delimited export.
///
/// The bytes are read as UTF-8 first. If they are not valid UTF-8, they are read
/// again as latin-1 (windows-1252), which accepts any input. The first line is the
/// header.
///
/// Fails if the table does not have more than two columns, the two identity columns
/// of the export.
pub fn decode_table(bytes: &[u8], delimiter: u8) -> Result<RawTable, SurveyErrors> {
    let (text, encoding) = decode_text(bytes);
    debug!(
        "decode_table: {} bytes decoded as {}",
        bytes.len(),
        encoding.name()
    );
    let table = parse_delimited(&text, delimiter)?;
    check_width(&table)?;
    info!(
        "Read a table with {} columns and {} rows",
        table.num_columns(),
        table.num_rows()
    );
    Ok(table)
}

/// Checks that a table goes beyond the identity columns.
pub fn check_width(table: &RawTable) -> Result<(), SurveyErrors> {
    match table.num_columns() {
        0 => Err(SurveyErrors::EmptyInput),
        n if n <= 2 => Err(SurveyErrors::TooFewColumns { found: n }),
        _ => Ok(()),
    }
}

fn decode_text(bytes: &[u8]) -> (Cow<'_, str>, &'static Encoding) {
    let (text, had_errors) = UTF_8.decode_with_bom_removal(bytes);
    if !had_errors {
        return (text, UTF_8);
    }
    info!("The file is not valid UTF-8, reading it as latin-1");
    let (text, _) = WINDOWS_1252.decode_without_bom_handling(bytes);
    (text, WINDOWS_1252)
}

fn parse_delimited(text: &str, delimiter: u8) -> Result<RawTable, SurveyErrors> {
    let rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut records = rdr.into_records();
    let header: Vec<String> = match records.next() {
        Some(r) => record_cells(r.map_err(unreadable)?),
        None => return Err(SurveyErrors::EmptyInput),
    };
    debug!("parse_delimited: header: {:?}", header);

    let mut rows: Vec<Vec<String>> = Vec::new();
    for line_r in records {
        let line = line_r.map_err(unreadable)?;
        rows.push(record_cells(line));
    }
    Ok(RawTable { header, rows })
}

fn record_cells(record: csv::StringRecord) -> Vec<String> {
    record.iter().map(|s| s.to_string()).collect()
}

fn unreadable(err: csv::Error) -> SurveyErrors {
    SurveyErrors::UnreadableCsv {
        line: err.position().map(|p| p.line()),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_semicolon_table() {
        let bytes = "id;tech;Accueil.Satisfait\n1;x;1\n2;y;\n;;1\n".as_bytes();
        let table = decode_table(bytes, DEFAULT_DELIMITER).unwrap();
        assert_eq!(table.header, vec!["id", "tech", "Accueil.Satisfait"]);
        assert_eq!(table.num_rows(), 3);
        assert_eq!(table.cell(1, 2), Some(""));
        assert_eq!(table.cell(2, 2), Some("1"));
    }

    #[test]
    fn falls_back_to_latin1() {
        // "Très" and "Durée" saved in latin-1: not valid UTF-8.
        let bytes: &[u8] = b"id;tech;Accueil.Tr\xe8s satisfait;Dur\xe9e\n1;a;3;x\n";
        let table = decode_table(bytes, DEFAULT_DELIMITER).unwrap();
        assert_eq!(table.header[2], "Accueil.Très satisfait");
        assert_eq!(table.header[3], "Durée");
        assert_eq!(table.cell(0, 2), Some("3"));
    }

    #[test]
    fn removes_utf8_bom() {
        let bytes = "\u{feff}id;tech;Q.Oui\n1;2;3\n".as_bytes();
        let table = decode_table(bytes, DEFAULT_DELIMITER).unwrap();
        assert_eq!(table.header[0], "id");
    }

    #[test]
    fn rejects_narrow_files() {
        let bytes = "id;tech\n1;2\n".as_bytes();
        assert_eq!(
            decode_table(bytes, DEFAULT_DELIMITER),
            Err(SurveyErrors::TooFewColumns { found: 2 })
        );
        // A comma separated file is seen as a single column.
        let bytes = "id,tech,Q.Oui\n1,2,3\n".as_bytes();
        assert_eq!(
            decode_table(bytes, DEFAULT_DELIMITER),
            Err(SurveyErrors::TooFewColumns { found: 1 })
        );
    }

    #[test]
    fn rejects_empty_files() {
        assert_eq!(
            decode_table(b"", DEFAULT_DELIMITER),
            Err(SurveyErrors::EmptyInput)
        );
    }

    #[test]
    fn keeps_quoted_delimiters() {
        let bytes = "id;tech;Q.Commentaire\n1;2;\"a; b\"\n".as_bytes();
        let table = decode_table(bytes, DEFAULT_DELIMITER).unwrap();
        assert_eq!(table.cell(0, 2), Some("a; b"));
    }
}
