// Primitives for reading the delimited exports.

use crate::digest::*;

pub fn read_csv_table(path: &str, delimiter: u8) -> DigestResult<RawTable> {
    let bytes = fs::read(path).context(OpeningFileSnafu { path })?;
    debug!("read_csv_table: {:?}: {} bytes", path, bytes.len());
    let table = decode_table(&bytes, delimiter).context(SurveySnafu {})?;
    debug!(
        "read_csv_table: {:?}: header: {:?}",
        simplify_file_name(path),
        table.header
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file() {
        let res = read_csv_table("/nonexistent/export.csv", b';');
        assert!(matches!(res, Err(DigestError::OpeningFile { .. })));
    }

    #[test]
    fn latin1_file() {
        let p = std::env::temp_dir().join(format!("survey-digest-latin1-{}.csv", std::process::id()));
        fs::write(&p, b"id;tech;Dur\xe9e.Adapt\xe9e\n1;a;\n;;4\n").unwrap();
        let table = read_csv_table(p.to_str().unwrap(), b';').unwrap();
        assert_eq!(table.header[2], "Durée.Adaptée");
        fs::remove_file(&p).unwrap();
    }

    #[test]
    fn narrow_file() {
        let p = std::env::temp_dir().join(format!("survey-digest-narrow-{}.csv", std::process::id()));
        fs::write(&p, "id;tech\n1;a\n").unwrap();
        let res = read_csv_table(p.to_str().unwrap(), b';');
        assert!(matches!(
            res,
            Err(DigestError::Survey {
                source: SurveyErrors::TooFewColumns { found: 2 }
            })
        ));
        fs::remove_file(&p).unwrap();
    }
}
