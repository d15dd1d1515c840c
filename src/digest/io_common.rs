use std::path::Path;

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

/// Reads a column written with letters, as in a spreadsheet: `A` is 0, `AZ` is 51,
/// `BO` is 66.
pub fn column_letters_to_index(letters: &str) -> Option<usize> {
    if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let mut acc: usize = 0;
    for c in letters.to_ascii_uppercase().chars() {
        let digit = (c as usize) - ('A' as usize) + 1;
        acc = acc.checked_mul(26)?.checked_add(digit)?;
    }
    Some(acc - 1)
}

/// The letters of a column position, as displayed by spreadsheets.
pub fn column_index_to_letters(index: usize) -> String {
    let mut letters: Vec<char> = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_letters() {
        assert_eq!(column_letters_to_index("A"), Some(0));
        assert_eq!(column_letters_to_index("c"), Some(2));
        assert_eq!(column_letters_to_index("Z"), Some(25));
        assert_eq!(column_letters_to_index("AZ"), Some(51));
        assert_eq!(column_letters_to_index("BO"), Some(66));
        assert_eq!(column_letters_to_index("BQ"), Some(68));
        assert_eq!(column_letters_to_index("BS"), Some(70));
        assert_eq!(column_letters_to_index(""), None);
        assert_eq!(column_letters_to_index("B2"), None);
    }

    #[test]
    fn column_indexes() {
        assert_eq!(column_index_to_letters(0), "A");
        assert_eq!(column_index_to_letters(25), "Z");
        assert_eq!(column_index_to_letters(26), "AA");
        assert_eq!(column_index_to_letters(51), "AZ");
        assert_eq!(column_index_to_letters(66), "BO");
        assert_eq!(column_index_to_letters(702), "AAA");
    }

    #[test]
    fn file_names() {
        assert_eq!(simplify_file_name("/tmp/exports/evento.csv"), "evento.csv");
        assert_eq!(simplify_file_name("evento.csv"), "evento.csv");
    }
}
