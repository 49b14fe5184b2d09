//! Tabular file parsing

use std::fs::File;
use std::path::Path;

use tabrag_core::{Error, Result, TextUnit};

/// Columns every ingested file must carry. Header matching is
/// case-insensitive and ignores surrounding whitespace.
const REQUIRED_COLUMNS: [&str; 4] = ["review title", "rating", "category", "comments"];

/// File name used to tag every unit and record from one ingestion run.
pub(crate) fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn normalize_column(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Parse a tabular file into one text unit per non-empty data row, in
/// file order.
///
/// Row text is the four required fields joined with single spaces and
/// trimmed. A malformed row aborts the whole file.
pub fn parse_file(path: &Path) -> Result<Vec<TextUnit>> {
    let source_file = source_name(path);

    let file = File::open(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| Error::Parse(e.to_string()))?
        .clone();

    let normalized: Vec<String> = headers.iter().map(normalize_column).collect();

    let mut indices = Vec::with_capacity(REQUIRED_COLUMNS.len());
    let mut missing = Vec::new();
    for column in REQUIRED_COLUMNS {
        match normalized.iter().position(|header| header == column) {
            Some(index) => indices.push(index),
            None => missing.push(column),
        }
    }

    if !missing.is_empty() {
        return Err(Error::Schema(format!(
            "Missing required columns: {}",
            missing.join(", ")
        )));
    }

    let mut units = Vec::new();
    for (row_index, record) in reader.records().enumerate() {
        let record = record.map_err(|e| Error::Parse(e.to_string()))?;

        let text = indices
            .iter()
            .map(|&index| record.get(index).unwrap_or(""))
            .collect::<Vec<_>>()
            .join(" ")
            .trim()
            .to_string();

        if text.is_empty() {
            continue;
        }

        units.push(TextUnit {
            source_file: source_file.clone(),
            row_index,
            text,
        });
    }

    if units.is_empty() {
        return Err(Error::EmptyInput("CSV file is empty".to_string()));
    }

    Ok(units)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn fixture(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn yields_one_unit_per_row_in_order() {
        let file = fixture(
            "review title,rating,category,comments\n\
             Great battery,5,Laptops,Lasts all day\n\
             Poor screen,2,Laptops,Dim panel\n\
             Solid build,4,Phones,Survived a drop\n",
        );

        let units = parse_file(file.path()).unwrap();

        assert_eq!(units.len(), 3);
        assert_eq!(units[0].row_index, 0);
        assert_eq!(units[0].text, "Great battery 5 Laptops Lasts all day");
        assert_eq!(units[1].row_index, 1);
        assert_eq!(units[1].text, "Poor screen 2 Laptops Dim panel");
        assert_eq!(units[2].row_index, 2);
        assert_eq!(units[2].text, "Solid build 4 Phones Survived a drop");

        let expected_name = file.path().file_name().unwrap().to_string_lossy();
        assert!(units.iter().all(|unit| unit.source_file == expected_name));
    }

    #[test]
    fn header_matching_ignores_case_and_whitespace() {
        let file = fixture(
            "  REVIEW TITLE , Rating ,  CATEGORY , Comments \n\
             Great battery,5,Laptops,Lasts all day\n",
        );

        let units = parse_file(file.path()).unwrap();
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].text, "Great battery 5 Laptops Lasts all day");
    }

    #[test]
    fn missing_columns_fail_before_any_unit() {
        let file = fixture(
            "review title,rating,category\n\
             Great battery,5,Laptops\n",
        );

        let err = parse_file(file.path()).unwrap_err();
        match err {
            Error::Schema(message) => assert!(message.contains("comments")),
            other => panic!("expected schema error, got {:?}", other),
        }
    }

    #[test]
    fn header_only_file_is_empty_input() {
        let file = fixture("review title,rating,category,comments\n");

        let err = parse_file(file.path()).unwrap_err();
        assert!(matches!(err, Error::EmptyInput(_)));
        assert_eq!(err.to_string(), "Empty input: CSV file is empty");
    }

    #[test]
    fn quoted_fields_keep_embedded_delimiters() {
        let file = fixture(
            "review title,rating,category,comments\n\
             \"Good, not great\",3,Laptops,\"Keyboard is fine, trackpad less so\"\n",
        );

        let units = parse_file(file.path()).unwrap();
        assert_eq!(
            units[0].text,
            "Good, not great 3 Laptops Keyboard is fine, trackpad less so"
        );
    }

    #[test]
    fn extra_columns_are_ignored() {
        let file = fixture(
            "id,review title,rating,category,comments,verified\n\
             17,Great battery,5,Laptops,Lasts all day,yes\n",
        );

        let units = parse_file(file.path()).unwrap();
        assert_eq!(units[0].text, "Great battery 5 Laptops Lasts all day");
    }

    #[test]
    fn malformed_row_aborts_the_file() {
        let file = fixture(
            "review title,rating,category,comments\n\
             Great battery,5,Laptops,Lasts all day,unexpected,extra\n",
        );

        let err = parse_file(file.path()).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn rows_with_empty_text_are_dropped() {
        let file = fixture(
            "review title,rating,category,comments\n\
             Great battery,5,Laptops,Lasts all day\n\
             ,,,\n\
             Solid build,4,Phones,Survived a drop\n",
        );

        let units = parse_file(file.path()).unwrap();
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].row_index, 0);
        assert_eq!(units[1].row_index, 2);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = parse_file(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
