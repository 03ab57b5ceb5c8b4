//! Delimited-text reader with encoding and delimiter detection.

use encoding_rs::Encoding;

use super::{Origin, RawTable};
use crate::error::{LoadError, LoadResult};

/// Detect the encoding of raw bytes.
///
/// Valid UTF-8 is taken as is; anything else is handed to chardet.
pub fn detect_encoding(bytes: &[u8]) -> String {
    if std::str::from_utf8(bytes).is_ok() {
        return "utf-8".to_string();
    }

    let charset = chardet::detect(bytes).0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" | "utf-8-sig" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        other => other.to_string(),
    }
}

/// Decode bytes to a string using the named encoding.
///
/// Unknown labels fall back to lossy UTF-8. A leading byte-order mark is
/// removed.
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    let decoded = match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => String::from_utf8_lossy(bytes).into_owned(),
        label => match Encoding::for_label(label.as_bytes()) {
            Some(enc) => enc.decode(bytes).0.into_owned(),
            None => String::from_utf8_lossy(bytes).into_owned(),
        },
    };

    match decoded.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => decoded,
    }
}

/// Detect the delimiter by counting occurrences in the first line.
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let separators = [',', ';', '\t', '|'];
    let mut best_sep = ',';
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Parse delimited bytes into a [`RawTable`].
///
/// `delimiter` of `None` means detect it from the header line.
pub fn parse_delimited(bytes: &[u8], delimiter: Option<char>) -> LoadResult<RawTable> {
    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding);
    let delimiter = delimiter.unwrap_or_else(|| detect_delimiter(&content));
    parse_str(&content, delimiter, encoding)
}

/// Tokenize decoded text with an explicit delimiter.
///
/// Short rows are padded with empty cells; rows wider than the header are
/// rejected. Blank lines are skipped.
pub fn parse_str(content: &str, delimiter: char, encoding: String) -> LoadResult<RawTable> {
    if content.trim().is_empty() {
        return Err(LoadError::parse(1, "empty file, no header row"));
    }
    if !delimiter.is_ascii() {
        return Err(LoadError::parse(0, format!("delimiter '{}' is not ASCII", delimiter)));
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| LoadError::parse(1, e))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| {
            let line = e.position().map(|p| p.line() as usize).unwrap_or(0);
            LoadError::parse(line, e)
        })?;
        let line = record.position().map(|p| p.line() as usize).unwrap_or(0);

        if record.len() == 1 && record[0].trim().is_empty() {
            continue;
        }
        if record.len() > headers.len() {
            return Err(LoadError::parse(
                line,
                format!("found {} fields, expected {}", record.len(), headers.len()),
            ));
        }

        let mut row: Vec<String> = record.iter().map(str::to_string).collect();
        row.resize(headers.len(), String::new());
        rows.push(row);
    }

    Ok(RawTable {
        headers,
        rows,
        origin: Origin::Delimited { encoding, delimiter },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> LoadResult<RawTable> {
        parse_str(content, ',', "utf-8".to_string())
    }

    #[test]
    fn test_simple_csv() {
        let table = parse("name,age\nAlice,30\nBob,25").unwrap();
        assert_eq!(table.headers, vec!["name", "age"]);
        assert_eq!(table.rows, vec![vec!["Alice", "30"], vec!["Bob", "25"]]);
    }

    #[test]
    fn test_quoted_values_keep_delimiters() {
        let table = parse("city,state\n\"Lincoln, West\",NE").unwrap();
        assert_eq!(table.rows[0][0], "Lincoln, West");
    }

    #[test]
    fn test_empty_lines_skipped() {
        let table = parse("a,b\n1,2\n\n3,4\n").unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_short_rows_padded() {
        let table = parse("a,b,c\n1").unwrap();
        assert_eq!(table.rows[0], vec!["1", "", ""]);
    }

    #[test]
    fn test_wide_row_is_parse_error() {
        let err = parse("a,b\n1,2\n1,2,3,4").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("line 3"), "{}", msg);
        assert!(msg.contains("4 fields"));
    }

    #[test]
    fn test_empty_csv_error() {
        assert!(matches!(parse("  \n"), Err(LoadError::Parse(_))));
    }

    #[test]
    fn test_header_only_has_no_rows() {
        let table = parse("a,b\n").unwrap();
        assert!(table.is_empty());
        assert_eq!(table.headers.len(), 2);
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("a;b;c\n1;2;3"), ';');
        assert_eq!(detect_delimiter("a,b,c\n1,2,3"), ',');
        assert_eq!(detect_delimiter("a\tb\tc\n1\t2\t3"), '\t');
        assert_eq!(detect_delimiter("a|b|c\n1|2|3"), '|');
        assert_eq!(detect_delimiter("single"), ',');
    }

    #[test]
    fn test_auto_parse_txt() {
        let table = parse_delimited(b"name;age\nAlice;30", None).unwrap();
        assert_eq!(
            table.origin,
            Origin::Delimited { encoding: "utf-8".into(), delimiter: ';' }
        );
        assert_eq!(table.rows[0][1], "30");
    }

    #[test]
    fn test_bom_is_stripped() {
        let table = parse_delimited(b"\xEF\xBB\xBFPatient ID#,Amount\n1,2", Some(',')).unwrap();
        assert_eq!(table.headers[0], "Patient ID#");
    }

    #[test]
    fn test_latin1_decoding() {
        // "Société" in ISO-8859-1
        let bytes: &[u8] = &[0x53, 0x6F, 0x63, 0x69, 0xE9, 0x74, 0xE9];
        assert_eq!(decode_content(bytes, "iso-8859-1"), "Société");
        assert_ne!(detect_encoding(bytes), "utf-8");
    }
}
