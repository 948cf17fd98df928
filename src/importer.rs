//! Participant import from delimited text, spreadsheets and `--entry`
//! arguments.
//!
//! Expected layout, one participant per row:
//!
//! ```text
//! Name,Occurrence
//! Alice,3
//! "Smith, Bob",1
//! ```
//!
//! Workbooks (`.xlsx`, `.xls`, `.ods`, ...) use the same two columns on their
//! first sheet.
//!
//! Row policy, shared by every format:
//! - blank rows are ignored
//! - rows whose name is empty after trimming are skipped
//! - a missing, non-numeric or non-positive weight becomes 1
//!
//! Every skip and coercion is logged and counted in [`ImportReport`].

use anyhow::Context;
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;
use thiserror::Error;

use crate::config::ImportConfig;
use crate::entry::Entry;
use crate::error::DrawError;

/// Weight used when a row's occurrence cannot be used as-is
pub const DEFAULT_WEIGHT: u32 = 1;

const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read workbook {path}: {source}")]
    Workbook {
        path: String,
        #[source]
        source: calamine::Error,
    },

    #[error("no participants found (expected rows of name and occurrence)")]
    NoRows,
}

/// What happened to the rows of an import
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Data rows seen (header and blank rows excluded)
    pub rows: usize,
    /// Rows dropped because the name was empty
    pub skipped: usize,
    /// Rows whose weight was replaced by [`DEFAULT_WEIGHT`]
    pub coerced: usize,
}

#[derive(Debug, Clone)]
pub struct Import {
    pub entries: Vec<Entry>,
    pub report: ImportReport,
}

/// Read a participant file from disk. Workbooks are picked by extension,
/// anything else is read as delimited text.
pub fn load_file(path: &Path, config: &ImportConfig) -> Result<Import, ImportError> {
    let import = if is_workbook(path) {
        load_workbook(path, config.has_header)?
    } else {
        let content = std::fs::read_to_string(path).map_err(|source| ImportError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let delimiter = config
            .delimiter
            .or_else(|| delimiter_for_extension(path))
            .unwrap_or_else(|| sniff_delimiter(&content));

        parse_table(&content, delimiter, config.has_header)?
    };

    tracing::info!(
        "Imported {} participants from {} ({} rows, {} skipped, {} coerced)",
        import.entries.len(),
        path.display(),
        import.report.rows,
        import.report.skipped,
        import.report.coerced
    );
    Ok(import)
}

/// Parse delimited text into entries
pub fn parse_table(content: &str, delimiter: char, has_header: bool) -> Result<Import, ImportError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    collect_rows(
        content.lines().map(|line| split_record(line, delimiter)),
        has_header,
    )
}

/// Read the first sheet of a workbook
pub fn load_workbook(path: &Path, has_header: bool) -> Result<Import, ImportError> {
    let workbook_error = |source| ImportError::Workbook {
        path: path.display().to_string(),
        source,
    };

    let mut workbook = open_workbook_auto(path).map_err(workbook_error)?;
    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range.map_err(workbook_error)?,
        None => return Err(ImportError::NoRows),
    };

    collect_rows(
        range
            .rows()
            .map(|row| row.iter().map(Data::to_string).collect::<Vec<_>>()),
        has_header,
    )
}

/// Apply the row policy to rows of raw fields
fn collect_rows<I>(rows: I, has_header: bool) -> Result<Import, ImportError>
where
    I: Iterator<Item = Vec<String>>,
{
    let mut entries = Vec::new();
    let mut report = ImportReport::default();

    let mut rows = rows.filter(|fields| fields.iter().any(|f| !f.trim().is_empty()));
    if has_header {
        rows.next();
    }

    for (i, fields) in rows.enumerate() {
        report.rows += 1;
        let name = fields.first().map(|s| s.trim()).unwrap_or("");
        let raw_weight = fields.get(1).map(|s| s.trim()).unwrap_or("");

        if name.is_empty() {
            tracing::warn!("Row {}: empty name, skipped", i + 1);
            report.skipped += 1;
            continue;
        }

        let weight = match parse_weight(raw_weight) {
            Some(w) => w,
            None => {
                tracing::warn!(
                    "Row {}: weight {:?} for '{}' is not a positive integer, using {}",
                    i + 1,
                    raw_weight,
                    name,
                    DEFAULT_WEIGHT
                );
                report.coerced += 1;
                DEFAULT_WEIGHT
            }
        };

        match Entry::new(name, weight) {
            Ok(entry) => entries.push(entry),
            Err(e) => {
                tracing::warn!("Row {}: {}, skipped", i + 1, e);
                report.skipped += 1;
            }
        }
    }

    if entries.is_empty() {
        return Err(ImportError::NoRows);
    }

    Ok(Import { entries, report })
}

/// Parse a `NAME[=WEIGHT]` command-line entry
pub fn parse_manual(arg: &str) -> Result<Entry, DrawError> {
    let (name, weight) = match arg.rsplit_once('=') {
        Some((name, raw)) => {
            let weight = parse_weight(raw.trim()).unwrap_or_else(|| {
                tracing::warn!(
                    "Weight {:?} for '{}' is not a positive integer, using {}",
                    raw,
                    name.trim(),
                    DEFAULT_WEIGHT
                );
                DEFAULT_WEIGHT
            });
            (name, weight)
        }
        None => (arg, DEFAULT_WEIGHT),
    };
    Entry::new(name, weight)
}

/// Parse all `--entry` values
pub fn parse_manual_all(args: &[String]) -> anyhow::Result<Vec<Entry>> {
    args
        .iter()
        .map(|s| parse_manual(s).with_context(|| format!("Invalid --entry value {:?}", s)))
        .collect()
}

/// Positive integer weight read from the leading digits, so `3.0`, `2.7`
/// and `3abc` give 3, 2 and 3. Anything below 1 or beyond `u32` is rejected.
fn parse_weight(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    let (negative, rest) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };

    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let n: u32 = rest[..end].parse().ok()?;
    if negative || n < 1 {
        return None;
    }
    Some(n)
}

fn is_workbook(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| WORKBOOK_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
}

fn delimiter_for_extension(path: &Path) -> Option<char> {
    match path.extension()?.to_str()?.to_lowercase().as_str() {
        "tsv" | "tab" => Some('\t'),
        _ => None,
    }
}

/// Pick the most frequent of `,` `;` tab on the first non-blank line
pub fn sniff_delimiter(content: &str) -> char {
    let first = content.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
    [',', ';', '\t']
        .into_iter()
        .map(|d| (d, first.matches(d).count()))
        .filter(|&(_, n)| n > 0)
        .max_by_key(|&(_, n)| n)
        .map(|(d, _)| d)
        .unwrap_or(',')
}

/// Split one line into fields. Double quotes group a field and `""` inside
/// quotes is a literal quote.
pub fn split_record(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            c if c == delimiter && !in_quotes => {
                fields.push(std::mem::take(&mut field));
            }
            c => field.push(c),
        }
    }
    fields.push(field);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn names(import: &Import) -> Vec<&str> {
        import.entries.iter().map(|e| e.name()).collect()
    }

    #[test]
    fn test_parse_basic_table() {
        let import = parse_table("Name,Occurrence\nAlice,3\nBob,1\n", ',', true).unwrap();
        assert_eq!(names(&import), vec!["Alice", "Bob"]);
        assert_eq!(import.entries[0].weight(), 3);
        assert_eq!(import.report, ImportReport { rows: 2, skipped: 0, coerced: 0 });
    }

    #[test]
    fn test_without_header() {
        let import = parse_table("Alice,3\nBob,1", ',', false).unwrap();
        assert_eq!(names(&import), vec!["Alice", "Bob"]);
    }

    #[test]
    fn test_invalid_weights_become_one() {
        let text = "name,n\nA,abc\nB,0\nC,-4\nD\nE,\nF,2.0\nG,7";
        let import = parse_table(text, ',', true).unwrap();
        let weights: Vec<u32> = import.entries.iter().map(|e| e.weight()).collect();
        assert_eq!(weights, vec![1, 1, 1, 1, 1, 2, 7]);
        assert_eq!(import.report.coerced, 5);
        assert_eq!(import.report.skipped, 0);
    }

    #[test]
    fn test_weight_uses_leading_digits() {
        assert_eq!(parse_weight("3abc"), Some(3));
        assert_eq!(parse_weight("2.7"), Some(2));
        assert_eq!(parse_weight("+4"), Some(4));
        assert_eq!(parse_weight(" 12 tickets"), Some(12));
        assert_eq!(parse_weight("0.9"), None);
        assert_eq!(parse_weight("-3"), None);
        assert_eq!(parse_weight("x3"), None);
        assert_eq!(parse_weight("99999999999"), None);
    }

    #[test]
    fn test_byte_order_mark_stripped() {
        let import = parse_table("\u{feff}Name,Occurrence\nAlice,2\n", ',', true).unwrap();
        assert_eq!(names(&import), vec!["Alice"]);

        let import = parse_table("\u{feff}Alice,2\n", ',', false).unwrap();
        assert_eq!(names(&import), vec!["Alice"]);
    }

    #[test]
    fn test_empty_names_skipped() {
        let text = "name,n\n,3\n   ,2\nAlice,1\n\n\n";
        let import = parse_table(text, ',', true).unwrap();
        assert_eq!(names(&import), vec!["Alice"]);
        assert_eq!(import.report.rows, 3);
        assert_eq!(import.report.skipped, 2);
    }

    #[test]
    fn test_no_rows() {
        assert!(matches!(parse_table("Name,Occurrence\n", ',', true), Err(ImportError::NoRows)));
        assert!(matches!(parse_table("", ',', false), Err(ImportError::NoRows)));
    }

    #[test]
    fn test_quoted_fields() {
        let fields = split_record(r#""Smith, Bob",2"#, ',');
        assert_eq!(fields, vec!["Smith, Bob", "2"]);

        let fields = split_record(r#""The ""Boss""",1"#, ',');
        assert_eq!(fields, vec![r#"The "Boss""#, "1"]);
    }

    #[test]
    fn test_sniff_delimiter() {
        assert_eq!(sniff_delimiter("name;weight\nA;1"), ';');
        assert_eq!(sniff_delimiter("name\tweight\nA\t1"), '\t');
        assert_eq!(sniff_delimiter("name,weight"), ',');
        assert_eq!(sniff_delimiter("name"), ',');
    }

    #[test]
    fn test_parse_manual() {
        assert_eq!(parse_manual("Alice=3").unwrap(), Entry::new("Alice", 3).unwrap());
        assert_eq!(parse_manual("Bob").unwrap(), Entry::new("Bob", 1).unwrap());
        assert_eq!(parse_manual(" Carol = x ").unwrap(), Entry::new("Carol", 1).unwrap());
        assert_eq!(parse_manual("=4"), Err(DrawError::EmptyName));
    }

    #[test]
    fn test_parse_manual_all_reports_value() {
        let err = parse_manual_all(&["A=1".to_string(), " =2".to_string()]).unwrap_err();
        assert!(err.to_string().contains("--entry"));
    }

    #[test]
    fn test_load_file_detects_semicolons() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "Name;Occurrence").unwrap();
        writeln!(file, "Alice;2").unwrap();
        writeln!(file, "Bob;5").unwrap();

        let import = load_file(file.path(), &ImportConfig::default()).unwrap();
        assert_eq!(names(&import), vec!["Alice", "Bob"]);
        assert_eq!(import.entries[1].weight(), 5);
    }

    #[test]
    fn test_load_file_tsv_extension() {
        let mut file = tempfile::Builder::new().suffix(".tsv").tempfile().unwrap();
        writeln!(file, "Name\tOccurrence").unwrap();
        writeln!(file, "Smith, Bob\t4").unwrap();

        let import = load_file(file.path(), &ImportConfig::default()).unwrap();
        assert_eq!(names(&import), vec!["Smith, Bob"]);
        assert_eq!(import.entries[0].weight(), 4);
    }

    fn fixture(name: &str) -> std::path::PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
    }

    #[test]
    fn test_load_workbook_first_sheet() {
        let import = load_file(&fixture("participants.xlsx"), &ImportConfig::default()).unwrap();
        assert_eq!(names(&import), vec!["Alice", "Smith, Bob", "Carol", "Dave", "Eve"]);
        let weights: Vec<u32> = import.entries.iter().map(|e| e.weight()).collect();
        assert_eq!(weights, vec![3, 2, 1, 1, 1]);
        assert_eq!(import.report, ImportReport { rows: 6, skipped: 1, coerced: 2 });
    }

    #[test]
    fn test_load_workbook_without_header() {
        let import = load_workbook(&fixture("participants.xlsx"), false).unwrap();
        // the header row is now a participant whose weight is coerced
        assert_eq!(import.entries[0].name(), "Name");
        assert_eq!(import.report.coerced, 3);
    }

    #[test]
    fn test_load_missing_workbook() {
        let err = load_file(Path::new("/nonexistent/participants.xlsx"), &ImportConfig::default())
            .unwrap_err();
        assert!(matches!(err, ImportError::Workbook { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_file(Path::new("/nonexistent/participants.csv"), &ImportConfig::default())
            .unwrap_err();
        assert!(matches!(err, ImportError::Io { .. }));
    }
}
