//! Tabular input loading for the CLI.
//!
//! Reads a delimited file into named columns of raw strings. The profiler's
//! contract is string values with the empty string marking missing data, so
//! short records pad with empty strings and everything else passes through
//! untouched.

use std::{fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result, ensure};
use log::debug;

/// One column of a tabular dataset: a name and its raw values, in row order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub values: Vec<String>,
}

const DEFAULT_CSV_DELIMITER: u8 = b',';
const DEFAULT_TSV_DELIMITER: u8 = b'\t';

/// Picks a delimiter from the explicit flag or the file extension.
pub fn resolve_delimiter(path: &Path, provided: Option<u8>) -> u8 {
    provided.unwrap_or_else(|| match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => DEFAULT_TSV_DELIMITER,
        _ => DEFAULT_CSV_DELIMITER,
    })
}

/// Loads a delimited file into columns, optionally capping the number of
/// rows scanned.
pub fn load_columns(path: &Path, delimiter: u8, limit: Option<usize>) -> Result<Vec<Column>> {
    let file = File::open(path).with_context(|| format!("Opening input file {path:?}"))?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(BufReader::new(file));

    let headers = reader
        .headers()
        .with_context(|| format!("Reading headers from {path:?}"))?
        .clone();
    ensure!(!headers.is_empty(), "Input file {path:?} has no columns");

    let mut columns: Vec<Column> = headers
        .iter()
        .map(|name| Column {
            name: name.to_string(),
            values: Vec::new(),
        })
        .collect();

    for (row_idx, record) in reader.records().enumerate() {
        if let Some(limit) = limit
            && row_idx >= limit
        {
            break;
        }
        let record = record.with_context(|| format!("Reading row {}", row_idx + 2))?;
        for (col_idx, column) in columns.iter_mut().enumerate() {
            // Short records pad with the missing-value marker
            let value = record.get(col_idx).unwrap_or("");
            column.values.push(value.to_string());
        }
    }

    debug!(
        "Loaded {} column(s), {} row(s) from {:?}",
        columns.len(),
        columns.first().map_or(0, |column| column.values.len()),
        path
    );
    Ok(columns)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn write_temp(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write contents");
        file
    }

    #[test]
    fn loads_columns_in_header_order() {
        let file = write_temp("a,b\n1,x\n2,y\n");
        let columns = load_columns(file.path(), b',', None).expect("load");
        assert_eq!(columns.len(), 2);
        assert_eq!(columns[0].name, "a");
        assert_eq!(columns[0].values, vec!["1", "2"]);
        assert_eq!(columns[1].values, vec!["x", "y"]);
    }

    #[test]
    fn short_records_pad_with_empty_strings() {
        let file = write_temp("a,b\n1\n2,y\n");
        let columns = load_columns(file.path(), b',', None).expect("load");
        assert_eq!(columns[1].values, vec!["", "y"]);
    }

    #[test]
    fn limit_caps_rows_scanned() {
        let file = write_temp("a\n1\n2\n3\n");
        let columns = load_columns(file.path(), b',', Some(2)).expect("load");
        assert_eq!(columns[0].values, vec!["1", "2"]);
    }

    #[test]
    fn tsv_extension_switches_delimiter() {
        let path = Path::new("data.tsv");
        assert_eq!(resolve_delimiter(path, None), b'\t');
        assert_eq!(resolve_delimiter(path, Some(b';')), b';');
        assert_eq!(resolve_delimiter(Path::new("data.csv"), None), b',');
    }
}
