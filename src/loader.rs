//! Reads the letters table.
//!
//! The table has one row per writer and one column per possible recipient:
//!
//! ```text
//! Name,Alice,Bob,Carol
//! Alice,,5,0
//! Bob,5,,1
//! ```
//!
//! Each non-name cell becomes one [`RawEdge`]; nothing is filtered here.

use crate::error::{Result, SocialMapError};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// One `(row, column)` cell of the table, cell text kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEdge {
    pub source: String,
    pub target: String,
    pub letters: String,
}

pub fn read_edges(path: &Path) -> Result<Vec<RawEdge>> {
    let file = File::open(path).map_err(|e| SocialMapError::data_load(path, e))?;
    let edges = read_edges_from(file).map_err(|e| match e {
        SocialMapError::DataLoad { reason, .. } => SocialMapError::data_load(path, reason),
        other => other,
    })?;

    debug!(path = %path.display(), cells = edges.len(), "read letters table");
    Ok(edges)
}

/// Melts a wide table from any reader, row order then column order.
pub fn read_edges_from<R: Read>(reader: R) -> Result<Vec<RawEdge>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| SocialMapError::data_load("<table>", e))?
        .clone();

    if headers.is_empty() {
        return Err(SocialMapError::data_load("<table>", "table has no columns"));
    }

    let recipients: Vec<&str> = headers.iter().skip(1).collect();
    let mut edges = Vec::new();

    for record in reader.records() {
        // Ragged rows surface here as UnequalLengths.
        let record = record.map_err(|e| SocialMapError::data_load("<table>", e))?;

        let mut cells = record.iter();
        let source = cells.next().unwrap_or_default();

        for (target, letters) in recipients.iter().zip(cells) {
            edges.push(RawEdge {
                source: source.to_string(),
                target: target.to_string(),
                letters: letters.to_string(),
            });
        }
    }

    Ok(edges)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_melts_rows_then_columns() {
        let table = "Name,Alice,Bob\nAlice,,5\nBob,3,x\n";
        let edges = read_edges_from(table.as_bytes()).unwrap();

        let cells: Vec<(&str, &str, &str)> = edges
            .iter()
            .map(|e| (e.source.as_str(), e.target.as_str(), e.letters.as_str()))
            .collect();

        assert_eq!(
            cells,
            vec![
                ("Alice", "Alice", ""),
                ("Alice", "Bob", "5"),
                ("Bob", "Alice", "3"),
                ("Bob", "Bob", "x"),
            ]
        );
    }

    #[test]
    fn test_name_only_table_has_no_edges() {
        let edges = read_edges_from("Name\nAlice\nBob\n".as_bytes()).unwrap();
        assert!(edges.is_empty());
    }

    #[test]
    fn test_ragged_table_is_a_load_error() {
        let table = "Name,Alice,Bob\nAlice,1\n";
        let err = read_edges_from(table.as_bytes()).unwrap_err();
        assert!(matches!(err, SocialMapError::DataLoad { .. }));
    }

    #[test]
    fn test_empty_input_is_a_load_error() {
        let err = read_edges_from("".as_bytes()).unwrap_err();
        assert!(matches!(err, SocialMapError::DataLoad { .. }));
    }

    #[test]
    fn test_missing_file_is_a_load_error() {
        let err = read_edges(Path::new("definitely/not/here.csv")).unwrap_err();
        match err {
            SocialMapError::DataLoad { path, .. } => {
                assert_eq!(path, Path::new("definitely/not/here.csv"))
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
