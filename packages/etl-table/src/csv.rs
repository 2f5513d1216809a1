//! CSV source and sink.
//!
//! The first CSV record is the header; the remaining records are data rows.
//! Every cell read from CSV is text. Missing values are written as empty
//! fields.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::Result;
use crate::header::Header;
use crate::table::{Row, Scan, Table};
use crate::value::Value;

#[derive(Debug, Clone)]
enum CsvSource {
    Path(PathBuf),
    Bytes(Arc<[u8]>),
}

/// A table read lazily from CSV.
///
/// Each scan re-opens the source, so a file changed between scans is
/// observed by the next scan.
#[derive(Debug, Clone)]
pub struct CsvTable {
    source: CsvSource,
}

impl CsvTable {
    /// Read from a file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        Self {
            source: CsvSource::Path(path.as_ref().to_path_buf()),
        }
    }

    /// Read from an in-memory buffer.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        let bytes: Vec<u8> = bytes.into();
        Self {
            source: CsvSource::Bytes(Arc::from(bytes)),
        }
    }

    fn open(&self) -> Result<Box<dyn Read>> {
        Ok(match &self.source {
            CsvSource::Path(path) => Box::new(File::open(path)?),
            CsvSource::Bytes(bytes) => Box::new(io::Cursor::new(Arc::clone(bytes))),
        })
    }
}

impl Table for CsvTable {
    fn scan(&self) -> Result<Scan<'_>> {
        let mut reader = ::csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(self.open()?);

        let names = reader.headers()?.clone();
        if names.is_empty() {
            return Ok(Scan::empty());
        }
        let header = Header::new(names.iter())?;

        let rows = reader.into_records().map(|record| -> Result<Row> {
            Ok(record?
                .iter()
                .map(|field| Value::Text(field.to_string()))
                .collect())
        });
        Ok(Scan::new(header, rows))
    }
}

/// Write one scan of `table` as CSV.
pub fn to_csv<T: Table + ?Sized, W: Write>(table: &T, writer: W) -> Result<usize> {
    let scan = table.scan()?;
    let mut writer = ::csv::Writer::from_writer(writer);
    if scan.header().is_empty() {
        return Ok(0);
    }
    writer.write_record(scan.header().iter())?;

    let mut written = 0;
    for row in scan {
        writer.write_record(row?.iter().map(|v| v.to_string()))?;
        written += 1;
    }
    writer.flush()?;
    tracing::debug!(rows = written, "Wrote CSV");
    Ok(written)
}

/// Write one scan of `table` into a CSV byte buffer.
pub fn to_csv_bytes<T: Table + ?Sized>(table: &T) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    to_csv(table, &mut buf)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryTable, TableError};

    #[test]
    fn test_reads_header_and_rows() {
        let table = CsvTable::from_bytes("name,height\nLuke,172\nC-3PO,167\n");
        assert_eq!(table.header().unwrap().names(), ["name", "height"]);
        assert_eq!(
            table.rows().unwrap(),
            vec![
                vec![Value::from("Luke"), Value::from("172")],
                vec![Value::from("C-3PO"), Value::from("167")],
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        let table = CsvTable::from_bytes("");
        assert!(table.header().unwrap().is_empty());
        assert_eq!(table.row_count().unwrap(), 0);
    }

    #[test]
    fn test_ragged_rows_fail() {
        let table = CsvTable::from_bytes("a,b\n1\n");
        let result = table.rows();
        assert!(matches!(result, Err(TableError::Csv(_))));
    }

    #[test]
    fn test_writes_quoted_fields_and_missing_values() {
        let table = MemoryTable::from_parts(
            ["name", "homeworld", "note"],
            vec![vec!["Luke".into(), Value::Null, "says \"hi\", twice".into()]],
        )
        .unwrap();

        let bytes = to_csv_bytes(&table).unwrap();
        assert_eq!(
            String::from_utf8(bytes.clone()).unwrap(),
            "name,homeworld,note\nLuke,,\"says \"\"hi\"\", twice\"\n"
        );

        let reread = CsvTable::from_bytes(bytes);
        let rows = reread.rows().unwrap();
        assert_eq!(rows[0][1], Value::from(""));
        assert_eq!(rows[0][2], Value::from("says \"hi\", twice"));
    }

    #[test]
    fn test_reads_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("people.csv");
        std::fs::write(&path, "name\nLeia\n").unwrap();

        let table = CsvTable::from_path(&path);
        assert_eq!(table.rows().unwrap(), vec![vec![Value::from("Leia")]]);

        std::fs::write(&path, "name\nLeia\nHan\n").unwrap();
        assert_eq!(table.row_count().unwrap(), 2);
    }

    #[test]
    fn test_missing_file() {
        let table = CsvTable::from_path("/nonexistent/people.csv");
        assert!(matches!(table.scan(), Err(TableError::Io(_))));
    }
}
