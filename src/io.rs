//! Edge-list CSV reading and writing.
//!
//! The exchange format is a three-column CSV with a mandatory header:
//! `source,target,weight`, in any column order. Identifiers are plain
//! strings without quoting (they must not contain commas); weights are
//! decimal numbers. This matches the upstream network-construction
//! pipeline and the downstream component-filtering stage, which only agree
//! on this contract.
//!
//! Reading validates the header by name and parses each record into a
//! typed outcome: a malformed record is an error naming the record, never
//! a silent skip. Blank lines are tolerated and counted in the returned
//! diagnostics so callers can report them.
//!
//! Writing is atomic: the edge list is written to a temporary file in the
//! destination directory and renamed into place, so an interrupted run
//! never leaves a truncated output file behind.

use crate::error::{Error, Result};
use crate::graph::EdgeRecord;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Column names required in the input header.
const COLUMNS: [&str; 3] = ["source", "target", "weight"];

/// A parsed edge list plus read diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadReport {
    /// Parsed records, in file order.
    pub records: Vec<EdgeRecord>,
    /// Blank lines skipped while reading.
    pub blank_lines: usize,
}

/// Read a `source,target,weight` CSV.
///
/// An empty *file* (no header at all) and a header-only file both produce
/// an empty record list; missing columns are fatal.
///
/// # Errors
///
/// [`Error::Io`] if the file cannot be read, [`Error::MissingColumn`] if a
/// required column is absent from the header, [`Error::MalformedRecord`]
/// for a record with the wrong field count or an unparseable weight.
pub fn read_edge_list(path: &Path) -> Result<ReadReport> {
    let file = File::open(path).map_err(|e| io_error(path, &e))?;
    let mut lines = BufReader::new(file).lines();

    let header = match lines.next() {
        Some(line) => line.map_err(|e| io_error(path, &e))?,
        None => {
            return Ok(ReadReport {
                records: Vec::new(),
                blank_lines: 0,
            })
        }
    };
    let layout = ColumnLayout::from_header(&header)?;

    let mut records = Vec::new();
    let mut blank_lines = 0usize;
    for (i, line) in lines.enumerate() {
        let line = line.map_err(|e| io_error(path, &e))?;
        if line.trim().is_empty() {
            blank_lines += 1;
            continue;
        }
        records.push(layout.parse_record(i + 1, &line)?);
    }

    Ok(ReadReport {
        records,
        blank_lines,
    })
}

/// Write a backbone edge list as CSV, atomically (write-then-rename).
///
/// # Errors
///
/// [`Error::Io`] on any filesystem failure; the destination is left
/// untouched in that case.
pub fn write_edge_list(path: &Path, edges: &[EdgeRecord]) -> Result<()> {
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    let tmp = match dir {
        Some(dir) => NamedTempFile::new_in(dir),
        None => NamedTempFile::new(),
    }
    .map_err(|e| io_error(path, &e))?;

    {
        let mut out = BufWriter::new(tmp.as_file());
        writeln!(out, "source,target,weight").map_err(|e| io_error(path, &e))?;
        for edge in edges {
            writeln!(out, "{},{},{}", edge.source, edge.target, edge.weight)
                .map_err(|e| io_error(path, &e))?;
        }
        out.flush().map_err(|e| io_error(path, &e))?;
    }

    let _ = tmp.persist(path).map_err(|e| io_error(path, &e.error))?;
    Ok(())
}

fn io_error(path: &Path, e: &dyn std::fmt::Display) -> Error {
    Error::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    }
}

/// Positions of the three required columns within a header.
#[derive(Debug, Clone, Copy)]
struct ColumnLayout {
    source: usize,
    target: usize,
    weight: usize,
    width: usize,
}

impl ColumnLayout {
    fn from_header(header: &str) -> Result<Self> {
        let names: Vec<&str> = header.split(',').map(str::trim).collect();
        let mut positions = [0usize; 3];
        for (slot, name) in COLUMNS.iter().enumerate() {
            positions[slot] = names
                .iter()
                .position(|n| n == name)
                .ok_or(Error::MissingColumn { name })?;
        }
        Ok(Self {
            source: positions[0],
            target: positions[1],
            weight: positions[2],
            width: names.len(),
        })
    }

    fn parse_record(&self, record: usize, line: &str) -> Result<EdgeRecord> {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() != self.width {
            return Err(Error::MalformedRecord {
                record,
                reason: format!("expected {} fields, found {}", self.width, fields.len()),
            });
        }
        let weight: f64 = fields[self.weight].parse().map_err(|_| Error::MalformedRecord {
            record,
            reason: format!("cannot parse weight '{}'", fields[self.weight]),
        })?;
        Ok(EdgeRecord::new(fields[self.source], fields[self.target], weight))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn write_temp(contents: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    #[test]
    fn reads_a_well_formed_file() {
        let f = write_temp("source,target,weight\na,b,1.5\nb,c,2\n");
        let report = read_edge_list(f.path()).unwrap();
        assert_eq!(
            report.records,
            vec![
                EdgeRecord::new("a", "b", 1.5),
                EdgeRecord::new("b", "c", 2.0),
            ]
        );
        assert_eq!(report.blank_lines, 0);
    }

    #[test]
    fn header_columns_may_be_reordered() {
        let f = write_temp("weight,source,target\n3,x,y\n");
        let report = read_edge_list(f.path()).unwrap();
        assert_eq!(report.records, vec![EdgeRecord::new("x", "y", 3.0)]);
    }

    #[test]
    fn missing_weight_column_is_fatal() {
        let f = write_temp("source,target\na,b\n");
        let err = read_edge_list(f.path()).unwrap_err();
        assert_eq!(err, Error::MissingColumn { name: "weight" });
    }

    #[test]
    fn blank_lines_are_counted_not_errors() {
        let f = write_temp("source,target,weight\na,b,1\n\n\nb,c,2\n");
        let report = read_edge_list(f.path()).unwrap();
        assert_eq!(report.records.len(), 2);
        assert_eq!(report.blank_lines, 2);
    }

    #[test]
    fn unparseable_weight_names_the_record() {
        let f = write_temp("source,target,weight\na,b,1\nb,c,lots\n");
        let err = read_edge_list(f.path()).unwrap_err();
        assert!(matches!(err, Error::MalformedRecord { record: 2, .. }));
    }

    #[test]
    fn wrong_field_count_names_the_record() {
        let f = write_temp("source,target,weight\na,b\n");
        let err = read_edge_list(f.path()).unwrap_err();
        assert!(matches!(err, Error::MalformedRecord { record: 1, .. }));
    }

    #[test]
    fn header_only_file_is_empty_not_an_error() {
        let f = write_temp("source,target,weight\n");
        let report = read_edge_list(f.path()).unwrap();
        assert!(report.records.is_empty());
    }

    #[test]
    fn zero_byte_file_is_empty_not_an_error() {
        let f = write_temp("");
        let report = read_edge_list(f.path()).unwrap();
        assert!(report.records.is_empty());
    }

    #[test]
    fn write_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backbone.csv");
        let edges = vec![
            EdgeRecord::new("a", "b", 1.0),
            EdgeRecord::new("b", "c", 2.5),
        ];
        write_edge_list(&path, &edges).unwrap();

        let report = read_edge_list(&path).unwrap();
        assert_eq!(report.records, edges);
    }

    #[test]
    fn write_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backbone.csv");
        write_edge_list(&path, &[EdgeRecord::new("a", "b", 1.0)]).unwrap();
        write_edge_list(&path, &[EdgeRecord::new("x", "y", 2.0)]).unwrap();

        let report = read_edge_list(&path).unwrap();
        assert_eq!(report.records, vec![EdgeRecord::new("x", "y", 2.0)]);
    }

    #[test]
    fn missing_input_file_is_an_io_error() {
        let err = read_edge_list(Path::new("/nonexistent/edges.csv")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
