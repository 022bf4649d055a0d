//! Fragment list reader
//!
//! # Format
//!
//! ```text
//! # start0 end0 start1 end1 weight
//! 10 25 100 115 16
//! 30 48 120 138 19
//! ```
//!
//! - One fragment per line: five whitespace-separated integers
//! - Positions are non-negative, the weight may be negative
//! - Lines starting with `#` and blank lines are ignored
//! - Files may be gzip or bzip2 compressed

use std::io::BufRead;
use std::path::Path;

use crate::core::{FragmentParseError, FragmentParseResult};
use crate::core::fragment::{FragmentTable, Position, Score};
use crate::core::io::{FragmentInput, LineReader, ReadStrategy};

/// Default capacity hint for tables read from files
const INITIAL_CAPACITY: usize = 1024;

const FIELD_NAMES: [&str; 4] = ["start0", "end0", "start1", "end1"];

/// A parsed data line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FragmentRecord {
    pub start0: Position,
    pub end0: Position,
    pub start1: Position,
    pub end1: Position,
    pub weight: Score,
}

fn parse_field<T: std::str::FromStr>(
    bytes: &[u8],
    field: &'static str,
    line: usize,
) -> FragmentParseResult<T> {
    std::str::from_utf8(bytes)
        .ok()
        .and_then(|s| s.parse::<T>().ok())
        .ok_or_else(|| FragmentParseError::ParseInt {
            line,
            field,
            value: String::from_utf8_lossy(bytes).into_owned(),
        })
}

impl FragmentRecord {
    /// Parse one line. Returns `Ok(None)` for comments and blank lines.
    pub fn parse(line: &[u8], line_number: usize) -> FragmentParseResult<Option<Self>> {
        let trimmed = line.trim_ascii();
        if trimmed.is_empty() || trimmed[0] == b'#' {
            return Ok(None);
        }

        let fields: Vec<&[u8]> = trimmed
            .split(|b| b.is_ascii_whitespace())
            .filter(|f| !f.is_empty())
            .collect();
        if fields.len() != 5 {
            return Err(FragmentParseError::FieldCount {
                line: line_number,
                found: fields.len(),
            });
        }

        let mut positions = [0 as Position; 4];
        for (i, position) in positions.iter_mut().enumerate() {
            *position = parse_field(fields[i], FIELD_NAMES[i], line_number)?;
        }
        let weight = parse_field(fields[4], "weight", line_number)?;

        Ok(Some(Self {
            start0: positions[0],
            end0: positions[1],
            start1: positions[2],
            end1: positions[3],
            weight,
        }))
    }

    fn add_to(self, table: &mut FragmentTable, line: usize) -> FragmentParseResult<usize> {
        table
            .add(self.start0, self.end0, self.start1, self.end1, self.weight)
            .map_err(|source| FragmentParseError::Range { line, source })
    }
}

/// Read all fragments from a `BufRead` source
pub fn read_fragments<R: BufRead>(reader: R) -> FragmentParseResult<FragmentTable> {
    let mut table = FragmentTable::new(INITIAL_CAPACITY);
    let mut lines = LineReader::new(reader);
    let mut line_number = 0;

    while let Some(line) = lines.next_line() {
        line_number += 1;
        if let Some(record) = FragmentRecord::parse(line?, line_number)? {
            record.add_to(&mut table, line_number)?;
        }
    }

    log::debug!("read {} fragments from {} lines", table.len(), line_number);
    Ok(table)
}

/// Read all fragments from an in-memory buffer
pub fn read_fragment_bytes(data: &[u8]) -> FragmentParseResult<FragmentTable> {
    let estimate = memchr::memchr_iter(b'\n', data).count() + 1;
    let mut table = FragmentTable::new(estimate);
    let mut line_start = 0;
    let mut line_number = 0;

    let ends = memchr::memchr_iter(b'\n', data).chain(std::iter::once(data.len()));
    for line_end in ends {
        line_number += 1;
        if let Some(record) = FragmentRecord::parse(&data[line_start..line_end], line_number)? {
            record.add_to(&mut table, line_number)?;
        }
        line_start = line_end + 1;
    }

    Ok(table)
}

/// Read a fragment file, decompressing gzip/bzip2 input.
///
/// Large plain files are memory mapped and parsed in place.
pub fn read_fragment_file<P: AsRef<Path>>(path: P) -> FragmentParseResult<FragmentTable> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(FragmentParseError::FileNotFound(path.to_path_buf()));
    }

    match FragmentInput::open(path, ReadStrategy::BySize)? {
        FragmentInput::Plain(reader) => read_fragments(reader),
        FragmentInput::Gzip(reader) => read_fragments(reader),
        FragmentInput::Bzip2(reader) => read_fragments(reader),
        FragmentInput::Mapped(map) => read_fragment_bytes(&map),
    }
}
