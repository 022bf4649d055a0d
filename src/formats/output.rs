//! Plain-text chain writer
//!
//! ```text
//! # chain 1: length 2 score 12
//! 0 2 0 2 5
//! 3 5 3 5 7
//! ```

use std::io::{self, Write};

use crate::core::fragment::FragmentTable;
use crate::core::Chain;

/// Writes chains, numbering them from 1
pub struct ChainWriter<W: Write> {
    writer: W,
    silent: bool,
    written: usize,
}

impl<W: Write> ChainWriter<W> {
    /// With `silent` set only the header line of each chain is written
    pub fn new(writer: W, silent: bool) -> Self {
        Self {
            writer,
            silent,
            written: 0,
        }
    }

    pub fn write(&mut self, table: &FragmentTable, chain: &Chain) -> io::Result<()> {
        self.written += 1;
        write_chain(&mut self.writer, table, chain, self.written, self.silent)
    }

    /// Number of chains written so far
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Write one chain with its header line
pub fn write_chain<W: Write>(
    writer: &mut W,
    table: &FragmentTable,
    chain: &Chain,
    number: usize,
    silent: bool,
) -> io::Result<()> {
    writeln!(
        writer,
        "# chain {}: length {} score {}",
        number,
        chain.len(),
        chain.score
    )?;
    if silent {
        return Ok(());
    }
    for &index in &chain.fragments {
        let fragment = &table[index];
        writeln!(
            writer,
            "{} {} {} {} {}",
            fragment.start[0], fragment.end[0], fragment.start[1], fragment.end[1], fragment.weight
        )?;
    }
    Ok(())
}
