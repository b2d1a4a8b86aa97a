//! Lazy block parsing of the text abundance dumps
//!
//! Every block opens with a `timestep` header line, followed by data lines
//! of `<proton number> <mass number> <abundance>`.
//!
//! A block is only known to be complete when the next header arrives, so the
//! final block of a file is flushed once the lines run out.

// crate modules
use crate::error::{Error, Result};
use crate::grid::SENTINEL;
use crate::parsers;

// standard library
use std::io::{BufRead, Lines};

// external crates
use log::{trace, warn};

/// A single isotope abundance taken from one data line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SparseTriple {
    /// Neutron number, `mass_number - proton_number`
    pub coordinate_n: i32,
    /// Proton number
    pub coordinate_z: i32,
    /// log10 of the abundance, or [SENTINEL] for non-positive abundances
    pub log_value: f64,
}

impl SparseTriple {
    /// Build a triple from the raw columns of a data line
    ///
    /// Returns `None` if the neutron number can not be represented.
    ///
    /// ```rust
    /// # use nucdiff_series::SparseTriple;
    /// let triple = SparseTriple::from_columns(2, 5, 0.01).unwrap();
    /// assert_eq!(triple.coordinate_n, 3);
    /// assert_eq!(triple.coordinate_z, 2);
    /// assert!((triple.log_value + 2.0).abs() < 1e-12);
    ///
    /// // log10 is undefined here, so the sentinel is used
    /// let triple = SparseTriple::from_columns(2, 5, 0.0).unwrap();
    /// assert_eq!(triple.log_value, -15.0);
    /// ```
    pub fn from_columns(proton_number: i32, mass_number: i32, raw_abundance: f64) -> Option<Self> {
        let log_value = if raw_abundance > 0.0 {
            raw_abundance.log10()
        } else {
            SENTINEL as f64
        };

        Some(Self {
            coordinate_n: mass_number.checked_sub(proton_number)?,
            coordinate_z: proton_number,
            log_value,
        })
    }
}

/// All triples collected between two `timestep` headers
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// Index from the header line
    pub timestep: i32,
    /// Triples in the order they appear in the file
    pub triples: Vec<SparseTriple>,
}

impl Block {
    /// An empty block for a timestep
    pub fn new(timestep: i32) -> Self {
        Self {
            timestep,
            triples: Vec::new(),
        }
    }
}

/// Iterator over the blocks of a text abundance dump
///
/// Lines are read one at a time, so only the triples of the currently open
/// block are ever held in memory.
///
/// - Lines before the first header are discarded
/// - Data lines with fewer than 3 columns are skipped silently
/// - Data lines that fail to parse are skipped with a warning
/// - The last block is flushed exactly once at the end of the input
///
/// I/O failures and headers without an integer index are yielded as errors,
/// after which the iterator is finished. Any block that was open when a bad
/// header is found is still given back before the error.
///
/// ```rust
/// # use nucdiff_series::Blocks;
/// let text = "timestep 1\n2 4 1.0\ntimestep 2\n2 5 0.01\n";
/// let blocks = Blocks::new(text.as_bytes())
///     .collect::<Result<Vec<_>, _>>()
///     .unwrap();
///
/// assert_eq!(blocks.len(), 2);
/// assert_eq!(blocks[1].timestep, 2);
/// assert_eq!(blocks[1].triples[0].coordinate_n, 3);
/// ```
#[derive(Debug)]
pub struct Blocks<R> {
    lines: Lines<R>,
    current: Option<Block>,
    deferred: Option<Error>,
    line_number: usize,
    finished: bool,
}

impl<R: BufRead> Blocks<R> {
    /// Parse blocks from any buffered reader
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            current: None,
            deferred: None,
            line_number: 0,
            finished: false,
        }
    }

    /// Number of lines consumed so far
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Handle a single line, returning a completed block if one was closed
    fn process_line(&mut self, line: &str) -> Result<Option<Block>> {
        if parsers::is_block_header(line) {
            let Some(timestep) = parsers::block_index(line) else {
                let error = Error::InvalidBlockHeader {
                    line: self.line_number,
                    content: line.to_string(),
                };
                // give back the open block first, the error follows on the next call
                return match self.current.take() {
                    Some(block) => {
                        self.deferred = Some(error);
                        Ok(Some(block))
                    }
                    None => Err(error),
                };
            };
            trace!("Opening block for timestep {timestep}");
            return Ok(self.current.replace(Block::new(timestep)));
        }

        // nothing to add to until the first header
        let Some(block) = self.current.as_mut() else {
            return Ok(None);
        };

        if !parsers::has_data_columns(line) {
            return Ok(None);
        }

        match parsers::data_line(line) {
            Ok((_, (proton, mass, abundance))) => {
                match SparseTriple::from_columns(proton, mass, abundance) {
                    Some(triple) => block.triples.push(triple),
                    None => warn!(
                        "Skipping line {}, neutron number out of range: \"{line}\"",
                        self.line_number
                    ),
                }
            }
            Err(_) => warn!(
                "Skipping line {}, could not parse data: \"{line}\"",
                self.line_number
            ),
        }

        Ok(None)
    }
}

impl<R: BufRead> Iterator for Blocks<R> {
    type Item = Result<Block>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        if let Some(e) = self.deferred.take() {
            self.finished = true;
            return Some(Err(e));
        }

        loop {
            let line = match self.lines.next() {
                Some(Ok(line)) => line,
                Some(Err(e)) => {
                    self.finished = true;
                    return Some(Err(e.into()));
                }
                None => {
                    // end of input, flush whatever is still open
                    self.finished = true;
                    return self.current.take().map(Ok);
                }
            };

            self.line_number += 1;
            match self.process_line(&line) {
                Ok(Some(block)) => return Some(Ok(block)),
                Ok(None) => continue,
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

impl<R: BufRead> std::iter::FusedIterator for Blocks<R> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Vec<Block> {
        Blocks::new(text.as_bytes())
            .collect::<Result<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn final_block_without_trailing_header() {
        let blocks = parse("timestep 0\n1 1 0.5\ntimestep 7\n1 2 0.25\n2 4 0.125");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].timestep, 0);
        assert_eq!(blocks[1].timestep, 7);
        assert_eq!(blocks[1].triples.len(), 2);
    }

    #[test]
    fn final_block_flushed_once() {
        let mut blocks = Blocks::new("timestep 4\n2 5 0.01\n".as_bytes());
        assert_eq!(blocks.next().unwrap().unwrap().timestep, 4);
        assert!(blocks.next().is_none());
        assert!(blocks.next().is_none());
    }

    #[test]
    fn lines_before_first_header_are_discarded() {
        let blocks = parse("1 1 0.5\n2 2 0.5\ntimestep 1\n3 6 0.5\n");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].triples.len(), 1);
        assert_eq!(blocks[0].triples[0].coordinate_z, 3);
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let blocks = parse("timestep 1\n\n1 2\nZ A abundance\n2 5 0.01\n");
        assert_eq!(blocks[0].triples.len(), 1);
    }

    #[test]
    fn empty_blocks_are_kept() {
        let blocks = parse("timestep 1\ntimestep 2\n");
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].triples.is_empty());
        assert!(blocks[1].triples.is_empty());
    }

    #[test]
    fn no_header_means_no_blocks() {
        assert!(parse("1 1 0.5\n").is_empty());
        assert!(parse("").is_empty());
    }

    #[test]
    fn header_without_index_is_an_error() {
        let mut blocks = Blocks::new("timestep 1\n1 1 0.5\ntimestep x\n".as_bytes());
        assert!(blocks.next().unwrap().is_ok());
        assert!(matches!(
            blocks.next(),
            Some(Err(Error::InvalidBlockHeader { line: 3, .. }))
        ));
        assert!(blocks.next().is_none());
    }

    #[test]
    fn non_positive_abundance_is_sentinel() {
        let blocks = parse("timestep 1\n2 5 0.0\n2 6 -3.0\n");
        assert!(blocks[0]
            .triples
            .iter()
            .all(|t| t.log_value == SENTINEL as f64));
    }
}
