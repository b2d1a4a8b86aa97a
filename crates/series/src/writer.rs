//! Write operations for binary abundance series

// standard library
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

// crate modules
use crate::error::{Error, Result};
use crate::grid::{GridRecord, Series, SeriesHeader, SENTINEL};
use nucdiff_utils::{f, ValueExt};

/// Streaming writer for the binary series format
///
/// The header is written as soon as the writer is created, and every record
/// is written straight through. Nothing is buffered beyond the underlying
/// writer, so records can be written as they are assembled.
///
/// ```rust
/// # use nucdiff_series::{Grid, GridRecord, SeriesHeader, SeriesWriter};
/// let mut bytes = Vec::new();
/// let mut writer = SeriesWriter::new(&mut bytes, SeriesHeader::new(2, 2)).unwrap();
/// writer.write_record(&GridRecord::new(0, Grid::empty(2, 2))).unwrap();
/// writer.write_record(&GridRecord::new(5, Grid::empty(2, 2))).unwrap();
/// writer.finish().unwrap();
///
/// assert_eq!(bytes.len(), 8 + 2 * (4 + 16));
/// ```
#[derive(Debug)]
pub struct SeriesWriter<W: Write> {
    writer: W,
    header: SeriesHeader,
    shape: (usize, usize),
    buffer: Vec<u8>,
    records_written: usize,
}

impl<W: Write> SeriesWriter<W> {
    /// Write the header and prepare for records
    pub fn new(mut writer: W, header: SeriesHeader) -> Result<Self> {
        let shape = header.shape()?;
        // reject headers that can not describe a record before writing anything
        header.record_byte_length()?;
        bincode::serialize_into(&mut writer, &header)?;

        Ok(Self {
            writer,
            header,
            shape,
            buffer: Vec::new(),
            records_written: 0,
        })
    }

    /// Dimensions every record must match
    pub fn header(&self) -> SeriesHeader {
        self.header
    }

    /// Number of records written so far
    pub fn records_written(&self) -> usize {
        self.records_written
    }

    /// Append one record, which must match the header dimensions
    pub fn write_record(&mut self, record: &GridRecord) -> Result<()> {
        if record.grid.shape() != self.shape {
            return Err(Error::UnexpectedGridShape {
                expected: self.shape,
                found: record.grid.shape(),
            });
        }

        self.buffer.clear();
        self.buffer.extend(record.timestep.to_le_bytes());
        for value in record.grid.values() {
            self.buffer.extend(value.to_le_bytes());
        }

        self.writer.write_all(&self.buffer)?;
        self.records_written += 1;
        Ok(())
    }

    /// Flush everything and give back the underlying writer
    pub fn finish(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

/// Serialise a complete [Series] to a binary file
///
/// ```rust, no_run
/// # use nucdiff_series::{read_series_file, write_series_file};
/// let series = read_series_file("path/to/XTime_run.dat").unwrap();
/// write_series_file(&series, "path/to/copy.dat").unwrap();
/// ```
pub fn write_series_file<P: AsRef<Path>>(series: &Series, path: P) -> Result<()> {
    let mut writer = SeriesWriter::new(init_writer(path)?, series.header)?;
    for record in &series.records {
        writer.write_record(record)?;
    }
    writer.finish()?;
    Ok(())
}

/// Write a [Series] to a human readable text file
///
/// A summary of the dimensions is followed by every record. Only rows with at
/// least one populated cell are written, since most of a nuclide chart is
/// empty.
///
/// ```rust, no_run
/// # use nucdiff_series::{read_series_file, write_ascii_pretty};
/// let series = read_series_file("path/to/XTime_run.dat").unwrap();
/// write_ascii_pretty(&series, "./series_pretty.txt").unwrap();
/// ```
pub fn write_ascii_pretty<P: AsRef<Path>>(series: &Series, path: P) -> Result<()> {
    let mut writer = init_writer(path)?;

    writeln!(writer, "Dimensions: {}", series.header)?;
    writeln!(writer, "Timesteps : {}", series.len())?;
    writeln!(writer, "Truncated : {}", series.truncated)?;

    for record in &series.records {
        writeln!(writer, "\nTimestep {}:", record.timestep)?;

        for (z, row) in record.grid.rows().enumerate() {
            if row.iter().all(|v| *v == SENTINEL) {
                continue;
            }

            let s = row
                .iter()
                .map(|v| v.sci(4, 2))
                .collect::<Vec<String>>()
                .join(" ");

            writeln!(writer, "Z = {z}")?;
            writeln!(writer, "{}", textwrap::indent(&textwrap::fill(&s, 76), "    "))?;
        }
    }

    writer.flush()?;
    Ok(())
}

/// Write a [Series] to a JSON file
///
/// A direct serialisation of the header, every record, and the truncation
/// flag for inspection or analysis elsewhere.
///
/// ```rust, no_run
/// # use nucdiff_series::{read_series_file, write_json};
/// let series = read_series_file("path/to/XTime_run.dat").unwrap();
/// write_json(&series, "./series.json").unwrap();
/// ```
pub fn write_json<P: AsRef<Path>>(series: &Series, path: P) -> Result<()> {
    let mut writer = init_writer(path)?;
    serde_json::to_writer_pretty(&mut writer, series)?;
    writer.flush()?;
    Ok(())
}

/// Initialise a writer from anything that can be turned into a path
pub(crate) fn init_writer<P: AsRef<Path>>(path: P) -> Result<BufWriter<File>> {
    let file = File::create(path.as_ref()).map_err(|e| {
        Error::IOError(std::io::Error::new(
            e.kind(),
            f!("unable to create {}: {e}", path.as_ref().display()),
        ))
    })?;
    Ok(BufWriter::new(file))
}
