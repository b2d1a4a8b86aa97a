//! Read operations for binary abundance series
//!
//! The file is a fixed 8 byte header followed by records until the end of the
//! file. There is no record count, so the end of the series is only found by
//! trying to read another timestep.
//!
//! ```text
//! <dim_n: i32> <dim_z: i32>
//! <timestep: i32> <dim_z * dim_n f32 values, z-major>
//! <timestep: i32> <dim_z * dim_n f32 values, z-major>
//! ...
//! ```
//!
//! Everything is little endian.

// standard library
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

// crate modules
use crate::error::{Error, Result};
use crate::grid::{Grid, GridRecord, Series, SeriesHeader};

// nucdiff modules
use nucdiff_utils::f;

// external crates
use log::{debug, info, warn};

/// Deserialise a complete binary series file
///
/// Returns a [Series] with every complete record. A partial record at the end
/// of the file stops the read with a warning, and the `truncated` flag is set.
///
/// ```rust, no_run
/// # use nucdiff_series::read_series_file;
/// let series = read_series_file("path/to/XTime_run.dat").unwrap();
/// println!("{series}");
/// ```
pub fn read_series_file<P: AsRef<Path>>(path: P) -> Result<Series> {
    let path = path.as_ref();
    let reader = SeriesReader::new(init_reader(path)?)?;
    let series = reader.into_series()?;

    match series.records.last() {
        Some(last) => info!(
            "Read {} timesteps from {}, last timestep {}",
            series.len(),
            path.display(),
            last.timestep
        ),
        None => info!("Read 0 timesteps from {}", path.display()),
    }

    Ok(series)
}

/// Initialise a reader from anything that can be turned into a path
pub(crate) fn init_reader<P: AsRef<Path>>(path: P) -> Result<BufReader<File>> {
    let file = File::open(path.as_ref()).map_err(|e| {
        Error::IOError(std::io::Error::new(
            e.kind(),
            f!("unable to open {}: {e}", path.as_ref().display()),
        ))
    })?;
    Ok(BufReader::new(file))
}

/// Deserialise the header to get the grid dimensions
pub fn read_header<R: Read>(reader: &mut R) -> Result<SeriesHeader> {
    let mut buffer = [0u8; SeriesHeader::BYTE_LENGTH];
    reader.read_exact(&mut buffer)?;
    let header: SeriesHeader = bincode::deserialize(&buffer)?;

    // fail early on anything that can not describe a grid
    header.record_byte_length()?;
    Ok(header)
}

/// Lazy reader over the records of a binary series
///
/// The header is read on construction. Records are then decoded one at a time
/// as the iterator is advanced, each sized by the header dimensions.
///
/// - Zero bytes where a timestep should be is a clean end of the series
/// - A partial timestep or grid is a truncated record, logged as a warning
///   and the iterator ends
/// - Any other I/O failure is yielded as an error, and the iterator ends
///
/// ```rust
/// # use nucdiff_series::{SeriesHeader, SeriesReader};
/// let mut bytes = vec![1, 0, 0, 0, 1, 0, 0, 0];
/// bytes.extend(7i32.to_le_bytes());
/// bytes.extend((-2.0f32).to_le_bytes());
///
/// let mut reader = SeriesReader::new(bytes.as_slice()).unwrap();
/// assert_eq!(reader.header(), SeriesHeader::new(1, 1));
///
/// let record = reader.next().unwrap().unwrap();
/// assert_eq!(record.timestep, 7);
/// assert_eq!(record.grid.values(), &[-2.0]);
/// assert!(reader.next().is_none());
/// ```
#[derive(Debug)]
pub struct SeriesReader<R> {
    reader: R,
    header: SeriesHeader,
    shape: (usize, usize),
    data_length: usize,
    buffer: Vec<u8>,
    records_read: usize,
    truncated: bool,
    finished: bool,
}

impl<R: Read> SeriesReader<R> {
    /// Read the header and prepare to decode records
    pub fn new(mut reader: R) -> Result<Self> {
        let header = read_header(&mut reader)?;
        let shape = header.shape()?;
        let data_length = header.record_byte_length()? - std::mem::size_of::<i32>();
        debug!("Series header {header}, {data_length} bytes of grid data per record");

        Ok(Self {
            reader,
            header,
            shape,
            data_length,
            buffer: Vec::new(),
            records_read: 0,
            truncated: false,
            finished: false,
        })
    }

    /// Dimensions declared by the file
    pub fn header(&self) -> SeriesHeader {
        self.header
    }

    /// Number of complete records decoded so far
    pub fn records_read(&self) -> usize {
        self.records_read
    }

    /// True if the last record in the file was incomplete
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Decode every remaining record into a [Series]
    pub fn into_series(mut self) -> Result<Series> {
        let mut series = Series::new(self.header);
        for record in self.by_ref() {
            series.records.push(record?);
        }
        series.truncated = self.truncated;
        Ok(series)
    }

    /// Try to decode the next record, `None` for the end of the series
    fn read_record(&mut self) -> Result<Option<GridRecord>> {
        let mut timestep_bytes = [0u8; std::mem::size_of::<i32>()];
        match read_fill(&mut self.reader, &mut timestep_bytes)? {
            0 => return Ok(None),
            n if n < timestep_bytes.len() => {
                self.warn_truncated(n);
                return Ok(None);
            }
            _ => (),
        }
        let timestep = i32::from_le_bytes(timestep_bytes);

        // grows with the bytes that arrive, never from the header alone
        self.buffer.clear();
        let n = (&mut self.reader)
            .take(self.data_length as u64)
            .read_to_end(&mut self.buffer)?;
        if n < self.data_length {
            self.warn_truncated(timestep_bytes.len() + n);
            return Ok(None);
        }

        let values = self
            .buffer
            .chunks_exact(std::mem::size_of::<f32>())
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect();

        let (dim_n, dim_z) = self.shape;
        let grid = Grid::from_values(dim_n, dim_z, values)?;
        self.records_read += 1;
        Ok(Some(GridRecord::new(timestep, grid)))
    }

    fn warn_truncated(&mut self, bytes: usize) {
        self.truncated = true;
        warn!(
            "Truncated record after {} complete timesteps ({bytes} of {} bytes), ignoring the remainder",
            self.records_read,
            self.data_length + std::mem::size_of::<i32>()
        );
    }
}

impl<R: Read> Iterator for SeriesReader<R> {
    type Item = Result<GridRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.read_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

impl<R: Read> std::iter::FusedIterator for SeriesReader<R> {}

/// Read until `buffer` is full or the stream ends, returning the bytes read
///
/// Unlike `read_exact` this tells a clean end of stream (0 bytes) apart from a
/// partial read.
fn read_fill<R: Read>(reader: &mut R, buffer: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buffer.len() {
        match reader.read(&mut buffer[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(filled)
}
