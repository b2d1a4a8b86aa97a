//! Text to binary conversion of abundance dumps

// standard library
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

// crate modules
use crate::assemble::assemble;
use crate::blocks::Blocks;
use crate::error::{Error, Result};
use crate::grid::SeriesHeader;
use crate::writer::{init_writer, SeriesWriter};

// nucdiff modules
use nucdiff_utils::{f, OptionExt};

// external crates
use kdam::{Bar, BarBuilder, BarExt};
use log::{debug, info};
use serde::Serialize;

/// Streaming converter from text block dumps to binary series
///
/// Blocks are parsed, assembled onto a dense grid, and written one at a time
/// so memory use does not grow with the length of the dump.
///
/// The grid dimensions default to 120 x 120 and are written to the header of
/// the output. Isotopes beyond these are dropped.
///
/// ```rust, no_run
/// # use nucdiff_series::Converter;
/// let mut converter = Converter::new();
/// converter.set_dimensions(150, 100);
/// converter.disable_progress();
///
/// let summary = converter
///     .convert("path/to/XTime_run.txt", "path/to/XTime_run.dat")
///     .unwrap();
/// println!("{summary}");
/// ```
#[derive(Debug, Clone, Default, Serialize)]
pub struct Converter {
    /// Dimensions of every assembled grid
    header: SeriesHeader,
    /// Disable progress bar?
    disable_progress: bool,
}

/// Outcome of a conversion
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionSummary {
    /// Dimensions written to the header
    pub header: SeriesHeader,
    /// Number of records written
    pub records: usize,
    /// Timestep of the final record, if there was one
    pub last_timestep: Option<i32>,
}

impl std::fmt::Display for ConversionSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "Converted {} timesteps onto a {} grid (last timestep: {})",
            self.records,
            self.header,
            self.last_timestep.display()
        )
    }
}

impl Converter {
    /// Just calls Default::default(), nothing special to be initialised
    pub fn new() -> Self {
        Default::default()
    }

    /// Setter for the dense grid dimensions
    pub fn set_dimensions(&mut self, dim_n: i32, dim_z: i32) {
        self.header = SeriesHeader::new(dim_n, dim_z);
    }

    /// Do not print the progress indicators
    pub fn disable_progress(&mut self) {
        self.disable_progress = true;
    }

    /// Dimensions that will be written to the header
    pub fn header(&self) -> SeriesHeader {
        self.header
    }

    /// Convert the text dump at `input` into a binary series at `output`
    pub fn convert<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input: P,
        output: Q,
    ) -> Result<ConversionSummary> {
        let input = input.as_ref();
        let reader = BufReader::new(File::open(input).map_err(|e| {
            Error::IOError(std::io::Error::new(
                e.kind(),
                f!("unable to open {}: {e}", input.display()),
            ))
        })?);

        info!("Converting {} to binary", input.display());
        let summary = self.convert_stream(reader, init_writer(output)?)?;
        info!("{summary}");
        Ok(summary)
    }

    /// Convert from any buffered text reader into any writer
    ///
    /// ```rust
    /// # use nucdiff_series::Converter;
    /// let text = "timestep 0\n1 2 0.5\ntimestep 5\n2 4 0.25\n";
    ///
    /// let mut converter = Converter::new();
    /// converter.set_dimensions(2, 2);
    /// converter.disable_progress();
    ///
    /// let mut bytes = Vec::new();
    /// let summary = converter.convert_stream(text.as_bytes(), &mut bytes).unwrap();
    ///
    /// assert_eq!(summary.records, 2);
    /// assert_eq!(summary.last_timestep, Some(5));
    /// assert_eq!(bytes.len(), 48);
    /// ```
    pub fn convert_stream<R: BufRead, W: Write>(
        &self,
        input: R,
        output: W,
    ) -> Result<ConversionSummary> {
        let (dim_n, dim_z) = self.header.shape()?;
        let mut writer = SeriesWriter::new(output, self.header)?;
        let mut progress_bar = self.init_progress_bar()?;
        let mut last_timestep = None;

        if !self.disable_progress {
            progress_bar.refresh()?;
        }

        for block in Blocks::new(input) {
            let block = block?;
            debug!(
                "Assembling timestep {} from {} isotopes",
                block.timestep,
                block.triples.len()
            );

            let record = assemble(block, dim_n, dim_z);
            writer.write_record(&record)?;
            last_timestep = Some(record.timestep);
            progress_bar.update(1)?;
        }

        // need an extra line for clean spacing if the progress bar is printed
        if !self.disable_progress {
            eprintln!()
        };

        let records = writer.records_written();
        writer.finish()?;

        Ok(ConversionSummary {
            header: self.header,
            records,
            last_timestep,
        })
    }

    /// Initialise the progress bar, if wanted
    fn init_progress_bar(&self) -> Result<Bar> {
        BarBuilder::default()
            .unit(" timesteps")
            .disable(self.disable_progress)
            .bar_format("{count} timesteps [{rate} timesteps/s]   ")
            .build()
            .map_err(|e| Error::ProgressBar(f!("{e:?}")))
    }
}

/// Output path for the binary series of a text dump
///
/// The file stem is kept and given a `.dat` extension inside `out_dir`.
///
/// ```rust
/// # use nucdiff_series::binary_path;
/// # use std::path::Path;
/// let path = binary_path("runs/XTime_ref.txt", "bin");
/// assert_eq!(path, Path::new("bin/XTime_ref.dat"));
/// ```
pub fn binary_path<P: AsRef<Path>, Q: AsRef<Path>>(input: P, out_dir: Q) -> PathBuf {
    let mut name = input
        .as_ref()
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| "series".into());
    name.push(".dat");
    out_dir.as_ref().join(name)
}
