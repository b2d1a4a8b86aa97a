//! Options and entry points for comparing two series

// standard library
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

// crate modules
use crate::difference::{compare_pair, find_match, DiffResult, Extrema, Outcome};
use crate::error::{Error, Result};
use crate::progress::Progress;
use crate::render::{Frame, Renderer};
use crate::report::Report;

// nucdiff modules
use nucdiff_isotopes::ReferenceIsotope;
use nucdiff_series::{Series, SeriesHeader, SeriesReader};
use nucdiff_utils::OptionExt;

// external crates
use log::{debug, info, warn};
use serde::Serialize;

/// Options for comparing two binary series
///
/// Every record of the first series is matched against the first record of
/// the second series at `timestep + offset`. The difference `series_2 -
/// series_1` is taken over the lower corner of the grid, optionally limited
/// to fewer columns or rows than the header declares.
///
/// Matched pairs whose differences all lie inside the threshold are counted
/// but not emitted.
///
/// ```rust, no_run
/// # use nucdiff_compare::Comparison;
/// let mut comparison = Comparison::new();
/// comparison.set_offset(5);
/// comparison.set_threshold(0.01);
/// comparison.set_limits(Some(60), None);
///
/// let mut differences = comparison
///     .compare_files("path/to/XTime_ref.dat", "path/to/XTime_new.dat")
///     .unwrap();
///
/// for result in differences.by_ref() {
///     println!("{}: ({}, {})", result.timestep, result.min, result.max);
/// }
///
/// println!("{}", differences.report());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    offset: i32,
    output_range: f32,
    threshold: f32,
    limit_n: Option<usize>,
    limit_z: Option<usize>,
    #[serde(skip)]
    disable_progress: bool,
}

impl Default for Comparison {
    fn default() -> Self {
        Self {
            offset: 0,
            output_range: 1.0,
            threshold: 0.0,
            limit_n: None,
            limit_z: None,
            disable_progress: false,
        }
    }
}

impl Comparison {
    /// Just calls Default::default(), nothing special to be initialised
    pub fn new() -> Self {
        Default::default()
    }

    /// Setter for the timestep offset applied to the first series
    pub fn set_offset(&mut self, offset: i32) {
        self.offset = offset;
    }

    /// Setter for the symmetric colour scale of rendered differences
    pub fn set_output_range(&mut self, output_range: f32) {
        self.output_range = output_range;
    }

    /// Setter for the significance threshold
    ///
    /// A pair is emitted if any difference is at least `threshold` or at
    /// most `-threshold`.
    pub fn set_threshold(&mut self, threshold: f32) {
        self.threshold = threshold;
    }

    /// Limit the compared columns (N) and rows (Z)
    ///
    /// Limits larger than the grid have no effect.
    pub fn set_limits(&mut self, limit_n: Option<usize>, limit_z: Option<usize>) {
        self.limit_n = limit_n;
        self.limit_z = limit_z;
    }

    /// Do not print the progress indicators
    pub fn disable_progress(&mut self) {
        self.disable_progress = true;
    }

    /// Timestep offset
    pub fn offset(&self) -> i32 {
        self.offset
    }

    /// Colour scale half width
    pub fn output_range(&self) -> f32 {
        self.output_range
    }

    /// Significance threshold
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Column and row limits, if any
    pub fn limits(&self) -> (Option<usize>, Option<usize>) {
        (self.limit_n, self.limit_z)
    }

    /// Effective `(dim_n, dim_z)` compared for grids of this header
    pub fn effective_dimensions(&self, header: SeriesHeader) -> Result<(usize, usize)> {
        let (dim_n, dim_z) = header.shape()?;
        Ok((
            self.limit_n.map_or(dim_n, |l| l.min(dim_n)),
            self.limit_z.map_or(dim_z, |l| l.min(dim_z)),
        ))
    }

    /// Open two binary series files and prepare their differences
    ///
    /// Both headers are read and checked before any record is decoded, so
    /// mismatched dimensions fail without reading the rest of either file.
    pub fn compare_files<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        path_1: P,
        path_2: Q,
    ) -> Result<Differences> {
        let (path_1, path_2) = (path_1.as_ref(), path_2.as_ref());
        let reader_1 = open_series(path_1)?;
        let reader_2 = open_series(path_2)?;

        info!("Series 1: {} ({})", reader_1.header(), path_1.display());
        info!("Series 2: {} ({})", reader_2.header(), path_2.display());

        if reader_1.header() != reader_2.header() {
            return Err(Error::HeaderMismatch {
                name_1: path_1.display().to_string(),
                header_1: reader_1.header(),
                name_2: path_2.display().to_string(),
                header_2: reader_2.header(),
            });
        }

        let series_1 = reader_1.into_series()?;
        let series_2 = reader_2.into_series()?;
        info!(
            "Read {} and {} timesteps",
            series_1.len(),
            series_2.len()
        );

        self.compare(series_1, series_2)
    }

    /// Prepare the differences between two series already in memory
    pub fn compare(&self, series_1: Series, series_2: Series) -> Result<Differences> {
        if series_1.header != series_2.header {
            return Err(Error::HeaderMismatch {
                name_1: "series 1".into(),
                header_1: series_1.header,
                name_2: "series 2".into(),
                header_2: series_2.header,
            });
        }

        if series_1.is_empty() {
            warn!("Series 1 has no timesteps, nothing to compare");
        }

        let limits = self.effective_dimensions(series_1.header)?;
        debug!(
            "Comparing {} x {} cells, offset {}, limits ({}, {})",
            limits.0,
            limits.1,
            self.offset,
            self.limit_n.display(),
            self.limit_z.display()
        );

        let progress = Progress::new(series_1.len(), self.disable_progress)?;

        Ok(Differences {
            options: self.clone(),
            series_1,
            series_2,
            limits,
            cursor: 0,
            extrema: Extrema::default(),
            progress,
            failure: None,
            finished: false,
            isotopes: Vec::new(),
        })
    }
}

/// Open a series file, reading only the header
fn open_series(path: &Path) -> Result<SeriesReader<BufReader<File>>> {
    let file = File::open(path).map_err(|source| Error::OpenFailure {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(SeriesReader::new(BufReader::new(file))?)
}

/// Lazy sequence of significant differences between two series
///
/// Records of the first series are processed in order, and each is either
/// skipped or yields one [DiffResult]. The running [Extrema] and counters are
/// kept up to date as the iterator advances, and [Differences::report()] can
/// be called at any point.
#[derive(Debug)]
pub struct Differences {
    options: Comparison,
    series_1: Series,
    series_2: Series,
    limits: (usize, usize),
    cursor: usize,
    extrema: Extrema,
    progress: Progress,
    failure: Option<Error>,
    finished: bool,
    isotopes: Vec<ReferenceIsotope>,
}

impl Differences {
    /// Running extrema over every matched pair processed so far
    pub fn extrema(&self) -> Extrema {
        self.extrema
    }

    /// Reference isotopes to mark on every rendered frame
    pub fn with_isotopes(mut self, isotopes: Vec<ReferenceIsotope>) -> Self {
        self.isotopes = isotopes;
        self
    }

    /// Effective `(dim_n, dim_z)` of every difference grid
    pub fn limits(&self) -> (usize, usize) {
        self.limits
    }

    /// Summary of everything processed so far
    pub fn report(&self) -> Report {
        Report {
            options: self.options.clone(),
            tally: self.progress.tally,
            extrema: self.extrema,
            truncated_inputs: (self.series_1.truncated, self.series_2.truncated),
            elapsed_seconds: self.progress.elapsed().as_secs_f64(),
        }
    }

    /// Render every remaining difference as a frame in `out_dir`
    ///
    /// Frames use the symmetric `output_range` colour scale and are annotated
    /// with the timestep and the running extrema. Any isotopes given to
    /// [Differences::with_isotopes()] are marked where they fit on the grid.
    pub fn render_into<R: Renderer, P: AsRef<Path>>(
        mut self,
        renderer: &mut R,
        out_dir: P,
    ) -> Result<Report> {
        let output_range = self.options.output_range;
        while let Some(result) = self.next() {
            let frame = Frame::difference(&result, output_range, out_dir.as_ref())
                .mark_isotopes(&self.isotopes);
            renderer.render(&frame)?;
        }

        if let Some(e) = self.failure.take() {
            return Err(e);
        }

        let report = self.report();
        info!("{report}");
        Ok(report)
    }

    /// Any error that ended the iteration early
    pub fn take_failure(&mut self) -> Option<Error> {
        self.failure.take()
    }
}

impl Iterator for Differences {
    type Item = DiffResult;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        while let Some(record_1) = self.series_1.records.get(self.cursor) {
            self.cursor += 1;

            let outcome = match find_match(
                record_1.timestep,
                self.options.offset,
                &self.series_2.records,
            ) {
                Some(record_2) => {
                    self.progress.tally.matched += 1;
                    compare_pair(
                        record_1,
                        record_2,
                        self.limits,
                        self.options.threshold,
                        &mut self.extrema,
                    )
                }
                None => Ok(Outcome::Unmatched),
            };

            let outcome = match outcome {
                Ok(o) => o,
                Err(e) => {
                    self.failure = Some(e);
                    self.finished = true;
                    return None;
                }
            };

            if let Outcome::Emitted(_) = outcome {
                self.progress.tally.rendered += 1;
            }
            self.progress.step(&self.extrema);

            match outcome {
                Outcome::Emitted(result) => return Some(result),
                Outcome::Unmatched => {
                    debug!("No match for timestep {}", record_1.timestep)
                }
                Outcome::Undefined | Outcome::Filtered => (),
            }
        }

        self.finished = true;
        None
    }
}

impl std::iter::FusedIterator for Differences {}
