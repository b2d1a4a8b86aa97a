//! Interfaces to the plotting and animation collaborators
//!
//! Drawing heatmaps and encoding video are left to whatever implements
//! [Renderer] and [Animator]. This module only decides what goes into each
//! frame and which frames make up an animation.

// standard library
use std::path::{Path, PathBuf};

// crate modules
use crate::difference::DiffResult;
use crate::error::Result;

// nucdiff modules
use nucdiff_isotopes::ReferenceIsotope;
use nucdiff_series::{Grid, GridRecord, SENTINEL};

/// Axis labels for every frame, columns then rows
pub const AXIS_LABELS: (&str, &str) = ("N", "Z");

/// Labelled cell drawn over a frame, such as a stable isotope
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    /// Row of the cell
    pub z: usize,
    /// Column of the cell
    pub n: usize,
    /// Text drawn at the cell, e.g. `Fe56`
    pub label: String,
}

/// Everything needed to draw one heatmap
#[derive(Debug, Clone, PartialEq)]
pub struct Frame<'a> {
    /// Grid to draw, rows of increasing Z
    pub values: &'a Grid,
    /// Column and row axis labels
    pub labels: (&'static str, &'static str),
    /// Colour scale `(low, high)`
    pub scale: (f32, f32),
    /// Text drawn onto the frame, if any
    pub annotation: Option<String>,
    /// Cells to highlight, empty for none
    pub markers: Vec<Marker>,
    /// Where the image should be saved
    pub path: PathBuf,
}

impl<'a> Frame<'a> {
    /// Frame for a difference grid on a symmetric `±output_range` scale
    ///
    /// ```rust
    /// # use nucdiff_compare::{DiffResult, Extrema, Frame};
    /// # use nucdiff_series::Grid;
    /// # use std::path::Path;
    /// let result = DiffResult {
    ///     timestep: 3,
    ///     matched_timestep: 8,
    ///     diff: Grid::filled(2, 2, 0.25),
    ///     max: 0.25,
    ///     min: 0.25,
    ///     extrema: Extrema { max: 0.25, min: 0.0 },
    /// };
    ///
    /// let frame = Frame::difference(&result, 0.5, Path::new("frames"));
    /// assert_eq!(frame.scale, (-0.5, 0.5));
    /// assert_eq!(frame.path, Path::new("frames/diff_00003.png"));
    /// ```
    pub fn difference(result: &'a DiffResult, output_range: f32, out_dir: &Path) -> Self {
        Self {
            values: &result.diff,
            labels: AXIS_LABELS,
            scale: (-output_range, output_range),
            annotation: Some(result.annotation()),
            markers: Vec::new(),
            path: out_dir.join(result.frame_name()),
        }
    }

    /// Frame for the log10 abundances of a single record
    pub fn abundance(record: &'a GridRecord, out_dir: &Path) -> Self {
        Self {
            values: &record.grid,
            labels: AXIS_LABELS,
            scale: (SENTINEL, 0.0),
            annotation: None,
            markers: Vec::new(),
            path: out_dir.join(format!("abundance_{:05}.png", record.timestep)),
        }
    }
}

impl Frame<'_> {
    /// Mark every reference isotope that falls inside the grid
    ///
    /// ```rust
    /// # use nucdiff_compare::Frame;
    /// # use nucdiff_isotopes::parse_isotopes;
    /// # use nucdiff_series::GridRecord;
    /// # use nucdiff_series::Grid;
    /// # use std::path::Path;
    /// let isotopes = parse_isotopes("2 he 4 1.0\n26 fe 56 0.9\n".as_bytes()).unwrap();
    /// let record = GridRecord::new(0, Grid::empty(10, 10));
    ///
    /// let frame = Frame::abundance(&record, Path::new(".")).mark_isotopes(&isotopes);
    /// assert_eq!(frame.markers.len(), 1);
    /// assert_eq!(frame.markers[0].label, "He4");
    /// ```
    pub fn mark_isotopes(mut self, isotopes: &[ReferenceIsotope]) -> Self {
        let (dim_n, dim_z) = self.values.shape();
        self.markers = isotopes
            .iter()
            .filter_map(|isotope| {
                let (z, n) = isotope.cell()?;
                (z < dim_z && n < dim_n).then(|| Marker {
                    z,
                    n,
                    label: isotope.label(),
                })
            })
            .collect();
        self
    }
}

/// Anything that can draw a [Frame] to an image
pub trait Renderer {
    /// Draw and save the frame to `frame.path`
    fn render(&mut self, frame: &Frame) -> Result<()>;
}

/// Anything that can combine frames into an animation
pub trait Animator {
    /// Combine `frames`, in order, into `output` at `fps` frames per second
    fn assemble(&mut self, frames: &[PathBuf], fps: u32, output: &Path) -> Result<()>;
}

/// Frames per second for a delay between frames, at least 1
///
/// ```rust
/// # use nucdiff_compare::frame_rate;
/// assert_eq!(frame_rate(0.1), 10);
/// assert_eq!(frame_rate(0.3), 3);
/// assert_eq!(frame_rate(2.0), 1);
/// assert_eq!(frame_rate(0.0), 1);
/// ```
pub fn frame_rate(delay: f64) -> u32 {
    if !delay.is_finite() || delay <= 0.0 {
        return 1;
    }
    ((1.0 / delay).floor() as u32).max(1)
}

/// Choose the frames of an animation
///
/// Only `.png` files are kept, sorted by file name, and at most `max_frames`
/// of them.
///
/// ```rust
/// # use nucdiff_compare::select_frames;
/// # use std::path::PathBuf;
/// let paths = vec![
///     PathBuf::from("out/diff_00010.png"),
///     PathBuf::from("out/notes.txt"),
///     PathBuf::from("out/diff_00002.png"),
///     PathBuf::from("out/diff_00005.png"),
/// ];
///
/// let frames = select_frames(paths, 2);
/// assert_eq!(
///     frames,
///     vec![PathBuf::from("out/diff_00002.png"), PathBuf::from("out/diff_00005.png")]
/// );
/// ```
pub fn select_frames(mut paths: Vec<PathBuf>, max_frames: usize) -> Vec<PathBuf> {
    paths.retain(|p| p.extension().is_some_and(|e| e == "png"));
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    paths.truncate(max_frames);
    paths
}

/// Collect and animate every frame in a directory
pub fn animate_directory<A: Animator, P: AsRef<Path>, Q: AsRef<Path>>(
    animator: &mut A,
    frame_dir: P,
    output: Q,
    delay: f64,
    max_frames: usize,
) -> Result<usize> {
    let paths = std::fs::read_dir(frame_dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;

    let frames = select_frames(paths, max_frames);
    animator.assemble(&frames, frame_rate(delay), output.as_ref())?;
    Ok(frames.len())
}
