//! Timestep aligned comparison of binary abundance series
//!
//! Two series written by `nucdiff-series` are compared record by record. Each
//! timestep of the first series is matched against the second series at
//! `timestep + offset`, and the cell-wise difference of the log10 abundances
//! is taken over the grid.
//!
//! ## Quickstart example
//!
//! ```rust, no_run
//! # use nucdiff_compare::Comparison;
//! let mut comparison = Comparison::new();
//! comparison.set_threshold(0.05);
//!
//! let mut differences = comparison
//!     .compare_files("path/to/XTime_ref.dat", "path/to/XTime_new.dat")
//!     .unwrap();
//!
//! for result in differences.by_ref() {
//!     println!("{} -> {}", result.frame_name(), result.max);
//! }
//!
//! println!("{}", differences.report());
//! ```
//!
//! ## Core concepts
//!
//! - Both series must share the same header, checked before any records are
//!   read
//! - The first record of the second series with a matching timestep is used,
//!   and records without a match are skipped
//! - [Extrema] start at zero and only ever widen, including for pairs that
//!   fall under the threshold
//! - A pair is emitted as a [DiffResult] if any difference is at least the
//!   threshold in magnitude
//!
//! Drawing and animation are handled by implementations of the [Renderer]
//! and [Animator] traits, given [Frame]s describing what to draw.

// Split into subfiles for development, but anything important is re-exported
mod comparison;
mod difference;
mod error;
mod progress;
mod render;
mod report;

// inline important components
pub use crate::comparison::{Comparison, Differences};
pub use crate::difference::{difference, DiffResult, Extrema};
pub use crate::error::{Error, Result};
pub use crate::progress::{estimate_remaining, Tally, ESTIMATE_AFTER};
pub use crate::render::{
    animate_directory, frame_rate, select_frames, Animator, Frame, Marker, Renderer, AXIS_LABELS,
};
pub use crate::report::Report;
