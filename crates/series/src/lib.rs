//! Block parsing, grid assembly, and binary codec for abundance time series
//!
//! Reaction network runs dump isotope abundances as blocks of text, one block
//! per timestep. This crate turns those dumps into a compact binary series of
//! dense grids, and reads them back again.
//!
//! ## Quickstart example
//!
//! ```rust, no_run
//! # use nucdiff_series::{read_series_file, Converter};
//! // Convert a text dump onto the default 120 x 120 grid
//! let converter = Converter::new();
//! converter.convert("path/to/XTime_run.txt", "path/to/XTime_run.dat").unwrap();
//!
//! // Read the binary series back for analysis
//! let series = read_series_file("path/to/XTime_run.dat").unwrap();
//! println!("{series}");
//! ```
//!
//! ## Core concepts
//!
//! The text format is a sequence of blocks, each opened by a `timestep` line
//! with the block index as the second column.
//!
//! ```text
//! timestep      3   time(s)  0.184731E-01   temperature(GK) 0.100000E+02
//! 0     1    0.899782E+00
//! 1     1    0.997817E-01
//! 1     2    0.436210E-03
//! ```
//!
//! Data lines are `<Z> <A> <abundance>`. [Blocks] yields each block lazily as
//! a list of [SparseTriple]s with the neutron number `N = A - Z` and the
//! log10 abundance. Non-positive abundances are given the [SENTINEL] value.
//!
//! [assemble()] maps a block onto a dense [Grid] indexed by `(Z, N)`, with
//! every cell that has no data left as the [SENTINEL]. Isotopes outside the
//! grid are dropped.
//!
//! ## Binary format
//!
//! ```text
//! <dim_n: i32> <dim_z: i32>
//! <timestep: i32> <dim_z * dim_n f32 values, z-major>
//! ...
//! ```
//!
//! Everything is little endian with no padding and no record count. The header
//! dimensions are authoritative for reading. A partial record at the end of a
//! file is reported with a warning and dropped, keeping everything before it.

// Split into subfiles for development, but anything important is re-exported
mod assemble;
mod blocks;
mod convert;
mod error;
mod grid;
pub mod parsers;
mod reader;
mod writer;

// Inline anything important for a nice public API
#[doc(inline)]
pub use assemble::assemble;

#[doc(inline)]
pub use blocks::{Block, Blocks, SparseTriple};

#[doc(inline)]
pub use convert::{binary_path, ConversionSummary, Converter};

#[doc(inline)]
pub use grid::{Grid, GridRecord, Series, SeriesHeader, SENTINEL};

#[doc(inline)]
pub use reader::{read_header, read_series_file, SeriesReader};

#[doc(inline)]
pub use writer::{write_ascii_pretty, write_json, write_series_file, SeriesWriter};

#[doc(inline)]
pub use error::{Error, Result};
