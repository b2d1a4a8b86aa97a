//! Reference isotope tables for annotating nuclide charts
//!
//! A small list of isotopes, typically the stable ones, is read from a plain
//! text table so that a renderer can mark them on the `(Z, N)` grid.
//!
//! ```text
//! 1   h    1   0.999885
//! 2   he   4   0.999998
//! 26  fe   56  0.917540
//! ```
//!
//! Columns are the proton number, element name, mass number, and abundance.
//! Anything after the fourth column is ignored. Lines that are too short or
//! have invalid numbers are logged and skipped rather than failing the read.
//!
//! ```rust, no_run
//! # use nucdiff_isotopes::{find_isotope, read_isotopes};
//! let isotopes = read_isotopes("path/to/stable_isotopes.txt").unwrap();
//!
//! if let Some(isotope) = find_isotope(&isotopes, 26, 30) {
//!     println!("{}", isotope.label());
//! }
//! ```

mod error;
mod isotope;
pub mod parsers;
mod reader;

pub use error::{Error, Result};
pub use isotope::{find_isotope, ReferenceIsotope};
pub use reader::{parse_isotopes, read_isotopes, write_json};
