//! Library of parser functions for the text block format
//!
//! ```text
//! timestep      3   time(s)  0.184731E-01   temperature(GK) 0.100000E+02 ...
//! 0     1    0.899782E+00
//! 1     1    0.997817E-01
//! 1     2    0.436210E-03
//! ```

// nom parser combinators
use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::{i32 as int32, space0, space1};
use nom::combinator::eof;
use nom::number::complete::double;
use nom::sequence::{terminated, tuple};
use nom::IResult;

/// Literal token that opens a new block
pub const BLOCK_TAG: &str = "timestep";

// ! Boolean checks
/// Check for a line starting with the `timestep` tag
///
/// This is a plain prefix match on the untrimmed line, so indented lines are
/// never treated as a header.
pub fn is_block_header(i: &str) -> bool {
    block_tag(i).is_ok()
}

/// Check for at least three whitespace separated tokens
///
/// Anything shorter is noise from the network output and is skipped.
pub fn has_data_columns(i: &str) -> bool {
    i.split_whitespace().nth(2).is_some()
}

// ! Parser combinators

/// Block index from the second whitespace separated token of a header
///
/// ```rust
/// # use nucdiff_series::parsers::block_index;
/// assert_eq!(block_index("timestep      3   time(s)  0.184731E-01"), Some(3));
/// assert_eq!(block_index("timestep"), None);
/// assert_eq!(block_index("timestep  x"), None);
/// ```
pub fn block_index(i: &str) -> Option<i32> {
    i.split_whitespace().nth(1)?.parse().ok()
}

/// Parse a data line into `(proton_number, mass_number, raw_abundance)`
///
/// Only the first three columns matter, any others are left in the remaining
/// input. Every column must be a complete token, so `1.0` is not accepted as
/// an integer and `3.0x` is not accepted as an abundance.
pub fn data_line(i: &str) -> IResult<&str, (i32, i32, f64)> {
    let (i, (_, proton, _, mass, _)) = tuple((space0, int32, space1, int32, space1))(i)?;
    let (i, abundance) = terminated(double, alt((space1, eof)))(i)?;
    Ok((i, (proton, mass, abundance)))
}

fn block_tag(i: &str) -> IResult<&str, &str> {
    tag(BLOCK_TAG)(i)
}
