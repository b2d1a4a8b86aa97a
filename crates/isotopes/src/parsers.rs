//! Parser combinators for reference isotope lines

// nom parser combinators
use nom::bytes::complete::is_not;
use nom::character::complete::{space0, space1};
use nom::number::complete::double;
use nom::sequence::tuple;
use nom::IResult;

/// Minimum number of whitespace separated tokens on an isotope line
pub const MIN_TOKENS: usize = 4;

/// Columns of an isotope line, `(proton_number, name, mass_number, abundance)`
///
/// Anything after the abundance is ignored.
///
/// ```rust
/// # use nucdiff_isotopes::parsers::isotope_line;
/// let (_, columns) = isotope_line("  2  he   4   0.25  stable").unwrap();
/// assert_eq!(columns, (2, "he", 4, 0.25));
/// ```
pub fn isotope_line(i: &str) -> IResult<&str, (i32, &str, i32, f64)> {
    let (i, (_, proton_number, _, name, _, mass_number, _, abundance)) = tuple((
        space0,
        nom::character::complete::i32,
        space1,
        is_not(" \t\r\n"),
        space1,
        nom::character::complete::i32,
        space1,
        double,
    ))(i)?;

    Ok((i, (proton_number, name, mass_number, abundance)))
}
