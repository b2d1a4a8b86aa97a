//! Read operations for reference isotope tables

// standard library
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

// crate modules
use crate::error::{Error, Result};
use crate::isotope::ReferenceIsotope;
use crate::parsers::{isotope_line, MIN_TOKENS};

// nucdiff modules
use nucdiff_utils::{f, StringExt};

// external crates
use log::{info, warn};

/// Read a reference isotope table from a file
///
/// One isotope per line as `<Z> <name> <A> <abundance>`. Lines that can not be
/// understood are logged and skipped.
///
/// ```rust, no_run
/// # use nucdiff_isotopes::read_isotopes;
/// let isotopes = read_isotopes("path/to/stable_isotopes.txt").unwrap();
/// for isotope in &isotopes {
///     println!("{} at Z={}, N={}", isotope.label(), isotope.proton_number, isotope.neutron_number);
/// }
/// ```
pub fn read_isotopes<P: AsRef<Path>>(path: P) -> Result<Vec<ReferenceIsotope>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        Error::IOError(std::io::Error::new(
            e.kind(),
            f!("unable to open {}: {e}", path.display()),
        ))
    })?;

    let isotopes = parse_isotopes(BufReader::new(file))?;
    info!("Read {} reference isotopes from {}", isotopes.len(), path.display());
    Ok(isotopes)
}

/// Parse a reference isotope table from any buffered reader
///
/// ```rust
/// # use nucdiff_isotopes::parse_isotopes;
/// let text = "1 h 1 0.999885\n2 he 4 0.999998\n";
/// let isotopes = parse_isotopes(text.as_bytes()).unwrap();
///
/// assert_eq!(isotopes[1].name, "He");
/// assert_eq!(isotopes[1].neutron_number, 2);
/// ```
pub fn parse_isotopes<R: BufRead>(reader: R) -> Result<Vec<ReferenceIsotope>> {
    let mut isotopes = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = index + 1;

        if line.trim().is_empty() {
            continue;
        }

        match parse_line(&line) {
            Ok(isotope) => isotopes.push(isotope),
            Err(e) => warn!("Skipping isotope line {line_number}: {e}"),
        }
    }

    Ok(isotopes)
}

/// Turn a single non-empty line into a [ReferenceIsotope]
fn parse_line(line: &str) -> Result<ReferenceIsotope> {
    let tokens = line.split_whitespace().count();
    if tokens < MIN_TOKENS {
        return Err(Error::ParseError(f!(
            "expected {MIN_TOKENS} columns, found {tokens} in \"{}\"",
            line.trim()
        )));
    }

    let (_, (proton_number, name, mass_number, abundance)) = isotope_line(line)
        .map_err(|_| Error::ParseError(f!("invalid values in \"{}\"", line.trim())))?;

    let neutron_number = mass_number.checked_sub(proton_number).ok_or_else(|| {
        Error::ParseError(f!("neutron number out of range in \"{}\"", line.trim()))
    })?;

    Ok(ReferenceIsotope {
        proton_number,
        neutron_number,
        name: name.capitalise(),
        abundance,
    })
}

/// Write a list of isotopes to a JSON file
pub fn write_json<P: AsRef<Path>>(isotopes: &[ReferenceIsotope], path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| {
        Error::IOError(std::io::Error::new(
            e.kind(),
            f!("unable to create {}: {e}", path.display()),
        ))
    })?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, isotopes)?;
    writer.flush()?;
    Ok(())
}
