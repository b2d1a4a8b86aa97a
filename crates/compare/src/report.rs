//! Summary of a completed comparison

// standard library
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

// crate modules
use crate::comparison::Comparison;
use crate::difference::Extrema;
use crate::error::{Error, Result};
use crate::progress::Tally;

// nucdiff modules
use nucdiff_utils::f;

// external crates
use serde::Serialize;

/// Final counts and extrema of a comparison
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// Options the comparison was run with
    pub options: Comparison,
    /// Record counts
    pub tally: Tally,
    /// Running extrema over every matched pair
    pub extrema: Extrema,
    /// Whether each input series ended in a partial record
    pub truncated_inputs: (bool, bool),
    /// Wall time in seconds
    pub elapsed_seconds: f64,
}

impl Report {
    /// True if not a single timestep could be matched
    pub fn is_degenerate(&self) -> bool {
        self.tally.matched == 0
    }

    /// Write the report to a JSON file
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| {
            Error::IOError(std::io::Error::new(
                e.kind(),
                f!("unable to create {}: {e}", path.display()),
            ))
        })?;

        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, "Comparison summary")?;
        writeln!(f, "  timesteps   : {}", self.tally.records)?;
        writeln!(f, "  matched     : {}", self.tally.matched)?;
        writeln!(f, "  rendered    : {}", self.tally.rendered)?;
        writeln!(f, "  max diff    : {}", self.extrema.max)?;
        writeln!(f, "  min diff    : {}", self.extrema.min)?;
        writeln!(f, "  offset      : {}", self.options.offset())?;
        writeln!(f, "  threshold   : {}", self.options.threshold())?;
        write!(f, "  elapsed     : {:.2}s", self.elapsed_seconds)?;

        match self.truncated_inputs {
            (false, false) => Ok(()),
            (t1, t2) => write!(f, "\n  truncated   : series 1 {t1}, series 2 {t2}"),
        }
    }
}
