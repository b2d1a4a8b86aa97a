//! Progress reporting and remaining time estimates for a comparison

// standard library
use std::time::{Duration, Instant};

// crate modules
use crate::difference::Extrema;
use crate::error::{Error, Result};

// nucdiff modules
use nucdiff_utils::f;

// external crates
use kdam::{Bar, BarBuilder, BarExt};
use log::debug;
use serde::Serialize;

/// Estimates are unreliable until this many differences have been rendered
pub const ESTIMATE_AFTER: usize = 20;

/// Running counts for a comparison
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Tally {
    /// Records in the first series
    pub records: usize,
    /// Records of the first series processed so far
    pub processed: usize,
    /// Records with a matching timestep in the second series
    pub matched: usize,
    /// Differences emitted after the threshold was applied
    pub rendered: usize,
}

impl Tally {
    /// Projected number of differences that will be emitted in total
    ///
    /// Assumes every remaining record will be emitted, so this only shrinks as
    /// records are skipped.
    pub fn projected(&self) -> usize {
        self.records
            .saturating_sub(self.processed.saturating_sub(self.rendered))
    }
}

/// Estimate the time remaining from the average time per emitted difference
///
/// No estimate is given until more than [ESTIMATE_AFTER] differences have
/// been emitted.
///
/// ```rust
/// # use nucdiff_compare::{estimate_remaining, Tally};
/// # use std::time::Duration;
/// let mut tally = Tally { records: 100, processed: 40, matched: 40, rendered: 32 };
///
/// // 92 projected, 32 done in 32 seconds, 60 to go at 1s each
/// let remaining = estimate_remaining(Duration::from_secs(32), &tally).unwrap();
/// assert_eq!(remaining.as_secs(), 60);
///
/// tally.rendered = 20;
/// assert!(estimate_remaining(Duration::from_secs(50), &tally).is_none());
/// ```
pub fn estimate_remaining(elapsed: Duration, tally: &Tally) -> Option<Duration> {
    if tally.rendered <= ESTIMATE_AFTER {
        return None;
    }

    let ratio = tally.projected() as f64 / tally.rendered as f64 - 1.0;
    Some(Duration::from_secs_f64(elapsed.as_secs_f64() * ratio.max(0.0)))
}

/// Progress bar and counters for a comparison in progress
pub(crate) struct Progress {
    pub(crate) tally: Tally,
    start: Instant,
    bar: Bar,
}

impl std::fmt::Debug for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Progress")
            .field("tally", &self.tally)
            .field("start", &self.start)
            .finish_non_exhaustive()
    }
}

impl Progress {
    pub(crate) fn new(records: usize, disable: bool) -> Result<Self> {
        let bar = BarBuilder::default()
            .total(records)
            .desc("Comparing")
            .unit(" timesteps")
            .disable(disable)
            .build()
            .map_err(|e| Error::ProgressBar(f!("{e:?}")))?;

        Ok(Self {
            tally: Tally {
                records,
                ..Default::default()
            },
            start: Instant::now(),
            bar,
        })
    }

    pub(crate) fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Advance by one processed record and refresh the postfix
    pub(crate) fn step(&mut self, extrema: &Extrema) {
        self.tally.processed += 1;

        let elapsed = self.elapsed();
        let remaining = match estimate_remaining(elapsed, &self.tally) {
            Some(r) => f!(", remaining: {}s", r.as_secs()),
            None => String::new(),
        };

        self.bar.set_postfix(f!(
            "elapsed: {}s{remaining}, diff = ({:.4}, {:.4})",
            elapsed.as_secs(),
            extrema.min,
            extrema.max
        ));

        // a broken terminal should not stop the comparison
        if let Err(e) = self.bar.update(1) {
            debug!("Progress bar update failed: {e}");
        }
    }
}
