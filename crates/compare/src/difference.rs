//! Cell-wise differences between matched records

// crate modules
use crate::error::Result;

// nucdiff modules
use nucdiff_series::{Grid, GridRecord};
use nucdiff_utils::{round_to, SliceExt};

// external crates
use log::warn;
use serde::Serialize;

/// Running extrema over every difference grid seen so far
///
/// Both bounds start at zero and are only ever widened, so the maximum is
/// never negative and the minimum is never positive.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
pub struct Extrema {
    /// Largest difference seen, at least zero
    pub max: f32,
    /// Smallest difference seen, at most zero
    pub min: f32,
}

impl Extrema {
    /// Widen the bounds to include `min` and `max`
    ///
    /// ```rust
    /// # use nucdiff_compare::Extrema;
    /// let mut extrema = Extrema::default();
    /// extrema.include(0.5, 2.0);
    /// extrema.include(-1.0, 1.0);
    ///
    /// assert_eq!(extrema, Extrema { max: 2.0, min: -1.0 });
    /// ```
    pub fn include(&mut self, min: f32, max: f32) {
        self.max = self.max.max(max);
        self.min = self.min.min(min);
    }
}

/// One emitted comparison between matched timesteps
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiffResult {
    /// Timestep from the first series
    pub timestep: i32,
    /// Timestep from the second series it was matched against
    pub matched_timestep: i32,
    /// `series_2 - series_1`, clipped to the comparison limits
    pub diff: Grid,
    /// Largest value in this difference grid
    pub max: f32,
    /// Smallest value in this difference grid
    pub min: f32,
    /// Running extrema including this difference
    pub extrema: Extrema,
}

impl DiffResult {
    /// Frame name used for rendering, e.g. `diff_00042.png`
    ///
    /// ```rust
    /// # use nucdiff_compare::{DiffResult, Extrema};
    /// # use nucdiff_series::Grid;
    /// let result = DiffResult {
    ///     timestep: 42,
    ///     matched_timestep: 42,
    ///     diff: Grid::filled(1, 1, 0.0),
    ///     max: 0.0,
    ///     min: 0.0,
    ///     extrema: Extrema::default(),
    /// };
    /// assert_eq!(result.frame_name(), "diff_00042.png");
    /// ```
    pub fn frame_name(&self) -> String {
        format!("diff_{:05}.png", self.timestep)
    }

    /// Annotation text for the frame, with the running extrema to 4 places
    pub fn annotation(&self) -> String {
        format!(
            "timestep: {}\nmax diff: {}\nmin diff: {}",
            self.timestep,
            round_to(self.extrema.max as f64, 4),
            round_to(self.extrema.min as f64, 4)
        )
    }
}

/// What happened when a record from the first series was processed
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Outcome {
    /// No timestep in the second series matched
    Unmatched,
    /// Matched, but the difference had no finite values to compare
    Undefined,
    /// Matched, but every difference was inside the threshold
    Filtered,
    /// Matched and significant enough to keep
    Emitted(DiffResult),
}

/// Subtract two grids cell by cell as `grid_2 - grid_1`
///
/// Only the lower corner `[..dim_z, ..dim_n]` is compared, further limited to
/// whatever both grids actually hold.
///
/// ```rust
/// # use nucdiff_compare::difference;
/// # use nucdiff_series::Grid;
/// let grid_1 = Grid::from_values(2, 2, vec![-1.0, -2.0, -3.0, -4.0]).unwrap();
/// let grid_2 = Grid::from_values(2, 2, vec![-1.5, -2.0, -2.0, -4.0]).unwrap();
///
/// let diff = difference(&grid_1, &grid_2, 2, 1).unwrap();
/// assert_eq!(diff.values(), &[-0.5, 0.0]);
/// ```
pub fn difference(grid_1: &Grid, grid_2: &Grid, dim_n: usize, dim_z: usize) -> Result<Grid> {
    let dim_n = dim_n.min(grid_1.dim_n()).min(grid_2.dim_n());
    let dim_z = dim_z.min(grid_1.dim_z()).min(grid_2.dim_z());

    let mut values = Vec::with_capacity(dim_n * dim_z);
    if dim_n > 0 {
        for (row_1, row_2) in grid_1.rows().zip(grid_2.rows()).take(dim_z) {
            values.extend(
                row_1[..dim_n]
                    .iter()
                    .zip(&row_2[..dim_n])
                    .map(|(a, b)| b - a),
            );
        }
    }

    Ok(Grid::from_values(dim_n, dim_z, values)?)
}

/// Find the first record of `candidates` at `timestep + offset`
///
/// An offset that overflows the timestep can never match.
pub(crate) fn find_match(
    timestep: i32,
    offset: i32,
    candidates: &[GridRecord],
) -> Option<&GridRecord> {
    let target = timestep.checked_add(offset)?;
    candidates.iter().find(|r| r.timestep == target)
}

/// Difference a matched pair, update the running extrema, and apply the
/// significance threshold
pub(crate) fn compare_pair(
    record_1: &GridRecord,
    record_2: &GridRecord,
    limits: (usize, usize),
    threshold: f32,
    extrema: &mut Extrema,
) -> Result<Outcome> {
    let diff = difference(&record_1.grid, &record_2.grid, limits.0, limits.1)?;

    let (min, max) = match diff.values().try_extrema() {
        Ok(bounds) => bounds,
        Err(e) => {
            warn!(
                "Timesteps {} and {} have no comparable values ({e}), skipping",
                record_1.timestep, record_2.timestep
            );
            return Ok(Outcome::Undefined);
        }
    };

    extrema.include(min, max);

    if max >= threshold || min <= -threshold {
        Ok(Outcome::Emitted(DiffResult {
            timestep: record_1.timestep,
            matched_timestep: record_2.timestep,
            diff,
            max,
            min,
            extrema: *extrema,
        }))
    } else {
        Ok(Outcome::Filtered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(timestep: i32, values: Vec<f32>) -> GridRecord {
        GridRecord::new(timestep, Grid::from_values(2, 2, values).unwrap())
    }

    #[test]
    fn first_match_wins() {
        let candidates = vec![
            record(15, vec![1.0; 4]),
            record(15, vec![2.0; 4]),
            record(20, vec![3.0; 4]),
        ];

        let found = find_match(10, 5, &candidates).unwrap();
        assert_eq!(found.grid.values(), &[1.0; 4]);
        assert!(find_match(10, 4, &candidates).is_none());
    }

    #[test]
    fn overflowing_offset_never_matches() {
        let candidates = vec![record(i32::MIN, vec![0.0; 4])];
        assert!(find_match(i32::MAX, 1, &candidates).is_none());
    }

    #[test]
    fn difference_is_clipped_to_limits() {
        let grid_1 = Grid::filled(4, 3, -2.0);
        let grid_2 = Grid::filled(4, 3, -1.0);

        let diff = difference(&grid_1, &grid_2, 2, 10).unwrap();
        assert_eq!(diff.shape(), (2, 3));
        assert!(diff.values().iter().all(|v| *v == 1.0));

        let diff = difference(&grid_1, &grid_2, 0, 3).unwrap();
        assert_eq!(diff.shape(), (0, 3));
        assert!(diff.values().is_empty());
    }

    #[test]
    fn identical_grids_are_filtered_by_positive_threshold() {
        let mut extrema = Extrema::default();
        let a = record(0, vec![-1.0, -2.0, -3.0, -4.0]);

        let outcome = compare_pair(&a, &a, (2, 2), 0.1, &mut extrema).unwrap();
        assert_eq!(outcome, Outcome::Filtered);
        assert_eq!(extrema, Extrema::default());
    }

    #[test]
    fn identical_grids_are_emitted_at_zero_threshold() {
        let mut extrema = Extrema::default();
        let a = record(0, vec![-1.0, -2.0, -3.0, -4.0]);

        let outcome = compare_pair(&a, &a, (2, 2), 0.0, &mut extrema).unwrap();
        assert!(matches!(outcome, Outcome::Emitted(r) if r.max == 0.0 && r.min == 0.0));
    }

    #[test]
    fn threshold_applies_to_either_sign() {
        let a = record(0, vec![0.0; 4]);
        let up = record(0, vec![0.0, 0.0, 0.0, 0.5]);
        let down = record(0, vec![0.0, -0.5, 0.0, 0.0]);

        let mut extrema = Extrema::default();
        let outcome = compare_pair(&a, &up, (2, 2), 0.5, &mut extrema).unwrap();
        assert!(matches!(outcome, Outcome::Emitted(_)));

        let outcome = compare_pair(&a, &down, (2, 2), 0.5, &mut extrema).unwrap();
        assert!(matches!(outcome, Outcome::Emitted(_)));

        let outcome = compare_pair(&a, &up, (2, 2), 0.6, &mut extrema).unwrap();
        assert_eq!(outcome, Outcome::Filtered);

        // filtered pairs still widen the extrema
        assert_eq!(extrema, Extrema { max: 0.5, min: -0.5 });
    }

    #[test]
    fn empty_difference_is_undefined() {
        let mut extrema = Extrema::default();
        let a = record(0, vec![0.0; 4]);

        let outcome = compare_pair(&a, &a, (0, 0), 0.0, &mut extrema).unwrap();
        assert_eq!(outcome, Outcome::Undefined);
    }

    #[test]
    fn non_finite_difference_is_undefined() {
        let mut extrema = Extrema::default();
        let a = record(0, vec![0.0; 4]);
        let b = record(0, vec![f32::NAN, 0.0, 0.0, 1.0]);

        let outcome = compare_pair(&a, &b, (2, 2), 0.0, &mut extrema).unwrap();
        assert_eq!(outcome, Outcome::Undefined);
        assert_eq!(extrema, Extrema::default());
    }

    #[test]
    fn annotation_is_rounded() {
        let result = DiffResult {
            timestep: 7,
            matched_timestep: 7,
            diff: Grid::filled(1, 1, 0.0),
            max: 0.0,
            min: 0.0,
            extrema: Extrema {
                max: 0.123456,
                min: -2.0,
            },
        };
        assert_eq!(
            result.annotation(),
            "timestep: 7\nmax diff: 0.1235\nmin diff: -2"
        );
    }
}
