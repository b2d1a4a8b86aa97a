// crate modules
use crate::error::{Error, Result};

// nucdiff modules
use nucdiff_utils::f;

// external crates
use serde::{Deserialize, Serialize};

/// Log10 abundance used for cells without data or with non-positive values
pub const SENTINEL: f32 = -15.0;

/// Dimensions written once at the start of every binary series
///
/// The byte layout is two little-endian `i32` values with no padding.
///
/// ```text
/// <dim_n> <dim_z>
/// ```
///
/// These are authoritative for how many bytes make up a record. Any other
/// "expected" dimensions only ever limit what is compared or displayed.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesHeader {
    /// Number of neutron columns
    pub dim_n: i32,
    /// Number of proton rows
    pub dim_z: i32,
}

impl SeriesHeader {
    /// Byte length of the encoded header
    pub const BYTE_LENGTH: usize = 2 * std::mem::size_of::<i32>();

    /// New header for a `dim_n` x `dim_z` grid
    pub fn new(dim_n: i32, dim_z: i32) -> Self {
        Self { dim_n, dim_z }
    }

    /// Header matching the shape of an existing grid
    pub fn for_grid(grid: &Grid) -> Result<Self> {
        let invalid = || Error::InvalidDimensions {
            dim_n: grid.dim_n() as i64,
            dim_z: grid.dim_z() as i64,
        };

        Ok(Self {
            dim_n: i32::try_from(grid.dim_n()).map_err(|_| invalid())?,
            dim_z: i32::try_from(grid.dim_z()).map_err(|_| invalid())?,
        })
    }

    /// Dimensions as `(dim_n, dim_z)` indices, rejecting negative values
    pub fn shape(&self) -> Result<(usize, usize)> {
        match (usize::try_from(self.dim_n), usize::try_from(self.dim_z)) {
            (Ok(n), Ok(z)) => Ok((n, z)),
            _ => Err(Error::InvalidDimensions {
                dim_n: self.dim_n as i64,
                dim_z: self.dim_z as i64,
            }),
        }
    }

    /// Number of values in every grid
    pub fn number_of_cells(&self) -> Result<usize> {
        let (n, z) = self.shape()?;
        n.checked_mul(z).ok_or(Error::InvalidDimensions {
            dim_n: self.dim_n as i64,
            dim_z: self.dim_z as i64,
        })
    }

    /// Byte length of one record, the timestep plus every grid value
    pub fn record_byte_length(&self) -> Result<usize> {
        let cells = self.number_of_cells()?;
        cells
            .checked_mul(std::mem::size_of::<f32>())
            .and_then(|bytes| bytes.checked_add(std::mem::size_of::<i32>()))
            .ok_or(Error::InvalidDimensions {
                dim_n: self.dim_n as i64,
                dim_z: self.dim_z as i64,
            })
    }
}

impl Default for SeriesHeader {
    fn default() -> Self {
        Self::new(120, 120)
    }
}

impl std::fmt::Display for SeriesHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} x {} (N x Z)", self.dim_n, self.dim_z)
    }
}

/// Dense 2D grid of log10 abundances indexed by `(z, n)`
///
/// Values are stored row-major with `z` as the row and `n` as the column,
/// which is the same order used in the binary records.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Grid {
    dim_n: usize,
    dim_z: usize,
    values: Vec<f32>,
}

impl Grid {
    /// A `dim_n` x `dim_z` grid with every cell set to `value`
    pub fn filled(dim_n: usize, dim_z: usize, value: f32) -> Self {
        Self {
            dim_n,
            dim_z,
            values: vec![value; dim_n * dim_z],
        }
    }

    /// A grid with every cell set to [SENTINEL]
    pub fn empty(dim_n: usize, dim_z: usize) -> Self {
        Self::filled(dim_n, dim_z, SENTINEL)
    }

    /// Wrap existing z-major values, which must hold exactly `dim_n * dim_z`
    /// entries
    ///
    /// ```rust
    /// # use nucdiff_series::Grid;
    /// let grid = Grid::from_values(2, 1, vec![-1.0, -2.0]).unwrap();
    /// assert_eq!(grid.get(0, 1), Some(-2.0));
    ///
    /// assert!(Grid::from_values(2, 2, vec![0.0]).is_err());
    /// ```
    pub fn from_values(dim_n: usize, dim_z: usize, values: Vec<f32>) -> Result<Self> {
        if values.len() != dim_n * dim_z {
            return Err(Error::UnexpectedValueCount {
                expected: dim_n * dim_z,
                found: values.len(),
            });
        }
        Ok(Self {
            dim_n,
            dim_z,
            values,
        })
    }

    /// Number of neutron columns
    pub fn dim_n(&self) -> usize {
        self.dim_n
    }

    /// Number of proton rows
    pub fn dim_z(&self) -> usize {
        self.dim_z
    }

    /// Shape as `(dim_n, dim_z)`
    pub fn shape(&self) -> (usize, usize) {
        (self.dim_n, self.dim_z)
    }

    /// Flat view of every value, z-major
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Value at proton row `z` and neutron column `n`
    pub fn get(&self, z: usize, n: usize) -> Option<f32> {
        if z < self.dim_z && n < self.dim_n {
            Some(self.values[z * self.dim_n + n])
        } else {
            None
        }
    }

    /// Set the value at `(z, n)`, returning false if outside of the grid
    pub fn set(&mut self, z: usize, n: usize, value: f32) -> bool {
        if z < self.dim_z && n < self.dim_n {
            self.values[z * self.dim_n + n] = value;
            true
        } else {
            false
        }
    }

    /// The row of values for proton number `z`
    pub fn row(&self, z: usize) -> Option<&[f32]> {
        if z < self.dim_z {
            Some(&self.values[z * self.dim_n..(z + 1) * self.dim_n])
        } else {
            None
        }
    }

    /// Iterate over rows in order of increasing `z`
    pub fn rows(&self) -> impl Iterator<Item = &[f32]> {
        // chunks_exact panics on zero, and there are no rows to give anyway
        self.values.chunks_exact(self.dim_n.max(1)).take(self.dim_z)
    }

    /// Copy of the lower corner `[..dim_z, ..dim_n]`, limited to the grid size
    ///
    /// Anything beyond the limits is discarded rather than resampled.
    pub fn clipped(&self, dim_n: usize, dim_z: usize) -> Self {
        let dim_n = dim_n.min(self.dim_n);
        let dim_z = dim_z.min(self.dim_z);

        let mut values = Vec::with_capacity(dim_n * dim_z);
        for row in self.rows().take(dim_z) {
            values.extend_from_slice(&row[..dim_n]);
        }

        Self {
            dim_n,
            dim_z,
            values,
        }
    }
}

/// One timestep of the series
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct GridRecord {
    /// Block index taken from the `timestep` header line
    pub timestep: i32,
    /// Dense log10 abundances
    pub grid: Grid,
}

impl GridRecord {
    /// New record for a timestep
    pub fn new(timestep: i32, grid: Grid) -> Self {
        Self { timestep, grid }
    }
}

/// A fully decoded binary series
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Series {
    /// Dimensions declared at the start of the file
    pub header: SeriesHeader,
    /// Every complete record in file order
    pub records: Vec<GridRecord>,
    /// True if reading stopped on a partial trailing record
    pub truncated: bool,
}

impl Series {
    /// Empty series for a header
    pub fn new(header: SeriesHeader) -> Self {
        Self {
            header,
            records: Vec::new(),
            truncated: false,
        }
    }

    /// Number of complete records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if there are no complete records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Timesteps in file order
    pub fn timesteps(&self) -> Vec<i32> {
        self.records.iter().map(|r| r.timestep).collect()
    }
}

impl std::fmt::Display for Series {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut s = "Series {\n".to_string();
        s += &f!("    dimensions: {}\n", self.header);
        s += &match (self.records.first(), self.records.last()) {
            (Some(first), Some(last)) => f!(
                "    records: {} (timesteps {} to {})\n",
                self.len(),
                first.timestep,
                last.timestep
            ),
            _ => "    records: 0\n".to_string(),
        };
        s += &f!("    truncated: {}\n}}", self.truncated);

        write!(f, "{}", s)
    }
}
