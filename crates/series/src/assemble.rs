//! Dense grid assembly from sparse blocks

// crate modules
use crate::blocks::Block;
use crate::grid::{Grid, GridRecord};

/// Turn one block of sparse triples into a dense [GridRecord]
///
/// Every cell starts as the sentinel value. Triples with a neutron or proton
/// number outside of `0..dim_n` or `0..dim_z` are dropped, and the last
/// triple wins when the same isotope appears more than once.
///
/// ```rust
/// # use nucdiff_series::{assemble, Block, SparseTriple};
/// let mut block = Block::new(3);
/// block.triples.push(SparseTriple::from_columns(2, 5, 0.01).unwrap());
///
/// let record = assemble(block, 120, 120);
/// assert_eq!(record.timestep, 3);
/// assert_eq!(record.grid.get(2, 3), Some(-2.0));
/// assert_eq!(record.grid.get(3, 2), Some(-15.0));
/// ```
pub fn assemble(block: Block, dim_n: usize, dim_z: usize) -> GridRecord {
    let mut grid = Grid::empty(dim_n, dim_z);

    for triple in &block.triples {
        // negative coordinates fail the conversion and are out of range too
        let (Ok(n), Ok(z)) = (
            usize::try_from(triple.coordinate_n),
            usize::try_from(triple.coordinate_z),
        ) else {
            continue;
        };

        grid.set(z, n, triple.log_value as f32);
    }

    GridRecord::new(block.timestep, grid)
}
