//! Partitioning of flat sequences into grid rows and square blocks
//!
//! Generic over the element type: the DCT pipeline partitions luma values,
//! the subsampler partitions whole pixels. Shape violations are rejected
//! before any block is produced; nothing is truncated or padded.

use crate::error::{Error, Result};

/// A square tile of a sequence plus its position in the block grid
#[derive(Debug, Clone, PartialEq)]
pub struct Block<T> {
    pub block_row: usize,
    pub block_col: usize,
    /// Tile contents in intra-block row-major order
    pub values: Vec<T>,
}

/// Split a flat sequence into rows of `row_width` elements.
/// Fails with `InvalidShape` unless the length divides evenly.
pub fn to_grid<T: Clone>(sequence: &[T], row_width: usize) -> Result<Vec<Vec<T>>> {
    if row_width == 0 || sequence.len() % row_width != 0 {
        return Err(Error::InvalidShape {
            length: sequence.len(),
            divisor: row_width,
            context: "grid rows",
        });
    }
    Ok(sequence.chunks(row_width).map(<[T]>::to_vec).collect())
}

/// Partition a flat sequence (interpreted as an `image_width`-wide grid)
/// into non-overlapping `block_size` x `block_size` squares in row-major
/// block order. Requires both image dimensions to be multiples of
/// `block_size`; fails with `InvalidShape` otherwise.
pub fn to_square_blocks<T: Clone>(
    sequence: &[T],
    block_size: usize,
    image_width: usize,
) -> Result<Vec<Block<T>>> {
    let rows = to_grid(sequence, image_width)?;
    let image_height = rows.len();
    if block_size == 0 || image_width % block_size != 0 || image_height % block_size != 0 {
        return Err(Error::InvalidShape {
            length: sequence.len(),
            divisor: block_size,
            context: "square blocks",
        });
    }

    let mut blocks = Vec::with_capacity((image_height / block_size) * (image_width / block_size));
    for row_start in (0..image_height).step_by(block_size) {
        for col_start in (0..image_width).step_by(block_size) {
            let mut values = Vec::with_capacity(block_size * block_size);
            for row in row_start..row_start + block_size {
                values.extend(rows[row][col_start..col_start + block_size].iter().cloned());
            }
            blocks.push(Block {
                block_row: row_start / block_size,
                block_col: col_start / block_size,
                values,
            });
        }
    }
    Ok(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_grid_splits_rows() {
        let grid = to_grid(&[1, 2, 3, 4, 5, 6], 3).unwrap();
        assert_eq!(grid, vec![vec![1, 2, 3], vec![4, 5, 6]]);
    }

    #[test]
    fn test_to_grid_rejects_remainder() {
        assert!(matches!(
            to_grid(&[1, 2, 3, 4, 5], 3),
            Err(Error::InvalidShape { length: 5, divisor: 3, .. })
        ));
        assert!(to_grid(&[1, 2], 0).is_err());
    }

    #[test]
    fn test_square_blocks_positions_and_order() {
        // 4x4 grid holding its own flat index
        let seq: Vec<usize> = (0..16).collect();
        let blocks = to_square_blocks(&seq, 2, 4).unwrap();
        assert_eq!(blocks.len(), 4);

        // Row-major block order, top-left to bottom-right
        assert_eq!((blocks[0].block_row, blocks[0].block_col), (0, 0));
        assert_eq!((blocks[1].block_row, blocks[1].block_col), (0, 1));
        assert_eq!((blocks[2].block_row, blocks[2].block_col), (1, 0));
        assert_eq!((blocks[3].block_row, blocks[3].block_col), (1, 1));

        // Intra-block row-major order
        assert_eq!(blocks[0].values, vec![0, 1, 4, 5]);
        assert_eq!(blocks[3].values, vec![10, 11, 14, 15]);
    }

    #[test]
    fn test_square_blocks_shape_checks() {
        // Width not a multiple of the block size
        assert!(matches!(
            to_square_blocks(&[0; 12], 2, 3),
            Err(Error::InvalidShape { .. })
        ));
        // Height (12 / 4 = 3 rows) not a multiple of the block size
        assert!(matches!(
            to_square_blocks(&[0; 12], 2, 4),
            Err(Error::InvalidShape { .. })
        ));
        // Length not a multiple of the width
        assert!(matches!(
            to_square_blocks(&[0; 10], 2, 4),
            Err(Error::InvalidShape { .. })
        ));
    }

    #[test]
    fn test_single_block_covers_whole_grid() {
        let seq: Vec<usize> = (0..64).collect();
        let blocks = to_square_blocks(&seq, 8, 8).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].values, seq);
    }
}
