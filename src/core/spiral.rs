//! Clockwise, outside-in spiral traversal of 2-D grids.
//!
//! [`flatten`] is the strict entry point: it only accepts square grids and
//! returns an empty vector for anything else. [`flatten_rect`] relaxes that to
//! any rectangular grid. [`SpiralMap`] precomputes the coordinate to index
//! bijection for one shape so a batch of same-shaped grids skips the walk.

use crate::domain::model::{shape_of, Shape};

/// Flattens a square grid in clockwise spiral order.
///
/// Empty, zero-width, ragged and non-square grids produce an empty vector.
pub fn flatten<T: Clone>(grid: &[Vec<T>]) -> Vec<T> {
    match shape_of(grid) {
        Some(shape) if shape.is_square() => gather(grid, shape),
        _ => Vec::new(),
    }
}

/// Like [`flatten`] but accepts any non-empty rectangular grid.
pub fn flatten_rect<T: Clone>(grid: &[Vec<T>]) -> Vec<T> {
    match shape_of(grid) {
        Some(shape) => gather(grid, shape),
        _ => Vec::new(),
    }
}

fn gather<T: Clone>(grid: &[Vec<T>], shape: Shape) -> Vec<T> {
    let mut out = Vec::with_capacity(shape.len());
    walk(shape, |row, col| out.push(grid[row][col].clone()));
    out
}

/// Calls `visit(row, col)` for every cell of `shape`, in spiral order.
pub fn walk(shape: Shape, mut visit: impl FnMut(usize, usize)) {
    if shape.is_empty() {
        return;
    }

    let (mut top, mut left) = (0, 0);
    let (mut bottom, mut right) = (shape.rows - 1, shape.cols - 1);

    while top <= bottom && left <= right {
        for col in left..=right {
            visit(top, col);
        }
        for row in top + 1..=bottom {
            visit(row, right);
        }
        if bottom > top {
            for col in (left..right).rev() {
                visit(bottom, col);
            }
            if right > left {
                for row in (top + 1..bottom).rev() {
                    visit(row, left);
                }
            }
        }

        // A single remaining row or column is the innermost layer.
        if bottom == top || right == left {
            break;
        }
        top += 1;
        left += 1;
        bottom -= 1;
        right -= 1;
    }
}

/// Output index of `(row, col)` in the spiral ordering of `shape`.
///
/// Returns `None` when the coordinate lies outside the grid.
pub fn spiral_position(row: usize, col: usize, shape: Shape) -> Option<usize> {
    if row >= shape.rows || col >= shape.cols {
        return None;
    }

    let layer = row
        .min(col)
        .min(shape.rows - 1 - row)
        .min(shape.cols - 1 - col);

    let height = shape.rows - 2 * layer;
    let width = shape.cols - 2 * layer;
    let before = shape.len() - height * width;

    let (top, left) = (layer, layer);
    let (bottom, right) = (shape.rows - 1 - layer, shape.cols - 1 - layer);

    let offset = if row == top {
        col - left
    } else if col == right {
        (width - 1) + (row - top)
    } else if row == bottom {
        (width - 1) + (height - 1) + (right - col)
    } else {
        2 * (width - 1) + (height - 1) + (bottom - row)
    };

    Some(before + offset)
}

/// Precomputed spiral ordering for one grid shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpiralMap {
    shape: Shape,
    // row-major cell index -> output index
    positions: Vec<usize>,
    // output index -> row-major cell index
    order: Vec<usize>,
}

impl SpiralMap {
    pub fn new(shape: Shape) -> Self {
        let mut order = Vec::with_capacity(shape.len());
        walk(shape, |row, col| order.push(row * shape.cols + col));

        let mut positions = vec![0; order.len()];
        for (index, &cell) in order.iter().enumerate() {
            positions[cell] = index;
        }

        Self {
            shape,
            positions,
            order,
        }
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn position(&self, row: usize, col: usize) -> Option<usize> {
        if row >= self.shape.rows || col >= self.shape.cols {
            return None;
        }
        self.positions.get(row * self.shape.cols + col).copied()
    }

    /// Flattens `grid` through the precomputed order, or `None` when its
    /// shape does not match this map.
    pub fn apply<T: Clone>(&self, grid: &[Vec<T>]) -> Option<Vec<T>> {
        if shape_of(grid) != Some(self.shape) {
            return None;
        }
        let cols = self.shape.cols;
        Some(
            self.order
                .iter()
                .map(|&cell| grid[cell / cols][cell % cols].clone())
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Grid;

    fn sequential(rows: usize, cols: usize) -> Vec<Vec<i64>> {
        Grid::sequential(rows, cols).rows().to_vec()
    }

    #[test]
    fn test_single_cell() {
        assert_eq!(flatten(&[vec![5]]), vec![5]);
    }

    #[test]
    fn test_two_by_two() {
        assert_eq!(flatten(&[vec![1, 2], vec![3, 4]]), vec![1, 2, 4, 3]);
    }

    #[test]
    fn test_three_by_three() {
        let grid = vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 9]];
        assert_eq!(flatten(&grid), vec![1, 2, 3, 6, 9, 8, 7, 4, 5]);
    }

    #[test]
    fn test_four_by_four() {
        assert_eq!(
            flatten(&sequential(4, 4)),
            vec![0, 1, 2, 3, 7, 11, 15, 14, 13, 12, 8, 4, 5, 6, 10, 9]
        );
    }

    #[test]
    fn test_degenerate_grids_flatten_to_empty() {
        let empty: Vec<Vec<i64>> = vec![];
        assert!(flatten(&empty).is_empty());
        assert!(flatten(&[Vec::<i64>::new()]).is_empty());
        assert!(flatten(&[vec![1, 2], vec![3]]).is_empty());
        assert!(flatten(&[vec![1, 2, 3], vec![4, 5, 6]]).is_empty());
        // square row count but one row too long
        assert!(flatten(&[vec![1, 2], vec![3, 4, 5]]).is_empty());
    }

    #[test]
    fn test_flatten_keeps_every_value_once() {
        for n in 1..=9 {
            let grid = sequential(n, n);
            let mut out = flatten(&grid);
            assert_eq!(out.len(), n * n);
            out.sort_unstable();
            let expected: Vec<i64> = (0..(n * n) as i64).collect();
            assert_eq!(out, expected, "size {}", n);
        }
    }

    #[test]
    fn test_flatten_does_not_touch_input() {
        let grid = vec![vec![9, 8], vec![7, 6]];
        let before = grid.clone();
        let _ = flatten(&grid);
        assert_eq!(grid, before);
    }

    #[test]
    fn test_rectangular_demo_grid() {
        assert_eq!(
            flatten_rect(&sequential(4, 6)),
            vec![
                0, 1, 2, 3, 4, 5, 11, 17, 23, 22, 21, 20, 19, 18, 12, 6, 7, 8, 9, 10, 16, 15, 14,
                13
            ]
        );
    }

    #[test]
    fn test_rectangular_single_row_and_column() {
        assert_eq!(flatten_rect(&[vec![1, 2, 3]]), vec![1, 2, 3]);
        assert_eq!(flatten_rect(&[vec![1], vec![2], vec![3]]), vec![1, 2, 3]);
        assert_eq!(
            flatten_rect(&sequential(3, 2)),
            vec![0, 1, 3, 5, 4, 2]
        );
    }

    #[test]
    fn test_rect_matches_square_flatten() {
        for n in 1..=6 {
            let grid = sequential(n, n);
            assert_eq!(flatten_rect(&grid), flatten(&grid));
        }
    }

    #[test]
    fn test_spiral_position_agrees_with_walk() {
        for rows in 1..=7 {
            for cols in 1..=7 {
                let shape = Shape::new(rows, cols);
                let mut index = 0;
                walk(shape, |row, col| {
                    assert_eq!(
                        spiral_position(row, col, shape),
                        Some(index),
                        "cell ({}, {}) in {}",
                        row,
                        col,
                        shape
                    );
                    index += 1;
                });
                assert_eq!(index, shape.len());
            }
        }
    }

    #[test]
    fn test_spiral_position_out_of_bounds() {
        let shape = Shape::new(3, 3);
        assert_eq!(spiral_position(3, 0, shape), None);
        assert_eq!(spiral_position(0, 3, shape), None);
    }

    #[test]
    fn test_spiral_map_matches_flatten_rect() {
        for (rows, cols) in [(1, 1), (2, 2), (4, 4), (4, 6), (5, 3), (1, 7)] {
            let map = SpiralMap::new(Shape::new(rows, cols));
            let grid = sequential(rows, cols);
            assert_eq!(map.apply(&grid), Some(flatten_rect(&grid)));
            for row in 0..rows {
                for col in 0..cols {
                    assert_eq!(
                        map.position(row, col),
                        spiral_position(row, col, map.shape())
                    );
                }
            }
        }
    }

    #[test]
    fn test_spiral_map_rejects_other_shapes() {
        let map = SpiralMap::new(Shape::new(3, 3));
        assert_eq!(map.apply(&sequential(2, 2)), None);
        assert_eq!(map.apply(&[vec![1, 2, 3], vec![4, 5], vec![6, 7, 8]]), None);
        assert_eq!(map.position(3, 0), None);
    }
}
