use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Row and column count of a well-formed (non-empty, non-ragged) grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shape {
    pub rows: usize,
    pub cols: usize,
}

impl Shape {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grid {
    rows: Vec<Vec<i64>>,
}

impl Grid {
    pub fn new(rows: Vec<Vec<i64>>) -> Self {
        Self { rows }
    }

    /// Grid filled with `0..rows*cols` in row-major order.
    pub fn sequential(rows: usize, cols: usize) -> Self {
        let rows = (0..rows)
            .map(|r| (0..cols).map(|c| (r * cols + c) as i64).collect())
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<i64>] {
        &self.rows
    }

    pub fn cell_count(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    /// `None` for empty, zero-width or ragged grids.
    pub fn shape(&self) -> Option<Shape> {
        shape_of(&self.rows)
    }
}

impl From<Vec<Vec<i64>>> for Grid {
    fn from(rows: Vec<Vec<i64>>) -> Self {
        Self::new(rows)
    }
}

pub(crate) fn shape_of<T>(rows: &[Vec<T>]) -> Option<Shape> {
    let first = rows.first()?;
    let cols = first.len();
    if cols == 0 || rows.iter().any(|row| row.len() != cols) {
        return None;
    }
    Some(Shape::new(rows.len(), cols))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedGrid {
    pub name: String,
    pub grid: Grid,
}

impl NamedGrid {
    pub fn new(name: impl Into<String>, grid: Grid) -> Self {
        Self {
            name: name.into(),
            grid,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapePolicy {
    #[default]
    Square,
    Rectangular,
}

impl ShapePolicy {
    pub fn accepts(&self, shape: Shape) -> bool {
        match self {
            ShapePolicy::Square => shape.is_square(),
            ShapePolicy::Rectangular => true,
        }
    }

    /// Why `shape` is refused under this policy, `None` when accepted.
    pub fn rejection(&self, shape: Shape) -> Option<String> {
        if self.accepts(shape) {
            return None;
        }
        match self {
            ShapePolicy::Square => Some(format!("grid is {}, not square", shape)),
            ShapePolicy::Rectangular => Some(format!("grid is {}, not rectangular", shape)),
        }
    }
}

impl fmt::Display for ShapePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapePolicy::Square => write!(f, "square"),
            ShapePolicy::Rectangular => write!(f, "rectangular"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpiralRecord {
    pub name: String,
    pub rows: usize,
    pub cols: usize,
    pub values: Vec<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejected: Option<String>,
}

impl SpiralRecord {
    pub fn is_rejected(&self) -> bool {
        self.rejected.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlattenReport {
    pub generated_at: DateTime<Utc>,
    pub policy: ShapePolicy,
    pub records: Vec<SpiralRecord>,
}

impl FlattenReport {
    pub fn new(policy: ShapePolicy, records: Vec<SpiralRecord>) -> Self {
        Self {
            generated_at: Utc::now(),
            policy,
            records,
        }
    }

    pub fn rejected_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_rejected()).count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Written(String),
    Rendered(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_rejects_degenerate_grids() {
        assert_eq!(Grid::new(vec![]).shape(), None);
        assert_eq!(Grid::new(vec![vec![], vec![]]).shape(), None);
        assert_eq!(Grid::new(vec![vec![1, 2], vec![3]]).shape(), None);
        assert_eq!(
            Grid::new(vec![vec![1, 2, 3], vec![4, 5, 6]]).shape(),
            Some(Shape::new(2, 3))
        );
    }

    #[test]
    fn test_sequential_grid_is_row_major() {
        let grid = Grid::sequential(2, 3);
        assert_eq!(grid.rows(), &[vec![0, 1, 2], vec![3, 4, 5]]);
        assert_eq!(grid.cell_count(), 6);
    }

    #[test]
    fn test_policy_accepts() {
        assert!(ShapePolicy::Square.accepts(Shape::new(3, 3)));
        assert!(!ShapePolicy::Square.accepts(Shape::new(4, 6)));
        assert!(ShapePolicy::Rectangular.accepts(Shape::new(4, 6)));
    }

    #[test]
    fn test_policy_rejection_reason() {
        assert_eq!(ShapePolicy::Square.rejection(Shape::new(3, 3)), None);
        assert_eq!(
            ShapePolicy::Square.rejection(Shape::new(4, 6)).as_deref(),
            Some("grid is 4x6, not square")
        );
        assert_eq!(ShapePolicy::Rectangular.rejection(Shape::new(4, 6)), None);
    }

    #[test]
    fn test_grid_serializes_as_nested_arrays() {
        let grid = Grid::new(vec![vec![1, 2], vec![3, 4]]);
        assert_eq!(serde_json::to_string(&grid).unwrap(), "[[1,2],[3,4]]");
    }
}
