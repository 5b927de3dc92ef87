//! Borrowed 2D view over a sheet's thickness data.

use super::types::Sheet;

/// Read-only row-major view of a thickness field.
#[derive(Debug, Clone, Copy)]
pub struct ThicknessGrid<'a> {
    width: usize,
    length: usize,
    cells: &'a [i32],
}

impl<'a> ThicknessGrid<'a> {
    /// Creates a view over `cells`, which must hold `width * length` values.
    pub fn new(width: usize, length: usize, cells: &'a [i32]) -> Self {
        debug_assert_eq!(cells.len(), width * length);
        Self {
            width,
            length,
            cells,
        }
    }

    /// Creates a view over a sheet's thickness data.
    pub fn from_sheet(sheet: &'a Sheet) -> Self {
        Self::new(sheet.width(), sheet.length(), sheet.thickness())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Thickness at `row` (along the length) and `col` (along the width).
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> i32 {
        self.cells[row * self.width + col]
    }

    /// One row of the grid.
    pub fn row(&self, row: usize) -> &'a [i32] {
        &self.cells[row * self.width..(row + 1) * self.width]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_indexing_is_row_major() {
        let cells = [1, 2, 3, 4, 5, 6];
        let grid = ThicknessGrid::new(3, 2, &cells);

        assert_eq!(grid.get(0, 0), 1);
        assert_eq!(grid.get(0, 2), 3);
        assert_eq!(grid.get(1, 0), 4);
        assert_eq!(grid.get(1, 2), 6);
        assert_eq!(grid.row(1), &[4, 5, 6]);
    }

    #[test]
    fn test_grid_from_sheet() {
        let sheet = Sheet::new(7, 2, 2, vec![10, 20, 30, 40]).unwrap();
        let grid = ThicknessGrid::from_sheet(&sheet);

        assert_eq!(grid.width(), 2);
        assert_eq!(grid.length(), 2);
        assert_eq!(grid.get(1, 1), 40);
    }
}
