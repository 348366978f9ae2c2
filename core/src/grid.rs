use alloc::vec::Vec;
use core::fmt;
use core::ops::Index;
use core::str::FromStr;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Fixed-size board of cells, indexed `(x, y)` with `y = 0` at the bottom.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    size: Coord2,
    cells: Array2<Cell>,
}

impl Grid {
    /// Empty board, each dimension clamped to at least 1.
    pub fn new((size_x, size_y): Coord2) -> Self {
        let size = (size_x.max(1), size_y.max(1));
        Self {
            size,
            cells: Array2::default(size.to_nd_index()),
        }
    }

    pub fn width(&self) -> Coord {
        self.size.0
    }

    pub fn height(&self) -> Coord {
        self.size.1
    }

    pub fn size(&self) -> Coord2 {
        self.size
    }

    pub fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if coords.0 < self.size.0 && coords.1 < self.size.1 {
            Ok(coords)
        } else {
            Err(GameError::OutOfBounds)
        }
    }

    pub fn get(&self, coords: Coord2) -> Result<Cell> {
        let coords = self.validate_coords(coords)?;
        Ok(self.cells[coords.to_nd_index()])
    }

    pub fn set(&mut self, coords: Coord2, cell: Cell) -> Result<()> {
        let coords = self.validate_coords(coords)?;
        self.cells[coords.to_nd_index()] = cell;
        Ok(())
    }

    /// Exchanges the contents of two cells.
    pub fn swap(&mut self, a: Coord2, b: Coord2) -> Result<()> {
        let a = self.validate_coords(a)?;
        let b = self.validate_coords(b)?;
        self.cells.swap(a.to_nd_index(), b.to_nd_index());
        Ok(())
    }

    pub fn symbol_at(&self, coords: Coord2) -> Result<Option<Symbol>> {
        self.get(coords).map(Cell::symbol)
    }

    /// Cells of column `x`, bottom to top.
    pub fn column(&self, x: Coord) -> Result<Vec<Cell>> {
        self.validate_coords((x, 0))?;
        Ok((0..self.size.1).map(|y| self[(x, y)]).collect())
    }

    pub fn empty_count(&self) -> CellCount {
        self.cells
            .iter()
            .filter(|cell| cell.is_empty())
            .count()
            .try_into()
            .unwrap_or(CellCount::MAX)
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|cell| !cell.is_empty())
    }

    /// Every coordinate, column by column from the bottom-left corner.
    pub fn iter_coords(&self) -> impl Iterator<Item = Coord2> + use<> {
        let (x_end, y_end) = self.size;
        (0..x_end).flat_map(move |x| (0..y_end).map(move |y| (x, y)))
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        NeighborIter::new(coords, self.size)
    }

    /// Every cell that is part of a horizontal or vertical run of at least
    /// [`MIN_MATCH`] equal symbols, in column-major order.
    pub fn find_all_matches(&self) -> Vec<Coord2> {
        let (x_end, y_end) = self.size;
        let mut marked: Array2<bool> = Array2::default(self.size.to_nd_index());

        for y in 0..y_end {
            self.mark_runs((0..x_end).map(|x| (x, y)), &mut marked);
        }
        for x in 0..x_end {
            self.mark_runs((0..y_end).map(|y| (x, y)), &mut marked);
        }

        self.iter_coords()
            .filter(|&coords| marked[coords.to_nd_index()])
            .collect()
    }

    pub fn has_matches(&self) -> bool {
        !self.find_all_matches().is_empty()
    }

    /// Marks the runs found along one row or column.
    fn mark_runs(&self, line: impl Iterator<Item = Coord2>, marked: &mut Array2<bool>) {
        let mut run: Vec<Coord2> = Vec::new();
        let mut run_symbol = None;

        let mut flush = |run: &mut Vec<Coord2>| {
            if run.len() >= MIN_MATCH {
                for coords in run.iter() {
                    marked[coords.to_nd_index()] = true;
                }
            }
            run.clear();
        };

        for coords in line {
            let symbol = self[coords].symbol();
            if symbol.is_none() || symbol != run_symbol {
                flush(&mut run);
            }
            run_symbol = symbol;
            if symbol.is_some() {
                run.push(coords);
            }
        }
        flush(&mut run);
    }
}

impl Index<Coord2> for Grid {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

/// Renders the board top row first, `.` for empty cells and letters for symbols.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (x_end, y_end) = self.size;
        for y in (0..y_end).rev() {
            for x in 0..x_end {
                match self[(x, y)] {
                    Cell::Empty => f.write_str(".")?,
                    Cell::Filled(symbol) => write!(f, "{symbol}")?,
                }
            }
            if y > 0 {
                f.write_str("\n")?;
            }
        }
        Ok(())
    }
}

/// Parses the [`Display`](fmt::Display) form back, blank lines are ignored.
impl FromStr for Grid {
    type Err = GameError;

    fn from_str(text: &str) -> Result<Self> {
        let rows: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        let height = Coord::try_from(rows.len()).map_err(|_| GameError::InvalidBoardShape)?;
        let width = rows.first().map_or(0, |row| row.chars().count());
        let width = Coord::try_from(width).map_err(|_| GameError::InvalidBoardShape)?;
        if width == 0 || height == 0 {
            return Err(GameError::InvalidBoardShape);
        }

        let mut grid = Grid::new((width, height));
        for (row_index, row) in rows.iter().enumerate() {
            if row.chars().count() != usize::from(width) {
                return Err(GameError::InvalidBoardShape);
            }
            // rows are listed top first
            let y = height - 1 - row_index as Coord;
            for (x, ch) in row.chars().enumerate() {
                let cell = match ch {
                    '.' => Cell::Empty,
                    'A'..='Z' => Cell::Filled(Symbol(ch as u8 - b'A')),
                    _ => return Err(GameError::UnknownSymbol),
                };
                grid.set((x as Coord, y), cell)?;
            }
        }
        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    fn grid(text: &str) -> Grid {
        text.parse().unwrap()
    }

    #[test]
    fn access_outside_bounds_fails() {
        let mut grid = Grid::new((3, 2));

        assert_eq!(grid.get((3, 0)), Err(GameError::OutOfBounds));
        assert_eq!(grid.get((0, 2)), Err(GameError::OutOfBounds));
        assert_eq!(
            grid.set((5, 5), Cell::Filled(Symbol(0))),
            Err(GameError::OutOfBounds)
        );
        assert_eq!(grid.empty_count(), 6);
    }

    #[test]
    fn set_only_touches_one_cell() {
        let mut grid = Grid::new((3, 3));
        grid.set((1, 2), Cell::Filled(Symbol(4))).unwrap();

        assert_eq!(grid.get((1, 2)), Ok(Cell::Filled(Symbol(4))));
        assert_eq!(grid.empty_count(), 8);
    }

    #[test]
    fn parse_puts_first_line_on_top() {
        let grid = grid(
            "AB.
             CDE",
        );

        assert_eq!(grid.size(), (3, 2));
        assert_eq!(grid[(0, 1)], Cell::Filled(Symbol(0)));
        assert_eq!(grid[(2, 1)], Cell::Empty);
        assert_eq!(grid[(2, 0)], Cell::Filled(Symbol(4)));
        assert_eq!(grid.to_string(), "AB.\nCDE");
    }

    #[test]
    fn parse_rejects_ragged_rows_and_unknown_symbols() {
        assert_eq!("AB\nC".parse::<Grid>(), Err(GameError::InvalidBoardShape));
        assert_eq!("A#".parse::<Grid>(), Err(GameError::UnknownSymbol));
        assert_eq!("".parse::<Grid>(), Err(GameError::InvalidBoardShape));
    }

    #[test]
    fn column_reads_bottom_to_top() {
        let grid = grid(
            "A.
             B.
             CD",
        );

        assert_eq!(
            grid.column(0).unwrap(),
            [
                Cell::Filled(Symbol(2)),
                Cell::Filled(Symbol(1)),
                Cell::Filled(Symbol(0))
            ]
        );
        assert_eq!(grid.column(2), Err(GameError::OutOfBounds));
    }

    #[test]
    fn find_all_matches_reports_rows_and_columns() {
        let grid = grid(
            "ABCD
             AEEE
             ABCD",
        );

        let matches = grid.find_all_matches();
        assert_eq!(matches, [(0, 0), (0, 1), (0, 2), (1, 1), (2, 1), (3, 1)]);
    }

    #[test]
    fn empty_cells_break_runs() {
        let grid = grid("AA.AA");
        assert!(!grid.has_matches());
    }

    #[test]
    fn swap_exchanges_contents() {
        let mut grid = grid("AB");
        grid.swap((0, 0), (1, 0)).unwrap();
        assert_eq!(grid.to_string(), "BA");
        assert_eq!(grid.swap((0, 0), (2, 0)), Err(GameError::OutOfBounds));
    }
}
