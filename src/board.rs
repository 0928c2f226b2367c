//! Board state as seen by the player.

use std::fmt::{self, Display, Formatter};
use std::ops::Index;

/// State of a single board cell.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Cell {
    /// Nothing decided yet.
    #[default]
    Empty,
    /// A queen, either placed by the player or forced by the constraints.
    Queen,
    /// No queen can legally go here anymore.
    Forbidden,
}

impl Cell {
    /// Integer code of the cell: `0` empty, `1` queen, `-1` forbidden.
    pub fn code(self) -> i8 {
        match self {
            Cell::Empty => 0,
            Cell::Queen => 1,
            Cell::Forbidden => -1,
        }
    }

    /// Whether the cell value can no longer change.
    pub fn is_determined(self) -> bool {
        self != Cell::Empty
    }
}

impl From<Cell> for i8 {
    fn from(cell: Cell) -> Self {
        cell.code()
    }
}

impl TryFrom<i8> for Cell {
    type Error = i8;

    fn try_from(code: i8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Cell::Empty),
            1 => Ok(Cell::Queen),
            -1 => Ok(Cell::Forbidden),
            other => Err(other),
        }
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let c = match self {
            Cell::Empty => '.',
            Cell::Queen => 'Q',
            Cell::Forbidden => 'x',
        };
        write!(f, "{}", c)
    }
}

/// An N×N grid of [`Cell`]s addressed by `(col, row)`.
///
/// The board can only be changed by the [`Queens`][crate::queens::Queens]
/// controller; callers get it by shared reference.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Board {
    size: usize,
    // Column-major: cells[col * size + row]
    cells: Vec<Cell>,
}

impl Board {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![Cell::Empty; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the cell at `(col, row)`, or `None` when off the board.
    pub fn get(&self, col: usize, row: usize) -> Option<Cell> {
        if col < self.size && row < self.size {
            Some(self.cells[col * self.size + row])
        } else {
            None
        }
    }

    pub(crate) fn set(&mut self, col: usize, row: usize, cell: Cell) {
        assert!(col < self.size && row < self.size);
        self.cells[col * self.size + row] = cell;
    }

    /// All cells as `(col, row, cell)`, column by column.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, Cell)> + '_ {
        let size = self.size;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &cell)| (i / size, i % size, cell))
    }

    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == cell).count()
    }

    /// Positions `(col, row)` of all queens.
    pub fn queens(&self) -> Vec<(usize, usize)> {
        self.iter()
            .filter(|&(_, _, cell)| cell == Cell::Queen)
            .map(|(col, row, _)| (col, row))
            .collect()
    }

    /// Integer codes indexed as `grid[col][row]`.
    pub fn to_grid(&self) -> Vec<Vec<i8>> {
        self.cells
            .chunks(self.size.max(1))
            .map(|column| column.iter().map(|&c| c.code()).collect())
            .collect()
    }

    /// The board mirrored along its main diagonal.
    pub fn transpose(&self) -> Board {
        let mut board = Board::new(self.size);
        for (col, row, cell) in self.iter() {
            board.set(row, col, cell);
        }
        board
    }
}

impl Index<(usize, usize)> for Board {
    type Output = Cell;

    fn index(&self, (col, row): (usize, usize)) -> &Self::Output {
        assert!(
            col < self.size && row < self.size,
            "Cell ({}, {}) is outside of the {}x{} board",
            col,
            row,
            self.size,
            self.size
        );
        &self.cells[col * self.size + row]
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for row in 0..self.size {
            for col in 0..self.size {
                if col > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", self[(col, row)])?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_codes() {
        for cell in [Cell::Empty, Cell::Queen, Cell::Forbidden] {
            assert_eq!(Cell::try_from(cell.code()), Ok(cell));
        }
        assert_eq!(i8::from(Cell::Forbidden), -1);
        assert_eq!(Cell::try_from(2), Err(2));
        assert!(!Cell::Empty.is_determined());
        assert!(Cell::Queen.is_determined());
    }

    #[test]
    fn test_new_board() {
        let board = Board::new(3);
        assert_eq!(board.size(), 3);
        assert_eq!(board.count(Cell::Empty), 9);
        assert_eq!(board.get(2, 2), Some(Cell::Empty));
        assert_eq!(board.get(3, 0), None);
        assert_eq!(board.to_grid(), vec![vec![0i8; 3]; 3]);
    }

    #[test]
    fn test_set_and_iter() {
        let mut board = Board::new(2);
        board.set(1, 0, Cell::Queen);
        board.set(0, 1, Cell::Forbidden);

        let cells: Vec<_> = board.iter().collect();
        assert_eq!(
            cells,
            vec![
                (0, 0, Cell::Empty),
                (0, 1, Cell::Forbidden),
                (1, 0, Cell::Queen),
                (1, 1, Cell::Empty),
            ]
        );
        assert_eq!(board.queens(), vec![(1, 0)]);
        assert_eq!(board.to_grid(), vec![vec![0i8, -1], vec![1, 0]]);
        assert_eq!(board.transpose()[(0, 1)], Cell::Queen);
    }

    #[test]
    fn test_display() {
        let mut board = Board::new(3);
        board.set(1, 0, Cell::Queen);
        board.set(0, 2, Cell::Forbidden);
        assert_eq!(board.to_string(), ". Q .\n. . .\nx . .\n");
    }

    #[test]
    #[should_panic(expected = "outside of the 2x2 board")]
    fn test_index_out_of_range() {
        let board = Board::new(2);
        let _ = board[(0, 2)];
    }
}
