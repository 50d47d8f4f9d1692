//! Core domain types for Reversi.

use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Width and height of the board.
pub const BOARD_SIZE: usize = 8;

/// Number of cells on the board.
pub const NUM_CELLS: usize = BOARD_SIZE * BOARD_SIZE;

/// Disc color, also used to name the side to move.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Color {
    /// White moves first.
    White,
    /// Black.
    Black,
}

impl Color {
    /// Returns the opposing color.
    pub fn opponent(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Cell code used in the flat stored form.
    pub fn code(self) -> u8 {
        match self {
            Color::White => 1,
            Color::Black => 2,
        }
    }
}

/// A cell on the Reversi board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Cell {
    /// No disc.
    #[default]
    Empty,
    /// A disc of the given color.
    Disc(Color),
}

impl Cell {
    /// Stored cell code: 0 empty, 1 white, 2 black.
    pub fn code(self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Disc(color) => color.code(),
        }
    }

    /// Parses a stored cell code.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Cell::Empty),
            1 => Some(Cell::Disc(Color::White)),
            2 => Some(Cell::Disc(Color::Black)),
            _ => None,
        }
    }
}

/// A board coordinate. `row` is the y axis, `col` the x axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    /// Row index, 0 at the top.
    pub row: u8,
    /// Column index, 0 at the left.
    pub col: u8,
}

impl Position {
    /// Creates a position, or `None` when it falls outside the board.
    pub fn new(row: u8, col: u8) -> Option<Self> {
        if (row as usize) < BOARD_SIZE && (col as usize) < BOARD_SIZE {
            Some(Self { row, col })
        } else {
            None
        }
    }

    /// Converts a row-major index (0-63) to a position.
    pub fn from_index(index: usize) -> Option<Self> {
        if index >= NUM_CELLS {
            return None;
        }
        Some(Self {
            row: (index / BOARD_SIZE) as u8,
            col: (index % BOARD_SIZE) as u8,
        })
    }

    /// Row-major index: `row * 8 + col`.
    pub fn index(self) -> usize {
        self.row as usize * BOARD_SIZE + self.col as usize
    }

    /// Steps one cell in the given direction, `None` past the edge.
    pub fn offset(self, d_row: i8, d_col: i8) -> Option<Self> {
        let row = self.row as i16 + d_row as i16;
        let col = self.col as i16 + d_col as i16;
        if row < 0 || col < 0 {
            return None;
        }
        Self::new(row as u8, col as u8)
    }

    /// Iterates every cell in row-major order.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..NUM_CELLS).filter_map(Position::from_index)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Error decoding a board from its flat stored form.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum BoardError {
    /// The flat sequence does not have 64 entries.
    #[display("Board must have {} cells, got {}", NUM_CELLS, len)]
    WrongLength {
        /// Length that was supplied.
        len: usize,
    },

    /// A cell code outside 0..=2.
    #[display("Invalid cell code {} at index {}", value, index)]
    InvalidCell {
        /// Row-major index of the bad cell.
        index: usize,
        /// The offending code.
        value: u8,
    },
}

impl std::error::Error for BoardError {}

/// 8x8 Reversi board.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    cells: [[Cell; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    /// Creates the standard opening board.
    ///
    /// ```text
    /// row 3: . . . W B . . .
    /// row 4: . . . B W . . .
    /// ```
    pub fn new() -> Self {
        let mut board = Self::empty();
        board.cells[3][3] = Cell::Disc(Color::White);
        board.cells[3][4] = Cell::Disc(Color::Black);
        board.cells[4][3] = Cell::Disc(Color::Black);
        board.cells[4][4] = Cell::Disc(Color::White);
        board
    }

    /// Creates a board with no discs.
    pub fn empty() -> Self {
        Self {
            cells: [[Cell::Empty; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    /// Builds a board from a 2-D grid of cells.
    pub fn from_rows(cells: [[Cell; BOARD_SIZE]; BOARD_SIZE]) -> Self {
        Self { cells }
    }

    /// Returns the cell at the given position.
    pub fn get(&self, pos: Position) -> Cell {
        self.cells[pos.row as usize][pos.col as usize]
    }

    /// Sets the cell at the given position.
    pub fn set(&mut self, pos: Position, cell: Cell) {
        self.cells[pos.row as usize][pos.col as usize] = cell;
    }

    /// Checks if a cell is empty.
    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos) == Cell::Empty
    }

    /// Returns the grid, row by row.
    pub fn rows(&self) -> &[[Cell; BOARD_SIZE]; BOARD_SIZE] {
        &self.cells
    }

    /// Number of discs of the given color.
    pub fn count(&self, color: Color) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|cell| **cell == Cell::Disc(color))
            .count()
    }

    /// Number of empty cells.
    pub fn empty_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|cell| **cell == Cell::Empty)
            .count()
    }

    /// Flattens to the row-major stored form (`index = row * 8 + col`).
    pub fn flatten(&self) -> [u8; NUM_CELLS] {
        let mut flat = [0u8; NUM_CELLS];
        for (index, cell) in self.cells.iter().flatten().enumerate() {
            flat[index] = cell.code();
        }
        flat
    }

    /// Reshapes the row-major stored form back into a board.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError`] on a wrong length or an unknown cell code.
    #[instrument(level = "trace", skip(flat), fields(len = flat.len()))]
    pub fn from_flat(flat: &[u8]) -> Result<Self, BoardError> {
        if flat.len() != NUM_CELLS {
            return Err(BoardError::WrongLength { len: flat.len() });
        }
        let mut board = Self::empty();
        for (index, &value) in flat.iter().enumerate() {
            let cell = Cell::from_code(value).ok_or(BoardError::InvalidCell { index, value })?;
            board.cells[index / BOARD_SIZE][index % BOARD_SIZE] = cell;
        }
        Ok(board)
    }

    /// Formats the board as a human-readable grid.
    pub fn display(&self) -> String {
        let mut result = String::from("  0 1 2 3 4 5 6 7\n");
        for (row, cells) in self.cells.iter().enumerate() {
            result.push_str(&row.to_string());
            for cell in cells {
                result.push(' ');
                result.push(match cell {
                    Cell::Empty => '.',
                    Cell::Disc(Color::White) => 'W',
                    Cell::Disc(Color::Black) => 'B',
                });
            }
            if row + 1 < BOARD_SIZE {
                result.push('\n');
            }
        }
        result
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
