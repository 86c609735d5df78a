use super::player::PlayerId;

pub const ROWS: usize = 6;
pub const COLS: usize = 7;
/// Number of aligned pieces needed to win.
pub const WIN_LENGTH: usize = 4;
/// A match can last at most this many placements.
pub const MAX_MOVES: usize = ROWS * COLS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    Player1,
    Player2,
}

impl Cell {
    /// Owner of the piece in this cell, if any
    pub fn owner(self) -> Option<PlayerId> {
        match self {
            Cell::Empty => None,
            Cell::Player1 => Some(PlayerId::One),
            Cell::Player2 => Some(PlayerId::Two),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("column {0} is full")]
    ColumnFull(usize),

    #[error("column {0} is out of range (expected 1-7)")]
    InvalidColumn(usize),

    #[error("the match is already over")]
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    cells: [[Cell; COLS]; ROWS],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Board {
            cells: [[Cell::Empty; COLS]; ROWS],
        }
    }

    /// Get the cell at a specific position
    /// Row 0 is the top, row 5 is the bottom
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    /// The raw grid, top row first
    pub fn rows(&self) -> &[[Cell; COLS]; ROWS] {
        &self.cells
    }

    /// Check if a 0-indexed column is full
    pub fn is_column_full(&self, col: usize) -> bool {
        if col >= COLS {
            return true;
        }
        self.cells[0][col] != Cell::Empty
    }

    /// Drop a piece into a 1-indexed column, returns the row where it landed.
    ///
    /// The board is left untouched when the column is out of range or full.
    pub fn drop_piece(&mut self, column: usize, player: PlayerId) -> Result<usize, MoveError> {
        if !(1..=COLS).contains(&column) {
            return Err(MoveError::InvalidColumn(column));
        }
        let col = column - 1;

        let row = (0..ROWS)
            .rev()
            .find(|&row| self.cells[row][col] == Cell::Empty)
            .ok_or(MoveError::ColumnFull(column))?;

        self.cells[row][col] = player.to_cell();
        Ok(row)
    }

    /// Reset every cell to empty, like pulling the slider under the grid
    pub fn clear(&mut self) {
        self.cells = [[Cell::Empty; COLS]; ROWS];
    }

    /// Check if the board is completely full
    pub fn is_full(&self) -> bool {
        (0..COLS).all(|col| self.is_column_full(col))
    }

    /// Number of pieces on the board
    pub fn piece_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|&&cell| cell != Cell::Empty)
            .count()
    }

    /// Whether every column is filled contiguously from the bottom (no floating pieces).
    pub fn is_settled(&self) -> bool {
        (0..COLS).all(|col| {
            let mut seen_empty = false;
            for row in (0..ROWS).rev() {
                match self.cells[row][col] {
                    Cell::Empty => seen_empty = true,
                    _ if seen_empty => return false,
                    _ => {}
                }
            }
            true
        })
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
