//! Referee for a match: rescans the whole board on demand for four-in-a-row,
//! then falls back to surrender flags.

use super::board::{Board, COLS, ROWS, WIN_LENGTH};
use super::player::{Player, PlayerId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Left to right along a row
    Horizontal,
    /// Top to bottom along a column
    Vertical,
    /// Top-left to bottom-right, \
    DiagonalDownRight,
    /// Top-right to bottom-left, /
    DiagonalDownLeft,
}

impl Direction {
    /// (row, col) step between consecutive cells
    fn step(self) -> (isize, isize) {
        match self {
            Direction::Horizontal => (0, 1),
            Direction::Vertical => (1, 0),
            Direction::DiagonalDownRight => (1, 1),
            Direction::DiagonalDownLeft => (1, -1),
        }
    }
}

/// A completed line of `WIN_LENGTH` same-owner pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alignment {
    pub owner: PlayerId,
    pub direction: Direction,
    /// 0-indexed (row, col) of the first cell, row 0 at the top
    pub start: (usize, usize),
}

impl Alignment {
    /// Every cell of the line, starting from `start`
    pub fn cells(&self) -> [(usize, usize); WIN_LENGTH] {
        let (dr, dc) = self.direction.step();
        let (row, col) = self.start;
        std::array::from_fn(|i| {
            (
                row.wrapping_add_signed(dr * i as isize),
                col.wrapping_add_signed(dc * i as isize),
            )
        })
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        self.cells().contains(&(row, col))
    }
}

pub struct VictoryChecker<'a> {
    board: &'a Board,
    players: &'a [Player; 2],
}

impl<'a> VictoryChecker<'a> {
    pub fn new(board: &'a Board, players: &'a [Player; 2]) -> Self {
        VictoryChecker { board, players }
    }

    /// Owner of the `WIN_LENGTH` cells starting at (row, col) in `direction`,
    /// if they are all the same non-empty cell. Lines running off the board
    /// have no owner.
    fn line_owner(&self, row: usize, col: usize, direction: Direction) -> Option<PlayerId> {
        let (dr, dc) = direction.step();
        let reach = WIN_LENGTH as isize - 1;
        let end_row = row as isize + dr * reach;
        let end_col = col as isize + dc * reach;
        if !(0..ROWS as isize).contains(&end_row) || !(0..COLS as isize).contains(&end_col) {
            return None;
        }

        let first = self.board.get(row, col);
        let owner = first.owner()?;
        let aligned = (1..WIN_LENGTH as isize).all(|i| {
            let r = (row as isize + dr * i) as usize;
            let c = (col as isize + dc * i) as usize;
            self.board.get(r, c) == first
        });
        aligned.then_some(owner)
    }

    fn scan(
        &self,
        direction: Direction,
        mut starts: impl Iterator<Item = (usize, usize)>,
    ) -> Option<Alignment> {
        starts.find_map(|(row, col)| {
            self.line_owner(row, col, direction).map(|owner| Alignment {
                owner,
                direction,
                start: (row, col),
            })
        })
    }

    /// Four in a row along any row
    pub fn horizontal(&self) -> Option<Alignment> {
        let starts = (0..ROWS).flat_map(|row| (0..=COLS - WIN_LENGTH).map(move |col| (row, col)));
        self.scan(Direction::Horizontal, starts)
    }

    /// Four in a row along any column
    pub fn vertical(&self) -> Option<Alignment> {
        let starts = (0..COLS).flat_map(|col| (0..=ROWS - WIN_LENGTH).map(move |row| (row, col)));
        self.scan(Direction::Vertical, starts)
    }

    /// Four in a row along either diagonal, down-right lines first
    pub fn diagonal(&self) -> Option<Alignment> {
        let down_right =
            (0..=ROWS - WIN_LENGTH).flat_map(|row| (0..=COLS - WIN_LENGTH).map(move |col| (row, col)));
        let down_left =
            (0..=ROWS - WIN_LENGTH).flat_map(|row| (WIN_LENGTH - 1..COLS).map(move |col| (row, col)));

        self.scan(Direction::DiagonalDownRight, down_right)
            .or_else(|| self.scan(Direction::DiagonalDownLeft, down_left))
    }

    /// The opponent of whichever player surrendered
    pub fn surrender(&self) -> Option<&'a Player> {
        let [first, second] = self.players;
        if first.surrendered() {
            Some(second)
        } else if second.surrendered() {
            Some(first)
        } else {
            None
        }
    }

    /// First four-in-a-row on the board: horizontal, then vertical, then diagonal
    pub fn find_alignment(&self) -> Option<Alignment> {
        self.horizontal()
            .or_else(|| self.vertical())
            .or_else(|| self.diagonal())
    }

    /// The winning player, if any. A board win takes precedence over a surrender.
    pub fn check_victory(&self) -> Option<&'a Player> {
        match self.find_alignment() {
            Some(alignment) => Some(&self.players[alignment.owner.index()]),
            None => self.surrender(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::player::{PieceColor, PieceGlyph};

    fn players() -> [Player; 2] {
        [
            Player::new(
                PlayerId::One,
                "alice",
                PieceColor::Red,
                PieceGlyph::new('O').unwrap(),
            )
            .unwrap(),
            Player::new(
                PlayerId::Two,
                "bobby",
                PieceColor::Blue,
                PieceGlyph::new('X').unwrap(),
            )
            .unwrap(),
        ]
    }

    /// Drop pieces alternately starting with player one (1-indexed columns).
    fn play(columns: &[usize]) -> Board {
        let mut board = Board::new();
        let mut turn = PlayerId::One;
        for &column in columns {
            board.drop_piece(column, turn).unwrap();
            turn = turn.other();
        }
        board
    }

    #[test]
    fn test_empty_board_has_no_winner() {
        let board = Board::new();
        let players = players();
        let checker = VictoryChecker::new(&board, &players);
        assert!(checker.check_victory().is_none());
        assert!(checker.find_alignment().is_none());
    }

    #[test]
    fn test_three_in_a_row_is_not_a_win() {
        let mut board = Board::new();
        for column in 1..=3 {
            board.drop_piece(column, PlayerId::One).unwrap();
        }
        for _ in 0..3 {
            board.drop_piece(7, PlayerId::Two).unwrap();
        }
        let players = players();
        let checker = VictoryChecker::new(&board, &players);
        assert!(checker.check_victory().is_none());
    }

    #[test]
    fn test_horizontal_win() {
        let board = play(&[1, 1, 2, 2, 3, 3, 4]);
        let players = players();
        let checker = VictoryChecker::new(&board, &players);

        let alignment = checker.horizontal().unwrap();
        assert_eq!(alignment.owner, PlayerId::One);
        assert_eq!(alignment.start, (5, 0));
        assert_eq!(checker.check_victory().map(Player::name), Some("alice"));
    }

    #[test]
    fn test_horizontal_win_away_from_edge() {
        let mut board = Board::new();
        for column in 4..=7 {
            board.drop_piece(column, PlayerId::Two).unwrap();
        }
        let players = players();
        let checker = VictoryChecker::new(&board, &players);
        let alignment = checker.find_alignment().unwrap();
        assert_eq!(alignment.start, (5, 3));
        assert_eq!(checker.check_victory().map(Player::id), Some(PlayerId::Two));
    }

    #[test]
    fn test_vertical_win() {
        let board = play(&[1, 2, 1, 2, 1, 2, 1]);
        let players = players();
        let checker = VictoryChecker::new(&board, &players);

        assert!(checker.horizontal().is_none());
        let alignment = checker.vertical().unwrap();
        assert_eq!(alignment.direction, Direction::Vertical);
        assert_eq!(alignment.cells(), [(2, 0), (3, 0), (4, 0), (5, 0)]);
        assert_eq!(checker.check_victory().map(Player::id), Some(PlayerId::One));
    }

    #[test]
    fn test_vertical_win_at_top_of_column() {
        let mut board = Board::new();
        board.drop_piece(5, PlayerId::One).unwrap();
        board.drop_piece(5, PlayerId::One).unwrap();
        for _ in 0..4 {
            board.drop_piece(5, PlayerId::Two).unwrap();
        }
        let players = players();
        let checker = VictoryChecker::new(&board, &players);
        let alignment = checker.vertical().unwrap();
        assert_eq!(alignment.start, (0, 4));
        assert_eq!(alignment.owner, PlayerId::Two);
    }

    #[test]
    fn test_diagonal_down_left_win() {
        // Rising to the right (/), which reads top-right to bottom-left
        let mut board = Board::new();
        board.drop_piece(1, PlayerId::One).unwrap();

        board.drop_piece(2, PlayerId::Two).unwrap();
        board.drop_piece(2, PlayerId::One).unwrap();

        board.drop_piece(3, PlayerId::Two).unwrap();
        board.drop_piece(3, PlayerId::Two).unwrap();
        board.drop_piece(3, PlayerId::One).unwrap();

        board.drop_piece(4, PlayerId::Two).unwrap();
        board.drop_piece(4, PlayerId::Two).unwrap();
        board.drop_piece(4, PlayerId::Two).unwrap();
        board.drop_piece(4, PlayerId::One).unwrap();

        let players = players();
        let checker = VictoryChecker::new(&board, &players);
        assert!(checker.horizontal().is_none());
        assert!(checker.vertical().is_none());

        let alignment = checker.diagonal().unwrap();
        assert_eq!(alignment.direction, Direction::DiagonalDownLeft);
        assert_eq!(alignment.start, (2, 3));
        assert!(alignment.contains(5, 0));
        assert_eq!(checker.check_victory().map(Player::id), Some(PlayerId::One));
    }

    #[test]
    fn test_diagonal_down_right_win() {
        let mut board = Board::new();
        board.drop_piece(7, PlayerId::Two).unwrap();

        board.drop_piece(6, PlayerId::One).unwrap();
        board.drop_piece(6, PlayerId::Two).unwrap();

        board.drop_piece(5, PlayerId::One).unwrap();
        board.drop_piece(5, PlayerId::One).unwrap();
        board.drop_piece(5, PlayerId::Two).unwrap();

        board.drop_piece(4, PlayerId::One).unwrap();
        board.drop_piece(4, PlayerId::One).unwrap();
        board.drop_piece(4, PlayerId::One).unwrap();
        board.drop_piece(4, PlayerId::Two).unwrap();

        let players = players();
        let checker = VictoryChecker::new(&board, &players);
        let alignment = checker.diagonal().unwrap();
        assert_eq!(alignment.direction, Direction::DiagonalDownRight);
        assert_eq!(alignment.cells(), [(2, 3), (3, 4), (4, 5), (5, 6)]);
        assert_eq!(checker.check_victory().map(Player::id), Some(PlayerId::Two));
    }

    #[test]
    fn test_mixed_owners_do_not_align() {
        let board = play(&[1, 2, 3, 4, 5, 6, 7]);
        let players = players();
        let checker = VictoryChecker::new(&board, &players);
        assert!(checker.check_victory().is_none());
    }

    #[test]
    fn test_surrender_gives_win_to_opponent() {
        let board = Board::new();
        let mut players = players();
        players[0].set_surrendered(true);
        let checker = VictoryChecker::new(&board, &players);
        assert_eq!(checker.surrender().map(Player::id), Some(PlayerId::Two));
        assert_eq!(checker.check_victory().map(Player::id), Some(PlayerId::Two));

        let mut players = self::players();
        players[1].set_surrendered(true);
        let checker = VictoryChecker::new(&board, &players);
        assert_eq!(checker.check_victory().map(Player::id), Some(PlayerId::One));
    }

    #[test]
    fn test_board_win_takes_precedence_over_surrender() {
        // Player two has four in a row, but player two's flag is set too.
        let mut board = Board::new();
        for column in 1..=4 {
            board.drop_piece(column, PlayerId::Two).unwrap();
        }
        let mut players = players();
        players[1].set_surrendered(true);

        let checker = VictoryChecker::new(&board, &players);
        assert_eq!(checker.check_victory().map(Player::id), Some(PlayerId::Two));
    }

    #[test]
    fn test_surrender_with_opponent_board_win_still_goes_to_opponent() {
        let mut board = Board::new();
        for _ in 0..4 {
            board.drop_piece(2, PlayerId::Two).unwrap();
        }
        let mut players = players();
        players[0].set_surrendered(true);

        let checker = VictoryChecker::new(&board, &players);
        assert_eq!(checker.check_victory().map(Player::id), Some(PlayerId::Two));
    }
}
