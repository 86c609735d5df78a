//! Core Connect Four game logic: board representation, players, the victory
//! checker, and the turn-by-turn match state machine.

mod board;
mod player;
mod state;
mod victory;

pub use board::{Board, Cell, MoveError, COLS, MAX_MOVES, ROWS, WIN_LENGTH};
pub use player::{
    is_guest_name, validate_name, PieceColor, PieceGlyph, Player, PlayerError, PlayerId,
    GUEST_NAMES,
};
pub use state::{Command, CommandError, Match, MatchError, MatchOutcome, MatchStatus};
pub use victory::{Alignment, Direction, VictoryChecker};
