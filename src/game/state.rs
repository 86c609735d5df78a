use std::str::FromStr;

use log::{debug, info};

use super::board::{Board, MoveError, COLS, MAX_MOVES};
use super::player::{Player, PlayerId};
use super::victory::{Alignment, VictoryChecker};

/// A sanitized player command: `1`-`7`, `clear` or `surrender`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Drop a piece into a 1-indexed column
    Drop(usize),
    Clear,
    Surrender,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("invalid command '{0}': enter a column 1-7, 'clear' or 'surrender'")]
    Unrecognized(String),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim().to_ascii_lowercase();
        match input.as_str() {
            "clear" => Ok(Command::Clear),
            "surrender" => Ok(Command::Surrender),
            digit => match digit.parse::<usize>() {
                // Only a single digit counts, so "01" or "+3" are rejected
                Ok(column) if digit.len() == 1 && (1..=COLS).contains(&column) => {
                    Ok(Command::Drop(column))
                }
                _ => Err(CommandError::Unrecognized(s.to_string())),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStatus {
    InProgress,
    Won(PlayerId),
    Draw,
    Surrendered { winner: PlayerId, loser: PlayerId },
}

impl MatchStatus {
    pub fn is_terminal(self) -> bool {
        self != MatchStatus::InProgress
    }

    pub fn winner(self) -> Option<PlayerId> {
        match self {
            MatchStatus::Won(winner) | MatchStatus::Surrendered { winner, .. } => Some(winner),
            MatchStatus::InProgress | MatchStatus::Draw => None,
        }
    }
}

/// Result of a finished match, keyed by display names for the stats store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOutcome {
    /// Both participants, player one first
    pub players: [String; 2],
    /// `None` on a draw
    pub winner: Option<String>,
    pub surrendered: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    #[error("both players use {color} '{glyph}' pieces; change a color or piece type first")]
    IndistinguishablePieces { color: String, glyph: char },

    #[error("players must be seated as player 1 then player 2")]
    SeatMismatch,
}

/// One match session: owns the board and both players from first move to result.
#[derive(Debug, Clone)]
pub struct Match {
    board: Board,
    players: [Player; 2],
    turn: PlayerId,
    move_count: usize,
    status: MatchStatus,
    last_move: Option<(usize, usize)>,
}

impl Match {
    pub fn new(players: [Player; 2]) -> Result<Self, MatchError> {
        if players[0].id() != PlayerId::One || players[1].id() != PlayerId::Two {
            return Err(MatchError::SeatMismatch);
        }
        if players[0].looks_like(&players[1]) {
            return Err(MatchError::IndistinguishablePieces {
                color: players[0].color().to_string(),
                glyph: players[0].glyph().as_char(),
            });
        }

        Ok(Match {
            board: Board::new(),
            players,
            turn: PlayerId::One, // Player one starts
            move_count: 0,
            status: MatchStatus::InProgress,
            last_move: None,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn players(&self) -> &[Player; 2] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id.index()]
    }

    /// Whose turn it is
    pub fn turn(&self) -> PlayerId {
        self.turn
    }

    pub fn current_player(&self) -> &Player {
        self.player(self.turn)
    }

    pub fn move_count(&self) -> usize {
        self.move_count
    }

    pub fn status(&self) -> MatchStatus {
        self.status
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// (row, col) of the most recent piece, for highlighting
    pub fn last_move(&self) -> Option<(usize, usize)> {
        self.last_move
    }

    /// The four-in-a-row currently on the board, if any
    pub fn winning_line(&self) -> Option<Alignment> {
        VictoryChecker::new(&self.board, &self.players).find_alignment()
    }

    /// Apply a command for the player whose turn it is.
    ///
    /// Errors leave the match untouched so the caller can simply re-prompt.
    pub fn apply(&mut self, command: Command) -> Result<MatchStatus, MoveError> {
        if self.is_terminal() {
            return Err(MoveError::GameOver);
        }

        match command {
            Command::Drop(column) => self.drop_piece(column),
            Command::Clear => {
                self.clear();
                Ok(self.status)
            }
            Command::Surrender => Ok(self.surrender()),
        }
    }

    fn drop_piece(&mut self, column: usize) -> Result<MatchStatus, MoveError> {
        let row = self.board.drop_piece(column, self.turn)?;
        self.move_count += 1;
        self.last_move = Some((row, column - 1));
        debug!(
            "move {}: {} dropped into column {column}",
            self.move_count,
            self.current_player().name()
        );

        let winner = VictoryChecker::new(&self.board, &self.players)
            .check_victory()
            .map(Player::id);

        if let Some(winner) = winner {
            self.status = MatchStatus::Won(winner);
            info!("{} wins after {} moves", self.player(winner).name(), self.move_count);
        } else if self.move_count == MAX_MOVES {
            self.status = MatchStatus::Draw;
            info!("board full, match drawn");
        } else {
            self.turn = self.turn.other();
        }

        Ok(self.status)
    }

    /// Empty the board and hand the first move back to player one.
    /// Surrender flags are left alone.
    fn clear(&mut self) {
        self.board.clear();
        self.move_count = 0;
        self.turn = PlayerId::One;
        self.last_move = None;
        debug!("board cleared");
    }

    fn surrender(&mut self) -> MatchStatus {
        let loser = self.turn;
        self.players[loser.index()].set_surrendered(true);

        let winner = VictoryChecker::new(&self.board, &self.players)
            .check_victory()
            .map_or(loser.other(), Player::id);

        self.status = MatchStatus::Surrendered { winner, loser };
        info!("{} surrendered", self.player(loser).name());
        self.status
    }

    /// Reset everything for a new game between the same two players.
    pub fn rematch(&mut self) {
        self.clear();
        for player in &mut self.players {
            player.set_surrendered(false);
        }
        self.status = MatchStatus::InProgress;
    }

    /// The finished match as names, or `None` while still in progress.
    pub fn outcome(&self) -> Option<MatchOutcome> {
        if !self.is_terminal() {
            return None;
        }

        let name = |id: PlayerId| self.player(id).name().to_string();
        let surrendered = match self.status {
            MatchStatus::Surrendered { loser, .. } => Some(name(loser)),
            _ => None,
        };

        Some(MatchOutcome {
            players: [name(PlayerId::One), name(PlayerId::Two)],
            winner: self.status.winner().map(name),
            surrendered,
        })
    }
}
