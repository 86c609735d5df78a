use crate::accounts::StatsRecorder;
use crate::game::{Command, Match, MatchStatus, MoveError, COLS};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::{error, info};
use ratatui::{backend::Backend, Terminal};
use std::io;

/// Longest command a player can type ("surrender")
const MAX_INPUT: usize = 9;

pub struct App<R: StatsRecorder> {
    game: Match,
    recorder: R,
    selected_column: usize,
    input: String,
    should_quit: bool,
    message: Option<String>,
}

impl<R: StatsRecorder> App<R> {
    pub fn new(game: Match, recorder: R) -> Self {
        App {
            game,
            recorder,
            selected_column: COLS / 2, // Start in middle
            input: String::new(),
            should_quit: false,
            message: None,
        }
    }

    pub fn game(&self) -> &Match {
        &self.game
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Hand back the recorder once the session is over
    pub fn into_recorder(self) -> R {
        self.recorder
    }

    /// Main application loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            self.handle_events()?;
        }
        Ok(())
    }

    /// Handle keyboard events
    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key);
                }
            }
        }
        Ok(())
    }

    /// Handle key press
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Esc
            || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
        {
            self.should_quit = true;
            return;
        }

        if self.game.is_terminal() {
            self.handle_finished_key(key);
            return;
        }

        match key.code {
            KeyCode::Left => {
                self.selected_column = self.selected_column.saturating_sub(1);
            }
            KeyCode::Right => {
                if self.selected_column < COLS - 1 {
                    self.selected_column += 1;
                }
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(c) => {
                if self.input.len() < MAX_INPUT {
                    self.input.push(c);
                }
            }
            KeyCode::Enter => {
                if self.input.trim().is_empty() {
                    self.input.clear();
                    self.submit(Command::Drop(self.selected_column + 1));
                } else {
                    self.submit_input();
                }
            }
            _ => {}
        }
    }

    /// After a result only "play again?" answers are accepted
    fn handle_finished_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.game.rematch();
                self.selected_column = COLS / 2;
                self.input.clear();
                self.message = Some("Rematch! Good luck.".to_string());
                info!("rematch started");
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Char('q') => {
                self.should_quit = true;
            }
            _ => {
                self.message = Some("Play again? Press y or n.".to_string());
            }
        }
    }

    fn submit_input(&mut self) {
        let input = std::mem::take(&mut self.input);
        match input.parse::<Command>() {
            Ok(command) => self.submit(command),
            Err(e) => self.message = Some(format!("{e}. Please try again.")),
        }
    }

    /// Apply a command; rejected commands leave the turn with the same player
    pub fn submit(&mut self, command: Command) {
        self.message = None;

        match self.game.apply(command) {
            Ok(MatchStatus::InProgress) => {
                if let Command::Drop(column) = command {
                    self.selected_column = column - 1;
                }
                if command == Command::Clear {
                    self.message = Some("Board cleared. Player 1 starts again.".to_string());
                }
            }
            Ok(status) => self.finish(status),
            Err(e @ MoveError::ColumnFull(_)) => {
                self.message = Some(format!("{e}. Please try again."));
            }
            Err(e @ MoveError::InvalidColumn(_)) => {
                self.message = Some(format!("{e}."));
            }
            Err(MoveError::GameOver) => {
                self.message = Some("Game over! Press y to play again.".to_string());
            }
        }
    }

    /// Announce the result and pass it on to the stats store, once per game
    fn finish(&mut self, status: MatchStatus) {
        let name = |id| self.game.player(id).name().to_string();
        let announcement = match status {
            MatchStatus::Won(winner) => format!("{} wins!", name(winner)),
            MatchStatus::Surrendered { winner, loser } => {
                format!("{} surrendered! {} wins!", name(loser), name(winner))
            }
            MatchStatus::Draw => "Game Draw!".to_string(),
            MatchStatus::InProgress => return,
        };

        let Some(outcome) = self.game.outcome() else {
            return;
        };
        self.message = match self.recorder.record_outcome(&outcome) {
            Ok(()) => Some(announcement),
            Err(e) => {
                error!("failed to record match result: {e}");
                Some(format!("{announcement} (stats not saved: {e})"))
            }
        };
    }

    /// Render the UI
    fn render(&self, frame: &mut ratatui::Frame) {
        super::game_view::render(
            frame,
            &self.game,
            self.selected_column,
            &self.input,
            &self.message,
        );
    }
}
