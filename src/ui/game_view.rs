use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::board_widget::{board_lines, piece_color};
use crate::game::{Match, MatchStatus, Player};

pub fn render(
    frame: &mut Frame,
    game: &Match,
    selected_column: usize,
    input: &str,
    message: &Option<String>,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Header
            Constraint::Length(2),  // Players
            Constraint::Min(16),    // Board
            Constraint::Length(3),  // Message
            Constraint::Length(3),  // Command line
            Constraint::Length(3),  // Controls
        ])
        .split(frame.area());

    let selected = (!game.is_terminal()).then_some(selected_column);

    render_header(frame, game, chunks[0]);
    render_players(frame, game, chunks[1]);
    frame.render_widget(
        Paragraph::new(board_lines(game, selected)).alignment(Alignment::Center),
        chunks[2],
    );
    render_message(frame, message, chunks[3]);
    render_input(frame, game, input, chunks[4]);
    render_controls(frame, game.is_terminal(), chunks[5]);
}

fn player_span(player: &Player) -> Span<'static> {
    Span::styled(
        player.name().to_string(),
        Style::default()
            .fg(piece_color(player.color()))
            .add_modifier(Modifier::BOLD),
    )
}

fn render_header(frame: &mut Frame, game: &Match, area: Rect) {
    let status = match game.status() {
        MatchStatus::InProgress => Line::from(vec![
            player_span(game.current_player()),
            Span::raw(format!("'s turn  |  move {}", game.move_count() + 1)),
        ]),
        MatchStatus::Won(winner) => Line::from(vec![
            player_span(game.player(winner)),
            Span::raw(" wins!"),
        ]),
        MatchStatus::Surrendered { winner, loser } => Line::from(vec![
            player_span(game.player(loser)),
            Span::raw(" surrendered!  "),
            player_span(game.player(winner)),
            Span::raw(" wins!"),
        ]),
        MatchStatus::Draw => Line::from("Game Draw!"),
    };

    let header = Paragraph::new(status)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Connect 4"));

    frame.render_widget(header, area);
}

fn render_players(frame: &mut Frame, game: &Match, area: Rect) {
    let lines: Vec<Line> = game
        .players()
        .iter()
        .map(|player| {
            Line::from(vec![
                Span::raw(format!("P{} ", player.id().number())),
                player_span(player),
                Span::raw(" = "),
                Span::styled(
                    player.glyph().to_string(),
                    Style::default().fg(piece_color(player.color())),
                ),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn render_message(frame: &mut Frame, message: &Option<String>, area: Rect) {
    let text = message.as_deref().unwrap_or("");
    let msg_widget = Paragraph::new(text)
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(msg_widget, area);
}

fn render_input(frame: &mut Frame, game: &Match, input: &str, area: Rect) {
    let prompt = if game.is_terminal() {
        "Play again? (y / n): ".to_string()
    } else {
        format!("{}'s turn: ", game.current_player().name())
    };
    let line = Line::from(vec![
        Span::styled(prompt, Style::default().fg(Color::Cyan)),
        Span::raw(input.to_string()),
        Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
    ]);

    let widget = Paragraph::new(line).block(Block::default().borders(Borders::ALL).title("Command"));
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, finished: bool, area: Rect) {
    let text = if finished {
        "Y: Rematch  |  N / Esc: Quit"
    } else {
        "Type 1-7, clear or surrender + Enter  |  ←/→ + Enter: Drop  |  Esc: Quit"
    };

    let controls = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Controls"));

    frame.render_widget(controls, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Command, PieceColor, PieceGlyph, PlayerId};
    use ratatui::{backend::TestBackend, Terminal};

    fn screen_text(game: &Match, message: &Option<String>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 40)).unwrap();
        terminal
            .draw(|f| render(f, game, 3, "", message))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn new_match() -> Match {
        Match::new([
            Player::new(PlayerId::One, "alice", PieceColor::Red, PieceGlyph::new('O').unwrap())
                .unwrap(),
            Player::new(PlayerId::Two, "bobby", PieceColor::Blue, PieceGlyph::new('X').unwrap())
                .unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn test_render_in_progress() {
        let game = new_match();
        let text = screen_text(&game, &None);
        assert!(text.contains("Connect 4"));
        assert!(text.contains("alice's turn"));
        assert!(text.contains("bobby = X"));
    }

    #[test]
    fn test_render_surrender() {
        let mut game = new_match();
        game.apply(Command::Surrender).unwrap();
        let text = screen_text(&game, &Some("alice surrendered!".to_string()));
        assert!(text.contains("bobby wins!"));
        assert!(text.contains("Play again? (y / n)"));
    }
}
