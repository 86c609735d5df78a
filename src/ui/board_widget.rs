use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

use crate::game::{Alignment, Cell, Match, PieceColor, COLS, ROWS};

/// Terminal color for a piece color.
pub fn piece_color(color: PieceColor) -> Color {
    match color {
        PieceColor::Black => Color::Black,
        PieceColor::Red => Color::Red,
        PieceColor::Green => Color::Green,
        PieceColor::Yellow => Color::Yellow,
        PieceColor::Blue => Color::Blue,
        PieceColor::Magenta => Color::Magenta,
        PieceColor::Cyan => Color::Cyan,
        PieceColor::LightGrey => Color::Gray,
        PieceColor::DarkGrey => Color::DarkGray,
        PieceColor::LightRed => Color::LightRed,
        PieceColor::LightGreen => Color::LightGreen,
        PieceColor::LightYellow => Color::LightYellow,
        PieceColor::LightBlue => Color::LightBlue,
        PieceColor::LightMagenta => Color::LightMagenta,
        PieceColor::LightCyan => Color::LightCyan,
    }
}

/// Board lines: column numbers, the caged grid, the slider edge and the
/// selection marker under `selected_column` (0-indexed).
pub fn board_lines(game: &Match, selected_column: Option<usize>) -> Vec<Line<'static>> {
    let board = game.board();
    let winning_line: Option<Alignment> = game.winning_line();
    let [player1, player2] = game.players();

    let mut lines = Vec::with_capacity(ROWS * 2 + 4);

    // Column numbers
    let mut numbers = vec![Span::raw(" ")];
    for col in 0..COLS {
        let style = if selected_column == Some(col) {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::Black).bg(Color::White)
        };
        numbers.push(Span::styled(format!(" {} ", col + 1), style));
        numbers.push(Span::raw(" "));
    }
    lines.push(Line::from(numbers));

    let divider = format!("{}+", "+---".repeat(COLS));
    for row in 0..ROWS {
        lines.push(Line::from(divider.clone()));

        let mut spans = Vec::with_capacity(COLS * 2 + 1);
        for col in 0..COLS {
            spans.push(Span::raw("| "));
            let (glyph, mut style) = match board.get(row, col) {
                Cell::Empty => (' ', Style::default()),
                Cell::Player1 => (
                    player1.glyph().as_char(),
                    Style::default().fg(piece_color(player1.color())),
                ),
                Cell::Player2 => (
                    player2.glyph().as_char(),
                    Style::default().fg(piece_color(player2.color())),
                ),
            };
            if winning_line.is_some_and(|line| line.contains(row, col)) {
                style = style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
            } else if game.last_move() == Some((row, col)) {
                style = style.add_modifier(Modifier::BOLD);
            }
            spans.push(Span::styled(glyph.to_string(), style));
            spans.push(Span::raw(" "));
        }
        spans.push(Span::raw("|"));
        lines.push(Line::from(spans));
    }

    // Slider
    lines.push(Line::from(format!("{}+", "+===".repeat(COLS))));

    let mut indicator = vec![Span::raw(" ")];
    for col in 0..COLS {
        if selected_column == Some(col) {
            indicator.push(Span::styled(" ▲ ", Style::default().fg(Color::Cyan)));
        } else {
            indicator.push(Span::raw("   "));
        }
        indicator.push(Span::raw(" "));
    }
    lines.push(Line::from(indicator));

    lines
}
