use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::board::Cell;

/// Names handed to players who did not sign in. Their stats are never recorded.
pub const GUEST_NAMES: [&str; 2] = ["Guest1", "Guest2"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlayerError {
    #[error(
        "invalid player name '{0}': use 5-20 letters, digits, '.', '_' or '-', \
         starting and ending with a letter or digit"
    )]
    InvalidName(String),

    #[error("invalid color '{0}'")]
    InvalidColor(String),

    #[error("invalid piece type '{0}': use a single letter or digit")]
    InvalidPiece(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerId {
    One,
    Two,
}

impl PlayerId {
    /// Get the other player
    pub fn other(self) -> PlayerId {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }

    /// Convert player to cell type
    pub fn to_cell(self) -> Cell {
        match self {
            PlayerId::One => Cell::Player1,
            PlayerId::Two => Cell::Player2,
        }
    }

    /// Position in a `[_; 2]` array of per-player data
    pub fn index(self) -> usize {
        match self {
            PlayerId::One => 0,
            PlayerId::Two => 1,
        }
    }

    /// Player number as shown to users
    pub fn number(self) -> u8 {
        match self {
            PlayerId::One => 1,
            PlayerId::Two => 2,
        }
    }
}

/// Terminal colors a piece can be drawn in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PieceColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    LightGrey,
    DarkGrey,
    LightRed,
    LightGreen,
    LightYellow,
    LightBlue,
    LightMagenta,
    LightCyan,
}

impl PieceColor {
    pub const ALL: [PieceColor; 15] = [
        PieceColor::Black,
        PieceColor::Red,
        PieceColor::Green,
        PieceColor::Yellow,
        PieceColor::Blue,
        PieceColor::Magenta,
        PieceColor::Cyan,
        PieceColor::LightGrey,
        PieceColor::DarkGrey,
        PieceColor::LightRed,
        PieceColor::LightGreen,
        PieceColor::LightYellow,
        PieceColor::LightBlue,
        PieceColor::LightMagenta,
        PieceColor::LightCyan,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PieceColor::Black => "black",
            PieceColor::Red => "red",
            PieceColor::Green => "green",
            PieceColor::Yellow => "yellow",
            PieceColor::Blue => "blue",
            PieceColor::Magenta => "magenta",
            PieceColor::Cyan => "cyan",
            PieceColor::LightGrey => "light_grey",
            PieceColor::DarkGrey => "dark_grey",
            PieceColor::LightRed => "light_red",
            PieceColor::LightGreen => "light_green",
            PieceColor::LightYellow => "light_yellow",
            PieceColor::LightBlue => "light_blue",
            PieceColor::LightMagenta => "light_magenta",
            PieceColor::LightCyan => "light_cyan",
        }
    }
}

impl fmt::Display for PieceColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PieceColor {
    type Err = PlayerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        PieceColor::ALL
            .into_iter()
            .find(|color| color.name() == wanted)
            .ok_or_else(|| PlayerError::InvalidColor(s.to_string()))
    }
}

/// The single character a player's pieces are drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PieceGlyph(char);

impl PieceGlyph {
    pub fn new(glyph: char) -> Result<Self, PlayerError> {
        if glyph.is_ascii_alphanumeric() {
            Ok(PieceGlyph(glyph))
        } else {
            Err(PlayerError::InvalidPiece(glyph.to_string()))
        }
    }

    pub fn as_char(self) -> char {
        self.0
    }
}

impl fmt::Display for PieceGlyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PieceGlyph {
    type Err = PlayerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(glyph), None) => PieceGlyph::new(glyph),
            _ => Err(PlayerError::InvalidPiece(s.to_string())),
        }
    }
}

impl TryFrom<String> for PieceGlyph {
    type Error = PlayerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PieceGlyph> for String {
    fn from(glyph: PieceGlyph) -> Self {
        glyph.0.to_string()
    }
}

/// Check a user or player name: 5-20 characters of `[A-Za-z0-9._-]`,
/// first and last alphanumeric.
pub fn validate_name(name: &str) -> Result<(), PlayerError> {
    let bytes = name.as_bytes();
    let allowed = |b: &u8| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'-');

    let valid = (5..=20).contains(&bytes.len())
        && bytes.iter().all(allowed)
        && bytes.first().is_some_and(u8::is_ascii_alphanumeric)
        && bytes.last().is_some_and(u8::is_ascii_alphanumeric);

    if valid {
        Ok(())
    } else {
        Err(PlayerError::InvalidName(name.to_string()))
    }
}

/// Whether the name belongs to a guest account (case-insensitive).
pub fn is_guest_name(name: &str) -> bool {
    name.eq_ignore_ascii_case("guest") || GUEST_NAMES.iter().any(|g| g.eq_ignore_ascii_case(name))
}

/// One side of a match: identity, how its pieces look, and whether it gave up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    id: PlayerId,
    name: String,
    color: PieceColor,
    glyph: PieceGlyph,
    surrendered: bool,
}

impl Player {
    pub fn new(
        id: PlayerId,
        name: impl Into<String>,
        color: PieceColor,
        glyph: PieceGlyph,
    ) -> Result<Self, PlayerError> {
        let name = name.into();
        validate_name(&name)?;
        Ok(Player {
            id,
            name,
            color,
            glyph,
            surrendered: false,
        })
    }

    /// A guest player named `Guest1` or `Guest2` according to its id.
    pub fn guest(id: PlayerId, color: PieceColor, glyph: PieceGlyph) -> Self {
        Player {
            id,
            name: GUEST_NAMES[id.index()].to_string(),
            color,
            glyph,
            surrendered: false,
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> PieceColor {
        self.color
    }

    pub fn glyph(&self) -> PieceGlyph {
        self.glyph
    }

    pub fn is_guest(&self) -> bool {
        is_guest_name(&self.name)
    }

    pub fn surrendered(&self) -> bool {
        self.surrendered
    }

    pub fn set_surrendered(&mut self, surrendered: bool) {
        self.surrendered = surrendered;
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), PlayerError> {
        let name = name.into();
        validate_name(&name)?;
        self.name = name;
        Ok(())
    }

    pub fn set_color(&mut self, color: PieceColor) {
        self.color = color;
    }

    pub fn set_glyph(&mut self, glyph: PieceGlyph) {
        self.glyph = glyph;
    }

    /// Set the color from user text such as `"light_blue"`.
    pub fn set_color_str(&mut self, color: &str) -> Result<(), PlayerError> {
        self.set_color(color.parse()?);
        Ok(())
    }

    /// Set the glyph from user text; must be one letter or digit.
    pub fn set_glyph_str(&mut self, glyph: &str) -> Result<(), PlayerError> {
        self.set_glyph(glyph.parse()?);
        Ok(())
    }

    /// Two players whose pieces render identically cannot share a board.
    pub fn looks_like(&self, other: &Player) -> bool {
        self.color == other.color && self.glyph == other.glyph
    }
}
