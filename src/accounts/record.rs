use serde::{Deserialize, Serialize};

use crate::error::AccountError;
use crate::game::{validate_name, PieceColor, PieceGlyph};

/// How a single finished match went for one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchResult {
    Win,
    Loss,
    Draw,
}

/// One entry of the user record file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    pub pin: String,
    pub games_played: u32,
    pub wins: u32,
    pub losses: u32,
    /// (wins + draws / 2) / games played, as a percentage rounded to 2 places
    pub win_ratio: f64,
    pub color: PieceColor,
    pub piece_type: PieceGlyph,
    #[serde(with = "yes_no")]
    pub logged_in: bool,
}

impl UserRecord {
    /// A fresh account with no games. The username and PIN are validated here.
    pub fn new(
        username: &str,
        pin: &str,
        color: PieceColor,
        piece_type: PieceGlyph,
    ) -> Result<Self, AccountError> {
        validate_name(username)?;
        validate_pin(pin)?;
        Ok(UserRecord {
            username: username.to_string(),
            pin: pin.to_string(),
            games_played: 0,
            wins: 0,
            losses: 0,
            win_ratio: 0.0,
            color,
            piece_type,
            logged_in: false,
        })
    }

    pub fn draws(&self) -> u32 {
        self.games_played.saturating_sub(self.wins + self.losses)
    }

    /// Count one more game and refresh the win ratio.
    pub fn record(&mut self, result: MatchResult) {
        self.games_played += 1;
        match result {
            MatchResult::Win => self.wins += 1,
            MatchResult::Loss => self.losses += 1,
            MatchResult::Draw => {}
        }

        let score = f64::from(self.wins) + 0.5 * f64::from(self.draws());
        let ratio = score / f64::from(self.games_played) * 100.0;
        self.win_ratio = (ratio * 100.0).round() / 100.0;
    }
}

/// A PIN is exactly four ASCII digits.
pub fn validate_pin(pin: &str) -> Result<(), AccountError> {
    if pin.len() == 4 && pin.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(AccountError::InvalidPin)
    }
}

/// Public stats of a user, without PIN, piece, or login state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsRow {
    pub username: String,
    pub games_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub win_ratio: f64,
}

impl From<&UserRecord> for StatsRow {
    fn from(record: &UserRecord) -> Self {
        StatsRow {
            username: record.username.clone(),
            games_played: record.games_played,
            wins: record.wins,
            losses: record.losses,
            win_ratio: record.win_ratio,
        }
    }
}

/// The record file stores the login flag as "y" / "n".
mod yes_no {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(if *value { "y" } else { "n" })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        match String::deserialize(deserializer)?.as_str() {
            "y" => Ok(true),
            "n" => Ok(false),
            other => Err(de::Error::invalid_value(
                de::Unexpected::Str(other),
                &"\"y\" or \"n\"",
            )),
        }
    }
}
