//! Flat-file user accounts: registration, PIN login, piece preferences and
//! game statistics, stored as a JSON list.

mod record;
mod store;

pub use record::{validate_pin, MatchResult, StatsRow, UserRecord};
pub use store::{LeaderboardSort, StatsRecorder, UserStore};
