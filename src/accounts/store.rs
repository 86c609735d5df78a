use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::accounts::record::{validate_pin, MatchResult, StatsRow, UserRecord};
use crate::error::{AccountError, StoreError};
use crate::game::{is_guest_name, MatchOutcome, PieceColor, PieceGlyph};

/// Stat a leaderboard is ordered by, highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LeaderboardSort {
    #[default]
    Wins,
    #[value(name = "games")]
    GamesPlayed,
    #[value(name = "ratio")]
    WinRatio,
}

/// Receives finished matches so participants' stats can be updated.
pub trait StatsRecorder {
    fn record_outcome(&mut self, outcome: &MatchOutcome) -> Result<(), StoreError>;
}

impl StatsRecorder for UserStore {
    fn record_outcome(&mut self, outcome: &MatchOutcome) -> Result<(), StoreError> {
        UserStore::record_outcome(self, outcome)
    }
}

/// Flat JSON file holding every registered user.
///
/// The whole list is read on open and rewritten after each change.
#[derive(Debug)]
pub struct UserStore {
    path: PathBuf,
    users: Vec<UserRecord>,
}

impl UserStore {
    /// Open the record file, creating it as an empty list if it is missing or blank.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(source) => return Err(StoreError::Read { path, source }),
        };

        if content.trim().is_empty() {
            info!("creating empty user record file at {}", path.display());
            let store = UserStore {
                path,
                users: Vec::new(),
            };
            store.save()?;
            return Ok(store);
        }

        let users: Vec<UserRecord> =
            serde_json::from_str(&content).map_err(|source| StoreError::Parse {
                path: path.clone(),
                source,
            })?;
        debug!("loaded {} user records from {}", users.len(), path.display());

        Ok(UserStore { path, users })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn users(&self) -> &[UserRecord] {
        &self.users
    }

    pub fn find(&self, username: &str) -> Option<&UserRecord> {
        self.users.iter().find(|u| u.username == username)
    }

    fn find_mut(&mut self, username: &str) -> Result<&mut UserRecord, AccountError> {
        self.users
            .iter_mut()
            .find(|u| u.username == username)
            .ok_or_else(|| AccountError::UnknownUser(username.to_string()))
    }

    /// Create a new account. The new user starts logged in.
    pub fn register(
        &mut self,
        username: &str,
        pin: &str,
        color: PieceColor,
        piece_type: PieceGlyph,
    ) -> Result<UserRecord, AccountError> {
        if is_guest_name(username) {
            return Err(AccountError::ReservedName(username.to_string()));
        }
        if self.find(username).is_some() {
            return Err(AccountError::UsernameTaken(username.to_string()));
        }

        let mut record = UserRecord::new(username, pin, color, piece_type)?;
        record.logged_in = true;
        self.users.push(record.clone());
        self.save()?;
        info!("registered user {username}");
        Ok(record)
    }

    /// Check a username / PIN pair without logging in.
    pub fn verify(&self, username: &str, pin: &str) -> Result<&UserRecord, AccountError> {
        self.users
            .iter()
            .find(|u| u.username == username && u.pin == pin)
            .ok_or(AccountError::BadCredentials)
    }

    /// Check a username / PIN pair and mark the user logged in.
    pub fn login(&mut self, username: &str, pin: &str) -> Result<UserRecord, AccountError> {
        validate_pin(pin)?;
        let user = match self
            .users
            .iter_mut()
            .find(|u| u.username == username && u.pin == pin)
        {
            Some(user) => user,
            None => {
                warn!("rejected login for {username}");
                return Err(AccountError::BadCredentials);
            }
        };
        if user.logged_in {
            return Err(AccountError::AlreadyLoggedIn(username.to_string()));
        }

        user.logged_in = true;
        let record = user.clone();
        self.save()?;
        debug!("{username} logged in");
        Ok(record)
    }

    pub fn logout(&mut self, username: &str) -> Result<(), AccountError> {
        self.find_mut(username)?.logged_in = false;
        self.save()?;
        debug!("{username} logged out");
        Ok(())
    }

    /// Log every user out, e.g. after a previous session exited uncleanly.
    pub fn reset_logins(&mut self) -> Result<(), StoreError> {
        if self.users.iter().all(|u| !u.logged_in) {
            return Ok(());
        }
        for user in &mut self.users {
            user.logged_in = false;
        }
        self.save()
    }

    /// Change the color and piece a user plays with.
    pub fn update_piece(
        &mut self,
        username: &str,
        color: PieceColor,
        piece_type: PieceGlyph,
    ) -> Result<(), AccountError> {
        if is_guest_name(username) {
            return Err(AccountError::GuestAccount);
        }
        let user = self.find_mut(username)?;
        user.color = color;
        user.piece_type = piece_type;
        self.save()?;
        Ok(())
    }

    /// Update both participants' stats after a match. Guests and names
    /// without an account are skipped.
    pub fn record_outcome(&mut self, outcome: &MatchOutcome) -> Result<(), StoreError> {
        let mut changed = false;

        for name in &outcome.players {
            if is_guest_name(name) {
                continue;
            }
            let Some(user) = self.users.iter_mut().find(|u| &u.username == name) else {
                warn!("no account for {name}, stats not recorded");
                continue;
            };

            let result = match outcome.winner.as_deref() {
                None => MatchResult::Draw,
                Some(winner) if winner == name => MatchResult::Win,
                Some(_) => MatchResult::Loss,
            };
            user.record(result);
            changed = true;
            debug!("{name}: {result:?}, win ratio now {}%", user.win_ratio);
        }

        if changed {
            self.save()?;
        }
        Ok(())
    }

    /// Public stats for one user.
    pub fn stats(&self, username: &str) -> Option<StatsRow> {
        self.find(username).map(StatsRow::from)
    }

    /// Top `limit` users by the chosen stat.
    pub fn leaderboard(&self, sort: LeaderboardSort, limit: usize) -> Vec<StatsRow> {
        let mut rows: Vec<StatsRow> = self.users.iter().map(StatsRow::from).collect();
        rows.sort_by(|a, b| match sort {
            LeaderboardSort::Wins => b.wins.cmp(&a.wins),
            LeaderboardSort::GamesPlayed => b.games_played.cmp(&a.games_played),
            LeaderboardSort::WinRatio => b
                .win_ratio
                .partial_cmp(&a.win_ratio)
                .unwrap_or(Ordering::Equal),
        });
        rows.truncate(limit);
        rows
    }

    /// Write the whole list, via a temp file and rename.
    pub fn save(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&self.users)?;
        let tmp_path = self.path.with_extension("json.tmp");

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::Write {
                path: self.path.clone(),
                source,
            })?;
        }
        fs::write(&tmp_path, json).map_err(|source| StoreError::Write {
            path: tmp_path.clone(),
            source,
        })?;
        fs::rename(&tmp_path, &self.path).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;

        debug!("saved {} user records to {}", self.users.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glyph(c: char) -> PieceGlyph {
        PieceGlyph::new(c).unwrap()
    }

    fn store_with_users(dir: &Path) -> UserStore {
        let mut store = UserStore::open(dir.join("users.json")).unwrap();
        store
            .register("alice", "1111", PieceColor::Red, glyph('A'))
            .unwrap();
        store
            .register("bobby", "2222", PieceColor::Blue, glyph('B'))
            .unwrap();
        store.reset_logins().unwrap();
        store
    }

    fn outcome(winner: Option<&str>) -> MatchOutcome {
        MatchOutcome {
            players: ["alice".to_string(), "bobby".to_string()],
            winner: winner.map(str::to_string),
            surrendered: None,
        }
    }

    #[test]
    fn test_open_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.json");

        let store = UserStore::open(&path).unwrap();
        assert!(store.users().is_empty());
        assert_eq!(std::fs::read_to_string(&path).unwrap().trim(), "[]");
    }

    #[test]
    fn test_open_blank_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.json");
        std::fs::write(&path, "  \n").unwrap();

        let store = UserStore::open(&path).unwrap();
        assert!(store.users().is_empty());
        assert_eq!(std::fs::read_to_string(&path).unwrap().trim(), "[]");
    }

    #[test]
    fn test_open_rejects_malformed_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.json");

        for content in ["{not json", "{\"username\": \"alice\"}", "[1, 2]"] {
            std::fs::write(&path, content).unwrap();
            assert!(matches!(
                UserStore::open(&path),
                Err(StoreError::Parse { .. })
            ));
        }
    }

    #[test]
    fn test_register_persists() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_with_users(dir.path());
        assert_eq!(store.users().len(), 2);

        let reopened = UserStore::open(store.path()).unwrap();
        let alice = reopened.find("alice").unwrap();
        assert_eq!(alice.pin, "1111");
        assert_eq!(alice.color, PieceColor::Red);
        assert!(!alice.logged_in);
    }

    #[test]
    fn test_register_rejects_duplicates_and_guests() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_with_users(dir.path());

        assert!(matches!(
            store.register("alice", "9999", PieceColor::Green, glyph('Z')),
            Err(AccountError::UsernameTaken(_))
        ));
        assert!(matches!(
            store.register("Guest1", "9999", PieceColor::Green, glyph('Z')),
            Err(AccountError::ReservedName(_))
        ));
        assert!(matches!(
            store.register("carol", "99", PieceColor::Green, glyph('Z')),
            Err(AccountError::InvalidPin)
        ));
        assert_eq!(store.users().len(), 2);
    }

    #[test]
    fn test_login_and_logout() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_with_users(dir.path());

        assert!(matches!(
            store.login("alice", "2222"),
            Err(AccountError::BadCredentials)
        ));
        assert!(matches!(
            store.login("nobody", "1111"),
            Err(AccountError::BadCredentials)
        ));

        let alice = store.login("alice", "1111").unwrap();
        assert!(alice.logged_in);
        assert!(matches!(
            store.login("alice", "1111"),
            Err(AccountError::AlreadyLoggedIn(_))
        ));

        store.logout("alice").unwrap();
        assert!(!store.find("alice").unwrap().logged_in);
        assert!(store.login("alice", "1111").is_ok());
    }

    #[test]
    fn test_verify_does_not_log_in() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_with_users(dir.path());

        assert_eq!(store.verify("bobby", "2222").unwrap().username, "bobby");
        assert!(!store.find("bobby").unwrap().logged_in);
        assert!(matches!(
            store.verify("bobby", "1111"),
            Err(AccountError::BadCredentials)
        ));
    }

    #[test]
    fn test_record_win_and_loss() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_with_users(dir.path());

        store.record_outcome(&outcome(Some("alice"))).unwrap();

        let reopened = UserStore::open(store.path()).unwrap();
        let alice = reopened.find("alice").unwrap();
        let bobby = reopened.find("bobby").unwrap();
        assert_eq!((alice.games_played, alice.wins, alice.losses), (1, 1, 0));
        assert_eq!((bobby.games_played, bobby.wins, bobby.losses), (1, 0, 1));
        assert_eq!(alice.win_ratio, 100.0);
        assert_eq!(bobby.win_ratio, 0.0);
    }

    #[test]
    fn test_record_draw() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_with_users(dir.path());

        store.record_outcome(&outcome(None)).unwrap();

        for name in ["alice", "bobby"] {
            let user = store.find(name).unwrap();
            assert_eq!(user.games_played, 1);
            assert_eq!(user.draws(), 1);
            assert_eq!(user.win_ratio, 50.0);
        }
    }

    #[test]
    fn test_guests_are_not_recorded() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_with_users(dir.path());

        let outcome = MatchOutcome {
            players: ["alice".to_string(), "Guest2".to_string()],
            winner: Some("Guest2".to_string()),
            surrendered: Some("alice".to_string()),
        };
        store.record_outcome(&outcome).unwrap();

        assert_eq!(store.find("alice").unwrap().losses, 1);
        assert!(store.find("Guest2").is_none());
        assert_eq!(store.users().len(), 2);
    }

    #[test]
    fn test_update_piece() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_with_users(dir.path());

        store
            .update_piece("bobby", PieceColor::LightGreen, glyph('7'))
            .unwrap();
        let bobby = UserStore::open(store.path()).unwrap().find("bobby").cloned().unwrap();
        assert_eq!(bobby.color, PieceColor::LightGreen);
        assert_eq!(bobby.piece_type, glyph('7'));

        assert!(matches!(
            store.update_piece("Guest1", PieceColor::Red, glyph('G')),
            Err(AccountError::GuestAccount)
        ));
        assert!(matches!(
            store.update_piece("nobody", PieceColor::Red, glyph('G')),
            Err(AccountError::UnknownUser(_))
        ));
    }

    #[test]
    fn test_leaderboard_sorting() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_with_users(dir.path());
        store
            .register("carol", "3333", PieceColor::Green, glyph('C'))
            .unwrap();

        // alice: 2 wins 1 loss, bobby: 1 win 2 losses, carol: a single draw
        store.record_outcome(&outcome(Some("alice"))).unwrap();
        store.record_outcome(&outcome(Some("bobby"))).unwrap();
        store.record_outcome(&outcome(Some("alice"))).unwrap();
        store
            .record_outcome(&MatchOutcome {
                players: ["carol".to_string(), "Guest2".to_string()],
                winner: None,
                surrendered: None,
            })
            .unwrap();

        let by_wins = store.leaderboard(LeaderboardSort::Wins, 5);
        assert_eq!(by_wins[0].username, "alice");
        assert_eq!(by_wins[1].username, "bobby");

        let by_games = store.leaderboard(LeaderboardSort::GamesPlayed, 2);
        assert_eq!(by_games.len(), 2);
        assert_eq!(by_games[0].games_played, 3);

        let by_ratio = store.leaderboard(LeaderboardSort::WinRatio, 5);
        let names: Vec<&str> = by_ratio.iter().map(|r| r.username.as_str()).collect();
        assert_eq!(names, ["alice", "carol", "bobby"]);
    }

    #[test]
    fn test_stats_hides_pin() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_with_users(dir.path());
        let row = store.stats("alice").unwrap();
        let json = serde_json::to_string(&row).unwrap();
        assert!(!json.contains("1111"));
        assert!(store.stats("nobody").is_none());
    }
}
