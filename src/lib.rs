//! # Connect Four
//!
//! A two-player terminal Connect Four game with lightweight account
//! persistence. Features a terminal UI built with Ratatui and a flat JSON
//! record store for PIN-protected accounts and game statistics.
//!
//! ## Modules
//!
//! - [`game`]: Core game logic: board, players, victory checker, match state machine
//! - [`accounts`]: User records, login, piece preferences, stats and leaderboard
//! - [`ui`]: Terminal UI: match screen
//! - [`config`]: TOML configuration loading and validation
//! - [`logging`]: Logger setup that stays out of the UI's way
//! - [`error`]: Structured error types

pub mod accounts;
pub mod config;
pub mod error;
pub mod game;
pub mod logging;
pub mod ui;
