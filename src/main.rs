use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{info, warn};
use ratatui::{backend::CrosstermBackend, Terminal};

use connect_four_tui::accounts::{LeaderboardSort, StatsRow, UserStore};
use connect_four_tui::config::AppConfig;
use connect_four_tui::game::{is_guest_name, Match, PieceColor, Player, PlayerId};
use connect_four_tui::logging::{self, LogSink};
use connect_four_tui::ui::App;

/// Two-player Connect Four in the terminal.
#[derive(Parser)]
#[command(name = "connect-four", about = "Two-player Connect Four in the terminal")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "config.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Cmd>,
}

#[derive(Subcommand)]
enum Cmd {
    /// Start a match (default). Players without a name play as guests.
    Play {
        #[arg(long)]
        player1: Option<String>,
        /// PIN for player 1 (prompted for if omitted)
        #[arg(long, requires = "player1")]
        pin1: Option<String>,
        #[arg(long)]
        player2: Option<String>,
        /// PIN for player 2 (prompted for if omitted)
        #[arg(long, requires = "player2")]
        pin2: Option<String>,
    },
    /// Create an account
    Register {
        username: String,
        /// 4-digit PIN (prompted for if omitted)
        #[arg(long)]
        pin: Option<String>,
        #[arg(long)]
        color: Option<String>,
        /// Single letter or digit to draw your pieces with
        #[arg(long)]
        piece: Option<String>,
    },
    /// Change the color and piece of an account
    Customize {
        username: String,
        #[arg(long)]
        pin: Option<String>,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        piece: Option<String>,
    },
    /// Show one user's stats
    Stats { username: String },
    /// Show the top players
    Leaderboard {
        #[arg(long, value_enum, default_value_t)]
        by: LeaderboardSort,
        /// Number of rows (defaults to store.leaderboard_size)
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Print a config file with every default value
    InitConfig,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    let command = cli.command.unwrap_or(Cmd::Play {
        player1: None,
        pin1: None,
        player2: None,
        pin2: None,
    });

    let sink = match command {
        Cmd::Play { .. } => LogSink::FileOnly,
        _ => LogSink::Stderr,
    };
    logging::init(&config.log, sink).context("opening log file")?;

    match command {
        Cmd::Play {
            player1,
            pin1,
            player2,
            pin2,
        } => play(&config, [(player1, pin1), (player2, pin2)]),
        Cmd::Register {
            username,
            pin,
            color,
            piece,
        } => {
            let mut store = open_store(&config)?;
            let pin = pin_or_prompt(pin, &username)?;
            let color = parse_or(color, config.players.player1_color)?;
            let piece = parse_or(piece, config.players.player1_piece)?;
            store.register(&username, &pin, color, piece)?;
            store.logout(&username)?;
            println!("Account {username} created ({color} '{piece}').");
            Ok(())
        }
        Cmd::Customize {
            username,
            pin,
            color,
            piece,
        } => {
            let mut store = open_store(&config)?;
            if is_guest_name(&username) {
                bail!("guest accounts cannot customize pieces");
            }
            let pin = pin_or_prompt(pin, &username)?;
            let current = store.verify(&username, &pin)?.clone();
            let color = parse_or(color, current.color)?;
            let piece = parse_or(piece, current.piece_type)?;
            store.update_piece(&username, color, piece)?;
            println!("{username} now plays {color} '{piece}'.");
            Ok(())
        }
        Cmd::Stats { username } => {
            let store = open_store(&config)?;
            match store.stats(&username) {
                Some(row) => print_stats(&row),
                None => bail!("no account named '{username}'"),
            }
            Ok(())
        }
        Cmd::Leaderboard { by, limit } => {
            let store = open_store(&config)?;
            let rows = store.leaderboard(by, limit.unwrap_or(config.store.leaderboard_size));
            if rows.is_empty() {
                println!("No players yet.");
            }
            for row in &rows {
                print_stats(row);
                println!();
            }
            Ok(())
        }
        Cmd::InitConfig => {
            print!("{}", AppConfig::default_toml());
            Ok(())
        }
    }
}

fn open_store(config: &AppConfig) -> Result<UserStore> {
    UserStore::open(&config.store.users_file).with_context(|| {
        format!(
            "opening user records at {}",
            config.store.users_file.display()
        )
    })
}

fn parse_or<T>(value: Option<String>, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value {
        Some(value) => Ok(value.parse()?),
        None => Ok(default),
    }
}

fn pin_or_prompt(pin: Option<String>, username: &str) -> Result<String> {
    if let Some(pin) = pin {
        return Ok(pin);
    }
    eprint!("PIN for {username}: ");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn print_stats(row: &StatsRow) {
    println!("{}'s stats:", row.username);
    println!("Games played: {}", row.games_played);
    println!("Wins: {}", row.wins);
    println!("Losses: {}", row.losses);
    println!("Win ratio: {}%", row.win_ratio);
}

/// Sign in (or seat a guest) for both players, then run the match screen.
fn play(config: &AppConfig, seats: [(Option<String>, Option<String>); 2]) -> Result<()> {
    let mut store = open_store(config)?;
    store.reset_logins()?;

    let mut signed_in = Vec::new();
    let game = match seat_players(config, &mut store, seats, &mut signed_in) {
        Ok(game) => game,
        Err(err) => {
            sign_out(&mut store, &signed_in);
            return Err(err);
        }
    };
    info!(
        "match: {} vs {}",
        game.player(PlayerId::One).name(),
        game.player(PlayerId::Two).name()
    );

    let mut app = App::new(game, store);
    let result = run_terminal(&mut app);

    // Sign out even when the UI failed
    let mut store = app.into_recorder();
    sign_out(&mut store, &signed_in);
    result
}

/// Build the match, pushing every account that logs in onto `signed_in`
/// so the caller can undo the logins whatever happens next.
fn seat_players(
    config: &AppConfig,
    store: &mut UserStore,
    seats: [(Option<String>, Option<String>); 2],
    signed_in: &mut Vec<String>,
) -> Result<Match> {
    let mut players = Vec::with_capacity(2);
    for ((name, pin), id) in seats.into_iter().zip([PlayerId::One, PlayerId::Two]) {
        let (color, glyph) = match id {
            PlayerId::One => (config.players.player1_color, config.players.player1_piece),
            PlayerId::Two => (config.players.player2_color, config.players.player2_piece),
        };
        let player = match name {
            Some(name) if !is_guest_name(&name) => {
                let pin = pin_or_prompt(pin, &name)?;
                let record = store
                    .login(&name, &pin)
                    .with_context(|| format!("signing in {name}"))?;
                signed_in.push(name.clone());
                Player::new(id, name, record.color, record.piece_type)?
            }
            _ => Player::guest(id, color, glyph),
        };
        players.push(player);
    }

    let mut players: [Player; 2] = match players.try_into() {
        Ok(players) => players,
        Err(_) => bail!("expected exactly two players"),
    };
    separate_guest_pieces(&mut players);

    Match::new(players).context("run `customize` to change a piece")
}

fn sign_out(store: &mut UserStore, names: &[String]) {
    for name in names {
        if let Err(err) = store.logout(name) {
            warn!("could not log out {name}: {err}");
        }
    }
}

/// A guest whose pieces look like the opponent's gets the first free color.
fn separate_guest_pieces(players: &mut [Player; 2]) {
    if !players[0].looks_like(&players[1]) {
        return;
    }
    let (taken, guest) = match players {
        [first, second] if second.is_guest() => (first.color(), second),
        [first, second] if first.is_guest() => (second.color(), first),
        _ => return,
    };
    if let Some(color) = PieceColor::ALL.into_iter().find(|&c| c != taken) {
        guest.set_color(color);
    }
}

fn run_terminal(app: &mut App<UserStore>) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = app.run(&mut terminal);

    // Restore terminal even on error
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();

    Ok(res?)
}
