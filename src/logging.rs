use std::fs::OpenOptions;
use std::io;

use env_logger::{Builder, Env, Target, WriteStyle};

use crate::config::LogConfig;

/// Where log output may go for the current command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogSink {
    /// The terminal is free, stderr is fine when no file is configured
    Stderr,
    /// The match screen owns the terminal: log to the configured file or not at all
    FileOnly,
}

/// Install the global logger. `RUST_LOG` overrides `config.level`.
pub fn init(config: &LogConfig, sink: LogSink) -> io::Result<()> {
    let mut builder = Builder::from_env(Env::default().default_filter_or(config.level.as_str()));

    match (&config.file, sink) {
        (Some(path), _) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder
                .target(Target::Pipe(Box::new(file)))
                .write_style(WriteStyle::Never);
        }
        (None, LogSink::Stderr) => {
            builder.target(Target::Stderr);
        }
        (None, LogSink::FileOnly) => return Ok(()),
    }

    // A logger may already be installed (tests); keep it
    let _ = builder.try_init();
    Ok(())
}
