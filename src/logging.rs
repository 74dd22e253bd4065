// src/logging.rs

use anyhow::{Context, Result};
use log::LevelFilter;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

/// Map the number of `-v` flags to a level filter.
pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Install the terminal logger. Call once, from the binary.
pub fn init(verbosity: u8) -> Result<()> {
    let config = ConfigBuilder::new()
        .set_target_level(LevelFilter::Off)
        .set_time_level(LevelFilter::Debug)
        .add_filter_allow_str("wasatext_client")
        .build();
    TermLogger::init(level_for(verbosity), config, TerminalMode::Stderr, ColorChoice::Auto)
        .context("Failed to initialise logger")
}
