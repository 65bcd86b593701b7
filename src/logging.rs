//! Logging setup
//!
//! log4rs is configured from the YAML file named in [`LoggingConfig`]. When
//! that file is absent a console appender is built in code instead. The
//! `user` MDC key is filled in by user-scoped service operations.

use log::{info, LevelFilter};
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::path::Path;

use crate::config::LoggingConfig;

/// Console pattern used when no log4rs file is present
pub const DEFAULT_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} {h({l})} [{X(user)(-)}] {t} - {m}{n}";

/// Install the global logger. Fails if a logger is already set.
pub fn init(config: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    if Path::new(&config.config_file).exists() {
        log4rs::init_file(&config.config_file, Default::default())?;
        info!("Logging configured from {}", config.config_file);
        return Ok(());
    }

    log4rs::init_config(console_config(&config.level)?)?;
    info!("Logging to console at level {}", config.level);
    Ok(())
}

/// Build a console-only log4rs configuration at `level` (defaults to info
/// when the level does not parse)
pub fn console_config(level: &str) -> Result<Config, Box<dyn std::error::Error>> {
    let level = level.parse::<LevelFilter>().unwrap_or(LevelFilter::Info);
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(DEFAULT_PATTERN)))
        .build();

    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(level))?;
    Ok(config)
}
