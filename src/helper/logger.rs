use crate::config::{DEFAULT_LOG_LEVEL, ENV};
#[cfg(feature = "colored-term")]
use colored::{Color, ColoredString, Colorize};
use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};
use std::str::FromStr;

static CONSOLE_LOGGER: ConsoleLogger = ConsoleLogger;

/// A small [`log`] implimentation printing `[LEVEL] module > message` lines to stdout.
pub struct ConsoleLogger;

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    #[cfg(feature = "colored-term")]
    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let color = level_color(record.level());
        let args = format!("{}", record.args());
        let args = if record.level() == Level::Error {
            args.color(Color::Red)
        } else {
            ColoredString::from(args.as_str())
        };
        println!(
            "{} {} {} {}",
            level_str(record.level()).color(color),
            record
                .module_path()
                .unwrap_or("(unknown module)")
                .color(color),
            ">".color(color),
            args,
        );
    }

    #[cfg(not(feature = "colored-term"))]
    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            println!(
                "{} {} > {}",
                level_str(record.level()),
                record.module_path().unwrap_or("(unknown module)"),
                record.args(),
            );
        }
    }

    fn flush(&self) {}
}

/// Installs [`ConsoleLogger`] as the global logger. The level filter is read from the
/// `HELIODOR_LOG_LEVEL` environment variable, falling back to [`DEFAULT_LOG_LEVEL`].
pub fn init_logger() -> Result<LevelFilter, SetLoggerError> {
    let level = log_level_from_env();
    log::set_logger(&CONSOLE_LOGGER)?;
    log::set_max_level(level);
    Ok(level)
}

fn log_level_from_env() -> LevelFilter {
    std::env::var(ENV::LOG_LEVEL)
        .ok()
        .and_then(|value| parse_level_filter(&value))
        .unwrap_or(DEFAULT_LOG_LEVEL)
}

fn parse_level_filter(value: &str) -> Option<LevelFilter> {
    LevelFilter::from_str(value.trim()).ok()
}

#[cfg(feature = "colored-term")]
fn level_color(level: Level) -> Color {
    match level {
        Level::Error => Color::BrightRed,
        Level::Warn => Color::Yellow,
        Level::Info => Color::Cyan,
        Level::Debug => Color::Magenta,
        Level::Trace => Color::Blue,
    }
}

fn level_str(level: Level) -> &'static str {
    match level {
        Level::Error => "[E]",
        Level::Warn => "[W]",
        Level::Info => "[I]",
        Level::Debug => "[D]",
        Level::Trace => "[T]",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_names_parse_case_insensitively() {
        assert_eq!(parse_level_filter("trace"), Some(LevelFilter::Trace));
        assert_eq!(parse_level_filter(" WARN "), Some(LevelFilter::Warn));
        assert_eq!(parse_level_filter("off"), Some(LevelFilter::Off));
        assert_eq!(parse_level_filter("loud"), None);
    }
}
