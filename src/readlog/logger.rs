use colored::*;
use log::{Level, LevelFilter, Log, Metadata, Record};

/// Writes log records to stderr with a colored level tag.
struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        eprintln!("{} {}", level_tag(record.level()), record.args());
    }

    fn flush(&self) {}
}

fn level_tag(level: Level) -> ColoredString {
    match level {
        Level::Error => "error:".red().bold(),
        Level::Warn => "warning:".yellow().bold(),
        Level::Info => "info:".green(),
        Level::Debug => "debug:".blue(),
        Level::Trace => "trace:".dimmed(),
    }
}

pub fn level_for(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    }
}

/// Installs the logger. A second call keeps the first logger.
pub fn init(verbose: bool) {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level_for(verbose));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_enables_debug() {
        assert_eq!(level_for(true), LevelFilter::Debug);
        assert_eq!(level_for(false), LevelFilter::Warn);
    }
}
