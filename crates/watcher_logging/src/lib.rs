#![deny(missing_docs)]
//! Shared logging utilities for the puzzle watcher workspace.
//!
//! This crate provides the `watcher_*` logging macros used by the engine and
//! the binary, and a minimal test initializer for the global logger. Callers
//! depend on `log` themselves; the macros expand to the `log` facade.

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! watcher_trace {
    ($($arg:tt)*) => {{
        log::trace!(target: "puzzle_watcher", $($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! watcher_debug {
    ($($arg:tt)*) => {{
        log::debug!(target: "puzzle_watcher", $($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! watcher_info {
    ($($arg:tt)*) => {{
        log::info!(target: "puzzle_watcher", $($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! watcher_warn {
    ($($arg:tt)*) => {{
        log::warn!(target: "puzzle_watcher", $($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! watcher_error {
    ($($arg:tt)*) => {{
        log::error!(target: "puzzle_watcher", $($arg)*);
    }};
}

/// Parses a level name such as `"debug"` or `"WARN"`.
///
/// Unknown names fall back to `Info` so a typo in configuration never
/// silences the logger entirely.
pub fn parse_level(name: &str) -> log::LevelFilter {
    name.trim().parse().unwrap_or(log::LevelFilter::Info)
}

/// Initializes a simple terminal logger for use in tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}

#[cfg(test)]
mod tests {
    use super::parse_level;
    use log::LevelFilter;

    #[test]
    fn parses_known_levels_case_insensitively() {
        assert_eq!(parse_level("debug"), LevelFilter::Debug);
        assert_eq!(parse_level(" WARN "), LevelFilter::Warn);
        assert_eq!(parse_level("off"), LevelFilter::Off);
    }

    #[test]
    fn unknown_level_falls_back_to_info() {
        assert_eq!(parse_level("chatty"), LevelFilter::Info);
    }
}
