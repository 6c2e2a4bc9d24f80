//! Console logger setup

use std::sync::Once;

static LOGGER_INIT: Once = Once::new();

/// Install the coloured, timestamped logger. Only the first call has an effect.
///
/// Records go to stderr so that `--json` output on stdout stays parseable.
pub fn init_logger_with_level(level: log::LevelFilter) {
    LOGGER_INIT.call_once(|| {
        let colors = fern::colors::ColoredLevelConfig::new().info(fern::colors::Color::Cyan);
        fern::Dispatch::new()
            .format(move |out, message, record| {
                out.finish(format_args!(
                    "![{:5}] {} {}",
                    colors.color(record.level()),
                    chrono::Local::now().format("[%Y-%m-%d %H:%M:%S]"),
                    message
                ))
            })
            .level(level)
            .chain(std::io::stderr())
            .apply()
            .unwrap_or(());
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init_logger_with_level(log::LevelFilter::Warn);
        init_logger_with_level(log::LevelFilter::Trace);
        assert!(LOGGER_INIT.is_completed());
    }
}
