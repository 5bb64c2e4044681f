use std::{io::Write, sync::OnceLock, time::Instant};

use env_logger::{Builder, Target, WriteStyle};
use log::{Level, LevelFilter};

static START: OnceLock<Instant> = OnceLock::new();

/// Installs a compact stderr logger which prefixes every line with the seconds elapsed since
/// the logger was built. `RUST_LOG` takes precedence over `level`. Calling it twice is a no-op.
pub fn build_logger_for_level(level: LevelFilter) {
    let start = *START.get_or_init(Instant::now);

    let _ = Builder::new()
        .filter_level(level)
        .parse_default_env()
        .write_style(WriteStyle::Never)
        .target(Target::Stderr)
        .format(move |buf, record| {
            writeln!(
                buf,
                "[{:>9.3}s {:<5}] {}",
                start.elapsed().as_secs_f64(),
                level_tag(record.level()),
                record.args()
            )
        })
        .try_init();
}

/// Like [`build_logger_for_level`], but raises `base` by one level per `-v`
pub fn build_logger_for_verbosity(base: LevelFilter, verbosity: usize) {
    build_logger_for_level(raise_level(base, verbosity));
}

fn raise_level(base: LevelFilter, verbosity: usize) -> LevelFilter {
    LevelFilter::iter()
        .skip_while(|&l| l < base)
        .nth(verbosity)
        .unwrap_or(LevelFilter::Trace)
}

fn level_tag(level: Level) -> &'static str {
    match level {
        Level::Error => "ERROR",
        Level::Warn => "WARN",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    }
}
