use std::io::Write;

use env_logger::{fmt::Formatter, Builder, Target};
use log::{Level, LevelFilter};

use crate::{Error, Result};

/// Logs go to stderr; stdout carries the tour. `RUST_LOG` overrides `level`.
pub fn init_logger(level: LevelFilter) -> Result<()> {
    Builder::new()
        .filter_level(level)
        .parse_default_env()
        .write_style(env_logger::WriteStyle::Never)
        .format(|buf: &mut Formatter, record| {
            writeln!(
                buf,
                "{} {} [{}] {}",
                buf.timestamp_millis(),
                level_tag(record.level()),
                record.target(),
                record.args()
            )
        })
        .target(Target::Stderr)
        .try_init()
        .map_err(|e| Error::Logger(e.to_string()))
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
