//! Tracing setup.
//!
//! The player owns the terminal, so its logs go to a file and only when
//! `RUST_LOG` is set. The endpoint server logs to stderr.

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log file name inside the store directory.
pub const LOG_FILE: &str = "trivia-quiz.log";

fn filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Log to stderr, `info` unless `RUST_LOG` says otherwise.
pub fn init_stderr() {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .compact()
        .with_writer(std::io::stderr);

    let _ = tracing_subscriber::registry()
        .with(filter("info"))
        .with(fmt_layer)
        .try_init();
}

/// Append logs to `dir/trivia-quiz.log` if `RUST_LOG` is set; otherwise stay silent.
pub fn init_file(dir: &Path) -> std::io::Result<()> {
    if std::env::var("RUST_LOG").is_err() {
        return Ok(());
    }

    fs::create_dir_all(dir)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE))?;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file));

    let _ = tracing_subscriber::registry()
        .with(filter("info"))
        .with(fmt_layer)
        .try_init();
    Ok(())
}
