use anyhow::{Context, Result};
use env_logger::{Builder, Env, Target};
use log::LevelFilter;
use std::fs::OpenOptions;
use std::path::Path;

/// Installs the global logger.
pub fn init(log_file: Option<&Path>, interactive: bool) -> Result<()> {
    builder(log_file, interactive)?
        .try_init()
        .context("installing logger")?;
    Ok(())
}

/// The TUI without a log file logs nothing, even with `RUST_LOG` set, since
/// stderr would draw over the alternate screen. Otherwise `RUST_LOG` applies
/// on top of a `warn` default.
fn builder(log_file: Option<&Path>, interactive: bool) -> Result<Builder> {
    if interactive && log_file.is_none() {
        let mut builder = Builder::new();
        builder.filter_level(LevelFilter::Off);
        return Ok(builder);
    }
    let mut builder = Builder::from_env(Env::default().default_filter_or("warn"));
    if let Some(path) = log_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("opening log file {:?}", path))?;
        builder.target(Target::Pipe(Box::new(file)));
    }
    Ok(builder)
}
