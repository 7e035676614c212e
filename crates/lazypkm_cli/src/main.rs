//! Interactive menu front end for `lazypkm_core`.
//!
//! # Responsibility
//! - Resolve configuration from flags/environment and bootstrap logging.
//! - Map menu choices onto session operations and print results.
//!
//! # Invariants
//! - Errors from core operations are printed and the loop continues.
//! - Records are persisted only on explicit save or end of input.

mod menu;

use anyhow::{Context, Result};
use clap::Parser;
use lazypkm_core::{
    init_logging, init_stderr_logging, CoreConfig, JsonFileStore, ScheduleOrder, Session,
};
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "lazypkm", version, about = "Personal knowledge and task manager")]
struct Args {
    /// Directory holding the JSON record containers.
    #[arg(long, env = "LAZYPKM_DATA_DIR", default_value = lazypkm_core::config::DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    /// trace|debug|info|warn|error
    #[arg(long, env = "LAZYPKM_LOG_LEVEL")]
    log_level: Option<String>,

    /// Enables rolling file logs in this directory; logs go to stderr otherwise.
    #[arg(long, env = "LAZYPKM_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// calendar|lexicographic
    #[arg(long, env = "LAZYPKM_SCHEDULE_ORDER", default_value = "calendar")]
    schedule_order: ScheduleOrder,
}

impl Args {
    fn into_config(self) -> io::Result<CoreConfig> {
        let defaults = CoreConfig::default();
        let log_dir = match self.log_dir {
            Some(dir) => Some(absolutize(&dir)?),
            None => None,
        };
        Ok(CoreConfig {
            data_dir: self.data_dir,
            log_level: self.log_level.unwrap_or(defaults.log_level),
            log_dir,
            schedule_order: self.schedule_order,
        })
    }
}

fn absolutize(path: &Path) -> io::Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    Ok(std::env::current_dir()?.join(path))
}

fn main() -> Result<()> {
    let config = Args::parse()
        .into_config()
        .context("cannot resolve configuration")?;
    config.validate().map_err(anyhow::Error::msg)?;
    let logging = match &config.log_dir {
        Some(log_dir) => init_logging(&config.log_level, log_dir),
        None => init_stderr_logging(&config.log_level),
    };
    logging.context("cannot start logging")?;

    let store = JsonFileStore::new(&config.data_dir);
    let session = Session::load(&store)
        .with_context(|| format!("cannot load records from {}", store.data_dir().display()))?
        .with_schedule_order(config.schedule_order);

    println!(
        "LazyPKM {}: {} knowledge entries, {} tasks loaded from {}",
        lazypkm_core::core_version(),
        session.knowledge().len(),
        session.tasks().len(),
        store.data_dir().display()
    );

    let stdin = io::stdin();
    let mut app = menu::App::new(session, store, stdin.lock().lines());
    app.run()
}
