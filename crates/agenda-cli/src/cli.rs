use std::path::PathBuf;

use agenda_core::{Config, ConfigError};
use clap::Parser;

/// List the next week of events from your Google Calendar.
#[derive(Parser, Debug)]
#[command(name = "agenda", author, version, about, long_about = None)]
pub struct Args {
    /// Config file (default: <config dir>/agenda/config.toml when present)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// OAuth client credentials file
    #[arg(long, value_name = "PATH")]
    pub credentials: Option<PathBuf>,

    /// Cached token file
    #[arg(long, value_name = "PATH")]
    pub token: Option<PathBuf>,

    /// Calendar id to list
    #[arg(long, value_name = "ID")]
    pub calendar: Option<String>,

    /// Number of days to look ahead
    #[arg(long, value_name = "N")]
    pub days: Option<u32>,

    /// Maximum number of events to show
    #[arg(long, value_name = "N")]
    pub max_results: Option<u32>,

    /// Log debug output to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Flags take precedence over the file and the environment.
    pub fn apply(&self, config: &mut Config) {
        if let Some(path) = &self.credentials {
            config.paths.credentials = path.clone();
        }
        if let Some(path) = &self.token {
            config.paths.token = path.clone();
        }
        if let Some(id) = &self.calendar {
            config.calendar.calendar_id = id.clone();
        }
        if let Some(days) = self.days {
            config.calendar.window_days = days;
        }
        if let Some(max) = self.max_results {
            config.calendar.max_results = max;
        }
    }

    /// Resolve the effective configuration: file, then environment, then flags.
    pub fn load_config(&self) -> Result<Config, ConfigError> {
        let mut config = Config::load(self.config.as_deref())?;
        config.apply_env();
        self.apply(&mut config);
        config.ensure_valid()?;
        Ok(config)
    }
}
