//! Runtime configuration built once from the parsed command line.

use std::path::PathBuf;
use std::time::Duration;

use crate::cli::Cli;
use crate::error::{Error, Result};
use crate::utils;

/// Largest page size the GitHub list endpoints accept.
pub const MAX_PER_PAGE: u32 = 100;

/// Validated settings shared by the dispatcher and the API client.
#[derive(Debug, Clone)]
pub struct Config {
    pub token: String,
    pub interval: Duration,
    pub per_page: u32,
    pub results_dir: PathBuf,
    pub api_url: String,
    pub command: Option<String>,
    pub target: Option<String>,
    pub once: bool,
}

impl Config {
    /// Validates the CLI arguments. Nothing here touches the network.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` when the token is empty or the interval
    /// cannot be parsed or is not positive.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let token = cli.token.trim();
        if token.is_empty() {
            return Err(Error::Config("GitHub token cannot be empty.".to_string()));
        }

        let interval = utils::parse_duration(&cli.interval).map_err(|e| {
            Error::Config(format!("parsing {} as duration failed: {e}", cli.interval))
        })?;
        if interval.is_zero() {
            return Err(Error::Config(format!(
                "interval must be positive, got {}",
                cli.interval
            )));
        }

        let per_page = cli.per_page.clamp(1, MAX_PER_PAGE);
        if per_page != cli.per_page {
            log::warn!(
                "per_page out of range, clamped requested={} used={}",
                cli.per_page,
                per_page
            );
        }

        Ok(Self {
            token: token.to_string(),
            interval,
            per_page,
            results_dir: PathBuf::from(&cli.results_dir),
            api_url: cli.api_url.trim_end_matches('/').to_string(),
            command: cli.command.clone(),
            target: cli.target.clone(),
            once: cli.once,
        })
    }
}
