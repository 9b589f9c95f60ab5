//! Command-line interface definitions.
//!
//! The bot takes a handful of flags and then asks for its command
//! interactively, so there are no subcommands here.
//!
//! Long flags take two dashes (`--token`, `--interval`, `--version`).
//! Single-dash spellings such as `-token` are not accepted; only `-v` and
//! `-d` exist as short flags.

use clap::Parser;

/// Main CLI structure for the GitHub follow bot.
#[derive(Parser, Debug)]
#[command(
    name = "github-follow-bot",
    about = "GitHub bot that lists, follows and unfollows users on an interval",
    disable_version_flag = true,
    after_help = "Long flags use two dashes, e.g. --token <TOKEN> --interval 1m. Single-dash forms like -token are not accepted."
)]
pub struct Cli {
    /// GitHub API token
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true, default_value = "")]
    pub token: String,

    /// Check interval (ex. 5ms, 10s, 1m, 3h)
    #[arg(long, default_value = "30s")]
    pub interval: String,

    /// Print version and exit
    #[arg(short = 'v', long = "version")]
    pub version: bool,

    /// Run in debug mode
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,

    /// Page size used when listing users (1-100)
    #[arg(long, default_value_t = 30)]
    pub per_page: u32,

    /// Directory that receives followers.txt and following.txt
    #[arg(long, default_value = "results")]
    pub results_dir: String,

    /// Base URL of the GitHub REST API
    #[arg(long, default_value = "https://api.github.com")]
    pub api_url: String,

    /// Command to run instead of prompting (G, C/F, I, U, Q)
    #[arg(long)]
    pub command: Option<String>,

    /// User whose following list is mass-followed by the I command
    #[arg(long)]
    pub target: Option<String>,

    /// Run a single traversal after the first tick and exit
    #[arg(long)]
    pub once: bool,
}
