//! GitHub Follow Bot
//!
//! A small Rust bot that walks GitHub follower graphs on an interval.
//!
//! # Features
//!
//! - **G**: record the authenticated user's followers to `results/followers.txt`
//! - **C/F**: record who the user follows to `results/following.txt`
//! - **I**: follow everyone another user follows
//! - **U**: unfollow everyone the user follows
//!
//! Whatever is chosen runs again on every tick until Ctrl+C or SIGTERM.
//!
//! # Usage
//!
//! ```bash
//! # Record followers every minute
//! github-follow-bot --token "$GITHUB_TOKEN" --interval 1m
//!
//! # Follow octocat's following list once, without prompting
//! github-follow-bot --token "$GITHUB_TOKEN" --command i --target octocat --once
//! ```

mod actions;
mod cli;
mod commands;
mod config;
mod error;
mod github;
mod results;
mod shutdown;
#[cfg(test)]
mod testing;
mod utils;
mod walker;

use std::io;

use clap::{CommandFactory, Parser};
use cli::Cli;
use error::Error;
use log::LevelFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);
    log::info!("Application started version={}", env!("CARGO_PKG_VERSION"));

    let code = match commands::run(cli).await {
        Ok(code) => code,
        Err(Error::Config(message)) => {
            log::error!("Configuration error: {}", message);
            eprintln!("{message}\n");
            let _ = Cli::command().write_help(&mut io::stderr());
            eprintln!();
            commands::EXIT_FAILURE
        }
        Err(e) => {
            log::error!("Application error: {}", e);
            eprintln!("Error: {e}");
            commands::EXIT_FAILURE
        }
    };

    // Exit directly: a pending stdin read must not hold the runtime open.
    std::process::exit(code);
}

/// Info level by default, debug for this crate with `-d`. `RUST_LOG` wins when set.
fn init_logging(debug: bool) {
    let mut builder = pretty_env_logger::formatted_builder();
    builder.filter_level(LevelFilter::Info);
    if debug {
        builder.filter_module(env!("CARGO_CRATE_NAME"), LevelFilter::Debug);
    }
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.init();
}
