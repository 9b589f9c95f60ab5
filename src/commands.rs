//! Command selection and the polling loop.
//!
//! This module handles:
//! - Printing the version
//! - Reading the one-shot command (prompt or `--command`)
//! - Driving the selected action on every tick until a signal arrives

use std::io::{self, BufRead, Write};

use tokio::time::{self, Instant, MissedTickBehavior};

use crate::actions::Action;
use crate::cli::Cli;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::github::{GitHubClient, SocialGraph};
use crate::shutdown::Shutdown;

/// Exit status for a clean shutdown.
pub const EXIT_OK: i32 = 0;
/// Exit status for quit, invalid commands and failures.
pub const EXIT_FAILURE: i32 = 1;

const COMMANDS_HELP: &str =
    "Commands: G - Get Followers, I - Follow Users, F/C - Get Following, U - Unfollow Users, Q - Quit";

/// The command chosen once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    GetFollowers,
    GetFollowing,
    InitiateFollow,
    Unfollow,
    Quit,
}

impl Command {
    /// Parses the first non-whitespace character of `input`, case-insensitively.
    ///
    /// Both `C` and `F` select the following listing.
    pub fn parse(input: &str) -> Option<Self> {
        let first = input.trim_start().chars().next()?;
        match first.to_ascii_uppercase() {
            'G' => Some(Command::GetFollowers),
            'C' | 'F' => Some(Command::GetFollowing),
            'I' => Some(Command::InitiateFollow),
            'U' => Some(Command::Unfollow),
            'Q' => Some(Command::Quit),
            _ => None,
        }
    }
}

/// Printed when the user quits at the command prompt.
const QUIT_MESSAGE: &str = "Exit successful.";
/// Printed when the command prompt gets an unknown command.
const INVALID_COMMAND_MESSAGE: &str = "Invalid Command.";

/// Executes the bot with the parsed arguments and returns the exit status.
///
/// # Errors
///
/// Returns `Err` for configuration problems (before any request is made),
/// for a failed lookup of the authenticated user, and for any error that
/// aborts a traversal.
pub async fn run(cli: Cli) -> Result<i32> {
    if cli.version {
        println!("v{}", env!("CARGO_PKG_VERSION"));
        return Ok(EXIT_OK);
    }

    let config = Config::from_cli(&cli)?;
    start(&config, Shutdown::listen()).await
}

/// Looks up the authenticated user, selects the command and drives it.
///
/// Every await before the polling loop is raced against `shutdown`.
async fn start(config: &Config, mut shutdown: Shutdown) -> Result<i32> {
    let client = GitHubClient::new(config)?;
    let me = tokio::select! {
        reason = shutdown.signalled() => {
            log::debug!("Shutdown while looking up the authenticated user reason={}", reason);
            return Ok(EXIT_OK);
        }
        user = client.current_user() => user?,
    };

    log::info!("Bot started for user {}.", me.login);
    log::info!("{}", COMMANDS_HELP);

    let input = match &config.command {
        Some(command) => command.clone(),
        None => tokio::select! {
            reason = shutdown.signalled() => {
                log::debug!("Shutdown before a command was entered reason={}", reason);
                return Ok(EXIT_OK);
            }
            line = prompt("\nEnter Command: ") => line?,
        },
    };

    let command = Command::parse(&input);
    if let Some(message) = exit_message(command) {
        println!("\n{message}");
        return Ok(EXIT_FAILURE);
    }

    let action = match command {
        Some(Command::GetFollowers) => Action::Followers,
        Some(Command::GetFollowing) => Action::Following,
        Some(Command::InitiateFollow) => {
            let target = match &config.target {
                Some(target) => target.clone(),
                None => tokio::select! {
                    reason = shutdown.signalled() => {
                        log::debug!("Shutdown before a username was entered reason={}", reason);
                        return Ok(EXIT_OK);
                    }
                    line = prompt("\nEnter username(Whose following you wish to follow): ") => line?,
                },
            };
            let target = target.trim();
            if target.is_empty() {
                return Err(Error::Input("Username cannot be empty.".to_string()));
            }
            Action::Follow {
                target: target.to_string(),
            }
        }
        Some(Command::Unfollow) => Action::Unfollow,
        Some(Command::Quit) | None => return Ok(EXIT_FAILURE),
    };

    drive(&client, &action, &me.login, config, shutdown).await
}

/// The message to print when `command` ends the bot instead of selecting an action.
fn exit_message(command: Option<Command>) -> Option<&'static str> {
    match command {
        Some(Command::Quit) => Some(QUIT_MESSAGE),
        None => Some(INVALID_COMMAND_MESSAGE),
        Some(_) => None,
    }
}

/// Runs `action` on every tick of `config.interval` until shutdown.
///
/// The first tick fires one full interval after the call. A signal arriving
/// mid-traversal drops the traversal where it stands. With `config.once`
/// the loop ends after the first traversal.
pub async fn drive(
    api: &dyn SocialGraph,
    action: &Action,
    me: &str,
    config: &Config,
    mut shutdown: Shutdown,
) -> Result<i32> {
    let mut ticker = time::interval_at(Instant::now() + config.interval, config.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    log::info!(
        "Polling action={} interval={:?}",
        action.name(),
        config.interval
    );

    loop {
        tokio::select! {
            reason = shutdown.signalled() => {
                log::debug!("Timer stopped reason={}", reason);
                return Ok(EXIT_OK);
            }
            _ = ticker.tick() => {}
        }

        log::debug!("Tick action={}", action.name());
        tokio::select! {
            reason = shutdown.signalled() => {
                log::info!("Traversal interrupted action={} reason={}", action.name(), reason);
                return Ok(EXIT_OK);
            }
            result = action.run(api, me, config.per_page, &config.results_dir) => {
                result.inspect_err(|e| log::error!("Traversal failed action={}: {}", action.name(), e))?;
            }
        }

        if config.once {
            return Ok(EXIT_OK);
        }
    }
}

/// Prints `message` and reads one line from stdin on a blocking thread.
async fn prompt(message: &'static str) -> Result<String> {
    tokio::task::spawn_blocking(move || -> Result<String> {
        let mut stdout = io::stdout();
        write!(stdout, "{message}")?;
        stdout.flush()?;
        read_line(&mut io::stdin().lock())
    })
    .await
    .map_err(|e| Error::Input(format!("input task failed: {e}")))?
}

/// Reads one line, without its line terminator.
fn read_line(reader: &mut impl BufRead) -> Result<String> {
    let mut line = String::new();
    reader.read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
