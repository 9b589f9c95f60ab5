//! Error types shared by every part of the bot.
//!
//! Nothing here is retried or downgraded: an `Error` surfacing from a
//! traversal ends that traversal and, through `main`, the process.

/// Errors that can occur while configuring or running the bot.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid or missing configuration, detected before any network activity.
    #[error("{0}")]
    Config(String),

    /// Transport or decoding failure reported by the GitHub client.
    #[error("GitHub request failed: {0}")]
    Request(#[source] octocrab::Error),

    /// GitHub answered with a non-success status.
    #[error("GitHub API error status={status}: {message}")]
    Api {
        /// HTTP status code returned by the API.
        status: u16,
        /// The `message` field of GitHub's error body.
        message: String,
    },

    /// Reading stdin or writing a result log failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The interactive input could not be used.
    #[error("{0}")]
    Input(String),
}

impl From<octocrab::Error> for Error {
    fn from(e: octocrab::Error) -> Self {
        match e {
            octocrab::Error::GitHub { source, .. } => Error::Api {
                status: source.status_code.as_u16(),
                message: source.message.clone(),
            },
            other => Error::Request(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
