//! Plain-text logs of observed users.
//!
//! Each enumeration command appends one line per user it sees to its own
//! file under the results directory. Files and the directory are created on
//! first use and never truncated, so repeated ticks keep accumulating lines.
//!
//! # File Format
//!
//! Tab-separated, one user per line:
//! ```text
//! 2026-10-17 09:30:00 UTC	octocat	583231	https://github.com/octocat
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::github::User;
use crate::utils;

/// File receiving the followers listing.
pub const FOLLOWERS_FILE: &str = "followers.txt";
/// File receiving the following listing.
pub const FOLLOWING_FILE: &str = "following.txt";

/// Append-only log of users written by the enumeration actions.
pub struct ResultLog {
    /// Path of the log file.
    path: PathBuf,
    /// Handle opened in append mode.
    file: File,
}

impl ResultLog {
    /// Opens `dir/file_name` for appending, creating both if missing.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the directory or file cannot be created.
    pub fn open(dir: &Path, file_name: &str) -> Result<Self> {
        fs::create_dir_all(dir)?;
        let path = dir.join(file_name);
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        log::debug!("Opened result log file={}", path.display());
        Ok(Self { path, file })
    }

    /// Appends one line describing `user`.
    pub fn append(&mut self, user: &User) -> Result<()> {
        writeln!(
            self.file,
            "{}\t{}\t{}\t{}",
            utils::now_timestamp(),
            user.login,
            user.id,
            user.html_url
        )?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
