// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Environment and configuration defaults.

use std::env;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

/// Subreddits posts are read from unless told otherwise.
pub const DEFAULT_SUBREDDITS: &str = "copypasta+emojipasta";

/// Environment variable holding the Discord bot token.
pub const DISCORD_TOKEN_VAR: &str = "DISCORD_BOT_TOKEN";

/// Environment variable holding the Reddit application's client ID.
pub const REDDIT_ID_VAR: &str = "REDDIT_ID";

/// Environment variable holding the Reddit application's client secret.
pub const REDDIT_SECRET_VAR: &str = "REDDIT_SECRET";

const LOG_FILE_NAME: &str = "pastabot.log";

/// The directory logs are written to when no directory is given.
///
/// ```
/// use pastabot::conf::default_log_dir;
/// assert!(default_log_dir().ends_with("pastabot"));
/// ```
pub fn default_log_dir() -> PathBuf {
    env::temp_dir().join("pastabot")
}

/// Returns the path of the log file in `dir` (or in [`default_log_dir()`]),
/// creating the directory and an empty file if they do not exist yet.
pub fn log_file(dir: Option<&Path>) -> io::Result<PathBuf> {
    let dir = dir.map(Path::to_path_buf).unwrap_or_else(default_log_dir);
    fs::create_dir_all(&dir)?;

    let path = dir.join(LOG_FILE_NAME);
    OpenOptions::new().create(true).append(true).open(&path)?;
    Ok(path)
}
