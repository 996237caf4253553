// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Drives the bot from the command line.

use crate::conf::{self, DEFAULT_SUBREDDITS, DISCORD_TOKEN_VAR, REDDIT_ID_VAR, REDDIT_SECRET_VAR};
use crate::discord;
use crate::http::{HTTPClientFactory, default_user_agent};
use crate::logger;
use crate::reddit::{self, Reddit, auth::Auth};
use crate::router::Router;
use clap::{CommandFactory, Parser};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use log::info;
use std::io;
use std::path::{Path, PathBuf};
use std::process;
use thiserror::Error;

/// Prints `message` to stderr and exits with `error_code`.
pub fn die(error_code: i32, message: &str) -> ! {
    eprintln!("{message}");
    process::exit(error_code);
}

/// Program configuration.
///
/// Every credential can be given as a flag or through the environment
/// (including a `.env` file in the working directory).
#[derive(Debug, Parser)]
#[command(version)]
#[command(about = "Fetches copypasta from Reddit and posts it to Discord", long_about = None)]
pub struct Config {
    /// Discord bot token
    #[arg(long, env = DISCORD_TOKEN_VAR, hide_env_values = true)]
    discord_bot_token: Option<String>,

    /// Reddit application client ID
    #[arg(long, env = REDDIT_ID_VAR, hide_env_values = true)]
    reddit_id: Option<String>,

    /// Reddit application client secret
    #[arg(long, env = REDDIT_SECRET_VAR, hide_env_values = true)]
    reddit_secret: Option<String>,

    /// User agent sent to Reddit
    #[arg(long, value_name = "UA", default_value_t = default_user_agent())]
    reddit_ua: String,

    /// Subreddits to read from, joined with '+'
    #[arg(long, default_value = DEFAULT_SUBREDDITS)]
    subreddits: String,

    /// Directory to write pastabot.log to
    #[arg(long, value_name = "DIR")]
    log_path: Option<PathBuf>,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

impl Config {
    /// The user agent to identify as when talking to Reddit.
    pub fn reddit_ua(&self) -> &str {
        &self.reddit_ua
    }

    /// The subreddits to read posts from.
    pub fn subreddits(&self) -> &str {
        &self.subreddits
    }

    /// Where the log file should go, if not the default location.
    pub fn log_path(&self) -> Option<&Path> {
        self.log_path.as_deref()
    }

    /// How much to log, as set by `-v` and `-q`.
    pub fn verbosity(&self) -> Verbosity<InfoLevel> {
        self.verbosity
    }

    /// Collects the credentials needed to connect to Discord and Reddit.
    ///
    /// Returns [`Error::MissingCredential`] naming the first one that was
    /// not supplied, checking the Reddit ID, the Reddit secret, and then
    /// the Discord token.
    pub fn credentials(&self) -> Result<Credentials, Error> {
        let reddit_id = require(&self.reddit_id, REDDIT_ID_VAR)?;
        let reddit_secret = require(&self.reddit_secret, REDDIT_SECRET_VAR)?;
        let discord_token = require(&self.discord_bot_token, DISCORD_TOKEN_VAR)?;
        Ok(Credentials {
            discord_token: discord_token.to_string(),
            reddit: Auth::new(reddit_id, reddit_secret),
        })
    }

    /// A one-line summary of how to invoke the program.
    pub fn usage() -> String {
        Self::command().render_usage().to_string()
    }
}

fn require<'a>(value: &'a Option<String>, var: &'static str) -> Result<&'a str, Error> {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .ok_or(Error::MissingCredential(var))
}

/// Secrets for the services the bot connects to.
#[derive(Debug)]
pub struct Credentials {
    discord_token: String,
    reddit: Auth,
}

/// Errors that stop the bot.
#[derive(Debug, Error)]
pub enum Error {
    /// A required credential was not given.
    #[error("please supply {0} as environment variable or flag")]
    MissingCredential(&'static str),

    /// The log file could not be set up.
    #[error("could not set up logging: {0}")]
    Log(#[from] io::Error),

    /// The Reddit client could not be created.
    #[error("could not connect to Reddit: {0}")]
    Reddit(#[from] reddit::Error),

    /// The Discord client failed.
    #[error("Discord client failed: {0}")]
    Discord(#[from] serenity::Error),
}

impl Error {
    /// The text to show the user before exiting.
    pub fn message(&self) -> String {
        match self {
            Error::MissingCredential(_) => format!("Error: {self}\n{}", Config::usage()),
            _ => format!("Error: {self}"),
        }
    }
}

/// Runs the bot until it is shut down.
///
/// Credentials are checked before anything else happens, so a missing
/// credential never leaves a half-connected client behind.
pub async fn run(config: Config) -> Result<(), Error> {
    let credentials = config.credentials()?;

    let log_file = conf::log_file(config.log_path())?;
    logger::init(&log_file, config.verbosity().log_level_filter())?;
    info!("Logging to {}", log_file.display());

    let factory = HTTPClientFactory::new(config.reddit_ua());
    let reddit = Reddit::connect(credentials.reddit, &factory)?;
    info!("Reading from r/{}", config.subreddits());
    let router = Router::new(reddit, config.subreddits());

    discord::start(&credentials.discord_token, router).await?;
    Ok(())
}
