// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Recognizing and parsing bot commands in chat messages.

use crate::reddit::SortMode;
use indoc::formatdoc;
use itertools::Itertools;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use thiserror::Error;
use url::Url;

/// Text prefixes that mark a message as a command, longest first.
pub const PREFIXES: [&str; 4] = ["pastabot!", "pasta!", "pb!", "p!"];

/// Largest count `rand` draws from when the user does not pick one.
pub const DEFAULT_RANDOM_MAX: usize = 50;

static MENTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<@!?(\d+)>\s*").expect("mention regex is valid"));

/// Strips a command prefix from `content`.
///
/// A message is a command if it starts with one of the [`PREFIXES`] or
/// with a mention of the bot (`bot_id`). Returns the text following the
/// prefix, or `None` if the message is not addressed to the bot.
///
/// # Examples
///
/// ```
/// use pastabot::command::strip_prefix;
/// assert_eq!(strip_prefix("pasta!list top 5", None), Some("list top 5"));
/// assert_eq!(strip_prefix("<@1234> get new 2", Some(1234)), Some("get new 2"));
/// assert_eq!(strip_prefix("just chatting", None), None);
/// ```
pub fn strip_prefix(content: &str, bot_id: Option<u64>) -> Option<&str> {
    let content = content.trim_start();

    if let Some(rest) = PREFIXES.iter().find_map(|p| content.strip_prefix(p)) {
        return Some(rest);
    }

    let captures = MENTION.captures(content)?;
    let mentioned = captures.get(1)?.as_str().parse::<u64>().ok()?;
    if Some(mentioned) == bot_id {
        let prefix = captures.get(0)?;
        Some(&content[prefix.end()..])
    } else {
        None
    }
}

/// A command issued by a chat user.
#[derive(Clone, Debug, PartialEq)]
pub struct CommandRequest {
    user: String,
    name: String,
    args: Vec<String>,
}

impl CommandRequest {
    /// Creates a new request.
    pub fn new(
        user: impl Into<String>,
        name: impl Into<String>,
        args: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        let user = user.into();
        let name = name.into();
        let args = args.into_iter().map(Into::into).collect();
        Self { user, name, args }
    }

    /// Parses a chat message into a request.
    ///
    /// Returns `None` if the message has no command prefix, or if there
    /// is nothing after the prefix.
    pub fn parse(user: impl Into<String>, content: &str, bot_id: Option<u64>) -> Option<Self> {
        let rest = strip_prefix(content, bot_id)?;
        let mut words = rest.split_whitespace();
        let name = words.next()?;
        Some(Self::new(user, name, words))
    }

    /// Whoever issued the command.
    pub fn user(&self) -> &str {
        &self.user
    }

    /// The command name as typed.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Positional arguments following the command name.
    pub fn args(&self) -> &[String] {
        &self.args
    }
}

/// The commands the bot understands.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Command {
    /// List several posts.
    List,

    /// Show the post at a given rank.
    Get,

    /// Show a randomly chosen post.
    Rand,

    /// Show a post by its URL.
    Show,

    /// Explain how to use the bot.
    Help,
}

impl Command {
    /// Every command, in the order they are listed in help.
    pub const ALL: [Command; 5] = [
        Command::List,
        Command::Get,
        Command::Rand,
        Command::Show,
        Command::Help,
    ];

    /// The command's canonical name.
    pub fn name(&self) -> &'static str {
        match self {
            Command::List => "list",
            Command::Get => "get",
            Command::Rand => "rand",
            Command::Show => "show",
            Command::Help => "help",
        }
    }

    /// Alternative names for the command.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Command::List => &["l", "li"],
            Command::Get => &["g", "ge"],
            Command::Rand => &["r", "random"],
            Command::Show => &["s", "url"],
            Command::Help => &["h"],
        }
    }

    /// Argument synopsis, e.g. `<sort> <count>`.
    pub fn synopsis(&self) -> &'static str {
        match self {
            Command::List | Command::Get => "<hot|new|top|random> <count>",
            Command::Rand => "[hot|new|top|random] [max]",
            Command::Show => "<url>",
            Command::Help => "",
        }
    }

    /// One-line description for help output.
    pub fn summary(&self) -> &'static str {
        match self {
            Command::List => "Lists a number of posts from a sort type",
            Command::Get => "Gets the post at a given position in a sort type",
            Command::Rand => "Picks a random post (out of 50 by default)",
            Command::Show => "Shows a post from its Reddit URL",
            Command::Help => "Shows this message",
        }
    }

    /// How to invoke the command, e.g. `pasta!list <sort> <count>`.
    pub fn usage(&self) -> String {
        format!("pasta!{} {}", self.name(), self.synopsis())
            .trim_end()
            .to_string()
    }

    /// Coerces raw arguments into an [`Invocation`] of this command.
    ///
    /// Extra arguments are ignored.
    pub fn invocation(&self, args: &[String]) -> Result<Invocation, ArgumentError> {
        let arg = |i: usize| args.get(i).map(String::as_str);

        match self {
            Command::List | Command::Get => {
                let sort = arg(0).ok_or(ArgumentError::Missing("sort type"))?;
                let sort = SortMode::from_arg(sort);
                let count = arg(1).ok_or(ArgumentError::Missing("count"))?;
                let count = parse_count("count", count)?;
                if *self == Command::List {
                    Ok(Invocation::List { sort, count })
                } else {
                    Ok(Invocation::Get { sort, count })
                }
            }
            Command::Rand => {
                let sort = arg(0).map(SortMode::from_arg).unwrap_or(SortMode::Random);
                let max = match arg(1) {
                    Some(max) => parse_count("max", max)?,
                    None => DEFAULT_RANDOM_MAX,
                };
                Ok(Invocation::Rand { sort, max })
            }
            Command::Show => {
                let url = arg(0).ok_or(ArgumentError::Missing("url"))?;
                let id = post_id(url)?;
                Ok(Invocation::Show { id })
            }
            Command::Help => Ok(Invocation::Help),
        }
    }
}

fn parse_count(name: &'static str, value: &str) -> Result<usize, ArgumentError> {
    let n = value
        .parse::<i64>()
        .map_err(|_| ArgumentError::NotANumber {
            name,
            value: value.to_string(),
        })?;
    if n < 1 {
        return Err(ArgumentError::NotPositive { name, value: n });
    }
    usize::try_from(n).map_err(|_| ArgumentError::NotANumber {
        name,
        value: value.to_string(),
    })
}

/// Extracts a post ID from a Reddit URL.
///
/// The ID is the path segment immediately following `comments`, as in
/// `https://www.reddit.com/r/copypasta/comments/<id>/<slug>/`. URLs
/// without a scheme are accepted too.
///
/// # Examples
///
/// ```
/// use pastabot::command::post_id;
/// let url = "https://www.reddit.com/r/copypasta/comments/n345c9/slug/";
/// assert_eq!(post_id(url).unwrap(), "n345c9");
/// assert!(post_id("https://www.reddit.com/r/copypasta/").is_err());
/// ```
pub fn post_id(url: &str) -> Result<String, ArgumentError> {
    let parsed = Url::parse(url).or_else(|_| Url::parse(&format!("https://{url}")));
    let no_id = || ArgumentError::NoPostId(url.to_string());

    let parsed = parsed.map_err(|_| no_id())?;
    let mut segments = parsed.path_segments().ok_or_else(no_id)?;
    segments
        .find(|segment| *segment == "comments")
        .and_then(|_| segments.next())
        .filter(|id| !id.is_empty())
        .map(String::from)
        .ok_or_else(no_id)
}

/// A command with its arguments checked and coerced.
#[derive(Clone, Debug, PartialEq)]
pub enum Invocation {
    /// Summarize the first `count` posts.
    List { sort: SortMode, count: usize },

    /// Show the post at rank `count`.
    Get { sort: SortMode, count: usize },

    /// Show the post at a random rank between 1 and `max`.
    Rand { sort: SortMode, max: usize },

    /// Show the post with the given ID.
    Show { id: String },

    /// Show usage information.
    Help,
}

/// Maps command names and aliases to [`Command`]s.
#[derive(Clone, Debug)]
pub struct CommandTable {
    entries: HashMap<&'static str, Command>,
}

impl Default for CommandTable {
    fn default() -> Self {
        let entries = Command::ALL
            .iter()
            .flat_map(|cmd| {
                std::iter::once(cmd.name())
                    .chain(cmd.aliases().iter().copied())
                    .map(move |name| (name, *cmd))
            })
            .collect();
        Self { entries }
    }
}

impl CommandTable {
    /// Finds the command called `name`. Matching is case-insensitive.
    pub fn lookup(&self, name: &str) -> Option<Command> {
        self.entries.get(name.to_lowercase().as_str()).copied()
    }

    /// The canonical name of the command `name` refers to, or `name` itself
    /// if it is not a known command.
    pub fn canonical_name<'a>(&self, name: &'a str) -> &'a str {
        self.lookup(name).map_or(name, |cmd| cmd.name())
    }

    /// The text sent in response to `help`.
    pub fn help(&self) -> String {
        let prefixes = PREFIXES.iter().map(|p| format!("\"{p}\"")).join(" | ");
        let commands = Command::ALL
            .iter()
            .map(|cmd| {
                let aliases = cmd.aliases().join(", ");
                format!("  {:<44} {} (aliases: {aliases})", cmd.usage(), cmd.summary())
            })
            .join("\n");

        formatdoc! {"
            Hello I am PastaBot, I get copypasta posts from Reddit so you don't have to!

            Prefixes: {prefixes}
            or you can mention @PastaBot with a command

            ```
            Commands:
            {commands}

            Examples:
              p!rand          get a random submission (from 50 random pastas)
              p!rand top 10   get a random submission from the 10 top pastas
              p!list top 10   list 10 submissions from top
              p!get new 10    get the 10th submission from new
              p!show https://www.reddit.com/r/copypasta/comments/luau3v/
            ```"
        }
    }
}

/// Problems with the arguments given to a command.
#[derive(Debug, Error, PartialEq)]
pub enum ArgumentError {
    /// A required argument was not supplied.
    #[error("missing {0}")]
    Missing(&'static str),

    /// A numeric argument was not a number.
    #[error("{name} must be a number, not \"{value}\"")]
    NotANumber { name: &'static str, value: String },

    /// A numeric argument was zero or negative.
    #[error("{name} must be at least 1, not {value}")]
    NotPositive { name: &'static str, value: i64 },

    /// A URL did not point at a Reddit post.
    #[error("could not find a post ID in \"{0}\"")]
    NoPostId(String),
}
