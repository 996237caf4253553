// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Logging setup and the bot's standard log lines.

use crate::text::generate_emoji;
use chrono::Local;
use env_logger::{Builder, Target};
use log::{LevelFilter, Record, info};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

/// Number of emojis on the decorative line under an action banner.
const EMOJI_COUNT: usize = 8;

/// Sends everything written to it to both stdout and a file.
struct Tee {
    file: File,
}

impl Write for Tee {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stdout().write_all(buf)?;
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()?;
        self.file.flush()
    }
}

/// Starts logging to stdout and to `log_file` at the given level.
///
/// The file is appended to, and created if necessary. `RUST_LOG` can still
/// be used to adjust the level of individual modules.
pub fn init(log_file: &Path, level: LevelFilter) -> io::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)?;

    Builder::new()
        .filter_level(level)
        .parse_default_env()
        .target(Target::Pipe(Box::new(Tee { file })))
        .format(|buf, record| format_record(buf, record))
        .try_init()
        .map_err(io::Error::other)
}

/// Writes `record` as `<timestamp>:<target>:<LEVEL> - <message>`.
fn format_record<W: Write + ?Sized>(buf: &mut W, record: &Record<'_>) -> io::Result<()> {
    writeln!(
        buf,
        "{}:{}:{} - {}",
        Local::now().format("%Y-%m-%d %H:%M:%S,%3f"),
        record.target(),
        record.level(),
        record.args()
    )
}

/// Records that `user` successfully issued the command `name`.
pub fn log_command(name: &str, user: &str) {
    info!("{}", command_line(name, user));
}

fn command_line(name: &str, user: &str) -> String {
    format!("{name} command issued by {user}")
}

/// Announces a change in the bot's state, such as starting up or shutting
/// down, with a banner that stands out in the log.
pub fn log_action(action: &str) {
    for line in action_banner(action, &generate_emoji(&mut rand::rng(), EMOJI_COUNT)) {
        info!("{line}");
    }
}

fn action_banner(action: &str, emoji: &str) -> [String; 4] {
    let message = format!("PastaBot has {action}");
    let rule = match action {
        "started" => "+",
        "shut down" => "-",
        _ => "=",
    }
    .repeat(message.chars().count());
    [rule.clone(), message, rule, emoji.to_string()]
}
