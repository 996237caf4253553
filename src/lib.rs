// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! PastaBot is a Discord bot that fetches copypasta from Reddit so you
//! don't have to. It watches the channels it has been invited to for
//! commands, reads posts from a set of subreddits (r/copypasta and
//! r/emojipasta by default), and relays them back as chat messages,
//! splitting anything too long for a single Discord message.
//!
//! # Commands
//!
//! Commands start with `pastabot!`, `pasta!`, `pb!`, or `p!`, or with a
//! mention of the bot:
//!
//! ```text
//! p!list top 10     list the 10 top posts
//! p!get new 3       show the 3rd newest post
//! p!rand            show a random post out of the first 50
//! p!rand top 10     show a random post out of the 10 top posts
//! p!show <url>      show a post from its Reddit URL
//! p!help            show usage
//! ```
//!
//! # Setup
//!
//! The bot needs a Discord bot token and the client ID and secret of a
//! Reddit application. Supply them as flags or in the environment:
//!
//! ```bash
//! export DISCORD_BOT_TOKEN='...'
//! export REDDIT_ID='...'
//! export REDDIT_SECRET='...'
//! pastabot
//! ```
//!
//! Variables in a `.env` file in the working directory are loaded too.
//! See `pastabot --help` for everything else that can be configured.
//!
//! # License
//!
//! PastaBot is licensed under the terms of the [Apache License 2.0]. Please
//! see the LICENSE file accompanying this source code or visit the previous
//! link for more information on licensing.
//!
//! [Apache License 2.0]: https://www.apache.org/licenses/LICENSE-2.0

pub mod cli;
pub mod clock;
pub mod command;
pub mod conf;
pub mod discord;
pub mod format;
pub mod http;
pub mod logger;
pub mod reddit;
pub mod router;
pub mod text;

#[cfg(test)]
mod test_utils;
