// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Turns Reddit posts into chat messages.
//!
//! Discord rejects messages longer than 2,000 characters, so everything
//! produced here is split into chunks that fit. Chunks are always emitted
//! in their original order and nothing is ever dropped.

use crate::reddit::Post;
use crate::text::{pack_lines, pastify, windows};
use itertools::Itertools;

/// Discord's limit on the length of a single message, in characters.
pub const MESSAGE_LIMIT: usize = 2000;

/// Size of the windows long post bodies are cut into.
///
/// Smaller than [`MESSAGE_LIMIT`] to leave room for any formatting the
/// chat platform adds.
pub const BODY_WINDOW: usize = 1500;

/// A piece of text, already split into chunks that can each be sent as
/// one chat message.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OutboundMessage {
    chunks: Vec<String>,
}

impl OutboundMessage {
    /// Wraps already-sized chunks. Empty chunks are discarded.
    pub fn new(chunks: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let chunks = chunks
            .into_iter()
            .map(Into::into)
            .filter(|chunk: &String| !chunk.is_empty())
            .collect();
        Self { chunks }
    }

    /// The chunks, in the order they should be sent.
    pub fn chunks(&self) -> &[String] {
        &self.chunks
    }

    /// True if there is nothing to send.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

/// Lays out posts as chat messages.
#[derive(Clone, Debug)]
pub struct Formatter {
    limit: usize,
    window: usize,
    decorate: bool,
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new(MESSAGE_LIMIT, BODY_WINDOW)
    }
}

impl Formatter {
    /// Creates a formatter for a platform that accepts messages of up to
    /// `limit` characters, cutting long bodies into `window`-sized chunks.
    ///
    /// `window` is clamped to `limit`.
    pub fn new(limit: usize, window: usize) -> Self {
        let window = window.min(limit);
        Self {
            limit,
            window,
            decorate: true,
        }
    }

    /// Turns the pasta decoration around post titles on or off.
    pub fn decorate(self, decorate: bool) -> Self {
        Self { decorate, ..self }
    }

    /// A one-line-per-post summary of `posts`: rank, score, and title.
    ///
    /// Ranks start at 1. The digest is split between lines if it is too
    /// long for one message.
    ///
    /// # Examples
    ///
    /// ```
    /// use pastabot::format::Formatter;
    /// use pastabot::reddit::Post;
    ///
    /// let posts = vec![
    ///     Post::new("a1", "Navy Seal", "", "https://example.com/a1", 2875),
    ///     Post::new("b2", "Wholesome", "", "https://example.com/b2", 88),
    /// ];
    /// let digest = Formatter::default().digest(&posts);
    /// assert_eq!(digest.chunks(), ["1. [2875] Navy Seal\n2. [88] Wholesome"]);
    /// ```
    pub fn digest(&self, posts: &[Post]) -> OutboundMessage {
        let text = posts
            .iter()
            .enumerate()
            .map(|(i, post)| Self::digest_line(i + 1, post))
            .join("\n");
        OutboundMessage::new(pack_lines(&text, self.limit))
    }

    fn digest_line(rank: usize, post: &Post) -> String {
        format!("{rank}. [{}] {}", post.score(), post.title())
    }

    /// A full rendering of a single post.
    ///
    /// The title, the body (if the post has one), and a link to the source
    /// are each returned as separate messages, in that order, and are never
    /// merged into each other.
    pub fn post(&self, post: &Post) -> Vec<OutboundMessage> {
        let title = if self.decorate {
            pastify(post.title())
        } else {
            post.title().to_string()
        };

        let mut messages = vec![self.fit(&title)];
        if !post.body().is_empty() {
            messages.push(self.body(post.body()));
        }
        messages.push(self.fit(&format!("source: {}", post.url())));
        messages
    }

    /// Splits a post body into messages.
    ///
    /// Bodies that fit within the limit are sent whole; longer ones are
    /// cut into consecutive, non-overlapping windows.
    pub fn body(&self, body: &str) -> OutboundMessage {
        if body.chars().count() <= self.limit {
            OutboundMessage::new([body])
        } else {
            OutboundMessage::new(windows(body, self.window))
        }
    }

    fn fit(&self, text: &str) -> OutboundMessage {
        OutboundMessage::new(windows(text, self.limit))
    }
}
