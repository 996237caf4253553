// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Helpful utilities for working with text.

use htmlentity::entity::{self, ICodedDataTrait};
use rand::Rng;
use rand::seq::IndexedRandom;

/// Converts HTML entities into their single-character equivalents.
///
/// For example, Reddit returns "&" as "&amp;", ">" as "&gt;",
/// and "<" as "&lt;"; this function will convert those HTML
/// entities into single, human-readable characters.
///
/// Leading and trailing whitespace will also be trimmed from the string.
///
/// # Examples
///
/// ```
/// use pastabot::text::convert_html_entities;
/// let raw = "&lt;This &amp; That&gt;";
/// let converted = convert_html_entities(raw);
/// assert_eq!(converted, "<This & That>");
/// ```
///
/// ```
/// use pastabot::text::convert_html_entities;
/// let raw = "  &lt;This &amp; That&gt;  ";
/// let converted = convert_html_entities(raw);
/// assert_eq!(converted, "<This & That>");
/// ```
///
/// ```
/// use pastabot::text::convert_html_entities;
/// let raw = "";
/// let converted = convert_html_entities(raw);
/// assert_eq!(converted, raw);
/// ```
pub fn convert_html_entities(text: &str) -> String {
    let text = text.trim();
    entity::decode(text.as_bytes())
        .to_string()
        .unwrap_or(text.to_string())
}

/// Splits `text` into consecutive windows of at most `size` characters.
///
/// Windows never overlap and never drop characters: joining the windows
/// back together yields `text` exactly. Only the final window may be
/// shorter than `size`. An empty string produces no windows at all.
///
/// Sizes are measured in characters, not bytes, so a window never splits
/// a multibyte character.
///
/// # Examples
///
/// ```
/// use pastabot::text::windows;
/// let chunks = windows("abcdefg", 3);
/// assert_eq!(chunks, vec!["abc", "def", "g"]);
/// ```
pub fn windows(text: &str, size: usize) -> Vec<&str> {
    if size == 0 {
        return Vec::new();
    }

    let mut chunks = Vec::new();
    let mut start = 0;
    let mut count = 0;

    for (idx, _) in text.char_indices() {
        if count == size {
            chunks.push(&text[start..idx]);
            start = idx;
            count = 0;
        }
        count += 1;
    }

    if start < text.len() {
        chunks.push(&text[start..]);
    }

    chunks
}

/// Packs the lines of `text` into chunks of at most `limit` characters.
///
/// Lines are kept whole whenever possible; a chunk is closed when adding
/// the next line would push it over the limit. A single line that is
/// longer than `limit` on its own is hard-split with [`windows`].
///
/// # Examples
///
/// ```
/// use pastabot::text::pack_lines;
/// let chunks = pack_lines("one\ntwo\nthree", 8);
/// assert_eq!(chunks, vec!["one\ntwo", "three"]);
/// ```
pub fn pack_lines(text: &str, limit: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.lines() {
        let line_len = line.chars().count();

        if line_len > limit {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            chunks.extend(windows(line, limit).into_iter().map(String::from));
            continue;
        }

        let separator = usize::from(!current.is_empty());
        if current_len + separator + line_len > limit {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if !current.is_empty() {
            current.push('\n');
            current_len += 1;
        }
        current.push_str(line);
        current_len += line_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

/// Wraps a string in pasta.
///
/// # Examples
///
/// ```
/// use pastabot::text::pastify;
/// assert_eq!(pastify("Navy Seal"), "🍝 Navy Seal 🍝");
/// ```
pub fn pastify(text: &str) -> String {
    format!("🍝 {text} 🍝")
}

const EMOJIS: [&str; 14] = [
    "🙄", "😙", "😐", "🤤", "😤", "😲", "😬", "😭", "🥵", "🥺", "🤠", "🤫", "😳", "😢",
];

/// Generates a pseudo-random run of `count` emojis, each followed by a
/// plate of pasta.
pub fn generate_emoji<R: Rng + ?Sized>(rng: &mut R, count: usize) -> String {
    (0..count)
        .filter_map(|_| EMOJIS.choose(rng))
        .map(|emoji| format!("{emoji}🍝"))
        .collect()
}
