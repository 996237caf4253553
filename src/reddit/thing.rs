// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! A "thing" in the Reddit sense.
//!
//! Historically in the Reddit API and its old source code, a "Thing" was
//! any element of the Reddit system: users, posts, comments, etc. This
//! module encapsulates that idea and provides an easy way to more or less
//! work with JSON data from the Reddit API.
//!
//! The bot only cares about one kind of thing, the link (`t3`), which
//! covers both self posts and link posts.

use crate::text::convert_html_entities;
use serde::Deserialize;
use thiserror::Error;

/// A Reddit post.
#[derive(Clone, Debug, PartialEq)]
pub struct Post {
    id: String,
    title: String,
    body: String,
    url: String,
    score: i64,
}

impl Post {
    /// Creates a new post.
    ///
    /// Mostly useful for tests; posts usually come from [`Page::parse()`].
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
        url: impl Into<String>,
        score: i64,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            body: body.into(),
            url: url.into(),
            score,
        }
    }

    /// The post's ID, without the `t3_` prefix.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The post's title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The body of a self post. Empty for link posts.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// The URL the post points to.
    ///
    /// For self posts this is the post's own page.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Upvotes minus downvotes, as reported by Reddit.
    pub fn score(&self) -> i64 {
        self.score
    }
}

impl From<RawPost> for Post {
    fn from(raw: RawPost) -> Self {
        Self {
            id: raw.id,
            title: convert_html_entities(&raw.title),
            body: convert_html_entities(&raw.selftext),
            url: raw.url,
            score: raw.score,
        }
    }
}

/// One page of a Reddit listing.
#[derive(Debug)]
pub struct Page {
    posts: Vec<Post>,
    after: Option<String>,
}

impl Page {
    /// Parses a text response from the Reddit API into a page of posts.
    ///
    /// Things other than links (e.g., comments that sneak into a
    /// listing) are skipped.
    pub fn parse(data: &str) -> Result<Self, Error> {
        let listing: RawListing = serde_json::from_str(data)?;
        if listing.kind != "Listing" {
            return Err(Error::UnexpectedKind(listing.kind));
        }

        let posts = listing
            .data
            .children
            .into_iter()
            .filter_map(|child| match child {
                RawChild::Link { data } => Some(Post::from(data)),
                RawChild::Other => None,
            })
            .collect();
        let after = listing.data.after;

        Ok(Self { posts, after })
    }

    /// The posts on this page, in listing order.
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// Consumes the page, returning its posts.
    pub fn into_posts(self) -> Vec<Post> {
        self.posts
    }

    /// The cursor for the next page, if there is one.
    pub fn after(&self) -> Option<&str> {
        self.after.as_deref()
    }

    /// Splits the page into its posts and the cursor for the next page.
    pub fn into_parts(self) -> (Vec<Post>, Option<String>) {
        (self.posts, self.after)
    }
}

/// An error parsing Reddit data.
#[derive(Debug, Error)]
pub enum Error {
    /// The response was not valid JSON or did not look like a listing.
    #[error("Invalid listing: {0}")]
    Json(#[from] serde_json::Error),

    /// The response was JSON, but not a listing.
    #[error("Expected a Listing, got {0}")]
    UnexpectedKind(String),
}

#[derive(Deserialize)]
struct RawListing {
    kind: String,
    data: RawListingData,
}

#[derive(Deserialize)]
struct RawListingData {
    #[serde(default)]
    after: Option<String>,
    children: Vec<RawChild>,
}

#[derive(Deserialize)]
#[serde(tag = "kind")]
enum RawChild {
    #[serde(rename = "t3")]
    Link { data: RawPost },

    #[serde(other)]
    Other,
}

#[derive(Deserialize)]
struct RawPost {
    id: String,
    title: String,
    #[serde(default)]
    selftext: String,
    url: String,
    score: i64,
}
