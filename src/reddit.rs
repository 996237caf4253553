// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Reddit API clients and services for communicating with Reddit over HTTP.

pub mod auth;
pub mod client;
pub mod listing;
pub mod service;
pub mod sort;
pub mod thing;

pub use client::{Reddit, Subreddit};
pub use listing::Listing;
pub use sort::{Sort, SortMode};
pub use thing::Post;

use crate::http::HTTPError;
use thiserror::Error;

/// The result of talking to Reddit.
pub type Result<T> = std::result::Result<T, Error>;

/// A client error.
#[derive(Debug, Error)]
pub enum Error {
    /// An error from the underlying HTTP service.
    #[error("Service error: {0}")]
    Service(#[from] HTTPError),

    /// Reddit would not let us in.
    #[error("Authentication error: {0}")]
    Auth(#[from] auth::AuthError),

    /// An error parsing data.
    #[error("Parse error: {0}")]
    Parse(#[from] thing::Error),

    /// Reddit has no post with the given ID.
    #[error("No post with ID {0}")]
    NotFound(String),
}
