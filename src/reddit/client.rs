// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Clients for reading data from the Reddit API.

use crate::http::HTTPClientFactory;
use crate::reddit::auth::Auth;
use crate::reddit::listing::Listing;
use crate::reddit::service::{RedditService, Service};
use crate::reddit::sort::Sort;
use crate::reddit::thing::{Page, Post};
use crate::reddit::{Error, Result};

/// An entry point into the Reddit API.
///
/// A `Reddit` is cheap to share: every method takes `&self`, so a single
/// client can serve any number of concurrent requests.
#[derive(Debug)]
pub struct Reddit<S = RedditService> {
    service: S,
}

impl Reddit {
    /// Creates a new client that talks to Reddit over HTTPS using the
    /// given application credentials.
    ///
    /// Returns an [`enum@Error`] if an HTTP client cannot be created.
    pub fn connect(auth: Auth, factory: &HTTPClientFactory) -> Result<Self> {
        let service = RedditService::new(auth, factory)?;
        Ok(Self::with_service(service))
    }
}

impl<S: Service + Sync> Reddit<S> {
    /// Creates a new client backed by `service`.
    pub fn with_service(service: S) -> Self {
        Self { service }
    }

    /// A handle on one subreddit, or several joined with `+`.
    pub fn subreddit(&self, names: impl Into<String>) -> Subreddit<'_, S> {
        Subreddit {
            service: &self.service,
            names: names.into(),
        }
    }

    /// Retrieves a single post by its ID.
    ///
    /// Returns [`Error::NotFound`] if Reddit has no such post.
    pub async fn submission(&self, id: &str) -> Result<Post> {
        let data = self.service.get_by_id(id).await?;
        Page::parse(&data)?
            .into_posts()
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }
}

/// One or more subreddits whose posts can be listed.
#[derive(Debug)]
pub struct Subreddit<'a, S> {
    service: &'a S,
    names: String,
}

impl<'a, S: Service + Sync> Subreddit<'a, S> {
    /// Lists up to `limit` posts ranked by `sort`.
    pub fn listing(&self, sort: Sort, limit: usize) -> Listing<'a, S> {
        Listing::new(self.service, self.names.clone(), sort, limit)
    }

    /// Lists up to `limit` posts using Reddit's default ranking.
    pub fn hot(&self, limit: usize) -> Listing<'a, S> {
        self.listing(Sort::Hot, limit)
    }

    /// Lists up to `limit` of the most recent posts.
    pub fn newest(&self, limit: usize) -> Listing<'a, S> {
        self.listing(Sort::New, limit)
    }

    /// Lists up to `limit` of the highest-scoring posts of all time.
    pub fn top(&self, limit: usize) -> Listing<'a, S> {
        self.listing(Sort::Top, limit)
    }
}
