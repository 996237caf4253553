// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Lazily paged subreddit listings.

use crate::reddit::Result;
use crate::reddit::service::Service;
use crate::reddit::sort::Sort;
use crate::reddit::thing::{Page, Post};
use log::{debug, info};
use std::collections::VecDeque;

/// A bounded, pull-based sequence of posts from a subreddit listing.
///
/// Nothing is fetched until the first call to [`Listing::next()`], and
/// pages are only requested as they are needed, so asking for the 80th
/// post does not hold the first 79 in memory at once. A listing ends
/// after `limit` posts, or earlier if Reddit runs out. Once it has ended
/// it stays ended; listings cannot be rewound.
#[derive(Debug)]
pub struct Listing<'a, S> {
    service: &'a S,
    subreddits: String,
    sort: Sort,
    remaining: usize,
    buffer: VecDeque<Post>,
    after: Option<String>,
    exhausted: bool,
}

impl<'a, S: Service + Sync> Listing<'a, S> {
    pub(crate) fn new(service: &'a S, subreddits: impl Into<String>, sort: Sort, limit: usize) -> Self {
        let subreddits = subreddits.into();
        info!("Getting {limit} posts sorted by: {sort}");
        Self {
            service,
            subreddits,
            sort,
            remaining: limit,
            buffer: VecDeque::new(),
            after: None,
            exhausted: false,
        }
    }

    /// The sort this listing was created with.
    pub fn sort(&self) -> Sort {
        self.sort
    }

    /// Returns the next post, fetching another page from Reddit if
    /// necessary.
    ///
    /// Returns `Ok(None)` once the listing has ended.
    pub async fn next(&mut self) -> Result<Option<Post>> {
        if self.remaining == 0 {
            return Ok(None);
        }

        if self.buffer.is_empty() && !self.exhausted {
            self.fetch_page().await?;
        }

        let post = self.buffer.pop_front();
        match post {
            Some(_) => self.remaining -= 1,
            None => self.remaining = 0,
        }
        Ok(post)
    }

    /// Returns the post at 1-based `rank`, skipping past the ones before it.
    ///
    /// Returns `Ok(None)` if the listing ends first, or if `rank` is 0.
    pub async fn rank(&mut self, rank: usize) -> Result<Option<Post>> {
        if rank == 0 {
            return Ok(None);
        }

        let mut seen = 0;
        while let Some(post) = self.next().await? {
            seen += 1;
            if seen == rank {
                return Ok(Some(post));
            }
        }
        Ok(None)
    }

    /// Drains the rest of the listing into a vector.
    pub async fn collect(mut self) -> Result<Vec<Post>> {
        let mut posts = Vec::new();
        while let Some(post) = self.next().await? {
            posts.push(post);
        }
        Ok(posts)
    }

    async fn fetch_page(&mut self) -> Result<()> {
        let data = self
            .service
            .get_listing(
                &self.subreddits,
                self.sort,
                self.remaining,
                self.after.as_deref(),
            )
            .await?;
        let page = Page::parse(&data)?;
        debug!(
            "Fetched {} posts from r/{}, next page: {}",
            page.posts().len(),
            self.subreddits,
            page.after().unwrap_or("none")
        );
        let (posts, after) = page.into_parts();

        self.exhausted = after.is_none() || posts.is_empty();
        self.after = after;
        self.buffer.extend(posts);
        Ok(())
    }
}
