// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! HTTPS connector for the Reddit API.
//!
//! Service structures in this module provide a low-level way to interact
//! with the Reddit API over HTTPS, essentially a specialized HTTPS client
//! specifically for Reddit.

use crate::clock::{Clock, Expires, SystemClock, TimeDelta};
use crate::http::{self, HTTPClientFactory};
use crate::reddit::Result;
use crate::reddit::auth::{Auth, Token};
use crate::reddit::sort::Sort;
use log::{debug, info};
use reqwest::Client;
use tokio::sync::Mutex;

/// Largest page Reddit will hand out for a single listing request.
pub const MAX_PAGE_SIZE: usize = 100;

const TOKEN_URI: &str = "https://www.reddit.com/api/v1/access_token";
const API_BASE: &str = "https://oauth.reddit.com";

/// A service for retrieving posts from Reddit.
///
/// Using this trait, clients can implement different ways of connecting
/// to the Reddit API, such as an actual connector for production code,
/// and a mocked connector for testing purposes.
pub trait Service {
    /// Retrieves one page of a subreddit listing as raw JSON.
    ///
    /// `subreddits` is a single subreddit name or several joined with `+`.
    /// `after` is the cursor returned with the previous page, if any.
    fn get_listing(
        &self,
        subreddits: &str,
        sort: Sort,
        limit: usize,
        after: Option<&str>,
    ) -> impl Future<Output = Result<String>> + Send;

    /// Retrieves a single post by its ID as a raw JSON listing.
    fn get_by_id(&self, id: &str) -> impl Future<Output = Result<String>> + Send;
}

/// A service that contacts the Reddit API directly to retrieve information.
#[derive(Debug)]
pub struct RedditService {
    client: Client,
    auth: Auth,
    token: Mutex<Option<Token>>,
}

impl RedditService {
    /// Creates a new Reddit service that authenticates with `auth`.
    ///
    /// Returns an error if an HTTP client cannot be created.
    pub fn new(auth: Auth, factory: &HTTPClientFactory) -> Result<Self> {
        let client = factory.create()?;
        let token = Mutex::new(None);
        Ok(Self {
            client,
            auth,
            token,
        })
    }

    fn query_string(&self, sort: Sort, limit: usize, after: Option<&str>) -> String {
        let limit = limit.min(MAX_PAGE_SIZE);
        let mut qs = format!("?limit={limit}");
        if let Some(after) = after {
            qs += &format!("&after={after}");
        }
        if sort == Sort::Top {
            qs += "&t=all";
        }
        qs
    }

    fn listing_uri(&self, subreddits: &str, sort: Sort, limit: usize, after: Option<&str>) -> String {
        let qs = self.query_string(sort, limit, after);
        format!("{API_BASE}/r/{subreddits}/{sort}{qs}")
    }

    fn by_id_uri(&self, id: &str) -> String {
        format!("{API_BASE}/by_id/t3_{id}")
    }

    /// Returns a bearer token, requesting a new one if the cached token
    /// is missing or about to expire.
    async fn access_token(&self) -> Result<String> {
        let mut cached = self.token.lock().await;

        if let Some(token) = usable_token(cached.as_ref(), &SystemClock) {
            return Ok(token);
        }

        debug!("Requesting a new Reddit access token");
        let resp = self
            .client
            .post(TOKEN_URI)
            .basic_auth(self.auth.client_id(), Some(self.auth.client_secret()))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(http::HTTPError::from)?;
        let body = http::json_body(resp).await?;
        let token = Token::parse(&body, SystemClock.now())?;
        info!("Obtained a Reddit access token");

        let access_token = token.access_token().to_string();
        *cached = Some(token);
        Ok(access_token)
    }

    async fn get(&self, uri: &str) -> Result<String> {
        let token = self.access_token().await?;
        debug!("GET {uri}");
        let resp = self
            .client
            .get(uri)
            .bearer_auth(token)
            .send()
            .await
            .map_err(http::HTTPError::from)?;
        Ok(http::json_body(resp).await?)
    }
}

/// Tokens this close to expiring are replaced rather than reused.
fn token_leeway() -> TimeDelta {
    TimeDelta::seconds(60)
}

fn usable_token(token: Option<&Token>, clock: &impl Clock) -> Option<String> {
    token
        .filter(|token| !token.is_expired(clock, token_leeway()))
        .map(|token| token.access_token().to_string())
}

impl Service for RedditService {
    async fn get_listing(
        &self,
        subreddits: &str,
        sort: Sort,
        limit: usize,
        after: Option<&str>,
    ) -> Result<String> {
        let uri = self.listing_uri(subreddits, sort, limit, after);
        self.get(&uri).await
    }

    async fn get_by_id(&self, id: &str) -> Result<String> {
        let uri = self.by_id_uri(id);
        self.get(&uri).await
    }
}
