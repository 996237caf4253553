// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Services for communicating with APIs using HTTP.

use reqwest::{Client, ClientBuilder, header};
use thiserror::Error;

/// Builds HTTP clients that identify themselves with a fixed user agent.
///
/// Reddit is picky about user agents: requests with a generic or missing
/// user agent are throttled much more aggressively, so every client used
/// to talk to Reddit should come from a factory.
#[derive(Clone, Debug)]
pub struct HTTPClientFactory {
    user_agent: String,
}

impl HTTPClientFactory {
    /// Creates a new factory that stamps every client with `user_agent`.
    pub fn new(user_agent: impl Into<String>) -> Self {
        let user_agent = user_agent.into();
        Self { user_agent }
    }

    /// The user agent sent with each request.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Creates a new HTTP client.
    ///
    /// Returns an error if a TLS backend cannot be initialized.
    pub fn create(&self) -> HTTPResult<Client> {
        let client = ClientBuilder::new()
            .user_agent(&self.user_agent)
            .build()
            .map_err(HTTPError::Request)?;
        Ok(client)
    }
}

impl Default for HTTPClientFactory {
    fn default() -> Self {
        Self::new(default_user_agent())
    }
}

/// An appropriate user agent to use when making HTTP requests.
///
/// # Examples
///
/// ```
/// use pastabot::http::default_user_agent;
/// assert!(default_user_agent().starts_with("PastaBot "));
/// ```
pub fn default_user_agent() -> String {
    format!("PastaBot {}", env!("CARGO_PKG_VERSION"))
}

/// The result of an HTTP request.
pub type HTTPResult<T> = Result<T, HTTPError>;

/// Indicates an error has occurred when making an HTTP call.
#[derive(Debug, Error)]
pub enum HTTPError {
    /// An error that occurred while making an HTTP request.
    #[error("Error while making HTTP request: {0}")]
    Request(#[from] reqwest::Error),

    /// An unsuccessful HTTP status code in an HTTP response.
    #[error("Request returned HTTP {0}")]
    Http(reqwest::StatusCode),

    /// A missing Content-Type header in a response.
    #[error("Missing Content-Type header")]
    MissingContentType,

    /// An invalid Content-Type header.
    #[error("Invalid Content-Type header value: {0}")]
    InvalidContentType(#[from] header::ToStrError),

    /// A Content-Type that is not understood by the service.
    #[error("Unexpected content type: {0}")]
    UnexpectedContentType(String),
}

/// Checks that a response was successful and carries a JSON body, and
/// returns the raw body.
pub async fn json_body(resp: reqwest::Response) -> HTTPResult<String> {
    if !resp.status().is_success() {
        return Err(HTTPError::Http(resp.status()));
    }

    let content_type = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .ok_or(HTTPError::MissingContentType)?
        .to_str()?;
    if !content_type.starts_with("application/json") {
        Err(HTTPError::UnexpectedContentType(content_type.to_string()))
    } else {
        Ok(resp.text().await?)
    }
}
