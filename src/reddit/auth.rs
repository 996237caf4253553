// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Authentication for the Reddit API.
//!
//! The bot only ever reads public listings, so it authenticates as an
//! application rather than as a user: it trades its client ID and secret
//! for a short-lived bearer token using the OAuth "client credentials"
//! grant.

use crate::clock::{DateTime, Expires, TimeDelta, Utc};
use serde::Deserialize;
use std::env;
use thiserror::Error;

/// Client credentials for a Reddit "script" or "web" application.
#[derive(Clone)]
pub struct Auth {
    client_id: String,
    client_secret: String,
}

impl Auth {
    /// Creates a new `Auth` structure using the given credentials.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        let client_id = client_id.into();
        let client_secret = client_secret.into();
        Self {
            client_id,
            client_secret,
        }
    }

    /// Retrieves credentials from the environment.
    ///
    /// Returns an error if either value cannot be retrieved from the
    /// environment.
    pub fn from_env(id_var: &str, secret_var: &str) -> AuthResult<Self> {
        let client_id = env::var(id_var)?;
        let client_secret = env::var(secret_var)?;
        Ok(Self::new(client_id, client_secret))
    }

    /// The application's client ID.
    ///
    /// # Examples
    ///
    /// ```
    /// use pastabot::reddit::auth::Auth;
    /// let auth = Auth::new("my-client-id", "my-secret");
    /// assert_eq!(auth.client_id(), "my-client-id");
    /// ```
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// The application's client secret.
    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }
}

impl std::fmt::Debug for Auth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Auth")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// A bearer token handed out by Reddit's `access_token` endpoint.
#[derive(Clone, Debug)]
pub struct Token {
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl Token {
    /// Creates a token that expires at the given time.
    pub fn new(access_token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        let access_token = access_token.into();
        Self {
            access_token,
            expires_at,
        }
    }

    /// Parses a response from the `access_token` endpoint.
    ///
    /// `now` is the time the token was issued; Reddit only reports how
    /// many seconds the token lives for.
    pub fn parse(data: &str, now: DateTime<Utc>) -> AuthResult<Self> {
        let response: TokenResponse = serde_json::from_str(data)?;
        match response {
            TokenResponse::Granted {
                access_token,
                expires_in,
            } => {
                let expires_at = TimeDelta::try_seconds(expires_in)
                    .and_then(|lifetime| now.checked_add_signed(lifetime))
                    .ok_or(AuthError::InvalidLifetime(expires_in))?;
                Ok(Self::new(access_token, expires_at))
            }
            TokenResponse::Denied { error } => Err(AuthError::Denied(error)),
        }
    }

    /// The raw bearer token.
    pub fn access_token(&self) -> &str {
        &self.access_token
    }
}

impl Expires for Token {
    fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TokenResponse {
    Granted { access_token: String, expires_in: i64 },
    Denied { error: String },
}

/// Standard result type for authentication.
pub type AuthResult<T> = Result<T, AuthError>;

/// Indicates an error when creating credentials or obtaining a token.
#[derive(Debug, Error)]
pub enum AuthError {
    /// An error occurred while retrieving a key from the environment.
    #[error("Environment error: {0}")]
    EnvError(#[from] env::VarError),

    /// Reddit refused to issue a token.
    #[error("Reddit denied the token request: {0}")]
    Denied(String),

    /// Reddit reported a token lifetime that cannot be represented.
    #[error("Token lifetime out of range: {0} seconds")]
    InvalidLifetime(i64),

    /// The token response could not be understood.
    #[error("Could not parse token response: {0}")]
    Parse(#[from] serde_json::Error),
}
