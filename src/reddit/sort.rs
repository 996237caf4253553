// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Ranking strategies for subreddit listings.

use rand::Rng;
use rand::seq::IndexedRandom;
use std::fmt;

/// A ranking Reddit knows how to produce for a subreddit listing.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Sort {
    /// Reddit's default ranking.
    #[default]
    Hot,

    /// Most recent first.
    New,

    /// Highest score first, across all time.
    Top,
}

impl Sort {
    /// Every concrete sort, in the order Reddit's UI lists them.
    pub const ALL: [Sort; 3] = [Sort::Hot, Sort::New, Sort::Top];

    /// The path segment Reddit uses for this sort.
    pub fn as_str(&self) -> &'static str {
        match self {
            Sort::Hot => "hot",
            Sort::New => "new",
            Sort::Top => "top",
        }
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A sort requested by a user, which may be "pick one for me".
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SortMode {
    /// Reddit's default ranking.
    #[default]
    Hot,

    /// Most recent first.
    New,

    /// Highest score first.
    Top,

    /// One of the other three, chosen anew every time it is
    /// [resolved](SortMode::resolve).
    Random,
}

impl SortMode {
    /// Interprets a user-supplied sort name.
    ///
    /// Matching is case-insensitive. Anything unrecognized falls back to
    /// [`SortMode::Hot`], Reddit's default ranking, so this never fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use pastabot::reddit::SortMode;
    /// assert_eq!(SortMode::from_arg("TOP"), SortMode::Top);
    /// assert_eq!(SortMode::from_arg("bogus-sort"), SortMode::Hot);
    /// ```
    pub fn from_arg(arg: &str) -> Self {
        match arg.to_lowercase().as_str() {
            "new" => SortMode::New,
            "top" => SortMode::Top,
            "random" | "rand" => SortMode::Random,
            _ => SortMode::Hot,
        }
    }

    /// Turns the mode into a concrete [`Sort`].
    ///
    /// [`SortMode::Random`] picks uniformly from [`Sort::ALL`] on every
    /// call; the result is never cached.
    pub fn resolve<R: Rng + ?Sized>(self, rng: &mut R) -> Sort {
        match self {
            SortMode::Hot => Sort::Hot,
            SortMode::New => Sort::New,
            SortMode::Top => Sort::Top,
            SortMode::Random => *Sort::ALL.choose(rng).unwrap_or(&Sort::Hot),
        }
    }
}
