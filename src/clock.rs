// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! All things time-related.

pub use chrono::{DateTime, TimeDelta, Utc};

/// Tells time and returns the time.
///
/// Generally you will want to retrieve time using [`SystemClock`],
/// but in tests you may want to implement a `Clock` with a fixed time.
pub trait Clock {
    /// The current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Interacts with the system clock to get the current time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Marks a thing that stops being valid at some point in time.
pub trait Expires {
    /// The moment the item stops being valid, in UTC.
    fn expires_at(&self) -> DateTime<Utc>;

    /// True if the item has expired, or will expire within `leeway`.
    fn is_expired<C: Clock>(&self, clock: &C, leeway: TimeDelta) -> bool {
        clock.now() + leeway >= self.expires_at()
    }
}
