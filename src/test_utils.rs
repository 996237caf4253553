use crate::clock::{Clock, DateTime, Utc};
use crate::http::HTTPError;
use crate::reddit::service::Service;
use crate::reddit::{Result, Sort};
use crate::router::{Channel, SendError};
use reqwest::StatusCode;
use std::fs;
use std::sync::{Arc, Mutex};

pub fn do_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn load_data(file: &str) -> String {
    fs::read_to_string(format!("tests/data/{file}.json")).expect("could not find test data")
}

fn try_load_data(file: &str) -> Result<String> {
    fs::read_to_string(format!("tests/data/{file}.json"))
        .map_err(|_| HTTPError::Http(StatusCode::NOT_FOUND).into())
}

#[derive(Clone, Debug, PartialEq)]
pub struct ListingRequest {
    pub subreddits: String,
    pub sort: Sort,
    pub limit: usize,
    pub after: Option<String>,
}

/// Serves listings from `tests/data`.
///
/// The first page of a listing is read from `<fixture>.json`; later
/// pages from `<fixture>_<after>.json`. Posts requested by ID come from
/// `by_id_<id>.json`. Missing files are reported as HTTP 404s.
#[derive(Clone, Debug)]
pub struct TestService {
    fixture: String,
    requests: Arc<Mutex<Vec<ListingRequest>>>,
}

impl TestService {
    pub fn new(fixture: &str) -> Self {
        Self {
            fixture: fixture.to_string(),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn requests(&self) -> Vec<ListingRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Service for TestService {
    async fn get_listing(
        &self,
        subreddits: &str,
        sort: Sort,
        limit: usize,
        after: Option<&str>,
    ) -> Result<String> {
        self.requests.lock().unwrap().push(ListingRequest {
            subreddits: subreddits.to_string(),
            sort,
            limit,
            after: after.map(String::from),
        });
        match after {
            Some(after) => try_load_data(&format!("{}_{after}", self.fixture)),
            None => try_load_data(&self.fixture),
        }
    }

    async fn get_by_id(&self, id: &str) -> Result<String> {
        try_load_data(&format!("by_id_{id}"))
    }
}

/// Collects everything sent to it instead of delivering it anywhere.
#[derive(Clone, Debug, Default)]
pub struct RecordingChannel {
    sent: Arc<Mutex<Vec<String>>>,
    fail_after: Option<usize>,
}

impl RecordingChannel {
    /// A channel that accepts `n` messages and then fails every send.
    pub fn failing_after(n: usize) -> Self {
        Self {
            fail_after: Some(n),
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

impl Channel for RecordingChannel {
    async fn send(&self, text: &str) -> std::result::Result<(), SendError> {
        let mut sent = self.sent.lock().unwrap();
        if self.fail_after.is_some_and(|n| sent.len() >= n) {
            return Err(SendError::new("channel closed"));
        }
        sent.push(text.to_string());
        Ok(())
    }
}

pub struct FrozenClock {
    datetime: DateTime<Utc>,
}

impl FrozenClock {
    pub fn new(datetime: DateTime<Utc>) -> Self {
        FrozenClock { datetime }
    }
}

impl Default for FrozenClock {
    fn default() -> Self {
        let datetime = DateTime::parse_from_rfc3339("2025-05-23T10:13:00-07:00")
            .expect("invalid date supplied")
            .with_timezone(&Utc);
        Self::new(datetime)
    }
}

impl Clock for FrozenClock {
    fn now(&self) -> DateTime<Utc> {
        self.datetime
    }
}
