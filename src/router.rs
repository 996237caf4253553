// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Routes chat commands to the code that answers them.
//!
//! A [`Router`] owns everything a command needs: the Reddit client, the
//! subreddits to read from, and a [`Formatter`]. It is built once at
//! startup and shared by every incoming message; nothing in it changes
//! while commands are being handled, apart from the random number
//! generator behind `rand`.

use crate::command::{ArgumentError, Command, CommandRequest, CommandTable, Invocation};
use crate::format::{Formatter, OutboundMessage};
use crate::logger;
use crate::reddit::service::Service;
use crate::reddit::{self, Post, Reddit, Sort, SortMode};
use log::{error, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::error::Error as StdError;
use std::sync::{Mutex, PoisonError};
use thiserror::Error;

/// Reply sent when someone asks for a command that does not exist.
pub const NOT_FOUND_REPLY: &str =
    "That command wasn't found! Sorry :(\nUse `pasta!help` for a list of commands.";

/// Reply sent when Reddit cannot be reached.
pub const FETCH_FAILURE_REPLY: &str =
    "Sorry, I couldn't get any pasta from Reddit right now :( Try again in a bit.";

/// Somewhere messages can be sent, such as the chat channel a command
/// came from.
pub trait Channel {
    /// Sends a single message.
    fn send(&self, text: &str) -> impl Future<Output = Result<(), SendError>> + Send;
}

/// A message could not be delivered.
#[derive(Debug, Error)]
#[error("Could not send message: {0}")]
pub struct SendError(Box<dyn StdError + Send + Sync>);

impl SendError {
    /// Wraps the underlying delivery error.
    pub fn new(source: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self(source.into())
    }
}

/// Why a command could not be carried out.
#[derive(Debug, Error)]
pub enum Error {
    /// The user gave the command bad arguments.
    #[error("Invalid argument for {}: {source}", .command.name())]
    InvalidArgument {
        command: Command,
        source: ArgumentError,
    },

    /// Posts could not be retrieved from Reddit.
    #[error("Could not fetch posts: {0}")]
    Fetch(#[from] reddit::Error),

    /// No command has the given name.
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    /// A reply could not be delivered.
    #[error(transparent)]
    Send(#[from] SendError),
}

impl Error {
    /// The message the user should see, if any.
    ///
    /// Delivery failures have no reply; there is nowhere to send it.
    pub fn reply(&self) -> Option<String> {
        match self {
            Error::InvalidArgument { command, source } => {
                Some(format!("Sorry, {source}. Usage: `{}`", command.usage()))
            }
            Error::Fetch(_) => Some(FETCH_FAILURE_REPLY.to_string()),
            Error::UnknownCommand(_) => Some(NOT_FOUND_REPLY.to_string()),
            Error::Send(_) => None,
        }
    }
}

/// Dispatches [`CommandRequest`]s to their handlers.
#[derive(Debug)]
pub struct Router<S> {
    reddit: Reddit<S>,
    subreddits: String,
    formatter: Formatter,
    table: CommandTable,
    rng: Mutex<StdRng>,
}

impl<S: Service + Sync> Router<S> {
    /// Creates a router that reads posts from `subreddits`.
    pub fn new(reddit: Reddit<S>, subreddits: impl Into<String>) -> Self {
        Self::with_rng(reddit, subreddits, StdRng::from_rng(&mut rand::rng()))
    }

    /// Creates a router whose random choices come from `rng`.
    pub fn with_rng(reddit: Reddit<S>, subreddits: impl Into<String>, rng: StdRng) -> Self {
        Self {
            reddit,
            subreddits: subreddits.into(),
            formatter: Formatter::default(),
            table: CommandTable::default(),
            rng: Mutex::new(rng),
        }
    }

    /// Replaces the formatter used to lay out messages.
    pub fn formatter(self, formatter: Formatter) -> Self {
        Self { formatter, ..self }
    }

    /// Handles a request and tells the user about anything that went
    /// wrong.
    ///
    /// This never fails: problems are logged and, where possible,
    /// reported back to the channel. Messages already sent before a
    /// failure stay sent.
    pub async fn respond<C: Channel + Sync>(&self, request: &CommandRequest, channel: &C) {
        match self.handle(request, channel).await {
            Ok(_) => {
                logger::log_command(self.table.canonical_name(request.name()), request.user())
            }
            Err(err) => {
                match &err {
                    Error::Fetch(_) | Error::Send(_) => error!("{} failed: {err}", request.name()),
                    _ => warn!("{} from {} rejected: {err}", request.name(), request.user()),
                }
                if let Some(reply) = err.reply() {
                    if let Err(send_err) = channel.send(&reply).await {
                        error!("Could not tell {} about it: {send_err}", request.user());
                    }
                }
            }
        }
    }

    /// Handles a request, sending its output to `channel`.
    ///
    /// Returns the number of messages sent.
    pub async fn handle<C: Channel + Sync>(
        &self,
        request: &CommandRequest,
        channel: &C,
    ) -> Result<usize, Error> {
        let command = self
            .table
            .lookup(request.name())
            .ok_or_else(|| Error::UnknownCommand(request.name().to_string()))?;
        let invocation = command
            .invocation(request.args())
            .map_err(|source| Error::InvalidArgument { command, source })?;

        let messages = match invocation {
            Invocation::List { sort, count } => self.list(self.resolve(sort), count).await?,
            Invocation::Get { sort, count } => self.get(self.resolve(sort), count).await?,
            Invocation::Rand { sort, max } => {
                let (sort, count) = self.draw(sort, max);
                self.get(sort, count).await?
            }
            Invocation::Show { id } => self.show(&id).await?,
            Invocation::Help => vec![OutboundMessage::new([self.table.help()])],
        };

        self.deliver(&messages, channel).await
    }

    /// Resolves the sort for `rand` and picks a rank in `[1, max]`.
    fn draw(&self, sort: SortMode, max: usize) -> (Sort, usize) {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let sort = sort.resolve(&mut *rng);
        let count = draw_count(&mut *rng, max);
        (sort, count)
    }

    fn resolve(&self, sort: SortMode) -> Sort {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        sort.resolve(&mut *rng)
    }

    async fn list(&self, sort: Sort, count: usize) -> Result<Vec<OutboundMessage>, Error> {
        let posts = self
            .reddit
            .subreddit(self.subreddits.as_str())
            .listing(sort, count)
            .collect()
            .await?;
        Ok(vec![self.formatter.digest(&posts)])
    }

    async fn get(&self, sort: Sort, count: usize) -> Result<Vec<OutboundMessage>, Error> {
        let post = self
            .reddit
            .subreddit(self.subreddits.as_str())
            .listing(sort, count)
            .rank(count)
            .await?;
        Ok(self.render(post.as_ref()))
    }

    async fn show(&self, id: &str) -> Result<Vec<OutboundMessage>, Error> {
        let post = self.reddit.submission(id).await?;
        Ok(self.render(Some(&post)))
    }

    fn render(&self, post: Option<&Post>) -> Vec<OutboundMessage> {
        post.map(|post| self.formatter.post(post)).unwrap_or_default()
    }

    async fn deliver<C: Channel + Sync>(
        &self,
        messages: &[OutboundMessage],
        channel: &C,
    ) -> Result<usize, Error> {
        let mut sent = 0;
        for chunk in messages.iter().flat_map(|m| m.chunks()) {
            channel.send(chunk).await?;
            sent += 1;
        }
        Ok(sent)
    }
}

/// Draws a count uniformly from `[1, max]`.
///
/// A `max` of 0 is treated as 1.
pub fn draw_count<R: Rng + ?Sized>(rng: &mut R, max: usize) -> usize {
    rng.random_range(1..=max.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{BODY_WINDOW, MESSAGE_LIMIT};
    use crate::test_utils::{RecordingChannel, TestService, do_logging};

    fn router(fixture: &str) -> (Router<TestService>, TestService) {
        do_logging();
        let service = TestService::new(fixture);
        let reddit = Reddit::with_service(service.clone());
        let router = Router::with_rng(reddit, "copypasta+emojipasta", StdRng::seed_from_u64(1234));
        (router, service)
    }

    fn request(name: &str, args: &[&str]) -> CommandRequest {
        CommandRequest::new("mipadi", name, args.iter().copied())
    }

    mod list {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn it_lists_exactly_count_posts() {
            for count in 1..=5 {
                let (router, _) = router("pastas");
                let channel = RecordingChannel::default();
                let count_arg = count.to_string();
                let sent = router
                    .handle(&request("list", &["hot", count_arg.as_str()]), &channel)
                    .await
                    .unwrap();
                assert_eq!(sent, 1);

                let sent = channel.sent();
                let lines = sent[0].lines().collect::<Vec<_>>();
                assert_eq!(lines.len(), count);
                for (i, line) in lines.iter().enumerate() {
                    assert!(line.starts_with(&format!("{}. [", i + 1)), "{line}");
                }
            }
        }

        #[tokio::test]
        async fn it_includes_rank_score_and_title() {
            let (router, _) = router("pastas");
            let channel = RecordingChannel::default();
            router
                .handle(&request("list", &["top", "2"]), &channel)
                .await
                .unwrap();
            assert_eq!(
                channel.sent(),
                vec!["1. [4120] Anyone else kill people in Skyrim/Fallout & undress them?\n2. [2875] Navy Seal"]
            );
        }

        #[tokio::test]
        async fn it_treats_unknown_sorts_like_hot() {
            let (bogus_router, bogus_service) = router("pastas");
            let bogus = RecordingChannel::default();
            bogus_router
                .handle(&request("list", &["bogus-sort", "5"]), &bogus)
                .await
                .unwrap();

            let (hot_router, hot_service) = router("pastas");
            let hot = RecordingChannel::default();
            hot_router
                .handle(&request("list", &["hot", "5"]), &hot)
                .await
                .unwrap();

            assert_eq!(bogus.sent(), hot.sent());
            assert_eq!(bogus_service.requests(), hot_service.requests());
            assert!(bogus_service.requests().iter().all(|r| r.sort == Sort::Hot));
        }

        #[tokio::test]
        async fn it_fetches_new_posts_for_new() {
            let (router, service) = router("pastas");
            let channel = RecordingChannel::default();
            router
                .handle(&request("list", &["new", "1"]), &channel)
                .await
                .unwrap();
            assert_eq!(service.requests()[0].sort, Sort::New);
        }

        #[tokio::test]
        async fn it_sends_nothing_for_an_empty_subreddit() {
            let (router, _) = router("empty");
            let channel = RecordingChannel::default();
            let sent = router
                .handle(&request("list", &["hot", "5"]), &channel)
                .await
                .unwrap();
            assert_eq!(sent, 0);
            assert!(channel.sent().is_empty());
        }

        #[tokio::test]
        async fn it_rejects_a_missing_count() {
            let (router, service) = router("pastas");
            let channel = RecordingChannel::default();
            let err = router
                .handle(&request("list", &["hot"]), &channel)
                .await
                .unwrap_err();
            assert!(matches!(err, Error::InvalidArgument { command: Command::List, .. }));
            assert!(service.requests().is_empty());
        }
    }

    mod get {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn it_sends_the_post_at_the_given_rank() {
            let (router, _) = router("pastas");
            let channel = RecordingChannel::default();
            let sent = router
                .handle(&request("get", &["hot", "2"]), &channel)
                .await
                .unwrap();
            assert_eq!(sent, 3);
            assert_eq!(
                channel.sent(),
                vec![
                    "🍝 Navy Seal 🍝",
                    "What the fuck did you just fucking say about me, you little bitch?",
                    "source: https://www.reddit.com/r/copypasta/comments/n37jyj/navy_seal/",
                ]
            );
        }

        #[tokio::test]
        async fn it_skips_the_body_of_link_posts() {
            let (router, _) = router("pastas");
            let channel = RecordingChannel::default();
            router
                .handle(&request("get", &["hot", "3"]), &channel)
                .await
                .unwrap();
            assert_eq!(
                channel.sent(),
                vec![
                    "🍝 Emojipasta 🍝 of the day 🍝",
                    "source: https://i.redd.it/abcdef.png",
                ]
            );
        }

        #[tokio::test]
        async fn it_reads_across_pages() {
            let (router, service) = router("pastas");
            let channel = RecordingChannel::default();
            router
                .handle(&request("get", &["top", "5"]), &channel)
                .await
                .unwrap();
            assert_eq!(channel.sent()[0], "🍝 Wholesome 🍝");
            assert_eq!(service.requests().len(), 2);
        }

        #[tokio::test]
        async fn it_sends_nothing_past_the_end_of_the_listing() {
            let (router, _) = router("pastas");
            let channel = RecordingChannel::default();
            let sent = router
                .handle(&request("get", &["hot", "25"]), &channel)
                .await
                .unwrap();
            assert_eq!(sent, 0);
        }

        #[tokio::test]
        async fn it_sends_nothing_for_an_empty_subreddit() {
            let (router, _) = router("empty");
            let channel = RecordingChannel::default();
            let sent = router
                .handle(&request("get", &["new", "1"]), &channel)
                .await
                .unwrap();
            assert_eq!(sent, 0);
        }

        #[tokio::test]
        async fn it_rejects_non_numeric_counts() {
            let (router, _) = router("pastas");
            let channel = RecordingChannel::default();
            let err = router
                .handle(&request("get", &["hot", "two"]), &channel)
                .await
                .unwrap_err();
            assert!(matches!(err, Error::InvalidArgument { command: Command::Get, .. }));
        }
    }

    mod random {
        use super::*;
        use pretty_assertions::assert_eq;
        use std::collections::{HashMap, HashSet};

        #[test]
        fn it_draws_counts_within_range() {
            let mut rng = StdRng::seed_from_u64(99);
            for _ in 0..10_000 {
                let n = draw_count(&mut rng, 50);
                assert!((1..=50).contains(&n), "{n}");
            }
        }

        #[test]
        fn it_draws_counts_uniformly() {
            let mut rng = StdRng::seed_from_u64(7);
            let trials = 50_000;
            let mut counts = HashMap::new();
            for _ in 0..trials {
                *counts.entry(draw_count(&mut rng, 50)).or_insert(0usize) += 1;
            }

            assert_eq!(counts.len(), 50);
            let expected = trials as f64 / 50.0;
            let chi_squared: f64 = counts
                .values()
                .map(|&observed| {
                    let diff = observed as f64 - expected;
                    diff * diff / expected
                })
                .sum();
            // 49 degrees of freedom; the 99.9th percentile is about 85.4.
            assert!(chi_squared < 85.4, "chi-squared = {chi_squared}");
        }

        #[test]
        fn it_treats_a_zero_max_as_one() {
            let mut rng = StdRng::seed_from_u64(1);
            assert_eq!(draw_count(&mut rng, 0), 1);
        }

        #[tokio::test]
        async fn it_fetches_no_more_than_max_posts() {
            let (router, service) = router("pastas");
            let channel = RecordingChannel::default();
            router
                .handle(&request("rand", &["new", "3"]), &channel)
                .await
                .unwrap();
            let requests = service.requests();
            assert_eq!(requests.len(), 1);
            assert!((1..=3).contains(&requests[0].limit));
            assert_eq!(requests[0].sort, Sort::New);
            assert!(!channel.sent().is_empty());
        }

        #[tokio::test]
        async fn it_picks_a_new_sort_every_time() {
            let (router, service) = router("pastas");
            let channel = RecordingChannel::default();
            for _ in 0..20 {
                router.handle(&request("rand", &[]), &channel).await.unwrap();
            }
            let sorts = service
                .requests()
                .iter()
                .filter(|r| r.after.is_none())
                .map(|r| r.sort)
                .collect::<HashSet<_>>();
            assert!(sorts.len() > 1, "{sorts:?}");
        }

        #[tokio::test]
        async fn it_sends_nothing_for_an_empty_subreddit() {
            let (router, _) = router("empty");
            let channel = RecordingChannel::default();
            let sent = router.handle(&request("r", &[]), &channel).await.unwrap();
            assert_eq!(sent, 0);
        }
    }

    mod show {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn it_shows_a_post_by_url() {
            let (router, _) = router("pastas");
            let channel = RecordingChannel::default();
            let url = "https://www.reddit.com/r/copypasta/comments/n345c9/anyone_else_kill_people_in_skyrimfallout_undress/";
            router
                .handle(&request("show", &[url]), &channel)
                .await
                .unwrap();
            assert_eq!(
                channel.sent(),
                vec![
                    "🍝 Anyone else kill people in Skyrim/Fallout & undress them? 🍝",
                    "I always do this. I kill them & take their clothes. Is that weird? <3",
                    &format!("source: {url}"),
                ]
            );
        }

        #[tokio::test]
        async fn it_chunks_long_bodies() {
            let (router, _) = router("pastas");
            let channel = RecordingChannel::default();
            router
                .handle(
                    &request("url", &["https://www.reddit.com/r/copypasta/comments/longpost/a_very_long_pasta/"]),
                    &channel,
                )
                .await
                .unwrap();

            let sent = channel.sent();
            assert_eq!(sent.len(), 5);
            assert_eq!(sent[0], "🍝 A very long pasta 🍝");
            let body = &sent[1..4];
            assert_eq!(body[0].chars().count(), BODY_WINDOW);
            assert_eq!(body[1].chars().count(), BODY_WINDOW);
            assert_eq!(body[2].chars().count(), 3200 - 2 * BODY_WINDOW);
            assert!(sent.iter().all(|m| m.chars().count() <= MESSAGE_LIMIT));
            assert!(sent[4].starts_with("source: "));
        }

        #[tokio::test]
        async fn it_rejects_urls_without_a_post() {
            let (router, _) = router("pastas");
            let channel = RecordingChannel::default();
            let err = router
                .handle(&request("show", &["https://www.reddit.com/r/copypasta/"]), &channel)
                .await
                .unwrap_err();
            assert!(matches!(
                err,
                Error::InvalidArgument {
                    command: Command::Show,
                    source: ArgumentError::NoPostId(_)
                }
            ));
        }

        #[tokio::test]
        async fn it_reports_missing_posts_as_fetch_failures() {
            let (router, _) = router("pastas");
            let channel = RecordingChannel::default();
            let err = router
                .handle(&request("show", &["https://redd.it/x/comments/missing/"]), &channel)
                .await
                .unwrap_err();
            assert!(matches!(err, Error::Fetch(reddit::Error::NotFound(_))));
        }
    }

    mod dispatch {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn it_rejects_unknown_commands() {
            let (router, _) = router("pastas");
            let channel = RecordingChannel::default();
            let err = router
                .handle(&request("delete", &[]), &channel)
                .await
                .unwrap_err();
            assert!(matches!(err, Error::UnknownCommand(name) if name == "delete"));
            assert!(channel.sent().is_empty());
        }

        #[tokio::test]
        async fn it_answers_aliases() {
            let (router, _) = router("pastas");
            let channel = RecordingChannel::default();
            router.handle(&request("li", &["hot", "1"]), &channel).await.unwrap();
            router.handle(&request("g", &["hot", "1"]), &channel).await.unwrap();
            assert_eq!(channel.sent().len(), 4);
        }

        #[tokio::test]
        async fn it_sends_help() {
            let (router, _) = router("pastas");
            let channel = RecordingChannel::default();
            let sent = router.handle(&request("help", &[]), &channel).await.unwrap();
            assert_eq!(sent, 1);
            assert!(channel.sent()[0].contains("pasta!list"));
        }

        #[tokio::test]
        async fn it_stops_when_a_send_fails() {
            let (router, _) = router("pastas");
            let channel = RecordingChannel::failing_after(1);
            let err = router
                .handle(&request("get", &["hot", "1"]), &channel)
                .await
                .unwrap_err();
            assert!(matches!(err, Error::Send(_)));
            assert_eq!(channel.sent().len(), 1);
        }
    }

    mod respond {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn it_replies_to_unknown_commands() {
            let (router, _) = router("pastas");
            let channel = RecordingChannel::default();
            router.respond(&request("delete", &[]), &channel).await;
            assert_eq!(channel.sent(), vec![NOT_FOUND_REPLY]);
        }

        #[tokio::test]
        async fn it_replies_to_invalid_arguments() {
            let (router, _) = router("pastas");
            let channel = RecordingChannel::default();
            router.respond(&request("list", &["top", "zero"]), &channel).await;
            let sent = channel.sent();
            assert_eq!(sent.len(), 1);
            assert!(sent[0].contains("count must be a number"), "{}", sent[0]);
            assert!(sent[0].contains("pasta!list <hot|new|top|random> <count>"));
        }

        #[tokio::test]
        async fn it_apologizes_for_fetch_failures() {
            let (router, _) = router("does_not_exist");
            let channel = RecordingChannel::default();
            router.respond(&request("get", &["hot", "1"]), &channel).await;
            assert_eq!(channel.sent(), vec![FETCH_FAILURE_REPLY]);
        }

        #[tokio::test]
        async fn it_sends_output_for_valid_commands() {
            let (router, _) = router("pastas");
            let channel = RecordingChannel::default();
            router.respond(&request("get", &["hot", "1"]), &channel).await;
            assert_eq!(channel.sent().len(), 3);
        }

        #[tokio::test]
        async fn it_does_not_reply_when_the_channel_is_broken() {
            let (router, _) = router("pastas");
            let channel = RecordingChannel::failing_after(0);
            router.respond(&request("get", &["hot", "1"]), &channel).await;
            assert!(channel.sent().is_empty());
        }
    }
}
