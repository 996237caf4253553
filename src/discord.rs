// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Connects the [`Router`] to Discord.

use crate::command::CommandRequest;
use crate::logger;
use crate::reddit::service::Service;
use crate::router::{Channel, Router, SendError};
use log::{error, info};
use serenity::all::{
    ActivityData, ChannelId, Context, EventHandler, GatewayIntents, Http, Message, OnlineStatus,
    Ready,
};
use serenity::{Client, async_trait};
use std::sync::{Arc, OnceLock};

/// What the bot shows as its activity.
pub const PRESENCE: &str = "pasta!help";

/// The gateway events the bot needs: messages in servers and DMs, with
/// their content.
pub fn intents() -> GatewayIntents {
    GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT
}

/// The Discord channel a command was issued in.
#[derive(Clone)]
pub struct DiscordChannel {
    http: Arc<Http>,
    channel_id: ChannelId,
}

impl DiscordChannel {
    /// Sends to `channel_id` using the gateway's HTTP client.
    pub fn new(http: Arc<Http>, channel_id: ChannelId) -> Self {
        Self { http, channel_id }
    }
}

impl Channel for DiscordChannel {
    async fn send(&self, text: &str) -> Result<(), SendError> {
        self.channel_id
            .say(&self.http, text)
            .await
            .map(|_| ())
            .map_err(|err| SendError::new(err.to_string()))
    }
}

/// Handles gateway events by routing commands to a [`Router`].
pub struct Bot<S> {
    router: Router<S>,
    bot_id: OnceLock<u64>,
}

impl<S> Bot<S> {
    /// Creates a handler that passes commands to `router`.
    pub fn new(router: Router<S>) -> Self {
        Self {
            router,
            bot_id: OnceLock::new(),
        }
    }
}

#[async_trait]
impl<S: Service + Send + Sync + 'static> EventHandler for Bot<S> {
    async fn ready(&self, ctx: Context, ready: Ready) {
        let _ = self.bot_id.set(ready.user.id.get());
        info!("Logged in as {}", ready.user.name);
        logger::log_action("started");
        ctx.set_presence(Some(ActivityData::playing(PRESENCE)), OnlineStatus::Online);
    }

    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }

        let bot_id = self.bot_id.get().copied();
        let Some(request) = CommandRequest::parse(&msg.author.name, &msg.content, bot_id) else {
            return;
        };

        let channel = DiscordChannel::new(ctx.http.clone(), msg.channel_id);
        self.router.respond(&request, &channel).await;
    }
}

/// Connects to Discord and handles commands until interrupted.
///
/// Ctrl-C shuts every shard down, after which this returns.
pub async fn start<S>(token: &str, router: Router<S>) -> Result<(), serenity::Error>
where
    S: Service + Send + Sync + 'static,
{
    let mut client = Client::builder(token, intents())
        .event_handler(Bot::new(router))
        .await?;

    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                logger::log_action("shut down");
                shard_manager.shutdown_all().await;
            }
            Err(err) => error!("Could not listen for Ctrl-C: {err}"),
        }
    });

    client.start().await
}
