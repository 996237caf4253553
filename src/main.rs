// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

use clap::Parser;
use pastabot::cli::{self, Config};

#[tokio::main]
async fn main() {
    // A missing .env is fine; flags and the real environment still work.
    dotenvy::dotenv().ok();

    let config = Config::parse();
    if let Err(err) = cli::run(config).await {
        cli::die(1, &err.message());
    }
}
