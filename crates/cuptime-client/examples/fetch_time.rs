// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Fetch provider-signed time and compare it with the local clock.
//!
//! The provider defaults to Google; pass `microsoft` to query Edge's service.
//!
//! # Usage
//!
//! ```sh
//! RUST_LOG=debug cargo run --example fetch_time -- microsoft
//! ```

use cup_client::{Provider, TimeClient};

fn main() {
    env_logger::init();

    let provider: Provider = match std::env::args().nth(1) {
        Some(name) => match name.parse() {
            Ok(provider) => provider,
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(2);
            }
        },
        None => Provider::Google,
    };

    let client = match TimeClient::builder().provider(provider).build() {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Failed to build client: {e}");
            std::process::exit(1);
        }
    };

    println!("Querying {provider} ({})", client.config().service_url());

    match client.query() {
        Ok(time) => {
            let local = chrono::Utc::now().timestamp_millis();
            println!("Signed time: {} ms since Unix epoch", time.current_time_millis);
            if let Some(datetime) = time.datetime() {
                println!("UTC:         {datetime}");
            }
            println!("Key version: {}", time.key_version);
            println!("Local clock: {} ms ahead", local - time.current_time_millis);
        }
        Err(e) => {
            eprintln!("Signed time request failed: {e}");
            std::process::exit(1);
        }
    }
}
