// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Example demonstrating async signed-time requests using tokio.
//!
//! Run with: `cargo run --example async_fetch --features tokio`

use std::time::Duration;

use cup_client::{ProviderConfig, async_fetch};

#[tokio::main]
async fn main() {
    env_logger::init();

    println!("Querying signed-time providers concurrently...\n");

    // Fire all requests concurrently.
    let handles: Vec<_> = cup_client::keys::all()
        .map(|config: &'static ProviderConfig| {
            tokio::spawn(async move {
                let result = async_fetch::query_with_timeout(config, Duration::from_secs(5)).await;
                (config, result)
            })
        })
        .collect();

    for handle in handles {
        let Ok((config, result)) = handle.await else {
            continue;
        };
        let name = config
            .provider()
            .map_or_else(|| config.service_url().to_string(), |p| p.to_string());
        match result {
            Ok(time) => {
                println!(
                    "{}: {} ms (key v{}, {:?})",
                    name,
                    time.current_time_millis,
                    time.key_version,
                    time.datetime()
                );
            }
            Err(e) => {
                println!("{}: error: {}", name, e);
            }
        }
    }
}
