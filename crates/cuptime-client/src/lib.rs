// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

/*!
Signed-time client for the CUP2 protocol used by Chromium-family browsers.

Providers answer a plain HTTP GET with their current time and an ECDSA
P-256 proof bound to a fresh client nonce. This crate performs the GET,
verifies the proof against the provider's registered key and returns the
timestamp. A time that fails verification is never returned.

# Example
Shows how to fetch the current time according to Google's time service.

```rust,no_run
extern crate chrono;
extern crate cup_client;

fn main() {
    let time = cup_client::query(cup_client::ProviderConfig::google()).unwrap();
    let local_time = time.datetime().unwrap().with_timezone(&chrono::Local);
    println!("{}", local_time);
    println!("Signed with key version {}", time.key_version);
}
```

# Feature Flags

| Feature | Default | Description |
|---------|---------|-------------|
| `blocking` | yes | Blocking transport and `fetch_time`/`query` via `reqwest::blocking`. |
| `tokio` | no | Async `fetch_time`/`query` using reqwest's async client on the tokio runtime. |
*/

#![deny(unsafe_code)]
#![warn(missing_docs)]

// Re-export protocol types from cup_proto for convenience.
pub use cup_proto::{keys, payload, verify};
pub use cup_proto::{CupError, Provider, ProviderConfig};

/// Error types for the signed-time client.
pub mod error;

/// HTTP transport abstraction and the reqwest-backed blocking transport.
pub mod transport;

/// Reusable client with a builder for provider, timeout and preamble checks.
pub mod client;

/// Async signed-time client functions using the Tokio runtime.
///
/// See [`async_fetch::fetch_time`] and [`async_fetch::query_with_timeout`] for details.
#[cfg(feature = "tokio")]
pub mod async_fetch;

// Core result type and blocking orchestration.
mod request;

pub use client::{TimeClient, TimeClientBuilder};
pub use error::{TimeError, TransportError};
pub use request::{SignedTime, fetch_time_with, query_with};
pub use transport::{HttpResponse, Transport};

#[cfg(feature = "blocking")]
pub use request::{fetch_time, query, query_with_timeout};
#[cfg(feature = "blocking")]
pub use transport::BlockingTransport;
