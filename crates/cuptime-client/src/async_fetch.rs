// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Async signed-time client using the Tokio runtime.
//!
//! This module provides async versions of the blocking [`fetch_time`](crate::fetch_time)
//! and [`query`](crate::query) functions, using [`reqwest::Client`] for
//! non-blocking I/O.
//!
//! # Runtime Requirements
//!
//! These functions must be called from within a Tokio runtime context.
//! The library does **not** create a runtime; you must provide one.
//!
//! # Examples
//!
//! ```no_run
//! # async fn example() -> Result<(), cup_client::error::TimeError> {
//! let config = cup_client::ProviderConfig::google();
//! let millis = cup_client::async_fetch::fetch_time(config).await?;
//! println!("{millis} ms since the Unix epoch");
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use log::debug;

use cup_proto::ProviderConfig;

use crate::error::{TimeError, TransportError};
use crate::request::{ExchangeOptions, SignedTime, prepare_request, process_response};
use crate::transport::{DEFAULT_TIMEOUT, HttpResponse, MAX_BODY_BYTES, check_content_length};

/// Fetch the provider's verified time with a 5 second timeout.
///
/// # Errors
///
/// See [`query_with_timeout`].
pub async fn fetch_time(config: &ProviderConfig) -> Result<i64, TimeError> {
    query(config).await.map(|t| t.current_time_millis)
}

/// Fetch and verify the provider's time with a 5 second timeout.
///
/// # Errors
///
/// See [`query_with_timeout`].
pub async fn query(config: &ProviderConfig) -> Result<SignedTime, TimeError> {
    query_with_timeout(config, DEFAULT_TIMEOUT).await
}

/// Fetch and verify the provider's time with a configurable timeout.
///
/// The timeout covers the whole exchange (DNS, connect, request and body).
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> Result<(), cup_client::error::TimeError> {
/// use std::time::Duration;
/// let time = cup_client::async_fetch::query_with_timeout(
///     cup_client::ProviderConfig::microsoft(),
///     Duration::from_secs(10),
/// ).await?;
/// println!("{:?}", time.datetime());
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns [`TransportError::Timeout`] if the exchange does not finish in
/// time, other [`TimeError::Transport`] variants if the GET fails and
/// [`TimeError::Protocol`] if the proof or payload is rejected.
pub async fn query_with_timeout(
    config: &ProviderConfig,
    timeout: Duration,
) -> Result<SignedTime, TimeError> {
    let client = reqwest::Client::builder()
        .build()
        .map_err(|e| TransportError::Client {
            reason: e.to_string(),
        })?;
    query_with_client(&client, config, timeout).await
}

/// Like [`query_with_timeout`], reusing a caller-owned [`reqwest::Client`].
///
/// # Errors
///
/// See [`query_with_timeout`].
pub async fn query_with_client(
    client: &reqwest::Client,
    config: &ProviderConfig,
    timeout: Duration,
) -> Result<SignedTime, TimeError> {
    tokio::time::timeout(timeout, query_inner(client, config))
        .await
        .map_err(|_| TimeError::Transport(TransportError::Timeout))?
}

async fn query_inner(
    client: &reqwest::Client,
    config: &ProviderConfig,
) -> Result<SignedTime, TimeError> {
    // Nonce and URL (pure computation, shared with the blocking path).
    let request = prepare_request(config)?;

    let mut response = client.get(request.url()).send().await?;
    check_content_length(response.content_length())?;
    let status = response.status();
    let headers = response.headers().clone();

    // Stop reading as soon as the body passes the cap.
    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        body.extend_from_slice(&chunk);
        if body.len() > MAX_BODY_BYTES {
            return Err(TransportError::BodyTooLarge {
                size: body.len(),
                max: MAX_BODY_BYTES,
            }
            .into());
        }
    }
    debug!("recv: {} bytes", body.len());
    let response = HttpResponse::from_parts(status, &headers, body)?;

    // Verify and decode (pure computation, shared with the blocking path).
    process_response(config, &request, &response, ExchangeOptions::default())
}
