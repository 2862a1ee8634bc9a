// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Core result type and the blocking signed-time exchange.
//!
//! One exchange walks `Init -> NonceReady -> RequestSent -> ResponseReceived ->
//! Verified -> Parsed -> Done` and stops at the first failure. The pure steps
//! (request building and response processing) are shared with the async path
//! in [`crate::async_fetch`].

use chrono::{DateTime, Utc};
use log::{debug, warn};

use cup_proto::{
    CupRequest, Provider, ProviderConfig, SERVER_PROOF_HEADER, TimePayload, extract_time,
    extract_time_strict, verify_response,
};

use crate::error::TimeError;
use crate::transport::{HttpResponse, Transport};

/// A provider timestamp whose signature has been verified.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SignedTime {
    /// Provider time in milliseconds since the Unix epoch.
    pub current_time_millis: i64,
    /// Server nonce from the payload, if the provider sent one.
    pub server_nonce: Option<f64>,
    /// Registered provider that signed the response, `None` for custom configs.
    pub provider: Option<Provider>,
    /// Key version the proof was verified with.
    pub key_version: u32,
}

impl SignedTime {
    pub(crate) fn new(payload: TimePayload, config: &ProviderConfig) -> Self {
        SignedTime {
            current_time_millis: payload.current_time_millis,
            server_nonce: payload.server_nonce,
            provider: config.provider(),
            key_version: config.key_version(),
        }
    }

    /// The timestamp as a UTC date-time, or `None` if it is out of range.
    ///
    /// # Examples
    ///
    /// ```
    /// # use cup_client::SignedTime;
    /// let time = SignedTime {
    ///     current_time_millis: 1_700_000_000_123,
    ///     server_nonce: None,
    ///     provider: None,
    ///     key_version: 1,
    /// };
    /// assert_eq!(time.datetime().unwrap().to_rfc3339(), "2023-11-14T22:13:20.123+00:00");
    /// ```
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.current_time_millis)
    }
}

/// Options for processing a response.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct ExchangeOptions {
    /// Require the exact `)]}'\n` preamble.
    pub(crate) strict_preamble: bool,
}

/// Init -> NonceReady.
pub(crate) fn prepare_request(config: &ProviderConfig) -> Result<CupRequest, TimeError> {
    let request = cup_proto::build_request(config)?;
    debug!("cup2: GET {}", request.url());
    Ok(request)
}

/// ResponseReceived -> Verified -> Parsed.
pub(crate) fn process_response(
    config: &ProviderConfig,
    request: &CupRequest,
    response: &HttpResponse,
    options: ExchangeOptions,
) -> Result<SignedTime, TimeError> {
    debug!(
        "cup2: status {} with {} byte body from {}",
        response.status,
        response.body.len(),
        config.service_url()
    );

    let body = verify_response(
        response.header(SERVER_PROOF_HEADER),
        &response.body,
        config,
        request.protocol_key(),
    )
    .inspect_err(|e| warn!("cup2: rejected response from {}: {e}", config.service_url()))?;
    debug!("cup2: proof verified with key version {}", config.key_version());

    let payload = if options.strict_preamble {
        extract_time_strict(body)
    } else {
        extract_time(body)
    }?;
    debug!("cup2: current_time_millis={}", payload.current_time_millis);

    Ok(SignedTime::new(payload, config))
}

pub(crate) fn exchange<T: Transport + ?Sized>(
    transport: &T,
    config: &ProviderConfig,
    options: ExchangeOptions,
) -> Result<SignedTime, TimeError> {
    let request = prepare_request(config)?;
    let response = transport.get(request.url())?;
    process_response(config, &request, &response, options)
}

/// Fetch and verify the provider's time over a caller-supplied transport.
///
/// # Errors
///
/// Returns [`TimeError::Transport`] if the GET fails and
/// [`TimeError::Protocol`] if the proof or payload is rejected.
pub fn query_with<T: Transport + ?Sized>(
    transport: &T,
    config: &ProviderConfig,
) -> Result<SignedTime, TimeError> {
    exchange(transport, config, ExchangeOptions::default())
}

/// Like [`query_with`], returning only the millisecond timestamp.
///
/// # Errors
///
/// See [`query_with`].
pub fn fetch_time_with<T: Transport + ?Sized>(
    transport: &T,
    config: &ProviderConfig,
) -> Result<i64, TimeError> {
    query_with(transport, config).map(|t| t.current_time_millis)
}

/// Fetch and verify the provider's time with a 5 second timeout.
///
/// # Examples
///
/// ```no_run
/// # fn main() -> Result<(), cup_client::error::TimeError> {
/// let time = cup_client::query(cup_client::ProviderConfig::google())?;
/// println!("Google's time: {:?}", time.datetime());
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// See [`query_with`].
#[cfg(feature = "blocking")]
pub fn query(config: &ProviderConfig) -> Result<SignedTime, TimeError> {
    query_with_timeout(config, crate::transport::DEFAULT_TIMEOUT)
}

/// Fetch and verify the provider's time with a configurable timeout.
///
/// # Errors
///
/// See [`query_with`].
#[cfg(feature = "blocking")]
pub fn query_with_timeout(
    config: &ProviderConfig,
    timeout: std::time::Duration,
) -> Result<SignedTime, TimeError> {
    let transport = crate::transport::BlockingTransport::new(timeout)?;
    query_with(&transport, config)
}

/// Fetch the provider's verified time in milliseconds since the Unix epoch.
///
/// # Examples
///
/// ```no_run
/// # fn main() -> Result<(), cup_client::error::TimeError> {
/// let millis = cup_client::fetch_time(cup_client::ProviderConfig::microsoft())?;
/// println!("{millis}");
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// See [`query_with`].
#[cfg(feature = "blocking")]
pub fn fetch_time(config: &ProviderConfig) -> Result<i64, TimeError> {
    query(config).map(|t| t.current_time_millis)
}
