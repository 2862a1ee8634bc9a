// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Reusable signed-time client.
//!
//! [`TimeClient`] holds a resolved provider configuration and an HTTP
//! transport so repeated fetches reuse the same connection pool. Every call
//! still generates a fresh nonce and performs exactly one GET.
//!
//! # Examples
//!
//! ```no_run
//! # fn main() -> Result<(), cup_client::error::TimeError> {
//! use cup_client::{Provider, TimeClient};
//!
//! let client = TimeClient::builder()
//!     .provider(Provider::Microsoft)
//!     .timeout(std::time::Duration::from_secs(3))
//!     .strict_preamble(true)
//!     .build()?;
//!
//! let time = client.query()?;
//! println!("{} (key v{})", time.current_time_millis, time.key_version);
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::time::Duration;

use cup_proto::{Provider, ProviderConfig, keys};

use crate::error::TimeError;
use crate::request::{ExchangeOptions, SignedTime, exchange};
use crate::transport::{DEFAULT_TIMEOUT, Transport};

/// Where the builder gets its provider configuration from.
#[derive(Clone, Debug)]
enum Source {
    Registered {
        provider: Provider,
        key_version: Option<u32>,
    },
    Custom(ProviderConfig),
}

/// Builder for a [`TimeClient`].
pub struct TimeClientBuilder {
    source: Source,
    timeout: Duration,
    strict_preamble: bool,
    user_agent: Option<String>,
    transport: Option<Box<dyn Transport + Send + Sync>>,
}

impl TimeClientBuilder {
    fn new() -> Self {
        TimeClientBuilder {
            source: Source::Registered {
                provider: Provider::Google,
                key_version: None,
            },
            timeout: DEFAULT_TIMEOUT,
            strict_preamble: false,
            user_agent: None,
            transport: None,
        }
    }

    /// Use a registered provider (default: [`Provider::Google`]).
    pub fn provider(mut self, provider: Provider) -> Self {
        self.source = Source::Registered {
            provider,
            key_version: None,
        };
        self
    }

    /// Pin a key version of the registered provider instead of its current one.
    ///
    /// Ignored when a custom configuration is set.
    pub fn key_version(mut self, version: u32) -> Self {
        if let Source::Registered { key_version, .. } = &mut self.source {
            *key_version = Some(version);
        }
        self
    }

    /// Use a caller-supplied endpoint and key instead of the registry.
    pub fn config(mut self, config: ProviderConfig) -> Self {
        self.source = Source::Custom(config);
        self
    }

    /// Overall request timeout (default: 5 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Require the exact `)]}'\n` preamble before the JSON payload.
    pub fn strict_preamble(mut self, strict: bool) -> Self {
        self.strict_preamble = strict;
        self
    }

    /// `User-Agent` header sent with each request.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Send requests through `transport` instead of the built-in reqwest client.
    ///
    /// [`timeout`](Self::timeout) and [`user_agent`](Self::user_agent) do not
    /// apply to a custom transport.
    pub fn transport<T>(mut self, transport: T) -> Self
    where
        T: Transport + Send + Sync + 'static,
    {
        self.transport = Some(Box::new(transport));
        self
    }

    /// Resolve the configuration and construct the client.
    ///
    /// # Errors
    ///
    /// Returns [`CupError::UnknownKeyVersion`](cup_proto::CupError::UnknownKeyVersion)
    /// for an unregistered key version and [`TimeError::Transport`] if the
    /// HTTP client cannot be built.
    pub fn build(self) -> Result<TimeClient, TimeError> {
        let config = match self.source {
            Source::Registered {
                provider,
                key_version: Some(version),
            } => keys::lookup(provider, version)?.clone(),
            Source::Registered {
                provider,
                key_version: None,
            } => keys::current(provider).clone(),
            Source::Custom(config) => config,
        };

        let transport = match self.transport {
            Some(transport) => transport,
            None => default_transport(self.timeout, self.user_agent.as_deref())?,
        };

        Ok(TimeClient {
            config,
            options: ExchangeOptions {
                strict_preamble: self.strict_preamble,
            },
            transport,
        })
    }
}

impl fmt::Debug for TimeClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimeClientBuilder")
            .field("source", &self.source)
            .field("timeout", &self.timeout)
            .field("strict_preamble", &self.strict_preamble)
            .field("user_agent", &self.user_agent)
            .field("custom_transport", &self.transport.is_some())
            .finish()
    }
}

#[cfg(feature = "blocking")]
fn default_transport(
    timeout: Duration,
    user_agent: Option<&str>,
) -> Result<Box<dyn Transport + Send + Sync>, TimeError> {
    let transport = crate::transport::BlockingTransport::with_user_agent(timeout, user_agent)?;
    Ok(Box::new(transport))
}

#[cfg(not(feature = "blocking"))]
fn default_transport(
    _timeout: Duration,
    _user_agent: Option<&str>,
) -> Result<Box<dyn Transport + Send + Sync>, TimeError> {
    Err(crate::error::TransportError::Client {
        reason: "no transport configured and the `blocking` feature is disabled".into(),
    }
    .into())
}

/// A configured signed-time client.
pub struct TimeClient {
    config: ProviderConfig,
    options: ExchangeOptions,
    transport: Box<dyn Transport + Send + Sync>,
}

impl TimeClient {
    /// Start building a client.
    pub fn builder() -> TimeClientBuilder {
        TimeClientBuilder::new()
    }

    /// The provider configuration in use.
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Fetch and verify the provider's time.
    ///
    /// # Errors
    ///
    /// Same as [`crate::query_with`]. With strict preamble checking on, a body
    /// without the exact preamble fails with
    /// [`CupError::PayloadDecode`](cup_proto::CupError::PayloadDecode).
    pub fn query(&self) -> Result<SignedTime, TimeError> {
        exchange(&self.transport, &self.config, self.options)
    }

    /// Fetch the provider's verified time in milliseconds since the Unix epoch.
    ///
    /// # Errors
    ///
    /// See [`query`](Self::query).
    pub fn fetch_time(&self) -> Result<i64, TimeError> {
        self.query().map(|t| t.current_time_millis)
    }
}

impl fmt::Debug for TimeClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimeClient")
            .field("config", &self.config)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
