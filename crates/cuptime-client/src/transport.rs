// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! HTTP transport seam.
//!
//! The protocol only needs a GET that returns status, headers and body.
//! [`Transport`] abstracts that round trip so the orchestration can run over
//! reqwest, a proxy-aware client of the caller's choosing, or a canned
//! response in tests.

use std::time::Duration;

use reqwest::header::HeaderMap;

use crate::error::TransportError;

/// Default timeout for a time request (5 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Largest response body accepted. Time responses are well under 1 KiB.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// A received HTTP response.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    headers: Vec<(String, String)>,
    /// Raw response body.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// A response with no headers.
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// Add a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// First value of header `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Build from a reqwest status, header map and body.
    ///
    /// Header values that are not visible ASCII are dropped. Callers read the
    /// body through [`check_content_length`] and a bounded reader first, so
    /// the size check here is a backstop.
    #[cfg_attr(not(any(feature = "blocking", feature = "tokio")), allow(dead_code))]
    pub(crate) fn from_parts(
        status: reqwest::StatusCode,
        headers: &HeaderMap,
        body: Vec<u8>,
    ) -> Result<Self, TransportError> {
        if body.len() > MAX_BODY_BYTES {
            return Err(TransportError::BodyTooLarge {
                size: body.len(),
                max: MAX_BODY_BYTES,
            });
        }
        let headers = headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_owned(), v.to_owned()))
            })
            .collect();
        Ok(HttpResponse {
            status: status.as_u16(),
            headers,
            body,
        })
    }
}

/// Reject a response whose advertised length exceeds [`MAX_BODY_BYTES`]
/// before any of the body is read.
#[cfg_attr(not(any(feature = "blocking", feature = "tokio")), allow(dead_code))]
pub(crate) fn check_content_length(content_length: Option<u64>) -> Result<(), TransportError> {
    match content_length {
        Some(len) if len > MAX_BODY_BYTES as u64 => Err(TransportError::BodyTooLarge {
            size: usize::try_from(len).unwrap_or(usize::MAX),
            max: MAX_BODY_BYTES,
        }),
        _ => Ok(()),
    }
}

/// Performs the single GET of a signed-time exchange.
///
/// Implementations must not retry and must not follow the request with any
/// other traffic; the caller verifies exactly the response returned.
pub trait Transport {
    /// GET `url` and return the complete response.
    fn get(&self, url: &str) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        (**self).get(url)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        (**self).get(url)
    }
}

/// Blocking transport backed by [`reqwest::blocking::Client`].
#[cfg(feature = "blocking")]
#[derive(Clone, Debug)]
pub struct BlockingTransport {
    client: reqwest::blocking::Client,
}

#[cfg(feature = "blocking")]
impl BlockingTransport {
    /// A transport with the given overall request timeout.
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        Self::with_user_agent(timeout, None)
    }

    /// A transport with a timeout and an optional `User-Agent` header.
    pub fn with_user_agent(
        timeout: Duration,
        user_agent: Option<&str>,
    ) -> Result<Self, TransportError> {
        let mut builder = reqwest::blocking::Client::builder().timeout(timeout);
        if let Some(ua) = user_agent {
            builder = builder.user_agent(ua);
        }
        let client = builder.build().map_err(|e| TransportError::Client {
            reason: e.to_string(),
        })?;
        Ok(BlockingTransport { client })
    }
}

#[cfg(feature = "blocking")]
impl Transport for BlockingTransport {
    fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        use std::io::Read;

        let response = self.client.get(url).send()?;
        check_content_length(response.content_length())?;
        let status = response.status();
        let headers = response.headers().clone();

        // One byte past the cap is enough to tell an oversized body apart.
        let mut body = Vec::new();
        response
            .take(MAX_BODY_BYTES as u64 + 1)
            .read_to_end(&mut body)
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::TimedOut => TransportError::Timeout,
                _ => TransportError::Body {
                    reason: e.to_string(),
                },
            })?;
        HttpResponse::from_parts(status, &headers, body)
    }
}
