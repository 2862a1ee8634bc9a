// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Error types for the signed-time client.
//!
//! Every fetch returns `Result<_, TimeError>`. [`TimeError`] also converts into
//! [`io::Error`] for callers that work in `io::Result`; the original error can
//! be recovered by downcasting:
//!
//! ```no_run
//! use cup_client::error::TimeError;
//!
//! fn fetch() -> std::io::Result<i64> {
//!     Ok(cup_client::fetch_time(cup_client::ProviderConfig::google())?)
//! }
//!
//! if let Err(e) = fetch() {
//!     if let Some(TimeError::Protocol(p)) = e
//!         .get_ref()
//!         .and_then(|inner| inner.downcast_ref::<TimeError>())
//!     {
//!         eprintln!("verification failed: {p}");
//!     }
//! }
//! ```

pub use cup_proto::error::CupError;

use std::fmt;
use std::io;

/// Errors that can occur while fetching signed time.
#[derive(Debug)]
pub enum TimeError {
    /// The HTTP round trip failed.
    Transport(TransportError),
    /// Request building, proof verification or payload decoding failed.
    Protocol(CupError),
}

/// HTTP transport failures.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TransportError {
    /// The HTTP client could not be constructed.
    Client {
        /// Detail about the failure.
        reason: String,
    },
    /// The request URL was rejected by the HTTP client.
    InvalidUrl {
        /// The offending URL.
        url: String,
    },
    /// Connection, DNS or protocol failure while sending the request.
    Request {
        /// Detail about the failure.
        reason: String,
    },
    /// The response body could not be read.
    Body {
        /// Detail about the failure.
        reason: String,
    },
    /// The response body exceeded the size limit.
    BodyTooLarge {
        /// Bytes received.
        size: usize,
        /// Configured limit.
        max: usize,
    },
    /// The request did not complete within the timeout.
    Timeout,
}

// ── Display implementations ─────────────────────────────────────────

impl fmt::Display for TimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeError::Transport(e) => write!(f, "time request failed: {e}"),
            TimeError::Protocol(e) => write!(f, "signed time rejected: {e}"),
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Client { reason } => write!(f, "failed to build HTTP client: {reason}"),
            TransportError::InvalidUrl { url } => write!(f, "invalid request URL: {url}"),
            TransportError::Request { reason } => write!(f, "{reason}"),
            TransportError::Body { reason } => write!(f, "failed to read body: {reason}"),
            TransportError::BodyTooLarge { size, max } => {
                write!(f, "response body too large: {size} bytes (max {max})")
            }
            TransportError::Timeout => write!(f, "request timed out"),
        }
    }
}

// ── Error trait implementations ─────────────────────────────────────

impl std::error::Error for TimeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TimeError::Transport(e) => Some(e),
            TimeError::Protocol(e) => Some(e),
        }
    }
}

impl std::error::Error for TransportError {}

// ── From conversions ────────────────────────────────────────────────

impl From<TimeError> for io::Error {
    fn from(err: TimeError) -> io::Error {
        let kind = match &err {
            TimeError::Transport(TransportError::Timeout) => io::ErrorKind::TimedOut,
            TimeError::Transport(TransportError::InvalidUrl { .. }) => io::ErrorKind::InvalidInput,
            TimeError::Transport(TransportError::BodyTooLarge { .. }) => {
                io::ErrorKind::InvalidData
            }
            TimeError::Transport(_) => io::ErrorKind::Other,
            TimeError::Protocol(CupError::EntropyUnavailable) => io::ErrorKind::Other,
            TimeError::Protocol(
                CupError::UnknownProvider { .. } | CupError::UnknownKeyVersion { .. },
            ) => io::ErrorKind::InvalidInput,
            TimeError::Protocol(_) => io::ErrorKind::InvalidData,
        };
        io::Error::new(kind, err)
    }
}

impl From<TransportError> for TimeError {
    fn from(err: TransportError) -> TimeError {
        TimeError::Transport(err)
    }
}

impl From<CupError> for TimeError {
    fn from(err: CupError) -> TimeError {
        TimeError::Protocol(err)
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_builder() {
            match err.url() {
                Some(url) => TransportError::InvalidUrl {
                    url: url.to_string(),
                },
                None => TransportError::Client {
                    reason: err.to_string(),
                },
            }
        } else if err.is_body() || err.is_decode() {
            TransportError::Body {
                reason: err.to_string(),
            }
        } else {
            TransportError::Request {
                reason: err.to_string(),
            }
        }
    }
}

impl From<reqwest::Error> for TimeError {
    fn from(err: reqwest::Error) -> TimeError {
        TimeError::Transport(err.into())
    }
}

// ── Tests ───────────────────────────────────────────────────────────
