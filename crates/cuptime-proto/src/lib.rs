// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! CUP2 signed-time protocol: request parameters, server proof verification
//! and time payload decoding.
//!
//! Chromium-family browsers fetch the current time over plain HTTP and
//! authenticate the answer with a provider-signed proof. This crate holds the
//! protocol logic only; it performs no I/O.
//!
//! # Usage
//!
//! ```no_run
//! use cup_proto::{keys::ProviderConfig, payload, request, verify};
//!
//! let config = ProviderConfig::google();
//! let req = request::build_request(config).unwrap();
//!
//! // GET `req.url()`, collect the `x-cup-server-proof` header and the body.
//! # let (proof, body): (Option<&str>, Vec<u8>) = (None, vec![]);
//!
//! let verified = verify::verify_response(proof, &body, config, req.protocol_key()).unwrap();
//! let time = payload::extract_time(verified).unwrap();
//! println!("{} ms since epoch", time.current_time_millis);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

/// Protocol error type.
pub mod error;

/// Provider key registry: endpoints, key versions and embedded public keys.
pub mod keys;

/// Time payload decoding (preamble stripping and JSON record).
pub mod payload;

/// Nonce generation and request parameter encoding.
pub mod request;

/// Server proof parsing, hash chain and ECDSA P-256 verification.
pub mod verify;

pub use error::CupError;
pub use keys::{Provider, ProviderConfig};
pub use payload::{TimePayload, extract_time, extract_time_strict};
pub use request::{CupRequest, Nonce, build_request, build_request_with_nonce};
pub use verify::{SERVER_PROOF_HEADER, verify_response};
