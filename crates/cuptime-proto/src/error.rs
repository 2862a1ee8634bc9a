// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Error types for CUP2 request building, proof verification and payload decoding.
//!
//! [`CupError`] implements [`core::fmt::Display`] and [`std::error::Error`],
//! and converts into [`std::io::Error`] so callers working with `io::Result`
//! can recover the variant via `io::Error::get_ref()` and `downcast_ref`.

use core::fmt;

use crate::keys::Provider;

/// Errors that can occur while building a CUP2 request or verifying its response.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CupError {
    /// The response carried no `x-cup-server-proof` header.
    MissingProof,
    /// The server proof header is not exactly `<signature>:<request hash>`.
    MalformedProof {
        /// The offending header value.
        header: String,
    },
    /// The server bound its response to a different request body hash.
    RequestHashMismatch {
        /// The request hash the server echoed.
        received: String,
    },
    /// The signature half of the proof is not valid hex.
    SignatureDecode {
        /// Decoder error detail.
        reason: String,
    },
    /// The configured public key is not valid SubjectPublicKeyInfo DER.
    PublicKeyParse {
        /// Parser error detail.
        reason: String,
    },
    /// The configured public key is not an elliptic-curve key.
    WrongKeyType {
        /// Algorithm OID found in the key.
        algorithm: String,
    },
    /// ECDSA signature verification failed.
    SignatureInvalid,
    /// The response body could not be decoded into a time record.
    PayloadDecode {
        /// Length of the body in bytes, preamble included.
        length: usize,
        /// Decoder error detail.
        reason: String,
    },
    /// The operating system random source failed to produce a nonce.
    EntropyUnavailable,
    /// No provider is registered under this name.
    UnknownProvider {
        /// The requested provider name.
        name: String,
    },
    /// The provider has no key registered under this version.
    UnknownKeyVersion {
        /// The provider that was queried.
        provider: Provider,
        /// The requested key version.
        key_version: u32,
    },
}

impl fmt::Display for CupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CupError::MissingProof => write!(f, "no x-cup-server-proof header in response"),
            CupError::MalformedProof { header } => {
                write!(f, "x-cup-server-proof is invalid: {header}")
            }
            CupError::RequestHashMismatch { received } => {
                write!(f, "response request hash mismatch: {received}")
            }
            CupError::SignatureDecode { reason } => {
                write!(f, "failed to decode proof signature: {reason}")
            }
            CupError::PublicKeyParse { reason } => {
                write!(f, "failed to parse public key: {reason}")
            }
            CupError::WrongKeyType { algorithm } => {
                write!(f, "public key is not an EC key (algorithm {algorithm})")
            }
            CupError::SignatureInvalid => write!(f, "ECDSA signature verification failed"),
            CupError::PayloadDecode { length, reason } => {
                write!(f, "failed to decode {length} byte time payload: {reason}")
            }
            CupError::EntropyUnavailable => write!(f, "system random source unavailable"),
            CupError::UnknownProvider { name } => write!(f, "unknown time provider: {name}"),
            CupError::UnknownKeyVersion {
                provider,
                key_version,
            } => {
                write!(f, "no {provider} key with version {key_version}")
            }
        }
    }
}

impl std::error::Error for CupError {}

impl From<CupError> for std::io::Error {
    fn from(err: CupError) -> std::io::Error {
        let kind = match &err {
            CupError::EntropyUnavailable => std::io::ErrorKind::Other,
            CupError::UnknownProvider { .. } | CupError::UnknownKeyVersion { .. } => {
                std::io::ErrorKind::InvalidInput
            }
            _ => std::io::ErrorKind::InvalidData,
        };
        std::io::Error::new(kind, err)
    }
}
