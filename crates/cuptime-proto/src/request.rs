// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Nonce generation and CUP2 request parameters.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::TryRngCore;
use rand::rngs::OsRng;

use crate::error::CupError;
use crate::keys::ProviderConfig;

/// Length of the request nonce in bytes.
pub const NONCE_LENGTH: usize = 32;

/// Hex SHA-256 of the empty request body. Every request is a bodyless GET.
pub const EMPTY_BODY_SHA256: &str =
    "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

/// Query parameter carrying the protocol key.
pub const CUP2_KEY_PARAM: &str = "cup2key";

/// Query parameter carrying the request body hash.
pub const CUP2_HREQ_PARAM: &str = "cup2hreq";

/// Per-request random challenge.
pub type Nonce = [u8; NONCE_LENGTH];

/// Draw a fresh nonce from the operating system CSPRNG.
///
/// # Errors
///
/// Returns [`CupError::EntropyUnavailable`] if the OS random source fails.
/// There is no fallback to a weaker generator.
pub fn generate_nonce() -> Result<Nonce, CupError> {
    let mut nonce = [0u8; NONCE_LENGTH];
    OsRng
        .try_fill_bytes(&mut nonce)
        .map_err(|_| CupError::EntropyUnavailable)?;
    Ok(nonce)
}

/// Format the `cup2key` value: `<key_version>:<base64url(nonce), unpadded>`.
///
/// # Examples
///
/// ```
/// let key = cup_proto::request::protocol_key(9, &[0u8; 32]);
/// assert_eq!(key, "9:AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA");
/// ```
pub fn protocol_key(key_version: u32, nonce: &Nonce) -> String {
    format!("{key_version}:{}", URL_SAFE_NO_PAD.encode(nonce))
}

/// Parameters for one CUP2 exchange.
///
/// The same value is needed again to verify the response, since the server
/// proof is bound to [`CupRequest::protocol_key`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CupRequest {
    nonce: Nonce,
    protocol_key: String,
    url: String,
}

impl CupRequest {
    /// The nonce this request was built from.
    pub fn nonce(&self) -> &Nonce {
        &self.nonce
    }

    /// The `cup2key` value sent with the request.
    pub fn protocol_key(&self) -> &str {
        &self.protocol_key
    }

    /// Full GET URL including the encoded query string.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Query parameters in the order they are encoded.
    pub fn query_pairs(&self) -> [(&'static str, &str); 2] {
        [
            (CUP2_HREQ_PARAM, EMPTY_BODY_SHA256),
            (CUP2_KEY_PARAM, &self.protocol_key),
        ]
    }
}

/// Build a request for `config` with a freshly generated nonce.
///
/// # Errors
///
/// Returns [`CupError::EntropyUnavailable`] if no nonce could be generated.
pub fn build_request(config: &ProviderConfig) -> Result<CupRequest, CupError> {
    let nonce = generate_nonce()?;
    Ok(build_request_with_nonce(config, &nonce))
}

/// Build a request for `config` with a specific nonce (for testing).
pub fn build_request_with_nonce(config: &ProviderConfig, nonce: &Nonce) -> CupRequest {
    let protocol_key = protocol_key(config.key_version(), nonce);

    // Keys are appended in sorted order.
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair(CUP2_HREQ_PARAM, EMPTY_BODY_SHA256)
        .append_pair(CUP2_KEY_PARAM, &protocol_key)
        .finish();
    let url = format!("{}?{}", config.service_url(), query);

    CupRequest {
        nonce: *nonce,
        protocol_key,
        url,
    }
}
