// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! CUP2 server proof verification.
//!
//! The server signs `SHA-256(H1)` where
//! `H1 = SHA-256(request_hash || SHA-256(body) || protocol_key)`, binding the
//! request body, the response body and this exchange's nonce together. The
//! order of the three parts is fixed by the protocol.

use p256::ecdsa::signature::hazmat::PrehashVerifier;
use p256::ecdsa::{Signature, VerifyingKey};
use p256::pkcs8::spki::SubjectPublicKeyInfoRef;
use p256::pkcs8::{DecodePublicKey, ObjectIdentifier};
use ring::digest;

use crate::error::CupError;
use crate::keys::ProviderConfig;
use crate::request::EMPTY_BODY_SHA256;

/// Response header carrying the server proof.
pub const SERVER_PROOF_HEADER: &str = "x-cup-server-proof";

/// SHA-256 of the empty request body, raw bytes of [`EMPTY_BODY_SHA256`].
const EMPTY_BODY_SHA256_BYTES: [u8; 32] = [
    0xe3, 0xb0, 0xc4, 0x42, 0x98, 0xfc, 0x1c, 0x14, 0x9a, 0xfb, 0xf4, 0xc8, 0x99, 0x6f, 0xb9, 0x24,
    0x27, 0xae, 0x41, 0xe4, 0x64, 0x9b, 0x93, 0x4c, 0xa4, 0x95, 0x99, 0x1b, 0x78, 0x52, 0xb8, 0x55,
];

/// `id-ecPublicKey` (RFC 5480).
const ID_EC_PUBLIC_KEY: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.2.1");

/// A parsed `x-cup-server-proof` header value.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ServerProof<'a> {
    /// Hex-encoded ASN.1 DER ECDSA signature.
    pub signature_hex: &'a str,
    /// Hex SHA-256 of the request body the server saw.
    pub request_hash_hex: &'a str,
}

impl<'a> ServerProof<'a> {
    /// Split a header value into `<signature>:<request hash>`.
    ///
    /// # Errors
    ///
    /// Returns [`CupError::MalformedProof`] unless there is exactly one colon.
    pub fn parse(header: &'a str) -> Result<Self, CupError> {
        match header.split_once(':') {
            Some((signature_hex, request_hash_hex)) if !request_hash_hex.contains(':') => {
                Ok(ServerProof {
                    signature_hex,
                    request_hash_hex,
                })
            }
            _ => Err(CupError::MalformedProof {
                header: header.to_owned(),
            }),
        }
    }

    /// Decode the signature half from hex.
    ///
    /// # Errors
    ///
    /// Returns [`CupError::SignatureDecode`] on invalid hex.
    pub fn signature_bytes(&self) -> Result<Vec<u8>, CupError> {
        hex::decode(self.signature_hex).map_err(|e| CupError::SignatureDecode {
            reason: e.to_string(),
        })
    }
}

/// Compute `H1 = SHA-256(SHA-256("") || SHA-256(body) || protocol_key)`.
pub fn hash_chain(body: &[u8], protocol_key: &str) -> [u8; 32] {
    let body_hash = digest::digest(&digest::SHA256, body);

    let mut ctx = digest::Context::new(&digest::SHA256);
    ctx.update(&EMPTY_BODY_SHA256_BYTES);
    ctx.update(body_hash.as_ref());
    ctx.update(protocol_key.as_bytes());

    let mut out = [0u8; 32];
    out.copy_from_slice(ctx.finish().as_ref());
    out
}

/// Compute `H2 = SHA-256(H1)`, the digest the server signs.
pub fn signed_digest(body: &[u8], protocol_key: &str) -> [u8; 32] {
    let h1 = hash_chain(body, protocol_key);
    let mut out = [0u8; 32];
    out.copy_from_slice(digest::digest(&digest::SHA256, &h1).as_ref());
    out
}

/// Parse a DER SubjectPublicKeyInfo into a P-256 verifying key.
///
/// # Errors
///
/// - [`CupError::PublicKeyParse`] if the DER is malformed or the curve is not P-256.
/// - [`CupError::WrongKeyType`] if the key is not an elliptic-curve key.
pub fn parse_public_key(der: &[u8]) -> Result<VerifyingKey, CupError> {
    let spki = SubjectPublicKeyInfoRef::try_from(der).map_err(|e| CupError::PublicKeyParse {
        reason: e.to_string(),
    })?;
    if spki.algorithm.oid != ID_EC_PUBLIC_KEY {
        return Err(CupError::WrongKeyType {
            algorithm: spki.algorithm.oid.to_string(),
        });
    }

    VerifyingKey::from_public_key_der(der).map_err(|e| CupError::PublicKeyParse {
        reason: e.to_string(),
    })
}

/// Verify a CUP2 response against the request it answers.
///
/// `proof_header` is the `x-cup-server-proof` header value, if present, and
/// `protocol_key` the `cup2key` sent with the request. On success the body is
/// returned unchanged.
///
/// Steps:
/// 1. Require the proof header
/// 2. Split it into signature and request hash
/// 3. Check the request hash against the empty-body hash we sent
/// 4. Hex-decode the signature
/// 5. Compute `H2 = SHA-256(H1)` over the body and protocol key
/// 6. Parse the configured public key
/// 7. Verify the DER signature over `H2`
///
/// # Errors
///
/// Returns the [`CupError`] for the first step that fails.
pub fn verify_response<'b>(
    proof_header: Option<&str>,
    body: &'b [u8],
    config: &ProviderConfig,
    protocol_key: &str,
) -> Result<&'b [u8], CupError> {
    // 1. An empty value is treated the same as an absent header.
    let header = proof_header
        .filter(|h| !h.is_empty())
        .ok_or(CupError::MissingProof)?;

    // 2.
    let proof = ServerProof::parse(header)?;

    // 3.
    if proof.request_hash_hex != EMPTY_BODY_SHA256 {
        return Err(CupError::RequestHashMismatch {
            received: proof.request_hash_hex.to_owned(),
        });
    }

    // 4.
    let signature_bytes = proof.signature_bytes()?;

    // 5.
    let digest = signed_digest(body, protocol_key);

    // 6.
    let verifying_key = parse_public_key(config.public_key())?;

    // 7. The signature is over the prehashed digest, not a re-hash of it.
    let signature =
        Signature::from_der(&signature_bytes).map_err(|_| CupError::SignatureInvalid)?;
    verifying_key
        .verify_prehash(&digest, &signature)
        .map_err(|_| CupError::SignatureInvalid)?;

    Ok(body)
}
