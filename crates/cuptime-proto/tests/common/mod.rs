// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Shared helpers for integration tests.
//!
//! [`TestSigner`] plays the server side of a CUP2 exchange. It computes the
//! hash chain itself and signs through ring's ECDSA, which hashes the message
//! once more, so the proofs it produces are independent of the verifier code.

// Integration test helpers are `pub` so each `tests/*.rs` file can import them
// via `mod common`, but not every file uses every helper.
#![allow(dead_code, unreachable_pub)]

use cup_proto::ProviderConfig;
use cup_proto::request::EMPTY_BODY_SHA256;
use ring::digest;
use ring::rand::SystemRandom;
use ring::signature::{ECDSA_P256_SHA256_ASN1_SIGNING, EcdsaKeyPair, KeyPair};

/// DER SubjectPublicKeyInfo header for an uncompressed P-256 point.
const P256_SPKI_PREFIX: [u8; 26] = [
    0x30, 0x59, 0x30, 0x13, 0x06, 0x07, 0x2a, 0x86, 0x48, 0xce, 0x3d, 0x02, 0x01, 0x06, 0x08,
    0x2a, 0x86, 0x48, 0xce, 0x3d, 0x03, 0x01, 0x07, 0x03, 0x42, 0x00,
];

pub const TEST_KEY_VERSION: u32 = 3;

pub const SAMPLE_BODY: &[u8] =
    b")]}'\n{\"current_time_millis\":1700000000123,\"server_nonce\":-2.5}";

pub struct TestSigner {
    rng: SystemRandom,
    key_pair: EcdsaKeyPair,
}

impl TestSigner {
    pub fn generate() -> Self {
        let rng = SystemRandom::new();
        let pkcs8 = EcdsaKeyPair::generate_pkcs8(&ECDSA_P256_SHA256_ASN1_SIGNING, &rng).unwrap();
        let key_pair =
            EcdsaKeyPair::from_pkcs8(&ECDSA_P256_SHA256_ASN1_SIGNING, pkcs8.as_ref(), &rng)
                .unwrap();
        TestSigner { rng, key_pair }
    }

    /// SubjectPublicKeyInfo DER for the signing key.
    pub fn public_key_der(&self) -> Vec<u8> {
        let mut der = P256_SPKI_PREFIX.to_vec();
        der.extend_from_slice(self.key_pair.public_key().as_ref());
        der
    }

    pub fn config(&self) -> ProviderConfig {
        ProviderConfig::new(
            "http://time.test/time/1/current",
            TEST_KEY_VERSION,
            self.public_key_der(),
        )
    }

    /// Raw DER signature over `SHA-256(H1)`.
    pub fn sign(&self, body: &[u8], protocol_key: &str) -> Vec<u8> {
        let h1 = reference_hash_chain(body, protocol_key);
        // ring hashes the message with SHA-256 before signing.
        self.key_pair
            .sign(&self.rng, &h1)
            .unwrap()
            .as_ref()
            .to_vec()
    }

    /// A complete `x-cup-server-proof` header value.
    pub fn proof_header(&self, body: &[u8], protocol_key: &str) -> String {
        format!(
            "{}:{}",
            hex::encode(self.sign(body, protocol_key)),
            EMPTY_BODY_SHA256
        )
    }
}

/// `H1` computed step by step from the hex constant.
pub fn reference_hash_chain(body: &[u8], protocol_key: &str) -> Vec<u8> {
    let mut input = hex::decode(EMPTY_BODY_SHA256).unwrap();
    input.extend_from_slice(digest::digest(&digest::SHA256, body).as_ref());
    input.extend_from_slice(protocol_key.as_bytes());
    digest::digest(&digest::SHA256, &input).as_ref().to_vec()
}
