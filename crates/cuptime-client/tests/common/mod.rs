// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Shared helpers for integration tests.

// Integration test helpers are `pub` so each `tests/*.rs` file can import them
// via `mod common`, but not every file uses every helper.
#![allow(dead_code, unreachable_pub)]

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::Mutex;
use std::thread::JoinHandle;

use cup_client::error::{TimeError, TransportError};
use cup_client::{HttpResponse, ProviderConfig, Transport};
use cup_proto::request::EMPTY_BODY_SHA256;
use cup_proto::verify::SERVER_PROOF_HEADER;
use ring::digest;
use ring::rand::SystemRandom;
use ring::signature::{ECDSA_P256_SHA256_ASN1_SIGNING, EcdsaKeyPair, KeyPair};

/// DER SubjectPublicKeyInfo header for an uncompressed P-256 point.
const P256_SPKI_PREFIX: [u8; 26] = [
    0x30, 0x59, 0x30, 0x13, 0x06, 0x07, 0x2a, 0x86, 0x48, 0xce, 0x3d, 0x02, 0x01, 0x06, 0x08,
    0x2a, 0x86, 0x48, 0xce, 0x3d, 0x03, 0x01, 0x07, 0x03, 0x42, 0x00,
];

pub const SAMPLE_MILLIS: i64 = 1_700_000_000_123;

pub const SAMPLE_BODY: &[u8] =
    b")]}'\n{\"current_time_millis\":1700000000123,\"server_nonce\":-2.5}";

/// Returns `true` if the error indicates a network-level failure that should
/// cause a live test to be **skipped** (not panicked).
///
/// CI runners occasionally lack outbound HTTP, surfacing as DNS failures,
/// refused connections or timeouts. Verification failures are never skipped.
pub fn is_network_skip_error(e: &TimeError) -> bool {
    matches!(
        e,
        TimeError::Transport(TransportError::Request { .. } | TransportError::Timeout)
    )
}

/// Plays the provider: signs whatever body it is given for the nonce in the
/// request URL.
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

    pub fn config(&self) -> ProviderConfig {
        let mut der = P256_SPKI_PREFIX.to_vec();
        der.extend_from_slice(self.key_pair.public_key().as_ref());
        ProviderConfig::new("http://time.test/time/1/current", 5, der)
    }

    /// `x-cup-server-proof` value for `body` under `protocol_key`.
    pub fn proof_header(&self, body: &[u8], protocol_key: &str) -> String {
        let mut h1_input = hex::decode(EMPTY_BODY_SHA256).unwrap();
        h1_input.extend_from_slice(digest::digest(&digest::SHA256, body).as_ref());
        h1_input.extend_from_slice(protocol_key.as_bytes());
        let h1 = digest::digest(&digest::SHA256, &h1_input);
        // ring hashes once more, producing a signature over H2.
        let signature = self.key_pair.sign(&self.rng, h1.as_ref()).unwrap();
        format!("{}:{EMPTY_BODY_SHA256}", hex::encode(signature.as_ref()))
    }

    /// A correctly signed response to `url`.
    pub fn respond(&self, url: &str, body: &[u8]) -> HttpResponse {
        let key = protocol_key_from_url(url);
        HttpResponse::new(200, body.to_vec())
            .with_header(SERVER_PROOF_HEADER, self.proof_header(body, &key))
    }
}

/// Decoded `cup2key` query parameter.
pub fn protocol_key_from_url(url: &str) -> String {
    let url = url::Url::parse(url).unwrap();
    url.query_pairs()
        .find(|(k, _)| k == "cup2key")
        .map(|(_, v)| v.into_owned())
        .unwrap()
}

type Responder = Box<dyn Fn(&str) -> Result<HttpResponse, TransportError> + Send + Sync>;

/// Canned transport that records every URL it is asked to GET.
pub struct MockTransport {
    responder: Responder,
    requests: Mutex<Vec<String>>,
}

impl MockTransport {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&str) -> Result<HttpResponse, TransportError> + Send + Sync + 'static,
    {
        MockTransport {
            responder: Box::new(responder),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Answers every request with a valid proof over `body`.
    pub fn signing(signer: TestSigner, body: &'static [u8]) -> Self {
        MockTransport::new(move |url| Ok(signer.respond(url, body)))
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transport for MockTransport {
    fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(url.to_owned());
        (self.responder)(url)
    }
}

/// Serves one HTTP response from a local listener: `head` (status line and
/// headers, without the blank line) followed by up to `body_len` zero bytes.
///
/// Returns the base URL and a handle yielding the number of body bytes the
/// client accepted before it closed the connection.
pub fn serve_once(head: String, body_len: usize) -> (String, JoinHandle<usize>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/time/1/current", listener.local_addr().unwrap());

    let handle = std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();

        // Read the request head.
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            match stream.read(&mut buf) {
                Ok(0) | Err(_) => return 0,
                Ok(n) => request.extend_from_slice(&buf[..n]),
            }
        }

        if stream.write_all(format!("{head}\r\n\r\n").as_bytes()).is_err() {
            return 0;
        }
        let chunk = [0u8; 16 * 1024];
        let mut sent = 0;
        while sent < body_len {
            let n = chunk.len().min(body_len - sent);
            if stream.write_all(&chunk[..n]).is_err() {
                break;
            }
            sent += n;
        }
        sent
    });

    (url, handle)
}
