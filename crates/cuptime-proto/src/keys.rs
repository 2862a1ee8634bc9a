// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Provider key registry.
//!
//! Each time provider signs its responses with a P-256 key identified by a
//! key version. The registry holds one [`ProviderConfig`] per
//! (provider, key version) pair as static data, so lookups never allocate and
//! the configs can be shared across threads freely.

use std::borrow::Cow;
use core::fmt;
use core::str::FromStr;

use crate::error::CupError;

/// Google's time service endpoint.
const GOOGLE_SERVICE_URL: &str = "http://clients2.google.com/time/1/current";

/// Microsoft Edge's time service endpoint.
const MICROSOFT_SERVICE_URL: &str = "http://edge.microsoft.com/browsernetworktime/time/1/current";

/// Google key version 9 (SubjectPublicKeyInfo, P-256).
const GOOGLE_KEY_V9: [u8; 91] = [
    0x30, 0x59, 0x30, 0x13, 0x06, 0x07, 0x2a, 0x86, 0x48, 0xce, 0x3d, 0x02,
    0x01, 0x06, 0x08, 0x2a, 0x86, 0x48, 0xce, 0x3d, 0x03, 0x01, 0x07, 0x03,
    0x42, 0x00, 0x04, 0x51, 0x8b, 0x06, 0x03, 0x4d, 0xea, 0x13, 0xc3, 0x32,
    0x9b, 0x15, 0x73, 0xd6, 0xbc, 0x47, 0x33, 0x3f, 0xb6, 0x95, 0x0e, 0x5d,
    0x52, 0x73, 0x70, 0x5d, 0xe4, 0x92, 0xbd, 0xfd, 0xc5, 0xb9, 0xc6, 0x51,
    0x81, 0x2d, 0x8b, 0x46, 0xc4, 0x4c, 0xb0, 0xa5, 0xc6, 0xdb, 0x5b, 0xe4,
    0xdb, 0x80, 0x57, 0x6b, 0x4d, 0x08, 0x9c, 0x3d, 0x8b, 0xc2, 0xd9, 0x27,
    0x9a, 0xde, 0x3d, 0xe2, 0xcc, 0x0a, 0x20,
];

/// Microsoft key version 2 (SubjectPublicKeyInfo, P-256).
const MICROSOFT_KEY_V2: [u8; 91] = [
    0x30, 0x59, 0x30, 0x13, 0x06, 0x07, 0x2a, 0x86, 0x48, 0xce, 0x3d, 0x02,
    0x01, 0x06, 0x08, 0x2a, 0x86, 0x48, 0xce, 0x3d, 0x03, 0x01, 0x07, 0x03,
    0x42, 0x00, 0x04, 0xbb, 0x37, 0xa5, 0xf6, 0x3a, 0xf8, 0x32, 0x58, 0x1c,
    0x89, 0x29, 0xec, 0x3f, 0x91, 0x69, 0x23, 0x9b, 0x32, 0xe3, 0x35, 0xdb,
    0x54, 0xfc, 0xd8, 0x8d, 0xab, 0x36, 0xcd, 0x68, 0x71, 0x95, 0x50, 0xdd,
    0xb4, 0x82, 0xe6, 0xf8, 0x94, 0xe9, 0xeb, 0x3b, 0x01, 0x4a, 0x9e, 0x15,
    0x71, 0xbe, 0x57, 0x10, 0x8d, 0x8c, 0x1c, 0x7f, 0x39, 0x14, 0x09, 0xf9,
    0x63, 0xd1, 0xa3, 0x81, 0x99, 0x3d, 0x22,
];

static GOOGLE_V9: ProviderConfig = ProviderConfig {
    provider: Some(Provider::Google),
    service_url: Cow::Borrowed(GOOGLE_SERVICE_URL),
    key_version: 9,
    public_key: Cow::Borrowed(&GOOGLE_KEY_V9),
};

static MICROSOFT_V2: ProviderConfig = ProviderConfig {
    provider: Some(Provider::Microsoft),
    service_url: Cow::Borrowed(MICROSOFT_SERVICE_URL),
    key_version: 2,
    public_key: Cow::Borrowed(&MICROSOFT_KEY_V2),
};

/// Every registered (provider, key version) pair.
static REGISTRY: [&ProviderConfig; 2] = [&GOOGLE_V9, &MICROSOFT_V2];

/// A vendor operating a signed-time endpoint.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Provider {
    /// `clients2.google.com`.
    Google,
    /// `edge.microsoft.com`.
    Microsoft,
}

impl Provider {
    /// All known providers.
    pub const ALL: [Provider; 2] = [Provider::Google, Provider::Microsoft];

    /// Lowercase provider name, as accepted by [`FromStr`].
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Google => "google",
            Provider::Microsoft => "microsoft",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = CupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Provider::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CupError::UnknownProvider { name: s.to_owned() })
    }
}

/// Endpoint and verification key for one provider key version.
///
/// Registry entries are `'static`; [`ProviderConfig::new`] builds a custom
/// config (a private deployment or a test key) that is not tied to a
/// [`Provider`].
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct ProviderConfig {
    provider: Option<Provider>,
    service_url: Cow<'static, str>,
    key_version: u32,
    public_key: Cow<'static, [u8]>,
}

impl ProviderConfig {
    /// Build a config for an endpoint outside the registry.
    ///
    /// `public_key` must be a DER-encoded SubjectPublicKeyInfo; it is only
    /// parsed when a response is verified.
    pub fn new(
        service_url: impl Into<Cow<'static, str>>,
        key_version: u32,
        public_key: impl Into<Cow<'static, [u8]>>,
    ) -> Self {
        ProviderConfig {
            provider: None,
            service_url: service_url.into(),
            key_version,
            public_key: public_key.into(),
        }
    }

    /// Current Google config.
    pub fn google() -> &'static ProviderConfig {
        current(Provider::Google)
    }

    /// Current Microsoft config.
    pub fn microsoft() -> &'static ProviderConfig {
        current(Provider::Microsoft)
    }

    /// The registered provider, or `None` for a custom config.
    pub fn provider(&self) -> Option<Provider> {
        self.provider
    }

    /// Base URL of the time endpoint, without query string.
    pub fn service_url(&self) -> &str {
        &self.service_url
    }

    /// Key version sent in `cup2key`.
    pub fn key_version(&self) -> u32 {
        self.key_version
    }

    /// DER-encoded SubjectPublicKeyInfo of the signing key.
    pub fn public_key(&self) -> &[u8] {
        &self.public_key
    }
}

/// Look up the config for a specific provider key version.
///
/// # Errors
///
/// Returns [`CupError::UnknownKeyVersion`] when no key is registered for the pair.
pub fn lookup(provider: Provider, key_version: u32) -> Result<&'static ProviderConfig, CupError> {
    REGISTRY
        .iter()
        .copied()
        .find(|c| c.provider == Some(provider) && c.key_version == key_version)
        .ok_or(CupError::UnknownKeyVersion {
            provider,
            key_version,
        })
}

/// The newest registered key version for a provider.
pub fn current(provider: Provider) -> &'static ProviderConfig {
    match provider {
        Provider::Google => &GOOGLE_V9,
        Provider::Microsoft => &MICROSOFT_V2,
    }
}

/// Registered key versions for a provider, in registry order.
pub fn versions(provider: Provider) -> impl Iterator<Item = u32> {
    REGISTRY
        .iter()
        .filter(move |c| c.provider == Some(provider))
        .map(|c| c.key_version)
}

/// Every registered config.
pub fn all() -> impl Iterator<Item = &'static ProviderConfig> {
    REGISTRY.iter().copied()
}
