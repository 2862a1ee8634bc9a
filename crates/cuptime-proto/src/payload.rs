// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Time payload decoding.
//!
//! Response bodies start with a 5 byte anti-hijacking preamble followed by a
//! JSON record:
//!
//! ```text
//! )]}'
//! {"current_time_millis":1700000000000,"server_nonce":-1.2345e+308}
//! ```

use serde::{Deserialize, Deserializer};
use serde_json::value::RawValue;

use crate::error::CupError;

/// Length of the preamble stripped before JSON decoding.
pub const PREAMBLE_LENGTH: usize = 5;

/// The preamble providers send. Only checked by [`extract_time_strict`].
pub const ANTI_HIJACK_PREAMBLE: &[u8; PREAMBLE_LENGTH] = b")]}'\n";

/// The decoded time record.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
pub struct TimePayload {
    /// Provider time in milliseconds since the Unix epoch.
    pub current_time_millis: i64,
    /// Server-chosen nonce echoed by some providers; not used for verification.
    ///
    /// `None` when absent or not representable as an `f64`; a verified body is
    /// never rejected because of this field.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub server_nonce: Option<f64>,
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Box::<RawValue>::deserialize(deserializer)?;
    Ok(serde_json::from_str(raw.get()).ok())
}

/// Decode a verified response body.
///
/// The first [`PREAMBLE_LENGTH`] bytes are dropped without inspecting them.
///
/// # Errors
///
/// Returns [`CupError::PayloadDecode`] if the body is shorter than the preamble
/// or the remainder is not a JSON object with an integer `current_time_millis`.
pub fn extract_time(body: &[u8]) -> Result<TimePayload, CupError> {
    let record = body.get(PREAMBLE_LENGTH..).ok_or(CupError::PayloadDecode {
        length: body.len(),
        reason: format!("shorter than the {PREAMBLE_LENGTH} byte preamble"),
    })?;

    serde_json::from_slice(record).map_err(|e| CupError::PayloadDecode {
        length: body.len(),
        reason: e.to_string(),
    })
}

/// Like [`extract_time`], but also requires the preamble to be exactly
/// [`ANTI_HIJACK_PREAMBLE`].
///
/// # Errors
///
/// Returns [`CupError::PayloadDecode`] on a preamble mismatch or any
/// [`extract_time`] failure.
pub fn extract_time_strict(body: &[u8]) -> Result<TimePayload, CupError> {
    if body.len() >= PREAMBLE_LENGTH && !body.starts_with(ANTI_HIJACK_PREAMBLE) {
        return Err(CupError::PayloadDecode {
            length: body.len(),
            reason: format!("unexpected preamble {:?}", &body[..PREAMBLE_LENGTH]),
        });
    }
    extract_time(body)
}
