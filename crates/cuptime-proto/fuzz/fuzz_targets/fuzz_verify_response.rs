#![no_main]
use cup_proto::{ProviderConfig, verify_response};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary header/body pairs against the embedded keys; must never verify.
    let split = data.iter().position(|&b| b == 0).unwrap_or(data.len());
    let (header, body) = data.split_at(split);
    let Ok(header) = core::str::from_utf8(header) else {
        return;
    };
    let config = ProviderConfig::google();
    let protocol_key = "9:AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";
    assert!(verify_response(Some(header), body, config, protocol_key).is_err());
});
