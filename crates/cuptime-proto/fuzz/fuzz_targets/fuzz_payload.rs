#![no_main]
use cup_proto::payload::{extract_time, extract_time_strict};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Decode arbitrary bodies; must not panic.
    let lenient = extract_time(data);
    if let Ok(strict) = extract_time_strict(data) {
        assert_eq!(lenient, Ok(strict));
    }
});
