#![no_main]
use cup_proto::verify::ServerProof;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Parse arbitrary header values; must not panic.
    if let Ok(header) = core::str::from_utf8(data) {
        if let Ok(proof) = ServerProof::parse(header) {
            assert_eq!(header.matches(':').count(), 1);
            let _ = proof.signature_bytes();
        }
    }
});
