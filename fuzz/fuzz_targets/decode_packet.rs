#![no_main]

use libfuzzer_sys::fuzz_target;
use ruptela_decoder::error::DecodeError;
use ruptela_decoder::ruptela::{decode_packet, decode_packet_bytes, ValidationPolicy};

fuzz_target!(|data: &[u8]| {
    let policies = [ValidationPolicy::default(), ValidationPolicy::permissive()];

    for policy in &policies {
        if let Err(DecodeError::Internal(msg)) = decode_packet_bytes(data, policy) {
            panic!("internal fault on fuzz input: {}", msg);
        }
    }

    if let Ok(text) = std::str::from_utf8(data) {
        let _ = decode_packet(text, &ValidationPolicy::permissive());
    }
});
