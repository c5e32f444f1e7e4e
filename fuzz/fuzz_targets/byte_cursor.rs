#![no_main]

use libfuzzer_sys::fuzz_target;
use ruptela_decoder::ruptela::cursor::ByteCursor;

fuzz_target!(|data: &[u8]| {
    let mut cursor = ByteCursor::new(data);
    let mut idx = 0usize;

    // Use input bytes to drive a bounded sequence of reads.
    while idx < data.len() && idx < 1024 {
        let op = data[idx] % 7;
        idx += 1;

        match op {
            0 => {
                let _ = cursor.read_u8();
            }
            1 => {
                let _ = cursor.read_u16();
            }
            2 => {
                let _ = cursor.read_u32();
            }
            3 => {
                let _ = cursor.read_i16();
            }
            4 => {
                let _ = cursor.read_i32();
            }
            5 => {
                let width = usize::from(data[idx - 1] % 2) + 1;
                let _ = cursor.read_uint16(width);
            }
            _ => {
                let n = usize::from(data[idx - 1] % 16);
                let _ = cursor.take(n);
            }
        }

        assert!(cursor.offset() <= data.len());
    }
});
