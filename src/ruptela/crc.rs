//! # CRC16-CCITT Implementation
//!
//! CRC-16 checksum used by the Ruptela protocol (the reflected CCITT variant,
//! also catalogued as CRC-16/KERMIT).
//!
//! **Polynomial**: 0x8408 (reflected 0x1021)
//! **Initial Value**: 0x0000
//! **Final XOR**: none

/// Reflected CRC16-CCITT polynomial
const CRC16_POLY: u16 = 0x8408;

/// Precomputed CRC16 lookup table for fast calculation
const CRC16_TABLE: [u16; 256] = generate_crc16_table();

/// Generate CRC16 lookup table at compile time
const fn generate_crc16_table() -> [u16; 256] {
    let mut table = [0u16; 256];
    let mut i = 0;

    while i < 256 {
        let mut crc = i as u16;
        let mut j = 0;

        while j < 8 {
            if (crc & 0x0001) != 0 {
                crc = (crc >> 1) ^ CRC16_POLY;
            } else {
                crc >>= 1;
            }
            j += 1;
        }

        table[i] = crc;
        i += 1;
    }

    table
}

/// Calculate CRC16-CCITT (0x8408) checksum using lookup table
///
/// # Arguments
///
/// * `data` - Byte slice to calculate CRC for (the packet body after the length field)
///
/// # Returns
///
/// * `u16` - Calculated CRC16 checksum
///
/// # Examples
///
/// ```
/// use ruptela_decoder::ruptela::crc::crc16_ccitt;
///
/// assert_eq!(crc16_ccitt(b"123456789"), 0x2189);
/// ```
pub fn crc16_ccitt(data: &[u8]) -> u16 {
    let mut crc: u16 = 0;

    for &byte in data {
        crc = (crc >> 8) ^ CRC16_TABLE[((crc ^ u16::from(byte)) & 0xFF) as usize];
    }

    crc
}
