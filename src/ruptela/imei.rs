//! # Device Identifier Codec
//!
//! Ruptela devices send their IMEI as 8 bytes of packed decimal: every nibble is
//! one decimal digit, most significant first. A 15-digit IMEI leaves the first
//! high nibble as a zero pad, which is not counted as a digit.
//!
//! Nibbles above 9 are not rejected here. They still fold into the result
//! (`value * 10 + nibble`), which gives a wrong but stable number. Devices in the
//! field depend on this leniency; [`is_packed_decimal`] backs the opt-in strict
//! policy instead.
//!
//! Sixteen nibbles of at most 15 stay below 1.7e16, so the accumulator cannot
//! overflow a `u64`.

/// Length of the packed-decimal IMEI field in bytes
pub const IMEI_LEN: usize = 8;

/// Decode a packed-decimal IMEI into its numeric value
///
/// # Examples
///
/// ```
/// use ruptela_decoder::ruptela::imei::decode_imei;
///
/// let bcd = [0x03, 0x56, 0x30, 0x70, 0x42, 0x44, 0x10, 0x13];
/// assert_eq!(decode_imei(&bcd), 356_307_042_441_013);
/// ```
pub fn decode_imei(bcd: &[u8; IMEI_LEN]) -> u64 {
    let mut imei: u64 = 0;

    for (i, &byte) in bcd.iter().enumerate() {
        let high = u64::from(byte >> 4);
        let low = u64::from(byte & 0x0F);

        if i == 0 && high == 0 {
            imei = imei * 10 + low;
        } else {
            imei = imei * 10 + high;
            imei = imei * 10 + low;
        }
    }

    imei
}

/// Returns `true` when every nibble is a decimal digit
pub fn is_packed_decimal(bcd: &[u8; IMEI_LEN]) -> bool {
    bcd.iter().all(|&byte| (byte >> 4) <= 9 && (byte & 0x0F) <= 9)
}
