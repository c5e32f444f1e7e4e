#![allow(dead_code)]

//! Packet builders shared by the integration tests.

/// IMEI 356307042441013 in packed decimal
pub const IMEI_BCD: [u8; 8] = [0x03, 0x56, 0x30, 0x70, 0x42, 0x44, 0x10, 0x13];

/// Bit-by-bit CRC16-CCITT (reflected 0x8408, init 0), no lookup table
pub fn reference_crc(data: &[u8]) -> u16 {
    let mut crc: u16 = 0;
    for &byte in data {
        crc ^= u16::from(byte);
        for _ in 0..8 {
            crc = if crc & 1 != 0 { (crc >> 1) ^ 0x8408 } else { crc >> 1 };
        }
    }
    crc
}

/// Pack a decimal value below 10^16 into 16 BCD nibbles
pub fn encode_imei(mut value: u64) -> [u8; 8] {
    let mut out = [0u8; 8];
    for byte in out.iter_mut().rev() {
        let low = (value % 10) as u8;
        value /= 10;
        let high = (value % 10) as u8;
        value /= 10;
        *byte = (high << 4) | low;
    }
    out
}

/// Wrap IMEI, command and payload with a length prefix and CRC trailer
pub fn frame_with_imei(imei: [u8; 8], command: u8, payload: &[u8]) -> Vec<u8> {
    let mut body = imei.to_vec();
    body.push(command);
    body.extend_from_slice(payload);

    let mut packet = (body.len() as u16).to_be_bytes().to_vec();
    packet.extend_from_slice(&body);
    packet.extend_from_slice(&reference_crc(&body).to_be_bytes());
    packet
}

pub fn frame(command: u8, payload: &[u8]) -> Vec<u8> {
    frame_with_imei(IMEI_BCD, command, payload)
}

/// Records flag, record count, then the records back to back
pub fn records_payload(records: &[Vec<u8>]) -> Vec<u8> {
    let mut payload = vec![0x00, records.len() as u8];
    for rec in records {
        payload.extend_from_slice(rec);
    }
    payload
}

/// IO elements of one record, indexed by width class (1, 2, 4, 8 bytes)
pub type IoGroups = [Vec<(u16, Vec<u8>)>; 4];

/// Encode one record
///
/// Position fields are fixed: longitude 25.2797, latitude -54.6872,
/// altitude -12.5 m, angle 90.25, 9 satellites, speed 42, HDOP 0.8.
pub fn record(extended: bool, timestamp: u32, event_io: u16, groups: &IoGroups) -> Vec<u8> {
    let mut rec = Vec::new();
    rec.extend_from_slice(&timestamp.to_be_bytes());
    rec.push(0x00); // timestamp extension
    if extended {
        rec.push(0x07); // record extension
    }
    rec.push(0x01); // priority
    rec.extend_from_slice(&252_797_000i32.to_be_bytes());
    rec.extend_from_slice(&(-546_872_000i32).to_be_bytes());
    rec.extend_from_slice(&(-125i16).to_be_bytes());
    rec.extend_from_slice(&9025u16.to_be_bytes());
    rec.push(9);
    rec.extend_from_slice(&42u16.to_be_bytes());
    rec.push(8);

    if extended {
        rec.extend_from_slice(&event_io.to_be_bytes());
    } else {
        rec.push(event_io as u8);
    }

    for group in groups {
        rec.push(group.len() as u8);
        for (id, value) in group {
            if extended {
                rec.extend_from_slice(&id.to_be_bytes());
            } else {
                rec.push(*id as u8);
            }
            rec.extend_from_slice(value);
        }
    }
    rec
}

/// Command 1 record with a single 1-byte IO element
pub fn standard_record(io_id: u8, io_value: u8) -> Vec<u8> {
    let groups: IoGroups = [vec![(u16::from(io_id), vec![io_value])], vec![], vec![], vec![]];
    record(false, 1_700_000_000, 5, &groups)
}

pub fn to_hex(bytes: &[u8]) -> String {
    hex::encode_upper(bytes)
}
