//! # Ruptela Packet Decoder
//!
//! Decodes hex-encoded Ruptela packets into [`Packet`] values.
//!
//! Decoding is all-or-nothing: the first structural or policy failure is
//! returned and no partial packet escapes. The trailing CRC is read from the
//! last two bytes of the buffer; the cursor used for every other field stops
//! just before it.

use std::fmt;

use chrono::DateTime;

use super::crc::crc16_ccitt;
use super::cursor::{ByteCursor, OutOfData};
use super::imei::{decode_imei, is_packed_decimal, IMEI_LEN};
use super::policy::ValidationPolicy;
use super::protocol::*;
use crate::error::DecodeError;

/// Decode a hex-encoded Ruptela packet
///
/// Whitespace is stripped and hex digits are case-insensitive.
///
/// # Arguments
///
/// * `input` - Packet as hex text
/// * `policy` - Validation policy to apply
///
/// # Returns
///
/// * `Result<Packet, DecodeError>` - Decoded packet, or the first error found
///
/// # Errors
///
/// Returns [`DecodeError::Malformed`] if:
/// - The hex text has odd length or non-hex characters
/// - The packet is shorter than [`MIN_PACKET_SIZE`]
/// - Any field runs past the end of the buffer
///
/// Returns [`DecodeError::PolicyViolation`] if an enabled check fails
/// (size, declared length, CRC, record count, IO element count, IMEI).
///
/// # Examples
///
/// ```
/// use ruptela_decoder::ruptela::decoder::decode_packet;
/// use ruptela_decoder::ruptela::policy::ValidationPolicy;
///
/// let err = decode_packet("0102030405", &ValidationPolicy::default()).unwrap_err();
/// assert!(err.to_string().contains("packet too short"));
/// ```
pub fn decode_packet(input: &str, policy: &ValidationPolicy) -> Result<Packet, DecodeError> {
    let data = decode_hex(input)?;
    decode_packet_bytes(&data, policy)
}

/// Decode a Ruptela packet from raw bytes
///
/// Same checks as [`decode_packet`] minus the hex step.
pub fn decode_packet_bytes(data: &[u8], policy: &ValidationPolicy) -> Result<Packet, DecodeError> {
    // Always enforced: every later read depends on it
    if data.len() < MIN_PACKET_SIZE {
        return Err(DecodeError::Malformed {
            message: "packet too short".to_string(),
            offset: 0,
            data: data.to_vec(),
        });
    }

    if let Some(max) = policy.packet_size_limit() {
        if data.len() > max {
            return Err(DecodeError::PolicyViolation {
                field: "packet_size",
                value: data.len().to_string(),
                message: format!("packet too large: {} bytes (max: {})", data.len(), max),
            });
        }
    }

    let (body, trailer) = data.split_at(data.len() - CRC_FIELD_SIZE);
    let mut decoder = Decoder {
        cursor: ByteCursor::new(body),
        data,
        policy,
    };

    decoder.packet(trailer)
}

/// Strip whitespace and decode hex text
fn decode_hex(input: &str) -> Result<Vec<u8>, DecodeError> {
    let cleaned: String = input.chars().filter(|c| !c.is_whitespace()).collect();

    if cleaned.len() % 2 != 0 {
        return Err(DecodeError::Malformed {
            message: "input hex string must have even length".to_string(),
            offset: 0,
            data: cleaned.into_bytes(),
        });
    }

    match hex::decode(&cleaned) {
        Ok(data) => Ok(data),
        Err(e) => Err(DecodeError::Malformed {
            message: format!("invalid hex string: {}", e),
            offset: 0,
            data: cleaned.into_bytes(),
        }),
    }
}

/// Where in the packet a read happened, for error messages
#[derive(Debug, Clone, Copy)]
enum Location {
    Envelope,
    Record(usize),
    IoGroup { record: usize, width: IoWidth },
    IoElement { record: usize, width: IoWidth, element: usize },
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Envelope => Ok(()),
            Self::Record(record) => write!(f, " for record {}", record),
            Self::IoGroup { record, width } => {
                write!(f, " for record {}, size {}", record, width.bytes())
            }
            Self::IoElement { record, width, element } => write!(
                f,
                " for record {}, size {}, element {}",
                record,
                width.bytes(),
                element
            ),
        }
    }
}

/// Per-call decoding state
struct Decoder<'a> {
    cursor: ByteCursor<'a>,
    data: &'a [u8],
    policy: &'a ValidationPolicy,
}

impl<'a> Decoder<'a> {
    /// Decode the envelope, then the records if the command carries them
    fn packet(&mut self, trailer: &[u8]) -> Result<Packet, DecodeError> {
        let length = self.read_u16("length", Location::Envelope)?;

        if self.policy.checks_length() {
            let actual = self.data.len() - ENVELOPE_OVERHEAD;
            if usize::from(length) != actual {
                return Err(DecodeError::PolicyViolation {
                    field: "packet_length",
                    value: length.to_string(),
                    message: format!(
                        "invalid packet: actual packet data length ({} B) is different from the one specified in the packet ({} B)",
                        actual, length
                    ),
                });
            }
        }

        let crc = ByteCursor::new(trailer)
            .read_u16()
            .map_err(|e| self.short_read(e, "CRC", Location::Envelope))?;

        if self.policy.checks_crc() {
            self.verify_crc(length, crc)?;
        }

        let imei_bytes: [u8; IMEI_LEN] = {
            let result = self.cursor.read_array();
            self.located(result, "IMEI", Location::Envelope)?
        };

        if self.policy.checks_imei() && !is_packed_decimal(&imei_bytes) {
            return Err(DecodeError::PolicyViolation {
                field: "imei",
                value: hex::encode_upper(imei_bytes),
                message: "IMEI contains non-decimal digits".to_string(),
            });
        }

        let imei = decode_imei(&imei_bytes);
        let command_id = self.read_u8("command ID", Location::Envelope)?;

        let mut packet = Packet {
            length,
            crc,
            imei,
            command_id,
            records_flag: 0,
            num_records: 0,
            records: Vec::new(),
        };

        let Some(layout) = RecordLayout::from_command(command_id) else {
            return Ok(packet);
        };

        packet.records_flag = self.read_u8("records flag", Location::Envelope)?;
        packet.num_records = self.read_u8("number of records", Location::Envelope)?;

        if let Some(max) = self.policy.record_limit() {
            if usize::from(packet.num_records) > max {
                return Err(DecodeError::PolicyViolation {
                    field: "num_records",
                    value: packet.num_records.to_string(),
                    message: format!("too many records: {} (max: {})", packet.num_records, max),
                });
            }
        }

        let widths = layout.widths();
        packet.records.reserve(usize::from(packet.num_records));
        for index in 0..usize::from(packet.num_records) {
            let record = self.record(widths, index)?;
            packet.records.push(record);
        }

        Ok(packet)
    }

    /// Check the CRC over the region covered by the declared length
    fn verify_crc(&self, length: u16, crc: u16) -> Result<(), DecodeError> {
        let end = LENGTH_FIELD_SIZE + usize::from(length);
        let region = self.data.get(LENGTH_FIELD_SIZE..end).ok_or_else(|| {
            DecodeError::PolicyViolation {
                field: "packet_length",
                value: length.to_string(),
                message: format!("invalid packet length: {}", length),
            }
        })?;

        let calculated = crc16_ccitt(region);
        if calculated != crc {
            return Err(DecodeError::PolicyViolation {
                field: "crc",
                value: format!("{:04X}", crc),
                message: format!(
                    "CRC check failed. Packet CRC: {:04X}, Calculated CRC: {:04X}",
                    crc, calculated
                ),
            });
        }

        Ok(())
    }

    /// Decode one record
    fn record(&mut self, widths: FieldWidths, index: usize) -> Result<Record, DecodeError> {
        let at = Location::Record(index);

        let seconds = self.read_u32("timestamp", at)?;
        let timestamp = DateTime::from_timestamp(i64::from(seconds), 0).ok_or_else(|| {
            DecodeError::Internal(format!("timestamp {} not representable", seconds))
        })?;

        let timestamp_extension = self.read_u8("timestamp extension", at)?;
        let record_extension = if widths.record_extension {
            Some(self.read_u8("record extension", at)?)
        } else {
            None
        };
        let priority = self.read_u8("priority", at)?;

        let longitude = f64::from(self.read_i32("longitude", at)?) / COORDINATE_SCALE;
        let latitude = f64::from(self.read_i32("latitude", at)?) / COORDINATE_SCALE;
        let altitude = f64::from(self.read_i16("altitude", at)?) / ALTITUDE_SCALE;
        let angle = f64::from(self.read_u16("angle", at)?) / ANGLE_SCALE;
        let satellites = self.read_u8("satellites", at)?;
        let speed = self.read_u16("speed", at)?;
        let hdop = f64::from(self.read_u8("HDOP", at)?) / HDOP_SCALE;
        let event_io = self.read_uint16("event IO", widths.event_io, at)?;

        let mut io_elements = Vec::new();
        for width in IoWidth::ALL {
            self.io_group(width, widths, index, &mut io_elements)?;
        }

        Ok(Record {
            timestamp,
            timestamp_extension,
            record_extension,
            priority,
            longitude,
            latitude,
            altitude,
            angle,
            satellites,
            speed,
            hdop,
            event_io,
            io_elements,
        })
    }

    /// Decode the IO elements of one width class, appending to `elements`
    fn io_group(
        &mut self,
        width: IoWidth,
        widths: FieldWidths,
        record: usize,
        elements: &mut Vec<IoElement>,
    ) -> Result<(), DecodeError> {
        let count = usize::from(self.read_u8("IO count", Location::IoGroup { record, width })?);

        if let Some(max) = self.policy.io_element_limit() {
            let total = elements.len() + count;
            if total > max {
                return Err(DecodeError::PolicyViolation {
                    field: "io_elements",
                    value: total.to_string(),
                    message: format!(
                        "too many IO elements in record {}: {} (max: {})",
                        record, total, max
                    ),
                });
            }
        }

        elements.reserve(count);
        for element in 0..count {
            let at = Location::IoElement { record, width, element };
            let id = self.read_uint16("IO ID", widths.io_id, at)?;
            let raw = {
                let result = self.cursor.take(width.bytes());
                self.located(result, "IO value", at)?
            };

            elements.push(IoElement {
                width,
                id,
                value: hex::encode_upper(raw),
            });
        }

        Ok(())
    }

    fn read_u8(&mut self, field: &str, at: Location) -> Result<u8, DecodeError> {
        let result = self.cursor.read_u8();
        self.located(result, field, at)
    }

    fn read_u16(&mut self, field: &str, at: Location) -> Result<u16, DecodeError> {
        let result = self.cursor.read_u16();
        self.located(result, field, at)
    }

    fn read_u32(&mut self, field: &str, at: Location) -> Result<u32, DecodeError> {
        let result = self.cursor.read_u32();
        self.located(result, field, at)
    }

    fn read_i16(&mut self, field: &str, at: Location) -> Result<i16, DecodeError> {
        let result = self.cursor.read_i16();
        self.located(result, field, at)
    }

    fn read_i32(&mut self, field: &str, at: Location) -> Result<i32, DecodeError> {
        let result = self.cursor.read_i32();
        self.located(result, field, at)
    }

    fn read_uint16(&mut self, field: &str, width: usize, at: Location) -> Result<u16, DecodeError> {
        let result = self.cursor.read_uint16(width);
        self.located(result, field, at)
    }

    fn located<T>(&self, result: Result<T, OutOfData>, field: &str, at: Location) -> Result<T, DecodeError> {
        result.map_err(|e| self.short_read(e, field, at))
    }

    fn short_read(&self, err: OutOfData, field: &str, at: Location) -> DecodeError {
        DecodeError::Malformed {
            message: format!("failed to read {}{}: {}", field, at, err),
            offset: err.offset,
            data: self.data.to_vec(),
        }
    }
}
