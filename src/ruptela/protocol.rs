//! # Ruptela Protocol Constants and Types
//!
//! Core protocol definitions for the Ruptela tracker protocol.
//!
//! Packet layout (all integers big-endian):
//!
//! ```text
//! | length (2) | IMEI (8, BCD) | command (1) | payload ... | CRC16 (2) |
//! ```
//!
//! The declared length covers everything between the length field and the
//! trailing CRC, and the CRC is computed over that same region.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

/// Length field size in bytes
pub const LENGTH_FIELD_SIZE: usize = 2;

/// Trailing CRC field size in bytes
pub const CRC_FIELD_SIZE: usize = 2;

/// Smallest structurally valid packet: length(2) + IMEI(8) + command(1) + CRC(2)
pub const MIN_PACKET_SIZE: usize = 13;

/// Bytes of the buffer not covered by the declared length
pub const ENVELOPE_OVERHEAD: usize = LENGTH_FIELD_SIZE + CRC_FIELD_SIZE;

/// Records command, 1-byte IO identifiers
pub const COMMAND_RECORDS: u8 = 0x01;

/// Extended records command, 2-byte IO identifiers and a record extension byte
pub const COMMAND_EXTENDED_RECORDS: u8 = 0x44;

/// Coordinate scale (degrees × 10^7)
pub const COORDINATE_SCALE: f64 = 10_000_000.0;

/// Altitude scale (meters × 10)
pub const ALTITUDE_SCALE: f64 = 10.0;

/// Angle scale (degrees × 100)
pub const ANGLE_SCALE: f64 = 100.0;

/// HDOP scale (× 10)
pub const HDOP_SCALE: f64 = 10.0;

/// Wire widths that differ between the record-bearing commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldWidths {
    /// Record carries an extension byte after the timestamp extension
    pub record_extension: bool,

    /// Width of an IO element identifier in bytes
    pub io_id: usize,

    /// Width of the event IO identifier in bytes
    pub event_io: usize,
}

/// Record layout selected by the packet command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordLayout {
    /// Command 1: no record extension, 1-byte identifiers
    Standard,

    /// Command 68: record extension, 2-byte identifiers
    Extended,
}

impl RecordLayout {
    /// Select the record layout for a command, or `None` if the command
    /// carries no records
    pub const fn from_command(command_id: u8) -> Option<Self> {
        match command_id {
            COMMAND_RECORDS => Some(Self::Standard),
            COMMAND_EXTENDED_RECORDS => Some(Self::Extended),
            _ => None,
        }
    }

    /// Field width table for this layout
    pub const fn widths(self) -> FieldWidths {
        match self {
            Self::Standard => FieldWidths {
                record_extension: false,
                io_id: 1,
                event_io: 1,
            },
            Self::Extended => FieldWidths {
                record_extension: true,
                io_id: 2,
                event_io: 2,
            },
        }
    }
}

/// Width class of an IO element value
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IoWidth {
    /// 1-byte values
    One,
    /// 2-byte values
    Two,
    /// 4-byte values
    Four,
    /// 8-byte values
    Eight,
}

impl IoWidth {
    /// Width classes in wire order
    pub const ALL: [IoWidth; 4] = [IoWidth::One, IoWidth::Two, IoWidth::Four, IoWidth::Eight];

    /// Value width in bytes
    pub const fn bytes(self) -> usize {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Four => 4,
            Self::Eight => 8,
        }
    }
}

impl Serialize for IoWidth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.bytes() as u8)
    }
}

/// One auxiliary sensor or IO reading
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IoElement {
    /// Value width class
    #[serde(rename = "Size")]
    pub width: IoWidth,

    /// IO identifier (1 or 2 bytes on the wire)
    #[serde(rename = "ID")]
    pub id: u16,

    /// Raw value as uppercase hex, wire byte order
    #[serde(rename = "Value")]
    pub value: String,
}

/// One GPS/sensor record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Record {
    /// Fix time (UTC)
    pub timestamp: DateTime<Utc>,

    /// Sub-second / flags byte, opaque here
    pub timestamp_extension: u8,

    /// Record extension, only present for the extended command
    pub record_extension: Option<u8>,

    /// Record priority
    pub priority: u8,

    /// Longitude in degrees
    pub longitude: f64,

    /// Latitude in degrees
    pub latitude: f64,

    /// Altitude in meters
    pub altitude: f64,

    /// Heading in degrees
    pub angle: f64,

    /// Number of visible satellites
    pub satellites: u8,

    /// Speed, protocol units
    pub speed: u16,

    /// Horizontal dilution of precision
    #[serde(rename = "HDOP")]
    pub hdop: f64,

    /// Identifier of the IO that triggered the record
    #[serde(rename = "EventIO")]
    pub event_io: u16,

    /// IO elements grouped by width class, then wire order
    #[serde(rename = "IOElements")]
    pub io_elements: Vec<IoElement>,
}

/// Decoded Ruptela packet
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Packet {
    /// Declared length (bytes between the length field and the CRC)
    #[serde(rename = "Length")]
    pub length: u16,

    /// Trailing CRC as sent by the device
    #[serde(rename = "CRC")]
    pub crc: u16,

    /// Device IMEI
    #[serde(rename = "IMEI")]
    pub imei: u64,

    /// Command identifier
    #[serde(rename = "CommandID")]
    pub command_id: u8,

    /// Records-left flag, zero for commands without records
    #[serde(rename = "RecordsFlag")]
    pub records_flag: u8,

    /// Declared number of records
    #[serde(rename = "NumRecords")]
    pub num_records: u8,

    /// Records in wire order
    #[serde(rename = "Records")]
    pub records: Vec<Record>,
}

impl Packet {
    /// Record layout of this packet, if its command carries records
    pub fn layout(&self) -> Option<RecordLayout> {
        RecordLayout::from_command(self.command_id)
    }

    /// Render as indented JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Render as single-line JSON
    pub fn to_json_compact(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
