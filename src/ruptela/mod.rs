//! # Ruptela Protocol Module
//!
//! Implementation of the Ruptela tracker protocol decoder.
//!
//! This module handles:
//! - Packet envelope framing (length, IMEI, command, trailing CRC)
//! - GPS record decoding for the standard (1) and extended (68) commands
//! - IO element groups of 1, 2, 4 and 8 byte values
//! - CRC16-CCITT checksum calculation
//! - Configurable validation policy

pub mod protocol;
pub mod decoder;
pub mod cursor;
pub mod crc;
pub mod imei;
pub mod policy;

pub use decoder::{decode_packet, decode_packet_bytes};
pub use policy::ValidationPolicy;
pub use protocol::{IoElement, IoWidth, Packet, Record, RecordLayout};
