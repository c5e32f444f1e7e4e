//! # Validation Policy
//!
//! Semantic limits and switches applied while decoding. Structural checks (the
//! minimum packet size and every cursor bounds check) are not part of the
//! policy and can never be turned off.

use serde::Deserialize;

/// Configurable decode-time validation
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ValidationPolicy {
    /// Verify the trailing CRC16
    #[serde(default = "default_validate_crc")]
    pub validate_crc: bool,

    /// Verify the declared length against the buffer size
    #[serde(default = "default_validate_length")]
    pub validate_length: bool,

    /// Bypass every non-structural check
    #[serde(default)]
    pub skip_validation: bool,

    /// Maximum packet size in bytes (0 or negative disables)
    #[serde(default = "default_max_packet_size")]
    pub max_packet_size: i64,

    /// Maximum records per packet (0 or negative disables)
    #[serde(default = "default_max_records")]
    pub max_records: i64,

    /// Maximum IO elements per record (0 or negative disables)
    #[serde(default = "default_max_io_elements")]
    pub max_io_elements: i64,

    /// Reject identifiers with non-decimal nibbles
    #[serde(default)]
    pub strict_imei: bool,
}

fn default_validate_crc() -> bool { true }
fn default_validate_length() -> bool { true }
fn default_max_packet_size() -> i64 { 2048 }
fn default_max_records() -> i64 { 100 }
fn default_max_io_elements() -> i64 { 1000 }

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            validate_crc: default_validate_crc(),
            validate_length: default_validate_length(),
            skip_validation: false,
            max_packet_size: default_max_packet_size(),
            max_records: default_max_records(),
            max_io_elements: default_max_io_elements(),
            strict_imei: false,
        }
    }
}

impl ValidationPolicy {
    /// Policy with every non-structural check bypassed
    pub fn permissive() -> Self {
        Self {
            skip_validation: true,
            ..Self::default()
        }
    }

    /// Whether the CRC should be checked
    pub fn checks_crc(&self) -> bool {
        !self.skip_validation && self.validate_crc
    }

    /// Whether the declared length should be checked
    pub fn checks_length(&self) -> bool {
        !self.skip_validation && self.validate_length
    }

    /// Whether identifiers must be strict packed decimal
    pub fn checks_imei(&self) -> bool {
        !self.skip_validation && self.strict_imei
    }

    /// Active packet size limit, if any
    pub fn packet_size_limit(&self) -> Option<usize> {
        self.active_limit(self.max_packet_size)
    }

    /// Active record count limit, if any
    pub fn record_limit(&self) -> Option<usize> {
        self.active_limit(self.max_records)
    }

    /// Active per-record IO element limit, if any
    pub fn io_element_limit(&self) -> Option<usize> {
        self.active_limit(self.max_io_elements)
    }

    fn active_limit(&self, limit: i64) -> Option<usize> {
        if self.skip_validation || limit <= 0 {
            return None;
        }
        // Limits beyond the address space are effectively unlimited
        Some(usize::try_from(limit).unwrap_or(usize::MAX))
    }
}
