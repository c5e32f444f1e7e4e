//! # Packet Processor
//!
//! Turns one hex-encoded packet into one or more JSON messages.
//!
//! In packet mode the whole packet becomes a single message. In batch mode
//! every record becomes its own message, tagged with the device `IMEI` and
//! `COMMAND_ID` so downstream consumers can route records independently.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::config::{Config, OutputConfig};
use crate::error::{Result, RuptelaError};
use crate::ruptela::{decode_packet, Packet, ValidationPolicy};

/// Key carrying the device identifier in batch-mode messages
pub const IMEI_KEY: &str = "IMEI";

/// Key carrying the command identifier in batch-mode messages
pub const COMMAND_ID_KEY: &str = "COMMAND_ID";

/// Decodes packets and renders them as JSON messages
#[derive(Debug, Clone)]
pub struct PacketProcessor {
    policy: ValidationPolicy,
    batch_mode: bool,
    pretty: bool,
    enable_debug: bool,
}

impl PacketProcessor {
    /// Create a processor from a validation policy and output settings
    pub fn new(policy: ValidationPolicy, output: &OutputConfig) -> Self {
        Self {
            policy,
            batch_mode: output.batch_mode,
            pretty: output.pretty,
            enable_debug: output.enable_debug,
        }
    }

    /// Create a processor from a loaded configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.validation.clone(), &config.output)
    }

    /// Validation policy applied to every packet
    pub fn policy(&self) -> &ValidationPolicy {
        &self.policy
    }

    /// Decode one hex-encoded packet into JSON messages
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Input is empty after trimming
    /// - Packet fails to decode
    /// - JSON rendering fails
    pub fn process(&self, input: &str) -> Result<Vec<String>> {
        let input = input.trim();
        if input.is_empty() {
            return Err(RuptelaError::Processor("empty input data".to_string()));
        }

        let packet = decode_packet(input, &self.policy)?;

        if self.enable_debug {
            debug!(
                imei = packet.imei,
                command_id = packet.command_id,
                records = packet.records.len(),
                "Decoded packet"
            );
        }

        if self.batch_mode {
            self.record_messages(&packet)
        } else {
            let json = if self.pretty {
                packet.to_json()?
            } else {
                packet.to_json_compact()?
            };
            Ok(vec![json])
        }
    }

    /// One message per record; a packet without records yields one
    /// message holding only the identifiers
    fn record_messages(&self, packet: &Packet) -> Result<Vec<String>> {
        if packet.records.is_empty() {
            return Ok(vec![self.render(&Value::Object(identifiers(packet)))?]);
        }

        packet
            .records
            .iter()
            .map(|record| {
                let mut message = identifiers(packet);
                if let Value::Object(fields) = serde_json::to_value(record)? {
                    message.extend(fields);
                }
                self.render(&Value::Object(message))
            })
            .collect()
    }

    fn render<T: Serialize>(&self, value: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(json)
    }
}

fn identifiers(packet: &Packet) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert(IMEI_KEY.to_string(), Value::from(packet.imei));
    map.insert(COMMAND_ID_KEY.to_string(), Value::from(packet.command_id));
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Command 1, two standard records, IMEI 356307042441013
    const RECORDS_HEX: &str = "004503563070424410130100026553F10000010F116048DF676540FF83234109002A08050115030000006553F13C00010F116048DF676540FF83234109002A08050116AB000000E15A";

    /// Command 0x10 without payload
    const NO_RECORDS_HEX: &str = "00090356307042441013107F68";

    fn processor(batch_mode: bool, pretty: bool) -> PacketProcessor {
        let output = OutputConfig {
            batch_mode,
            pretty,
            enable_debug: true,
        };
        PacketProcessor::new(ValidationPolicy::default(), &output)
    }

    fn parse(message: &str) -> Value {
        serde_json::from_str(message).unwrap()
    }

    #[test]
    fn test_empty_input() {
        let err = processor(false, false).process("  \n\t").unwrap_err();
        assert!(matches!(err, RuptelaError::Processor(ref msg) if msg == "empty input data"));
    }

    #[test]
    fn test_packet_mode_single_message() {
        let messages = processor(false, false).process(RECORDS_HEX).unwrap();
        assert_eq!(messages.len(), 1);
        assert!(!messages[0].contains('\n'));

        let value = parse(&messages[0]);
        assert_eq!(value["IMEI"], 356_307_042_441_013u64);
        assert_eq!(value["CommandID"], 1);
        assert_eq!(value["NumRecords"], 2);
        assert_eq!(value["CRC"], 0xE15A);
        assert_eq!(value["Records"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_pretty_output() {
        let messages = processor(false, true).process(RECORDS_HEX).unwrap();
        assert!(messages[0].contains('\n'));
        assert_eq!(parse(&messages[0])["NumRecords"], 2);
    }

    #[test]
    fn test_batch_mode_one_message_per_record() {
        let messages = processor(true, false).process(RECORDS_HEX).unwrap();
        assert_eq!(messages.len(), 2);

        let first = parse(&messages[0]);
        assert_eq!(first[IMEI_KEY], 356_307_042_441_013u64);
        assert_eq!(first[COMMAND_ID_KEY], 1);
        assert_eq!(first["Timestamp"], "2023-11-14T22:13:20Z");
        assert_eq!(first["IOElements"][0]["Value"], "03");

        let second = parse(&messages[1]);
        assert_eq!(second["Timestamp"], "2023-11-14T22:14:20Z");
        assert_eq!(second["IOElements"][0]["ID"], 0x16);
        assert_eq!(second["IOElements"][0]["Value"], "AB");
    }

    #[test]
    fn test_batch_mode_without_records() {
        let messages = processor(true, false).process(NO_RECORDS_HEX).unwrap();
        assert_eq!(messages.len(), 1);

        let value = parse(&messages[0]);
        let fields = value.as_object().unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(value[IMEI_KEY], 356_307_042_441_013u64);
        assert_eq!(value[COMMAND_ID_KEY], 0x10);
    }

    #[test]
    fn test_decode_error_propagates() {
        let err = processor(false, false).process("0001").unwrap_err();
        match err {
            RuptelaError::Decode(decode) => assert!(decode.is_malformed()),
            other => panic!("expected decode error, got {:?}", other),
        }
    }

    #[test]
    fn test_input_is_trimmed() {
        let input = format!("  {}\r\n", NO_RECORDS_HEX);
        assert_eq!(processor(false, false).process(&input).unwrap().len(), 1);
    }

    #[test]
    fn test_from_config_uses_policy() {
        let mut config = Config::default();
        config.validation.max_records = 1;
        config.output.batch_mode = true;

        let processor = PacketProcessor::from_config(&config);
        assert_eq!(processor.policy().record_limit(), Some(1));

        let err = processor.process(RECORDS_HEX).unwrap_err();
        match err {
            RuptelaError::Decode(decode) => assert_eq!(decode.field(), Some("num_records")),
            other => panic!("expected policy violation, got {:?}", other),
        }
    }
}
