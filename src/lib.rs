//! # Ruptela Decoder Library
//!
//! Decode binary telemetry packets from Ruptela GPS trackers.
//!
//! This library provides the packet decoder, its validation policy, and the
//! JSON processing layer used by the `ruptela-decode` command-line tool.

pub mod config;
pub mod error;
pub mod ruptela;
pub mod processor;
pub mod stream;
