// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # osc-link - OSC address and transport layer
//!
//! Delivers Open Sound Control messages and bundles to UDP, TCP and
//! Unix-domain destinations.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use osc_link::{Address, OscArg, Result, TimeTag, Transmitter};
//!
//! fn main() -> Result<()> {
//!     let tx = Transmitter::default();
//!
//!     // Bare message over UDP
//!     let mut synth = Address::udp("127.0.0.1", "9000");
//!     tx.send(&mut synth, "/test", "i", [OscArg::Int32(42)])?;
//!
//!     // Timestamped bundle over TCP (length-prefixed on the stream)
//!     let mut ctrl = Address::from_url("osc.tcp://127.0.0.1:9001/")?;
//!     tx.send_timestamped(&mut ctrl, TimeTag::now(), "/cue", "sf", [
//!         OscArg::from("go"),
//!         OscArg::Float(0.5),
//!     ])?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +-------------------------------------------------------------+
//! |  Send API      send / send_timestamped / send_from / ...    |
//! +-------------------------------------------------------------+
//! |  codec         Message, Bundle -> serialized bytes          |
//! +-------------------------------------------------------------+
//! |  Engine        oversize check -> resolve -> socket choice   |
//! |                -> framing -> last error                     |
//! +-------------------------------------------------------------+
//! |  Sockets       server socket | shared UDP | owned per addr  |
//! +-------------------------------------------------------------+
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Address`] | Destination with lazily resolved endpoint and owned socket |
//! | [`Transmitter`] | Transmission engine and Send API |
//! | [`Message`] / [`Bundle`] | Serializable OSC content |
//! | [`TimeTag`] | NTP timestamp, [`TimeTag::IMMEDIATE`] for "now" |
//! | [`Error`] | Typed failure; mirrored in [`Address::last_error`] |
//!
//! ## Logging
//!
//! The crate logs through the `log` facade (`[OSC-TX]`, `[OSC-RESOLVE]`,
//! `[OSC-SOCK]`, `[TTL]` prefixes) and never installs a logger.

/// Message and bundle serialization.
pub mod codec;
/// Wire constants and runtime configuration.
pub mod config;
/// Error taxonomy and per-address last error.
pub mod error;
/// Address, resolution, sockets and transmission.
pub mod transport;
/// OSC value types (time tags, type tags, arguments).
pub mod types;

pub use codec::{Bundle, BundleElement, Message};
pub use config::{TransportConfig, MAX_MSG_SIZE};
pub use error::{Error, LastError, Result};
pub use transport::{
    Address, ClientSocketPool, Protocol, SourceServer, Transmitter, TransmitterBuilder,
};
pub use types::{OscArg, OscType, TimeTag};
