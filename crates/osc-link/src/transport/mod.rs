// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! OSC transport layer.
//!
//! Moves serialized OSC payloads to UDP, TCP and Unix-domain destinations.
//!
//! # Components
//!
//! - [`Address`]: destination plus its resolution, owned socket and last error
//! - [`Resolve`]: host/port lookup ([`SystemResolver`])
//! - [`SocketProvider`]: opens the socket an address owns ([`SystemProvider`])
//! - [`ClientSocketPool`]: process-wide shared UDP socket
//! - [`SourceServer`]: lends a listening socket for replies
//! - [`Transmitter`]: transmission engine and Send API
//! - [`frame`]: TCP length-prefix framing
//!
//! # Example
//!
//! ```no_run
//! use osc_link::{Address, OscArg, Transmitter};
//!
//! let tx = Transmitter::default();
//! let mut synth = Address::udp("127.0.0.1", "57120");
//! tx.send(&mut synth, "/s_new", "si", [OscArg::from("default"), OscArg::Int32(1000)])?;
//! # Ok::<(), osc_link::Error>(())
//! ```

mod address;
pub mod channel;
mod engine;
pub mod frame;
mod pool;
mod protocol;
mod provision;
mod resolver;
mod sender;
mod server;
pub mod ttl;

pub use address::Address;
pub use channel::Channel;
pub use engine::{Transmitter, TransmitterBuilder};
pub use pool::{ClientSocketPool, SharedSocket};
pub use protocol::Protocol;
pub use provision::{is_limited_broadcast, SocketProvider, SystemProvider};
#[cfg(any(test, feature = "test-util"))]
pub use resolver::StaticResolver;
pub use resolver::{Resolve, SystemResolver};
pub use server::SourceServer;
