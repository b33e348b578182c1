// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Send API: build, serialize and transmit messages and bundles.
//!
//! Argument errors are reported before any network activity. TCP sends that
//! fail on a connect or write are retried once on a fresh connection.

use super::address::Address;
use super::engine::Transmitter;
use super::protocol::Protocol;
use super::server::SourceServer;
use crate::codec::{Bundle, Message};
use crate::error::Result;
use crate::types::{OscArg, TimeTag};

impl Transmitter {
    /// Build a message from `types` and `args` and send it to `path`.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownType`](crate::Error::UnknownType) or
    /// [`Error::BadFormat`](crate::Error::BadFormat) without touching the
    /// network, otherwise any [`transmit`](Transmitter::transmit) error.
    pub fn send<I>(&self, address: &mut Address, path: &str, types: &str, args: I) -> Result<usize>
    where
        I: IntoIterator<Item = OscArg>,
    {
        let message = build_message(address, types, args)?;
        self.send_message(address, path, &message)
    }

    /// Build a message and send it wrapped in a bundle stamped `timetag`.
    pub fn send_timestamped<I>(
        &self,
        address: &mut Address,
        timetag: TimeTag,
        path: &str,
        types: &str,
        args: I,
    ) -> Result<usize>
    where
        I: IntoIterator<Item = OscArg>,
    {
        let message = build_message(address, types, args)?;
        let mut bundle = Bundle::new(timetag);
        bundle.add_message(path, message);
        self.send_bundle(address, &bundle)
    }

    /// Build a message and send it, optionally from a server's socket.
    ///
    /// [`TimeTag::IMMEDIATE`] sends a bare message; any other timetag wraps
    /// it in a bundle.
    pub fn send_from<I>(
        &self,
        address: &mut Address,
        from: Option<&dyn SourceServer>,
        timetag: TimeTag,
        path: &str,
        types: &str,
        args: I,
    ) -> Result<usize>
    where
        I: IntoIterator<Item = OscArg>,
    {
        let message = build_message(address, types, args)?;
        if timetag.is_immediate() {
            self.send_message_from(address, from, path, &message)
        } else {
            let mut bundle = Bundle::new(timetag);
            bundle.add_message(path, message);
            self.send_bundle_from(address, from, &bundle)
        }
    }

    /// Send a built message to `path`.
    pub fn send_message(&self, address: &mut Address, path: &str, message: &Message) -> Result<usize> {
        self.send_message_from(address, None, path, message)
    }

    /// Send a built message, optionally from a server's socket.
    pub fn send_message_from(
        &self,
        address: &mut Address,
        from: Option<&dyn SourceServer>,
        path: &str,
        message: &Message,
    ) -> Result<usize> {
        let payload = message.serialize(path);
        self.deliver(address, from, &payload)
    }

    /// Send a built bundle.
    pub fn send_bundle(&self, address: &mut Address, bundle: &Bundle) -> Result<usize> {
        self.send_bundle_from(address, None, bundle)
    }

    /// Send a built bundle, optionally from a server's socket.
    pub fn send_bundle_from(
        &self,
        address: &mut Address,
        from: Option<&dyn SourceServer>,
        bundle: &Bundle,
    ) -> Result<usize> {
        let payload = bundle.serialize();
        self.deliver(address, from, &payload)
    }

    fn deliver(
        &self,
        address: &mut Address,
        from: Option<&dyn SourceServer>,
        payload: &[u8],
    ) -> Result<usize> {
        match self.transmit(address, from, payload) {
            Err(e) if should_retry(address, from, &e) => {
                log::debug!("[OSC-TX] retrying TCP send to {}: {}", address.url(), e);
                self.transmit(address, from, payload)
            }
            result => result,
        }
    }
}

/// One resend on a fresh connection, only for owned TCP sockets.
fn should_retry(address: &Address, from: Option<&dyn SourceServer>, err: &crate::Error) -> bool {
    address.protocol() == Protocol::Tcp
        && err.is_transport_failure()
        && from.and_then(|server| server.reply_socket()).is_none()
}

fn build_message<I>(address: &mut Address, types: &str, args: I) -> Result<Message>
where
    I: IntoIterator<Item = OscArg>,
{
    let mut message = Message::new();
    if let Err(e) = message.add_typed(types, args) {
        log::debug!("[OSC-TX] not sending to {}: {}", address.url(), e);
        address.record_error(&e);
        return Err(e);
    }
    Ok(message)
}
