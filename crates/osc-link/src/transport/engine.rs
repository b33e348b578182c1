// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Transmission engine: move one serialized payload to an [`Address`].
//!
//! # Send Path
//!
//! ```text
//! transmit(address, from, payload)
//!   1. clear last error
//!   2. payload > max_message_size  -> Oversize (no I/O)
//!   3. resolve host/port if needed (Unix-domain skips)
//!   4. pick socket: server's socket > shared client socket (UDP) > owned socket
//!   5. frame: TCP = u32 BE length + payload, UDP/Unix = raw datagram
//!   6. TCP failure on an owned socket -> socket discarded
//!   7. record last error
//! ```
//!
//! The engine never retries. The TCP resend lives in the Send API
//! (see `sender.rs`).

use std::net::SocketAddr;
use std::sync::Arc;

use socket2::{SockAddr, Socket, Type};

use super::address::Address;
use super::channel::{send_all, Channel};
use super::frame;
use super::pool::ClientSocketPool;
use super::protocol::Protocol;
use super::provision::{is_limited_broadcast, SocketProvider, SystemProvider};
use super::resolver::{Resolve, SystemResolver};
use super::server::SourceServer;
use crate::config::TransportConfig;
use crate::error::{Error, Result};

/// Sends OSC payloads to addresses.
///
/// Cheap to clone; clones share the pool, resolver and provider.
#[derive(Debug, Clone)]
pub struct Transmitter {
    config: TransportConfig,
    pool: Arc<ClientSocketPool>,
    resolver: Arc<dyn Resolve>,
    provider: Arc<dyn SocketProvider>,
}

impl Default for Transmitter {
    fn default() -> Self {
        Self::new(TransportConfig::default())
    }
}

impl Transmitter {
    /// Transmitter using the process-wide pool and OS resolver/sockets.
    #[must_use]
    pub fn new(config: TransportConfig) -> Self {
        Self::builder().config(config).build()
    }

    /// Transmitter configured from `OSC_*` environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(TransportConfig::from_env())
    }

    /// Builder for injecting a pool, resolver or socket provider.
    #[must_use]
    pub fn builder() -> TransmitterBuilder {
        TransmitterBuilder::default()
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Shared client socket pool in use.
    #[must_use]
    pub fn pool(&self) -> &Arc<ClientSocketPool> {
        &self.pool
    }

    /// New address carrying the configured default TTL.
    pub fn address(
        &self,
        protocol: Protocol,
        host: impl Into<String>,
        port: impl Into<String>,
    ) -> Address {
        let mut address = Address::new(protocol, host, port);
        address.set_ttl(self.config.default_ttl);
        address
    }

    /// Parse `url` into an address carrying the configured default TTL.
    ///
    /// # Errors
    ///
    /// See [`Address::from_url`].
    pub fn address_from_url(&self, url: &str) -> Result<Address> {
        let mut address = Address::from_url(url)?;
        address.set_ttl(self.config.default_ttl);
        Ok(address)
    }

    /// Send one already-serialized payload.
    ///
    /// Returns the number of payload bytes sent (the TCP length prefix is not
    /// counted). The outcome is also mirrored in the address' last error.
    ///
    /// # Errors
    ///
    /// - [`Error::Oversize`] before any resolution or socket work
    /// - [`Error::Resolve`] / [`Error::NoCandidates`] (address stays unresolved)
    /// - [`Error::Socket`] / [`Error::Connect`] (no socket kept)
    /// - [`Error::Send`] (TCP: owned socket discarded)
    /// - [`Error::IncompatibleSocket`] when the server socket has the wrong type
    /// - [`Error::UnsupportedProtocol`] for Unix-domain on non-Unix targets
    pub fn transmit(
        &self,
        address: &mut Address,
        from: Option<&dyn SourceServer>,
        payload: &[u8],
    ) -> Result<usize> {
        address.clear_error();
        let result = self.try_transmit(address, from, payload);
        match &result {
            Ok(sent) => log::debug!("[OSC-TX] {} bytes -> {}", sent, address.url()),
            Err(e) => {
                log::debug!("[OSC-TX] send to {} failed: {}", address.url(), e);
                address.record_error(e);
            }
        }
        result
    }

    fn try_transmit(
        &self,
        address: &mut Address,
        from: Option<&dyn SourceServer>,
        payload: &[u8],
    ) -> Result<usize> {
        let max = self.config.max_message_size;
        if payload.len() > max {
            log::warn!(
                "[OSC-TX] rejecting {} byte payload for {} (max {})",
                payload.len(),
                address.url(),
                max
            );
            return Err(Error::Oversize {
                len: payload.len(),
                max,
            });
        }

        self.ensure_resolved(address)?;

        if let Some(socket) = from.and_then(|server| server.reply_socket()) {
            return send_borrowed(address, &socket, payload);
        }

        if address.protocol() == Protocol::Udp && self.config.shared_client_socket {
            // The shared socket is IPv4; other destinations use an owned socket
            if let Some(dest) = address.resolved_addr().filter(SocketAddr::is_ipv4) {
                match self.pool.get_or_init() {
                    Ok(shared) => {
                        let address = &*address;
                        return shared.with(|channel| send_shared(address, channel, dest, payload));
                    }
                    Err(e) => log::debug!(
                        "[OSC-SOCK] shared client socket unavailable, using owned socket: {}",
                        e
                    ),
                }
            }
        }

        self.send_owned(address, payload)
    }

    fn ensure_resolved(&self, address: &mut Address) -> Result<()> {
        if !address.protocol().needs_resolution() || address.is_resolved() {
            return Ok(());
        }
        let candidates =
            self.resolver
                .resolve(address.host(), address.port(), address.protocol())?;
        let Some(first) = candidates.first() else {
            return Err(Error::NoCandidates {
                host: address.host().to_string(),
                port: address.port().to_string(),
            });
        };
        log::debug!(
            "[OSC-RESOLVE] {} -> {} candidate(s), using {}",
            address.url(),
            candidates.len(),
            first
        );
        address.resolved = Some(candidates);
        Ok(())
    }

    fn send_owned(&self, address: &mut Address, payload: &[u8]) -> Result<usize> {
        let protocol = address.protocol();
        let dest = match protocol {
            Protocol::Udp => Some(SockAddr::from(udp_destination(address)?)),
            Protocol::Tcp | Protocol::Unix => None,
        };

        let channel = match address.socket.take() {
            Some(channel) => channel,
            None => self.provider.open(address)?,
        };

        if protocol == Protocol::Udp {
            apply_ttl(channel.as_ref(), address.ttl());
        }

        match write_payload(channel.as_ref(), protocol, dest.as_ref(), payload) {
            Err(e) if protocol == Protocol::Tcp => {
                log::debug!(
                    "[OSC-SOCK] discarding TCP socket for {} after failure",
                    address.url()
                );
                drop(channel);
                Err(e)
            }
            result => {
                address.socket = Some(channel);
                result
            }
        }
    }
}

fn udp_destination(address: &Address) -> Result<SocketAddr> {
    address.resolved_addr().ok_or_else(|| Error::NoCandidates {
        host: address.host().to_string(),
        port: address.port().to_string(),
    })
}

fn apply_ttl(channel: &dyn Channel, ttl: Option<u8>) {
    if let Some(ttl) = ttl {
        // Failure is logged by the TTL helper; the datagram still goes out
        let _ = channel.set_multicast_ttl(ttl);
    }
}

fn send_shared(
    address: &Address,
    channel: &dyn Channel,
    dest: SocketAddr,
    payload: &[u8],
) -> Result<usize> {
    if is_limited_broadcast(&dest) && !channel.broadcast().unwrap_or(false) {
        if let Err(e) = channel.set_broadcast(true) {
            log::warn!("[OSC-SOCK] failed to enable broadcast on shared socket: {}", e);
        }
    }
    apply_ttl(channel, address.ttl());
    write_payload(channel, Protocol::Udp, Some(&SockAddr::from(dest)), payload)
}

/// One send on a server's socket. Options are left untouched.
fn send_borrowed(address: &Address, socket: &Socket, payload: &[u8]) -> Result<usize> {
    let protocol = address.protocol();
    let expected = match protocol {
        Protocol::Tcp => Type::STREAM,
        Protocol::Udp | Protocol::Unix => Type::DGRAM,
    };
    if socket.r#type().map_err(Error::Socket)? != expected {
        return Err(Error::IncompatibleSocket { protocol });
    }

    let dest = match protocol {
        Protocol::Udp => Some(SockAddr::from(udp_destination(address)?)),
        Protocol::Unix => Some(unix_destination(address.port())?),
        Protocol::Tcp => None,
    };
    let channel: &dyn Channel = socket;
    write_payload(channel, protocol, dest.as_ref(), payload)
}

#[cfg(unix)]
fn unix_destination(path: &str) -> Result<SockAddr> {
    super::provision::unix_sockaddr(path).map_err(Error::Socket)
}

#[cfg(not(unix))]
fn unix_destination(_path: &str) -> Result<SockAddr> {
    Err(Error::UnsupportedProtocol(
        "unix-domain sockets are not available on this platform".to_string(),
    ))
}

/// Frame and write `payload`, returning the payload byte count.
fn write_payload(
    channel: &dyn Channel,
    protocol: Protocol,
    dest: Option<&SockAddr>,
    payload: &[u8],
) -> Result<usize> {
    match protocol {
        Protocol::Tcp => {
            send_all(channel, &frame::encode(payload)).map_err(Error::Send)?;
            Ok(payload.len())
        }
        Protocol::Udp | Protocol::Unix => match dest {
            Some(dest) => channel.send_to(payload, dest),
            None => channel.send(payload),
        }
        .map_err(Error::Send),
    }
}

/// Builder for [`Transmitter`].
#[derive(Debug, Default)]
pub struct TransmitterBuilder {
    config: TransportConfig,
    pool: Option<Arc<ClientSocketPool>>,
    resolver: Option<Arc<dyn Resolve>>,
    provider: Option<Arc<dyn SocketProvider>>,
}

impl TransmitterBuilder {
    /// Set the configuration.
    #[must_use]
    pub fn config(mut self, config: TransportConfig) -> Self {
        self.config = config;
        self
    }

    /// Use `pool` instead of the process-wide pool.
    #[must_use]
    pub fn pool(mut self, pool: Arc<ClientSocketPool>) -> Self {
        self.pool = Some(pool);
        self
    }

    /// Use a custom resolver.
    #[must_use]
    pub fn resolver(mut self, resolver: Arc<dyn Resolve>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Use a custom socket provider.
    #[must_use]
    pub fn provider(mut self, provider: Arc<dyn SocketProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Build the transmitter.
    #[must_use]
    pub fn build(self) -> Transmitter {
        let ipv6 = self.config.ipv6;
        Transmitter {
            config: self.config,
            pool: self.pool.unwrap_or_else(ClientSocketPool::global),
            resolver: self
                .resolver
                .unwrap_or_else(|| Arc::new(SystemResolver::new(ipv6))),
            provider: self.provider.unwrap_or_else(|| Arc::new(SystemProvider)),
        }
    }
}
