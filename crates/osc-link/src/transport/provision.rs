// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Socket provisioning: open the one socket an [`Address`] will own.
//!
//! - **TCP**: stream socket connected to the resolved endpoint
//! - **UDP**: unconnected datagram socket, broadcast enabled for 255.255.255.255
//! - **Unix-domain**: datagram socket connected to the (truncated) path
//!
//! A failed connect drops the socket before returning, so an address never
//! owns a half-open descriptor.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use socket2::{Domain, SockAddr, Socket, Type};

use super::address::Address;
use super::channel::Channel;
use super::protocol::Protocol;
use crate::error::{Error, Result};

/// Opens sockets for addresses.
pub trait SocketProvider: Send + Sync + fmt::Debug {
    /// Open a socket suited to `address`.
    ///
    /// UDP and TCP addresses are resolved before this is called.
    fn open(&self, address: &Address) -> Result<Box<dyn Channel>>;
}

/// Provider creating real OS sockets.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProvider;

impl SocketProvider for SystemProvider {
    fn open(&self, address: &Address) -> Result<Box<dyn Channel>> {
        let socket = match address.protocol() {
            Protocol::Tcp => open_tcp(resolved(address)?)?,
            Protocol::Udp => open_udp(resolved(address)?)?,
            Protocol::Unix => open_unix(address.port())?,
        };
        Ok(Box::new(socket))
    }
}

fn resolved(address: &Address) -> Result<SocketAddr> {
    address.resolved_addr().ok_or_else(|| Error::NoCandidates {
        host: address.host().to_string(),
        port: address.port().to_string(),
    })
}

/// Whether `addr` is the IPv4 limited broadcast address.
#[must_use]
pub fn is_limited_broadcast(addr: &SocketAddr) -> bool {
    addr.ip() == IpAddr::V4(Ipv4Addr::BROADCAST)
}

fn open_tcp(dest: SocketAddr) -> Result<Socket> {
    let socket = Socket::new(
        Domain::for_address(dest),
        Type::STREAM,
        Some(socket2::Protocol::TCP),
    )
    .map_err(Error::Socket)?;

    #[cfg(any(target_os = "macos", target_os = "ios"))]
    socket.set_nosigpipe(true).map_err(Error::Socket)?;

    // On failure `socket` is dropped here, closing the descriptor
    socket.connect(&SockAddr::from(dest)).map_err(|e| {
        log::debug!("[OSC-SOCK] TCP connect to {} failed: {}", dest, e);
        Error::Connect(e)
    })?;

    log::debug!("[OSC-SOCK] TCP connected to {}", dest);
    Ok(socket)
}

fn open_udp(dest: SocketAddr) -> Result<Socket> {
    let socket = Socket::new(
        Domain::for_address(dest),
        Type::DGRAM,
        Some(socket2::Protocol::UDP),
    )
    .map_err(Error::Socket)?;

    if is_limited_broadcast(&dest) {
        if let Err(e) = socket.set_broadcast(true) {
            log::warn!("[OSC-SOCK] failed to enable broadcast for {}: {}", dest, e);
        }
    }

    log::debug!("[OSC-SOCK] UDP socket opened for {}", dest);
    Ok(socket)
}

#[cfg(unix)]
fn open_unix(path: &str) -> Result<Socket> {
    let target = unix_sockaddr(path).map_err(Error::Socket)?;
    let socket = Socket::new(Domain::UNIX, Type::DGRAM, None).map_err(Error::Socket)?;
    socket.connect(&target).map_err(|e| {
        log::debug!("[OSC-SOCK] unix connect to {} failed: {}", path, e);
        Error::Connect(e)
    })?;
    log::debug!("[OSC-SOCK] unix socket connected to {}", path);
    Ok(socket)
}

#[cfg(not(unix))]
fn open_unix(_path: &str) -> Result<Socket> {
    Err(Error::UnsupportedProtocol(
        "unix-domain sockets are not available on this platform".to_string(),
    ))
}

/// Socket address for a Unix-domain path, truncated to the platform limit.
#[cfg(unix)]
pub(crate) fn unix_sockaddr(path: &str) -> std::io::Result<SockAddr> {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let limit = crate::config::UNIX_PATH_MAX;
    let bytes = path.as_bytes();
    let truncated = if bytes.len() > limit {
        log::warn!(
            "[OSC-SOCK] unix path truncated to {} bytes: {}",
            limit,
            path
        );
        &bytes[..limit]
    } else {
        bytes
    };
    SockAddr::unix(OsStr::from_bytes(truncated))
}
