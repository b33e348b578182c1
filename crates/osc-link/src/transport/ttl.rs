// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Multicast TTL (hop limit) for UDP sends.
//!
//! | TTL | Scope |
//! |-----|-------|
//! | 0 | Same host |
//! | 1 | Link-local (OS default) |
//! | 32 | Site-local |
//! | 255 | Unrestricted |
//!
//! An [`Address`](crate::Address) with no TTL leaves the socket's value alone.

use socket2::Socket;
use std::io;

/// Set the multicast TTL (IPv4) or hop limit (IPv6) on a socket.
pub fn set_multicast_ttl(socket: &Socket, ttl: u8) -> io::Result<()> {
    let result = if is_ipv6(socket) {
        socket.set_multicast_hops_v6(u32::from(ttl))
    } else {
        socket.set_multicast_ttl_v4(u32::from(ttl))
    };

    match result {
        Ok(()) => {
            log::debug!("[TTL] Set multicast TTL={}", ttl);
            Ok(())
        }
        Err(err) => {
            log::warn!("[TTL] Failed to set multicast TTL={}: {}", ttl, err);
            Err(err)
        }
    }
}

/// Current multicast TTL of a socket.
#[cfg(test)]
fn multicast_ttl(socket: &Socket) -> Option<u8> {
    let value = if is_ipv6(socket) {
        socket.multicast_hops_v6().ok()?
    } else {
        socket.multicast_ttl_v4().ok()?
    };
    // TTL is 8-bit on the wire; clamp values from odd drivers
    Some(value.min(255) as u8)
}

fn is_ipv6(socket: &Socket) -> bool {
    socket
        .local_addr()
        .map(|addr| addr.is_ipv6())
        .unwrap_or(false)
}
