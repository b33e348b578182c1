// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Process-wide shared client socket.
//!
//! Plain UDP sends (no source server, no owned socket needed) go out through
//! one IPv4 datagram socket shared by every address. The socket is created on
//! first use and lives until [`ClientSocketPool::shutdown`] or process exit.
//!
//! The pool is injected into [`Transmitter`](crate::Transmitter); tests build
//! a fresh one with [`ClientSocketPool::new`] instead of touching the global.
//!
//! # Thread Safety
//!
//! Each use of the shared socket holds its lock for the TTL update and the
//! single `send_to` call. TCP never goes through the pool.

use std::net::{Ipv4Addr, SocketAddr, UdpSocket};
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;
use socket2::{Domain, Socket, Type};

use super::channel::Channel;
use crate::error::{Error, Result};

static GLOBAL_POOL: OnceLock<Arc<ClientSocketPool>> = OnceLock::new();

/// Outbound UDP socket shared between addresses.
#[derive(Debug)]
pub struct SharedSocket {
    channel: Mutex<Box<dyn Channel>>,
}

impl SharedSocket {
    fn new(channel: Box<dyn Channel>) -> Self {
        Self {
            channel: Mutex::new(channel),
        }
    }

    /// Run `f` with exclusive use of the socket.
    pub fn with<R>(&self, f: impl FnOnce(&dyn Channel) -> R) -> R {
        let guard = self.channel.lock();
        f(guard.as_ref())
    }
}

/// Holder for the lazily created shared client socket.
#[derive(Debug, Default)]
pub struct ClientSocketPool {
    udp: Mutex<Option<Arc<SharedSocket>>>,
}

impl ClientSocketPool {
    /// Empty pool, independent of the process-wide one.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide pool (created if not initialized).
    pub fn global() -> Arc<ClientSocketPool> {
        GLOBAL_POOL
            .get_or_init(|| Arc::new(ClientSocketPool::new()))
            .clone()
    }

    /// Shared socket, if one exists.
    pub fn get(&self) -> Option<Arc<SharedSocket>> {
        self.udp.lock().clone()
    }

    /// Shared socket, creating it on first use.
    ///
    /// # Errors
    ///
    /// [`Error::Socket`] if the socket cannot be created or bound.
    pub fn get_or_init(&self) -> Result<Arc<SharedSocket>> {
        let mut slot = self.udp.lock();
        if let Some(shared) = slot.as_ref() {
            return Ok(Arc::clone(shared));
        }

        let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(socket2::Protocol::UDP))
            .map_err(Error::Socket)?;
        socket
            .bind(&SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0)).into())
            .map_err(Error::Socket)?;
        log::debug!(
            "[OSC-SOCK] shared client socket created on {:?}",
            socket.local_addr().ok().and_then(|a| a.as_socket())
        );

        let shared = Arc::new(SharedSocket::new(Box::new(socket)));
        *slot = Some(Arc::clone(&shared));
        Ok(shared)
    }

    /// Use `socket` as the shared client socket, replacing any existing one.
    pub fn install(&self, socket: UdpSocket) {
        self.install_channel(Box::new(Socket::from(socket)));
    }

    /// Use any channel as the shared client socket.
    pub fn install_channel(&self, channel: Box<dyn Channel>) {
        *self.udp.lock() = Some(Arc::new(SharedSocket::new(channel)));
    }

    /// Release the shared socket.
    ///
    /// In-flight sends keep their handle until they finish; later sends
    /// create a new socket or fall back to per-address sockets.
    pub fn shutdown(&self) {
        if self.udp.lock().take().is_some() {
            log::debug!("[OSC-SOCK] shared client socket released");
        }
    }

    /// Whether a shared socket currently exists.
    pub fn is_initialized(&self) -> bool {
        self.udp.lock().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::channel::mock::MockChannel;

    #[test]
    fn test_lazy_init_once() {
        let pool = ClientSocketPool::new();
        assert!(!pool.is_initialized());
        assert!(pool.get().is_none());

        let a = pool.get_or_init().unwrap();
        let b = pool.get_or_init().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(pool.is_initialized());
    }

    #[test]
    fn test_shutdown_releases() {
        let pool = ClientSocketPool::new();
        let (channel, state) = MockChannel::new();
        pool.install_channel(Box::new(channel));
        assert!(pool.is_initialized());

        pool.shutdown();
        assert!(!pool.is_initialized());
        assert!(state.is_closed());
    }

    #[test]
    fn test_shared_socket_concurrent_use() {
        let pool = Arc::new(ClientSocketPool::new());
        let (channel, state) = MockChannel::new();
        pool.install_channel(Box::new(channel));

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let pool = Arc::clone(&pool);
                std::thread::spawn(move || {
                    let shared = pool.get().unwrap();
                    for _ in 0..25 {
                        shared.with(|ch| ch.send(&[i as u8; 8]).unwrap());
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let writes = state.writes();
        assert_eq!(writes.len(), 100);
        assert!(writes.iter().all(|w| w.len() == 8 && w.iter().all(|b| *b == w[0])));
    }

    #[test]
    fn test_global_is_singleton() {
        assert!(Arc::ptr_eq(
            &ClientSocketPool::global(),
            &ClientSocketPool::global()
        ));
    }
}
