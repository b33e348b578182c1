// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Channel trait: the socket operations the transmission engine needs.
//!
//! This module provides a narrow abstraction over OS sockets so that:
//! - Address-owned sockets, the shared client socket and a server's borrowed
//!   socket go through one code path
//! - Tests can substitute a recording mock
//!
//! `socket2::Socket` implements it directly. A borrowed `socket2::SockRef`
//! derefs to `Socket`, so server sockets need no wrapper.

use std::fmt;
use std::io;

use socket2::{SockAddr, Socket};

use super::ttl;

#[cfg(any(target_os = "linux", target_os = "android"))]
const SEND_FLAGS: libc::c_int = libc::MSG_NOSIGNAL;

#[cfg(not(any(target_os = "linux", target_os = "android")))]
const SEND_FLAGS: std::os::raw::c_int = 0;

/// Socket operations used for one outbound send.
pub trait Channel: Send + fmt::Debug {
    /// Send on a connected socket (TCP, Unix-domain).
    fn send(&self, buf: &[u8]) -> io::Result<usize>;

    /// Send one datagram to `dest` (UDP, borrowed Unix-domain).
    fn send_to(&self, buf: &[u8], dest: &SockAddr) -> io::Result<usize>;

    /// Set the multicast TTL for subsequent datagrams.
    fn set_multicast_ttl(&self, ttl: u8) -> io::Result<()>;

    /// Allow or forbid sends to broadcast addresses.
    fn set_broadcast(&self, enabled: bool) -> io::Result<()>;

    /// Whether broadcast sends are allowed.
    fn broadcast(&self) -> io::Result<bool>;
}

impl Channel for Socket {
    fn send(&self, buf: &[u8]) -> io::Result<usize> {
        self.send_with_flags(buf, SEND_FLAGS)
    }

    fn send_to(&self, buf: &[u8], dest: &SockAddr) -> io::Result<usize> {
        self.send_to_with_flags(buf, dest, SEND_FLAGS)
    }

    fn set_multicast_ttl(&self, ttl: u8) -> io::Result<()> {
        ttl::set_multicast_ttl(self, ttl)
    }

    fn set_broadcast(&self, enabled: bool) -> io::Result<()> {
        Socket::set_broadcast(self, enabled)
    }

    fn broadcast(&self) -> io::Result<bool> {
        Socket::broadcast(self)
    }
}

/// Write all of `buf` on a connected stream channel.
pub(crate) fn send_all(channel: &dyn Channel, mut buf: &[u8]) -> io::Result<usize> {
    let total = buf.len();
    while !buf.is_empty() {
        match channel.send(buf) {
            Ok(0) => {
                return Err(io::Error::new(
                    io::ErrorKind::WriteZero,
                    "socket accepted no bytes",
                ))
            }
            Ok(n) => buf = &buf[n..],
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(total)
}

// ============================================================================
// Test doubles
// ============================================================================

#[cfg(any(test, feature = "test-util"))]
pub mod mock {
    //! Recording channel and scripted socket provider.

    use super::*;
    use crate::error::{Error, Result};
    use crate::transport::{Address, SocketProvider};
    use parking_lot::Mutex;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    /// State shared between a [`MockChannel`] and the test observing it.
    #[derive(Debug, Default)]
    pub struct MockState {
        writes: Mutex<Vec<Vec<u8>>>,
        destinations: Mutex<Vec<Option<SockAddr>>>,
        send_errors: Mutex<VecDeque<io::ErrorKind>>,
        ttl: Mutex<Option<u8>>,
        broadcast: AtomicBool,
        closed: AtomicBool,
    }

    impl MockState {
        /// Payloads successfully written, one entry per send call.
        pub fn writes(&self) -> Vec<Vec<u8>> {
            self.writes.lock().clone()
        }

        /// Destination of each write (`None` for connected sends).
        pub fn destinations(&self) -> Vec<Option<SockAddr>> {
            self.destinations.lock().clone()
        }

        /// Fail the next send with `kind`.
        pub fn fail_next_send(&self, kind: io::ErrorKind) {
            self.send_errors.lock().push_back(kind);
        }

        /// Last multicast TTL set.
        pub fn ttl(&self) -> Option<u8> {
            *self.ttl.lock()
        }

        /// Whether broadcast permission has been enabled.
        pub fn broadcast_enabled(&self) -> bool {
            self.broadcast.load(Ordering::SeqCst)
        }

        /// Whether the channel has been dropped (socket closed).
        pub fn is_closed(&self) -> bool {
            self.closed.load(Ordering::SeqCst)
        }

        fn record(&self, buf: &[u8], dest: Option<&SockAddr>) -> io::Result<usize> {
            if let Some(kind) = self.send_errors.lock().pop_front() {
                return Err(io::Error::new(kind, "injected error"));
            }
            self.writes.lock().push(buf.to_vec());
            self.destinations.lock().push(dest.cloned());
            Ok(buf.len())
        }
    }

    /// Channel that records writes instead of touching the network.
    #[derive(Debug)]
    pub struct MockChannel {
        state: Arc<MockState>,
    }

    impl MockChannel {
        /// Create a channel and the handle observing it.
        pub fn new() -> (Self, Arc<MockState>) {
            let state = Arc::new(MockState::default());
            (
                Self {
                    state: Arc::clone(&state),
                },
                state,
            )
        }
    }

    impl Drop for MockChannel {
        fn drop(&mut self) {
            self.state.closed.store(true, Ordering::SeqCst);
        }
    }

    impl Channel for MockChannel {
        fn send(&self, buf: &[u8]) -> io::Result<usize> {
            self.state.record(buf, None)
        }

        fn send_to(&self, buf: &[u8], dest: &SockAddr) -> io::Result<usize> {
            self.state.record(buf, Some(dest))
        }

        fn set_multicast_ttl(&self, ttl: u8) -> io::Result<()> {
            *self.state.ttl.lock() = Some(ttl);
            Ok(())
        }

        fn set_broadcast(&self, enabled: bool) -> io::Result<()> {
            self.state.broadcast.store(enabled, Ordering::SeqCst);
            Ok(())
        }

        fn broadcast(&self) -> io::Result<bool> {
            Ok(self.state.broadcast.load(Ordering::SeqCst))
        }
    }

    /// What the next `open` call does.
    #[derive(Debug, Clone, Copy)]
    pub enum OpenScript {
        /// Connect fails with this error kind.
        ConnectFails(io::ErrorKind),
        /// Channel opens, first send fails with this error kind.
        SendFails(io::ErrorKind),
    }

    /// Socket provider handing out [`MockChannel`]s.
    ///
    /// Opens follow the queued scripts; once the queue is empty every open
    /// yields a healthy channel.
    #[derive(Debug, Default)]
    pub struct MockProvider {
        script: Mutex<VecDeque<OpenScript>>,
        opened: Mutex<Vec<Arc<MockState>>>,
        attempts: Mutex<usize>,
    }

    impl MockProvider {
        /// Create a provider with an empty script.
        pub fn new() -> Self {
            Self::default()
        }

        /// Queue behaviour for the next open.
        pub fn push(&self, step: OpenScript) {
            self.script.lock().push_back(step);
        }

        /// Open calls, including failed connects.
        pub fn attempts(&self) -> usize {
            *self.attempts.lock()
        }

        /// Channels successfully opened, in order.
        pub fn opened(&self) -> Vec<Arc<MockState>> {
            self.opened.lock().clone()
        }
    }

    impl SocketProvider for MockProvider {
        fn open(&self, _address: &Address) -> Result<Box<dyn Channel>> {
            *self.attempts.lock() += 1;
            let (channel, state) = MockChannel::new();
            match self.script.lock().pop_front() {
                Some(OpenScript::ConnectFails(kind)) => {
                    return Err(Error::Connect(io::Error::new(kind, "injected connect error")))
                }
                Some(OpenScript::SendFails(kind)) => state.fail_next_send(kind),
                None => {}
            }
            self.opened.lock().push(state);
            Ok(Box::new(channel))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockChannel;
    use super::*;
    use socket2::{Domain, Protocol, Type};

    #[test]
    fn test_socket_is_object_safe_channel() {
        let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP)).unwrap();
        let channel: &dyn Channel = &socket;
        assert!(!channel.broadcast().unwrap());
        channel.set_broadcast(true).unwrap();
        assert!(channel.broadcast().unwrap());
    }

    #[test]
    fn test_send_all_retries_nothing_on_success() {
        let (channel, state) = MockChannel::new();
        assert_eq!(send_all(&channel, b"abc").unwrap(), 3);
        assert_eq!(state.writes(), vec![b"abc".to_vec()]);
    }

    #[test]
    fn test_mock_error_injection() {
        let (channel, state) = MockChannel::new();
        state.fail_next_send(io::ErrorKind::BrokenPipe);
        let err = channel.send(b"x").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        // injected error is consumed by one send
        assert!(channel.send(b"x").is_ok());
        assert_eq!(state.writes().len(), 1);
    }

    #[test]
    fn test_mock_close_on_drop() {
        let (channel, state) = MockChannel::new();
        assert!(!state.is_closed());
        drop(channel);
        assert!(state.is_closed());
    }
}
