// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Source server seam for replies sent from a listening socket.
//!
//! A server lends its socket so a reply leaves from the same local endpoint
//! the request arrived on. The engine calls `send` on it at most once per
//! transmission and never closes it, binds it or changes its options.

use std::net::{TcpStream, UdpSocket};

use socket2::SockRef;

/// A server whose listening socket may be borrowed for one send.
pub trait SourceServer {
    /// Socket to send from, or `None` if the server has none open.
    fn reply_socket(&self) -> Option<SockRef<'_>>;
}

impl SourceServer for UdpSocket {
    fn reply_socket(&self) -> Option<SockRef<'_>> {
        Some(SockRef::from(self))
    }
}

impl SourceServer for TcpStream {
    fn reply_socket(&self) -> Option<SockRef<'_>> {
        Some(SockRef::from(self))
    }
}

#[cfg(unix)]
impl SourceServer for std::os::unix::net::UnixDatagram {
    fn reply_socket(&self) -> Option<SockRef<'_>> {
        Some(SockRef::from(self))
    }
}

impl<S: SourceServer + ?Sized> SourceServer for &S {
    fn reply_socket(&self) -> Option<SockRef<'_>> {
        (**self).reply_socket()
    }
}
