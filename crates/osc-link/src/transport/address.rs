// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! OSC destination address with lazily created transport state.
//!
//! An [`Address`] names one remote endpoint (protocol, host, port or path)
//! and owns everything needed to reach it:
//!
//! - the resolved endpoint list, filled on the first send
//! - at most one open socket, never shared with another address
//! - the last error, mirroring the most recent send result
//!
//! Dropping the address closes its socket and releases the resolution.
//!
//! # URLs
//!
//! ```text
//! osc.udp://localhost:7770/
//! osc.tcp://[::1]:9000/
//! osc.unix:///tmp/synth.sock
//! ```

use std::net::SocketAddr;

use super::channel::Channel;
use super::protocol::Protocol;
use crate::config::URL_SCHEME;
use crate::error::{Error, LastError, Result};

/// A named destination plus its transport state.
#[derive(Debug)]
pub struct Address {
    protocol: Protocol,
    host: String,
    port: String,
    ttl: Option<u8>,
    pub(crate) resolved: Option<Vec<SocketAddr>>,
    pub(crate) socket: Option<Box<dyn Channel>>,
    last_error: Option<LastError>,
}

impl Address {
    /// Create an address. No resolution or socket work happens until the first send.
    ///
    /// For [`Protocol::Unix`], `port` is the socket path and `host` is ignored.
    pub fn new(protocol: Protocol, host: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            protocol,
            host: host.into(),
            port: port.into(),
            ttl: None,
            resolved: None,
            socket: None,
            last_error: None,
        }
    }

    /// UDP destination.
    pub fn udp(host: impl Into<String>, port: impl Into<String>) -> Self {
        Self::new(Protocol::Udp, host, port)
    }

    /// TCP destination.
    pub fn tcp(host: impl Into<String>, port: impl Into<String>) -> Self {
        Self::new(Protocol::Tcp, host, port)
    }

    /// Unix-domain datagram destination.
    pub fn unix(path: impl Into<String>) -> Self {
        Self::new(Protocol::Unix, "localhost", path)
    }

    /// Parse an OSC URL such as `osc.udp://localhost:7770/`.
    ///
    /// A bare `osc://` scheme means UDP.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidUrl`] for malformed URLs, [`Error::UnsupportedProtocol`]
    /// for an unknown `osc.<proto>` scheme.
    pub fn from_url(url: &str) -> Result<Self> {
        let invalid = || Error::InvalidUrl(url.to_string());

        let (scheme, rest) = url.split_once("://").ok_or_else(invalid)?;
        let protocol = if scheme == URL_SCHEME {
            Protocol::Udp
        } else {
            scheme
                .strip_prefix(URL_SCHEME)
                .and_then(|s| s.strip_prefix('.'))
                .ok_or_else(invalid)?
                .parse::<Protocol>()?
        };

        if protocol == Protocol::Unix {
            let path = rest.strip_prefix("localhost").unwrap_or(rest);
            if path.is_empty() {
                return Err(invalid());
            }
            return Ok(Self::unix(path));
        }

        let authority = match rest.strip_prefix('[') {
            // Bracketed IPv6 literal: keep the colons inside the brackets
            Some(inner) => {
                let (host, tail) = inner.split_once(']').ok_or_else(invalid)?;
                let port = tail.strip_prefix(':').ok_or_else(invalid)?;
                let port = port.split('/').next().unwrap_or_default();
                (host, port)
            }
            None => {
                let authority = rest.split('/').next().unwrap_or_default();
                authority.rsplit_once(':').ok_or_else(invalid)?
            }
        };

        let (host, port) = authority;
        if port.is_empty() {
            return Err(invalid());
        }
        Ok(Self::new(protocol, host, port))
    }

    /// URL form of this address.
    #[must_use]
    pub fn url(&self) -> String {
        match self.protocol {
            Protocol::Unix => format!("{}.unix://{}", URL_SCHEME, self.port),
            proto if self.host.contains(':') => {
                format!("{}.{}://[{}]:{}/", URL_SCHEME, proto, self.host, self.port)
            }
            proto => format!("{}.{}://{}:{}/", URL_SCHEME, proto, self.host, self.port),
        }
    }

    /// Transport protocol.
    #[must_use]
    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    /// Host name or literal.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Port (UDP/TCP) or socket path (Unix-domain).
    #[must_use]
    pub fn port(&self) -> &str {
        &self.port
    }

    /// Multicast TTL applied on UDP sends, if any.
    #[must_use]
    pub fn ttl(&self) -> Option<u8> {
        self.ttl
    }

    /// Set or clear the multicast TTL. `None` keeps the socket's default.
    ///
    /// TTL is a socket option: on the shared client socket a value set by one
    /// address stays in effect for later sends from addresses with `None`.
    pub fn set_ttl(&mut self, ttl: Option<u8>) {
        self.ttl = ttl;
    }

    /// Most recent error, cleared at the start of every send.
    #[must_use]
    pub fn last_error(&self) -> Option<&LastError> {
        self.last_error.as_ref()
    }

    /// Code of the most recent error, `0` after a success.
    #[must_use]
    pub fn error_code(&self) -> i32 {
        self.last_error.as_ref().map_or(0, |e| e.code)
    }

    /// Message of the most recent error, resolving OS codes on demand.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        self.last_error.as_ref().map(LastError::message)
    }

    /// Whether host/port resolution has completed.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.resolved.is_some()
    }

    /// Endpoint used for sends (first resolved candidate).
    #[must_use]
    pub fn resolved_addr(&self) -> Option<SocketAddr> {
        self.resolved.as_ref().and_then(|r| r.first().copied())
    }

    /// Whether this address currently owns an open socket.
    #[must_use]
    pub fn has_socket(&self) -> bool {
        self.socket.is_some()
    }

    /// Close the owned socket; the next send opens a fresh one.
    pub fn close(&mut self) {
        if self.socket.take().is_some() {
            log::debug!("[OSC-SOCK] closed socket for {}", self.url());
        }
    }

    /// Close the socket and forget the resolution so the next send looks
    /// the host up again.
    pub fn reset(&mut self) {
        self.close();
        self.resolved = None;
    }

    pub(crate) fn clear_error(&mut self) {
        self.last_error = None;
    }

    pub(crate) fn record_error(&mut self, err: &Error) {
        self.last_error = Some(LastError::from_error(err));
    }
}
