// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error taxonomy for OSC address and transport operations.
//!
//! Every public send operation returns a [`Result`]. The per-address
//! [`LastError`] only mirrors the most recent outcome so callers that keep an
//! [`Address`](crate::Address) around can query it after the fact.

use std::io;

use thiserror::Error;

/// Integer codes stored in [`LastError::code`].
///
/// OS-level failures store the raw `errno` instead; these negative values
/// never collide with it. Resolution failures store the resolver's `EAI_*`
/// code, which is negative on glibc.
pub mod codes {
    /// Unknown type character in a format string.
    pub const UNKNOWN_TYPE: i32 = -1;
    /// Format string and argument list do not agree.
    pub const BAD_FORMAT: i32 = -2;
    /// Protocol tag is not UDP, TCP or Unix-domain (or not available here).
    pub const UNSUPPORTED_PROTOCOL: i32 = -3;
    /// Resolution produced no usable endpoint, or failed without a native code.
    pub const RESOLVE: i32 = -4;
    /// Borrowed server socket cannot carry this address' protocol.
    pub const INCOMPATIBLE_SOCKET: i32 = -5;
    /// URL could not be parsed into an address.
    pub const INVALID_URL: i32 = -6;
    /// I/O failure that carried no OS error code.
    pub const IO: i32 = -7;
    /// Payload exceeds the configured maximum message size.
    pub const OVERSIZE: i32 = 99;
}

/// Errors returned by OSC transport operations.
#[derive(Debug, Error)]
pub enum Error {
    // ========================================================================
    // Argument-build errors (raised before any network activity)
    // ========================================================================
    /// Format string contains a character that is not an OSC type tag.
    #[error("unknown type '{0}'")]
    UnknownType(char),

    /// Format string and argument list disagree (missing, extra or mismatched).
    #[error("bad format/args: {0}")]
    BadFormat(String),

    // ========================================================================
    // Size errors
    // ========================================================================
    /// Payload larger than the maximum message size.
    #[error("attempted to send message of {len} bytes in excess of maximum message size {max}")]
    Oversize {
        /// Serialized payload length.
        len: usize,
        /// Configured ceiling.
        max: usize,
    },

    // ========================================================================
    // Resolution errors
    // ========================================================================
    /// Host/service lookup failed.
    #[error("cannot resolve address: {message}")]
    Resolve {
        /// Resolver code (`EAI_*` from `getaddrinfo` on Unix).
        code: i32,
        /// Resolver message (`gai_strerror` text on Unix).
        message: String,
    },

    /// Lookup succeeded but produced no usable endpoint.
    #[error("no usable address for {host}:{port}")]
    NoCandidates {
        /// Host that was looked up.
        host: String,
        /// Port or service that was looked up.
        port: String,
    },

    // ========================================================================
    // Socket errors
    // ========================================================================
    /// Socket could not be created or configured.
    #[error("socket creation failed: {0}")]
    Socket(#[source] io::Error),

    /// Connect (TCP or Unix-domain) failed; no socket is kept.
    #[error("connect failed: {0}")]
    Connect(#[source] io::Error),

    /// OS-level send failure.
    #[error("send failed: {0}")]
    Send(#[source] io::Error),

    // ========================================================================
    // Contract errors
    // ========================================================================
    /// Protocol tag is invalid or unavailable on this platform.
    #[error("unsupported protocol: {0}")]
    UnsupportedProtocol(String),

    /// The borrowed server socket cannot carry this address' protocol.
    #[error("server socket cannot send {protocol} traffic")]
    IncompatibleSocket {
        /// Protocol of the destination address.
        protocol: crate::Protocol,
    },

    /// URL could not be parsed.
    #[error("invalid OSC URL: {0}")]
    InvalidUrl(String),
}

impl Error {
    /// Integer code recorded in the address' last error.
    pub fn code(&self) -> i32 {
        match self {
            Error::UnknownType(_) => codes::UNKNOWN_TYPE,
            Error::BadFormat(_) => codes::BAD_FORMAT,
            Error::Oversize { .. } => codes::OVERSIZE,
            Error::Resolve { code, .. } => *code,
            Error::NoCandidates { .. } => codes::RESOLVE,
            Error::Socket(e) | Error::Connect(e) | Error::Send(e) => {
                e.raw_os_error().unwrap_or(codes::IO)
            }
            Error::UnsupportedProtocol(_) => codes::UNSUPPORTED_PROTOCOL,
            Error::IncompatibleSocket { .. } => codes::INCOMPATIBLE_SOCKET,
            Error::InvalidUrl(_) => codes::INVALID_URL,
        }
    }

    /// Whether a TCP send may recover by reconnecting once.
    pub fn is_transport_failure(&self) -> bool {
        matches!(self, Error::Connect(_) | Error::Send(_))
    }

    /// Whether the failure happened while building arguments.
    pub fn is_argument_error(&self) -> bool {
        matches!(self, Error::UnknownType(_) | Error::BadFormat(_))
    }
}

/// Convenient alias for results using the crate [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;

/// Snapshot of the most recent failure on an address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastError {
    /// Error code (OS errno for socket failures).
    pub code: i32,
    /// Human-readable message; unset for OS errors until asked for.
    pub message: Option<String>,
}

impl LastError {
    /// Record an error, leaving OS-level messages unresolved.
    pub fn from_error(err: &Error) -> Self {
        let os_level = match err {
            Error::Socket(e) | Error::Connect(e) | Error::Send(e) => e.raw_os_error().is_some(),
            _ => false,
        };
        Self {
            code: err.code(),
            message: if os_level { None } else { Some(err.to_string()) },
        }
    }

    /// Message text, resolving OS error codes on demand.
    pub fn message(&self) -> String {
        match &self.message {
            Some(msg) => msg.clone(),
            None => io::Error::from_raw_os_error(self.code).to_string(),
        }
    }
}
